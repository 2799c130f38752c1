mod admin_tests;
mod api_tests;
mod promo_code_tests;
mod track_tests;
