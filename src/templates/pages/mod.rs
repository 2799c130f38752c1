pub mod admin;
pub mod application;
pub mod error;
pub mod home;
pub mod promo_codes;
pub mod track;

pub use admin::{admin_page, AdminVm};
pub use application::{application_page, ApplicationVm};
pub use error::error_page;
pub use home::home_page;
pub use promo_codes::promo_codes_page;
pub use track::{track_page, TrackVm};
