pub mod applications;
pub mod connection;
pub mod promo_codes;

pub use connection::{init_db, Database};
