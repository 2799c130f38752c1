pub mod application;
pub mod pricing;
pub mod stats;
pub mod status;
pub mod timeline;
pub mod view;
