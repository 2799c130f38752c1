pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{card, stat_tiles, status_badge, timeline};
pub use layouts::desktop::desktop_layout;
