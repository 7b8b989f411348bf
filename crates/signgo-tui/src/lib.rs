//! Sign&Go TUI Library
//!
//! Terminal screens for the Sign&Go courier client: booking tracking with a
//! route map, signature capture and incident reporting.

pub mod app;
pub mod ui;
pub mod utils;

pub use app::App;
