//! Reusable UI components

pub mod alert;
pub mod header;
pub mod notification;
pub mod route_map;
