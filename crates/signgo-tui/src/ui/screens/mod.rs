//! Screen modules for different views

pub mod home;
pub mod loading;
pub mod report_incident;
pub mod signature;
pub mod track_order;
