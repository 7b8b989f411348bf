//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::{App, Screen};

/// Main render function - delegates to the current screen, then overlays
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.state.current_screen {
        Screen::Loading => screens::loading::render(frame, app),
        Screen::Home => screens::home::render(frame, app),
        Screen::TrackOrder => screens::track_order::render(frame, app),
        Screen::Signature => screens::signature::render(frame, app),
        Screen::ReportIncident => screens::report_incident::render(frame, app),
    }

    let area = frame.area();
    app.notifications.render(frame, area, &app.theme);
    if let Some(alert) = &app.state.alert {
        components::alert::render(frame, area, alert, &app.theme);
    }
}
