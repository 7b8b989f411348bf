//! Splash screen shown while the app starts

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Gauge, Paragraph};

use crate::app::App;
use crate::ui::layout::centered_rect_fixed;

const LOGO: &str = r#"
  ____  _               ___      ____
 / ___|(_) __ _ _ __   ( _ )    / ___| ___
 \___ \| |/ _` | '_ \  / _ \/\ | |  _ / _ \
  ___) | | (_| | | | || (_>  < | |_| | (_) |
 |____/|_|\__, |_| |_| \___/\/  \____|\___/
          |___/
"#;

const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];

/// Draw the splash screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(48, 12, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let logo = Paragraph::new(LOGO.trim_matches('\n'))
        .style(app.theme.title())
        .alignment(Alignment::Left);
    frame.render_widget(logo, chunks[0]);

    let spinner = SPINNER[(app.tick / 2) as usize % SPINNER.len()];
    let subtitle = Paragraph::new(format!("{} Loading courier tools...", spinner))
        .style(app.theme.text_secondary())
        .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let total = app.config.splash_delay().as_secs_f64();
    let remaining = app
        .state
        .loading_deadline
        .saturating_duration_since(Instant::now())
        .as_secs_f64();
    let ratio = if total > 0.0 {
        (1.0 - remaining / total).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(app.theme.brand).bg(app.theme.selection))
        .ratio(ratio)
        .label("");
    frame.render_widget(gauge, chunks[3]);
}
