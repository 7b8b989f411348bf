//! Header component

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Render the header bar with the navigation trail
pub fn render(frame: &mut Frame, area: Rect, breadcrumb: &[&str], theme: &Theme) {
    let time_str = chrono::Local::now().format("%H:%M").to_string();
    let trail = breadcrumb.join(" › ");

    let used = trail.chars().count() + time_str.len() + 14;
    let header_text = Line::from(vec![
        Span::styled(
            " SIGN&GO ",
            Style::default()
                .fg(Color::White)
                .bg(theme.brand_dark)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(trail, theme.text().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(format!(" {} ", time_str), theme.text_muted()),
    ]);

    let header = Paragraph::new(header_text).style(Style::default().bg(theme.selection));
    frame.render_widget(header, area);
}
