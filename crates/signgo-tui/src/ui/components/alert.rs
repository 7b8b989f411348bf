//! Modal alert dialog

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use signgo_core::Alert;

use crate::ui::{layout::centered_rect_fixed, Theme};

/// Render `alert` centered over `area`
pub fn render(frame: &mut Frame, area: Rect, alert: &Alert, theme: &Theme) {
    let width = (alert.message.chars().count() as u16 + 6).clamp(30, 60);
    let dialog_area = centered_rect_fixed(width, 8, area);

    frame.render_widget(Clear, dialog_area);

    let style = title_style(&alert.title, theme);
    let block = Block::default()
        .title(format!(" {} ", alert.title))
        .title_style(style)
        .borders(Borders::ALL)
        .border_style(style);

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    let message = Paragraph::new(alert.message.as_str())
        .style(theme.text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, chunks[0]);

    let help = Paragraph::new("[Enter] OK")
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}

fn title_style(title: &str, theme: &Theme) -> Style {
    match title {
        "Success" | "Signature Captured" => theme.success().add_modifier(Modifier::BOLD),
        "Not Found" => theme.warning().add_modifier(Modifier::BOLD),
        _ => theme.danger(),
    }
}
