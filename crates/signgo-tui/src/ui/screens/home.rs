//! Home screen - main menu

use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph};

use crate::app::{App, MenuItem};
use crate::ui::components::header;
use crate::ui::layout::{render_footer, section_block, ScreenLayout};

/// Render the home menu
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = ScreenLayout::new(frame.area());
    let theme = &app.theme;

    header::render(frame, layout.header, &app.router.breadcrumb(), theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(layout.content);

    let welcome = Paragraph::new(vec![
        Line::styled("Welcome to Sign&Go", theme.title()),
        Line::styled(
            "Track shipments, capture signatures and report incidents",
            theme.text_secondary(),
        ),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(welcome, chunks[0]);

    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let selected = i == app.state.menu_index;
            let marker = if selected { "▸" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} {:<18}", marker, item.label()), theme.menu_item(selected)),
                Span::styled(item.description(), theme.text_muted()),
            ]))
        })
        .collect();

    let menu = List::new(items).block(section_block("Menu", true, theme));
    frame.render_widget(menu, chunks[1]);

    render_footer(
        frame,
        layout.footer,
        &[("↑↓", "Select"), ("Enter", "Open"), ("q", "Quit")],
        theme,
    );
}
