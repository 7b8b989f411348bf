//! Digital Signature screen - drawing pad

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use signgo_core::StatusProjection;

use crate::app::App;
use crate::ui::components::header;
use crate::ui::layout::{render_footer, section_block, ScreenLayout};

const INK: char = '█';

/// Render the signature pad
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = ScreenLayout::new(frame.area());
    header::render(frame, layout.header, &app.router.breadcrumb(), &app.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(layout.content);

    let theme = &app.theme;
    let booking_line = match app.store.current_booking() {
        Some(booking) => {
            let projection = StatusProjection::of(booking);
            Line::from(vec![
                Span::styled(format!("Booking #{}  ", booking.booking_number), theme.text()),
                Span::styled(format!(" {} ", projection.label), theme.status_badge(projection.tone)),
            ])
        }
        None => Line::styled("No active booking", theme.text_muted()),
    };
    let intro = Paragraph::new(vec![
        Line::styled("Draw your signature below", theme.title()),
        booking_line,
    ])
    .alignment(Alignment::Center);
    frame.render_widget(intro, chunks[0]);

    let block = section_block("Signature Area", true, theme);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let signature = &mut app.state.signature;
    signature.pad.resize(inner.width, inner.height);
    signature.pad_area = inner;

    let ink = Style::default().fg(app.theme.text_primary);
    let buf = frame.buffer_mut();
    for (x, y) in signature.pad.inked_cells() {
        if let Some(cell) = buf.cell_mut((inner.x + x, inner.y + y)) {
            cell.set_char(INK).set_style(ink);
        }
    }

    let (cx, cy) = signature.pad.cursor();
    let cursor_style = if signature.pad.is_pen_down() {
        Style::default().fg(app.theme.brand).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text_muted)
    };
    if let Some(cell) = buf.cell_mut((inner.x + cx, inner.y + cy)) {
        let symbol = if signature.pad.is_pen_down() { '●' } else { '+' };
        cell.set_char(symbol).set_style(cursor_style);
    }

    let status = if signature.submitting {
        Line::styled("Saving signature...", app.theme.info())
    } else if signature.pad.is_pen_down() {
        Line::styled("Pen down: move to draw, Space to lift", app.theme.text_secondary())
    } else {
        Line::styled(
            "Tip: drag with the mouse, or use the arrows with Space as the pen",
            app.theme.text_muted(),
        )
    };
    frame.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        chunks[2],
    );

    render_footer(
        frame,
        layout.footer,
        &[
            ("←↑↓→", "Move"),
            ("Space", "Pen"),
            ("c", "Clear"),
            ("Enter", "Save"),
            ("Esc", "Cancel"),
        ],
        &app.theme,
    );
}
