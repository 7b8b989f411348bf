//! Report Incident screen - incident form

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use signgo_core::{IncidentKind, IncidentMode};

use crate::app::{App, IncidentField};
use crate::ui::components::header;
use crate::ui::layout::{render_footer, section_block, ScreenLayout};

/// Render the incident form
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = ScreenLayout::new(frame.area());
    header::render(frame, layout.header, &app.router.breadcrumb(), &app.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Booking
            Constraint::Length(3), // Type
            Constraint::Min(5),    // Description
            Constraint::Length(3), // Total cost
            Constraint::Length(3), // Image
            Constraint::Length(1), // Submit
        ])
        .split(layout.content);

    let booking = match app.store.current_booking() {
        Some(b) => Line::from(vec![
            Span::styled("Booking: ", app.theme.text_muted()),
            Span::styled(b.booking_number.clone(), app.theme.text()),
        ]),
        None => Line::styled("No active booking - search one in Track Order first", app.theme.warning()),
    };
    frame.render_widget(Paragraph::new(booking), chunks[0]);

    let field = app.state.incident.field;
    let kind = app.state.incident.kind;
    let kind_line = Line::from(
        [IncidentKind::Land, IncidentKind::Sea]
            .into_iter()
            .flat_map(|k| {
                let marker = if k == kind { "(•)" } else { "( )" };
                [
                    Span::styled(format!("{} {}", marker, k.code()), app.theme.menu_item(k == kind)),
                    Span::raw("    "),
                ]
            })
            .collect::<Vec<_>>(),
    );
    frame.render_widget(
        Paragraph::new(kind_line).block(section_block("Type", field == IncidentField::Kind, &app.theme)),
        chunks[1],
    );

    let incident = &mut app.state.incident;
    let inputs = [
        (&mut incident.description, "Description", IncidentField::Description, chunks[2]),
        (&mut incident.total_cost, "Total Cost", IncidentField::TotalCost, chunks[3]),
        (&mut incident.image_path, "Image Path", IncidentField::ImagePath, chunks[4]),
    ];
    for (input, title, which, area) in inputs {
        input.set_block(section_block(title, field == which, &app.theme));
        frame.render_widget(&*input, area);
    }

    let submit_label = if incident.submitting {
        " Submitting... ".to_string()
    } else {
        match app.config.incident_mode {
            IncidentMode::Upload => " Submit Report ".to_string(),
            IncidentMode::Acknowledge => " Submit Report (offline) ".to_string(),
        }
    };
    frame.render_widget(
        Paragraph::new(Span::styled(submit_label, app.theme.button(field == IncidentField::Submit)))
            .alignment(Alignment::Center),
        chunks[5],
    );

    render_footer(
        frame,
        layout.footer,
        &[
            ("Tab", "Next field"),
            ("←→", "Type"),
            ("Ctrl+S", "Submit"),
            ("Esc", "Back"),
        ],
        &app.theme,
    );
}
