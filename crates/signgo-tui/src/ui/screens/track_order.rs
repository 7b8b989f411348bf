//! Track Order screen - search, booking card and route map

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use signgo_core::{format_distance, Booking, StatusProjection, NOT_AVAILABLE};

use crate::app::{App, TrackAction, TrackFocus, TrackMode};
use crate::ui::components::header;
use crate::ui::components::route_map::RouteMap;
use crate::ui::layout::{render_footer, section_block, ScreenLayout};
use crate::ui::Theme;
use crate::utils::{or_not_available, truncate};

/// Render the tracking screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = ScreenLayout::new(frame.area());
    header::render(frame, layout.header, &app.router.breadcrumb(), &app.theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout.content);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(columns[0]);

    render_search(frame, left[0], app);
    render_body(frame, left[1], app);

    let booking = app.store.current_booking();
    let destinations = match app.state.track.mode {
        TrackMode::Found => app.state.track.destinations.as_ref(),
        _ => None,
    };
    let title = match (booking, destinations) {
        (Some(_), None) if app.state.track.mode == TrackMode::Found => "Route (locating...)",
        _ => "Route",
    };
    RouteMap {
        user: app.user_location,
        destinations,
    }
    .render(frame, columns[1], section_block(title, false, &app.theme), &app.theme);

    let hints: &[(&str, &str)] = match app.state.track.focus {
        TrackFocus::Search => &[("Enter", "Search"), ("Tab", "Actions"), ("Esc", "Back")],
        TrackFocus::Actions => &[("←→", "Select"), ("Enter", "Run"), ("Tab", "Search"), ("Esc", "Back")],
    };
    render_footer(frame, layout.footer, hints, &app.theme);
}

fn render_search(frame: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.state.track.focus == TrackFocus::Search;
    let block = section_block("Booking / HWB Number", focused, &app.theme);
    app.state.track.search.set_block(block);
    frame.render_widget(&app.state.track.search, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = section_block("Shipment", app.state.track.focus == TrackFocus::Actions, theme);

    let lines = match (app.state.track.mode, app.store.current_booking()) {
        (TrackMode::Found, Some(booking)) => card_lines(booking, app),
        (TrackMode::Searching, _) => {
            let spinner = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            vec![Line::styled(
                format!("{} Searching...", spinner[app.tick as usize % spinner.len()]),
                theme.text_secondary(),
            )]
        }
        (TrackMode::NotFound, _) => vec![
            Line::styled("No booking found", theme.warning()),
            Line::styled("Check the number and search again.", theme.text_muted()),
        ],
        (TrackMode::Error, _) => vec![
            Line::styled("Search failed", theme.danger()),
            Line::styled("Press Enter to try again.", theme.text_muted()),
        ],
        _ => vec![
            Line::styled("Track your shipment", theme.title()),
            Line::styled(
                "Enter a booking or HWB number and press Enter.",
                theme.text_muted(),
            ),
        ],
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    if app.state.track.mode == TrackMode::Found {
        render_actions(frame, chunks[1], app);
    }
}

fn card_lines<'a>(booking: &'a Booking, app: &App) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let projection = StatusProjection::of(booking);

    let distance = match app.state.track.destinations.as_ref() {
        Some(d) => d
            .current
            .as_ref()
            .map(|p| format!("  ({})", format_distance(app.user_location.distance_km(&p.coords)))),
        None => None,
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("Booking #{}  ", booking.booking_number), theme.title()),
            Span::styled(format!(" {} ", projection.label), theme.status_badge(projection.tone)),
        ]),
        field("HWB", or_not_available(&booking.hwb_number), theme),
        field(
            "Booked On",
            &booking.booked_on().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            theme,
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("{}: ", projection.current_location.label), theme.text_muted()),
            Span::styled(truncate(&projection.current_location.location, 60), theme.text()),
            Span::styled(distance.unwrap_or_default(), theme.info()),
        ]),
    ];

    if let Some(next) = &projection.next_destination {
        lines.push(field("Next Destination", next, theme));
    }

    lines.push(Line::raw(""));
    lines.push(field("Shipper", or_not_available(&booking.shipper), theme));
    lines.push(field("Consignee", or_not_available(&booking.consignee), theme));
    lines
}

fn field<'a>(label: &str, value: &str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), theme.text_muted()),
        Span::styled(value.to_string(), theme.text()),
    ])
}

fn render_actions(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.state.track.focus == TrackFocus::Actions;
    let spans: Vec<Span> = TrackAction::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, action)| {
            let selected = focused && i == app.state.track.action_index;
            [
                Span::styled(format!(" {} ", action.label()), app.theme.button(selected)),
                Span::raw(" "),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
