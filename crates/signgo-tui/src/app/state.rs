//! Application state

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use signgo_core::{
    Alert, CapturedSignature, IncidentForm, IncidentKind, MapDestinations, SignaturePad,
};
use tui_textarea::TextArea;

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Splash shown for a fixed delay at startup
    #[default]
    Loading,

    /// Main menu
    Home,

    /// Booking search, status card and route map
    TrackOrder,

    /// Signature pad that advances the booking status
    Signature,

    /// Incident report form
    ReportIncident,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Loading => "Sign&Go",
            Screen::Home => "Home",
            Screen::TrackOrder => "Track Order",
            Screen::Signature => "Digital Signature",
            Screen::ReportIncident => "Report Incident",
        }
    }
}

/// Home menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    TrackOrder,
    Signature,
    ReportIncident,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::TrackOrder,
        MenuItem::Signature,
        MenuItem::ReportIncident,
        MenuItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::TrackOrder => "Track Order",
            MenuItem::Signature => "Digital Signature",
            MenuItem::ReportIncident => "Report Incident",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuItem::TrackOrder => "Search a booking and follow it on the map",
            MenuItem::Signature => "Sign for the current booking",
            MenuItem::ReportIncident => "File a land or sea incident",
            MenuItem::Quit => "Exit application",
        }
    }
}

/// What the Track Order screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackMode {
    #[default]
    NoSearchYet,
    Searching,
    Found,
    NotFound,
    Error,
}

/// Which part of the Track Order screen takes keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackFocus {
    #[default]
    Search,
    Actions,
}

/// Buttons under the booking card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
    Sign,
    Report,
    ExportMap,
    Retry,
}

impl TrackAction {
    pub const ALL: [TrackAction; 4] = [
        TrackAction::Sign,
        TrackAction::Report,
        TrackAction::ExportMap,
        TrackAction::Retry,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TrackAction::Sign => "Sign",
            TrackAction::Report => "Report",
            TrackAction::ExportMap => "Export Map",
            TrackAction::Retry => "Retry",
        }
    }
}

/// Track Order screen state
pub struct TrackState {
    pub mode: TrackMode,
    pub focus: TrackFocus,
    pub search: TextArea<'static>,
    pub action_index: usize,
    /// Pins for the booking on the card, once resolved
    pub destinations: Option<MapDestinations>,
}

impl TrackState {
    pub fn new() -> Self {
        Self {
            mode: TrackMode::NoSearchYet,
            focus: TrackFocus::Search,
            search: single_line("Booking or HWB number"),
            action_index: 0,
            destinations: None,
        }
    }

    pub fn query(&self) -> String {
        self.search.lines().join("")
    }

    pub fn selected_action(&self) -> TrackAction {
        TrackAction::ALL[self.action_index.min(TrackAction::ALL.len() - 1)]
    }
}

impl Default for TrackState {
    fn default() -> Self {
        Self::new()
    }
}

/// Signature screen state
pub struct SignatureState {
    pub pad: SignaturePad,
    /// Where the pad was last drawn, for mapping mouse positions
    pub pad_area: Rect,
    pub submitting: bool,
    pub captured: Option<CapturedSignature>,
}

impl SignatureState {
    pub fn new() -> Self {
        Self {
            pad: SignaturePad::new(60, 12),
            pad_area: Rect::default(),
            submitting: false,
            captured: None,
        }
    }

    /// Pad cell under a terminal position, if inside the pad
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        let area = self.pad_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| (column - area.x, row - area.y))
    }
}

impl Default for SignatureState {
    fn default() -> Self {
        Self::new()
    }
}

/// Incident form fields in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncidentField {
    Kind,
    #[default]
    Description,
    TotalCost,
    ImagePath,
    Submit,
}

impl IncidentField {
    const ORDER: [IncidentField; 5] = [
        IncidentField::Kind,
        IncidentField::Description,
        IncidentField::TotalCost,
        IncidentField::ImagePath,
        IncidentField::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Report Incident screen state
pub struct IncidentState {
    pub kind: IncidentKind,
    pub field: IncidentField,
    pub description: TextArea<'static>,
    pub total_cost: TextArea<'static>,
    pub image_path: TextArea<'static>,
    pub submitting: bool,
}

impl IncidentState {
    pub fn new() -> Self {
        let mut description = TextArea::default();
        description.set_placeholder_text("What happened?");
        description.set_cursor_line_style(Style::default());

        Self {
            kind: IncidentKind::default(),
            field: IncidentField::default(),
            description,
            total_cost: single_line("0"),
            image_path: single_line("Optional photo path"),
            submitting: false,
        }
    }

    /// The form as typed
    pub fn form(&self) -> IncidentForm {
        let image_path = self.image_path.lines().join("");
        IncidentForm {
            kind: self.kind,
            description: self.description.lines().join("\n"),
            total_cost: self.total_cost.lines().join(""),
            image_path: (!image_path.trim().is_empty()).then_some(image_path),
        }
    }

    /// Text input behind the focused field, if it is one
    pub fn focused_input(&mut self) -> Option<&mut TextArea<'static>> {
        match self.field {
            IncidentField::Description => Some(&mut self.description),
            IncidentField::TotalCost => Some(&mut self.total_cost),
            IncidentField::ImagePath => Some(&mut self.image_path),
            IncidentField::Kind | IncidentField::Submit => None,
        }
    }
}

impl Default for IncidentState {
    fn default() -> Self {
        Self::new()
    }
}

fn single_line(placeholder: &str) -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_placeholder_text(placeholder.to_string());
    input.set_cursor_line_style(Style::default());
    input.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    input
}

/// Application state
pub struct AppState {
    pub current_screen: Screen,

    /// Home menu selection index
    pub menu_index: usize,

    /// When the splash screen gives way to Home
    pub loading_deadline: Instant,

    pub track: TrackState,
    pub signature: SignatureState,
    pub incident: IncidentState,

    /// Modal alert awaiting dismissal
    pub alert: Option<Alert>,
}

impl AppState {
    pub fn new(loading_deadline: Instant) -> Self {
        Self {
            current_screen: Screen::Loading,
            menu_index: 0,
            loading_deadline,
            track: TrackState::new(),
            signature: SignatureState::new(),
            incident: IncidentState::new(),
            alert: None,
        }
    }

    pub fn selected_menu_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_index.min(MenuItem::ALL.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IncidentField::Kind, IncidentField::Description)]
    #[case(IncidentField::ImagePath, IncidentField::Submit)]
    #[case(IncidentField::Submit, IncidentField::Kind)]
    fn test_incident_field_cycle(#[case] from: IncidentField, #[case] to: IncidentField) {
        assert_eq!(from.next(), to);
        assert_eq!(to.prev(), from);
    }

    #[test]
    fn test_incident_form_from_inputs() {
        let mut state = IncidentState::new();
        state.kind = IncidentKind::Sea;
        state.description.insert_str("Container fell overboard");
        state.total_cost.insert_str("12000");

        let form = state.form();
        assert_eq!(form.kind, IncidentKind::Sea);
        assert_eq!(form.description, "Container fell overboard");
        assert_eq!(form.total_cost, "12000");
        assert_eq!(form.image_path, None);

        state.image_path.insert_str("/tmp/photo.jpg");
        assert_eq!(state.form().image_path.as_deref(), Some("/tmp/photo.jpg"));
    }

    #[test]
    fn test_pad_cell_mapping() {
        let mut state = SignatureState::new();
        state.pad_area = Rect::new(10, 5, 20, 8);

        assert_eq!(state.cell_at(10, 5), Some((0, 0)));
        assert_eq!(state.cell_at(29, 12), Some((19, 7)));
        assert_eq!(state.cell_at(30, 12), None);
        assert_eq!(state.cell_at(9, 6), None);
    }
}
