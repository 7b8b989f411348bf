//! Application state and event handling

mod config;
mod events;
mod router;
mod state;

pub use config::{ClientConfig, ConfigError};
pub use events::{Event, EventHandler};
pub use router::Router;
pub use state::{
    AppState, IncidentField, IncidentState, MenuItem, Screen, SignatureState, TrackAction,
    TrackFocus, TrackMode, TrackState,
};

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use signgo_core::incident::{submit_incident, SUBMITTED, SUBMIT_FAILED};
use signgo_core::location::user_location_or_default;
use signgo_core::signature::{CAPTURED_MESSAGE, CAPTURED_TITLE, SIGNATURE_REQUIRED};
use signgo_core::{
    advance_on_signature, Alert, ApiResult, Booking, BookingApi, BookingStore, Coordinates, Geocoder,
    LocationProvider, MapDestinations, MapDocument, RequestToken, SearchOutcome, SearchRequest,
    UpdateOutcome, UpdateRequest,
};
use tracing::{debug, info, warn};

use crate::ui::{self, components::notification::{Notification, NotificationManager}, Theme};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application struct
pub struct App {
    pub state: AppState,
    pub store: BookingStore,
    pub config: ClientConfig,
    pub theme: Theme,
    pub router: Router,
    pub notifications: NotificationManager,

    /// Where distances and the map start from
    pub user_location: Coordinates,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter for animations
    pub tick: u64,

    geocoder: Arc<dyn Geocoder>,
    events: EventHandler,
}

impl App {
    pub fn new(
        config: ClientConfig,
        api: Arc<dyn BookingApi>,
        geocoder: Arc<dyn Geocoder>,
        location: &dyn LocationProvider,
    ) -> Self {
        let deadline = Instant::now() + config.splash_delay();
        Self {
            state: AppState::new(deadline),
            store: BookingStore::new(api),
            user_location: user_location_or_default(location),
            config,
            theme: Theme::default(),
            router: Router::new(Screen::Loading),
            notifications: NotificationManager::new(),
            should_quit: false,
            tick: 0,
            geocoder,
            events: EventHandler::new(TICK_RATE),
        }
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        self.events.start();

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            match self.next_event().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        Ok(())
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Key(_) | Event::Resize => {}
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Tick => self.on_tick(),
            Event::SearchCompleted { token, result } => self.on_search_completed(token, result),
            Event::StatusUpdated { token, result } => self.on_status_updated(token, result),
            Event::IncidentSubmitted { result } => self.on_incident_submitted(result),
            Event::MapResolved {
                booking_id,
                status,
                destinations,
            } => {
                let current = self
                    .store
                    .current_booking()
                    .is_some_and(|b| b.id == booking_id && b.status == status);
                if current {
                    self.state.track.destinations = Some(destinations);
                } else {
                    debug!(%booking_id, "dropping map for a replaced booking");
                }
            }
        }
    }

    fn navigate(&mut self, screen: Screen) {
        self.router.push(screen);
        self.state.current_screen = self.router.current();
    }

    fn go_back(&mut self) {
        self.state.current_screen = self.router.back();
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.notifications.tick();

        if self.state.current_screen == Screen::Loading
            && Instant::now() >= self.state.loading_deadline
        {
            self.router.replace(Screen::Home);
            self.state.current_screen = Screen::Home;
        }
    }

    /// Handle key press events
    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // A modal alert swallows keys until dismissed
        if self.state.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.state.alert = None;
            }
            return;
        }

        match self.state.current_screen {
            Screen::Loading => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            Screen::Home => self.handle_home_key(key),
            Screen::TrackOrder => self.handle_track_key(key),
            Screen::Signature => self.handle_signature_key(key),
            Screen::ReportIncident => self.handle_incident_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.menu_index = self.state.menu_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.menu_index < MenuItem::ALL.len() - 1 {
                    self.state.menu_index += 1;
                }
            }
            KeyCode::Enter => match self.state.selected_menu_item() {
                MenuItem::TrackOrder => self.navigate(Screen::TrackOrder),
                MenuItem::Signature => self.navigate(Screen::Signature),
                MenuItem::ReportIncident => self.navigate(Screen::ReportIncident),
                MenuItem::Quit => self.should_quit = true,
            },
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_track_key(&mut self, key: KeyEvent) {
        let found = self.state.track.mode == TrackMode::Found;

        match self.state.track.focus {
            TrackFocus::Search => match key.code {
                KeyCode::Esc => self.go_back(),
                KeyCode::Enter => self.submit_search(),
                KeyCode::Tab | KeyCode::Down if found => {
                    self.state.track.focus = TrackFocus::Actions;
                }
                _ => {
                    self.state.track.search.input(key);
                }
            },
            TrackFocus::Actions => match key.code {
                KeyCode::Esc => self.go_back(),
                KeyCode::Tab | KeyCode::Up | KeyCode::BackTab => {
                    self.state.track.focus = TrackFocus::Search;
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.state.track.action_index = self.state.track.action_index.saturating_sub(1);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    if self.state.track.action_index < TrackAction::ALL.len() - 1 {
                        self.state.track.action_index += 1;
                    }
                }
                KeyCode::Enter => self.run_track_action(self.state.track.selected_action()),
                _ => {}
            },
        }
    }

    fn run_track_action(&mut self, action: TrackAction) {
        match action {
            TrackAction::Sign => self.navigate(Screen::Signature),
            TrackAction::Report => self.navigate(Screen::ReportIncident),
            TrackAction::ExportMap => self.export_map(),
            TrackAction::Retry => self.retry(),
        }
    }

    fn handle_signature_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.state.signature.pad.end_stroke();
            self.go_back();
            return;
        }
        if self.state.signature.submitting {
            return;
        }

        let pad = &mut self.state.signature.pad;
        match key.code {
            KeyCode::Left => pad.move_cursor(-1, 0),
            KeyCode::Right => pad.move_cursor(1, 0),
            KeyCode::Up => pad.move_cursor(0, -1),
            KeyCode::Down => pad.move_cursor(0, 1),
            KeyCode::Char(' ') => pad.toggle_pen(),
            KeyCode::Char('c') => {
                pad.clear();
                self.notifications.push(Notification::info("Signature cleared"));
            }
            KeyCode::Enter | KeyCode::Char('s') => self.save_signature(),
            _ => {}
        }
    }

    fn handle_incident_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.go_back();
            return;
        }
        if self.state.incident.submitting {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submit_incident();
            return;
        }

        let incident = &mut self.state.incident;
        match (key.code, incident.field) {
            (KeyCode::Tab, _) => incident.field = incident.field.next(),
            (KeyCode::BackTab, _) => incident.field = incident.field.prev(),
            (KeyCode::Left | KeyCode::Right | KeyCode::Char(' '), IncidentField::Kind) => {
                incident.kind = incident.kind.toggle();
            }
            (KeyCode::Enter, IncidentField::Submit) => self.submit_incident(),
            (KeyCode::Enter, IncidentField::Kind | IncidentField::TotalCost | IncidentField::ImagePath) => {
                incident.field = incident.field.next();
            }
            _ => {
                if let Some(input) = incident.focused_input() {
                    input.input(key);
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state.current_screen != Screen::Signature
            || self.state.alert.is_some()
            || self.state.signature.submitting
        {
            return;
        }

        let cell = self.state.signature.cell_at(mouse.column, mouse.row);
        let pad = &mut self.state.signature.pad;
        match (mouse.kind, cell) {
            (MouseEventKind::Down(MouseButton::Left), Some(cell)) => pad.begin_stroke(cell),
            (MouseEventKind::Drag(MouseButton::Left), Some(cell)) => pad.drag_to(cell),
            (MouseEventKind::Up(MouseButton::Left), _) => pad.end_stroke(),
            _ => {}
        }
    }

    fn submit_search(&mut self) {
        let query = self.state.track.query();
        match self.store.begin_search(&query) {
            Ok(request) => {
                self.state.track.mode = TrackMode::Searching;
                self.state.track.destinations = None;
                self.spawn_search(request);
            }
            Err(e) => self.state.alert = Some(e.search_alert()),
        }
    }

    fn retry(&mut self) {
        if let Some(request) = self.store.begin_retry() {
            self.state.track.mode = TrackMode::Searching;
            self.state.track.destinations = None;
            self.spawn_search(request);
        }
    }

    fn on_search_completed(&mut self, token: RequestToken, result: ApiResult<Option<Booking>>) {
        match self.store.complete_search(token, result) {
            SearchOutcome::Found(booking) => {
                self.state.track.mode = TrackMode::Found;
                self.state.track.focus = TrackFocus::Actions;
                self.state.track.action_index = 0;
                self.spawn_map(booking);
            }
            SearchOutcome::NotFound => {
                self.state.track.mode = TrackMode::NotFound;
                self.state.track.focus = TrackFocus::Search;
            }
            SearchOutcome::Failed(alert) => {
                self.state.track.mode = TrackMode::Error;
                self.state.track.focus = TrackFocus::Search;
                self.state.alert = Some(alert);
            }
            SearchOutcome::Stale => {}
        }
    }

    fn export_map(&mut self) {
        let Some(destinations) = self.state.track.destinations.clone() else {
            self.notifications.push(Notification::warning("Map is still loading"));
            return;
        };

        let path = self.config.map_export_path.clone();
        match MapDocument::new(self.user_location, destinations).save(&path) {
            Ok(()) => {
                info!(path = %path.display(), "map exported");
                self.notifications
                    .push(Notification::success(format!("Map exported to {}", path.display())));
            }
            Err(e) => {
                warn!(error = %e, "map export failed");
                self.state.alert = Some(Alert::error(format!("Failed to export map: {}", e)));
            }
        }
    }

    fn save_signature(&mut self) {
        let advance = match advance_on_signature(self.store.current_booking()) {
            Ok(advance) => advance,
            Err(e) => {
                self.state.alert = Some(Alert::error(e.to_string()));
                return;
            }
        };

        let captured = match self.state.signature.pad.capture() {
            Ok(Some(captured)) => captured,
            Ok(None) => {
                self.state.alert = Some(Alert::error(SIGNATURE_REQUIRED));
                return;
            }
            Err(e) => {
                warn!(error = %e, "signature encoding failed");
                self.state.alert = Some(Alert::error(format!("Failed to save signature: {}", e)));
                return;
            }
        };

        info!(bytes = captured.png.len(), booking_id = %advance.booking_id, "signature captured");
        self.state.signature.captured = Some(captured);
        self.state.signature.submitting = true;

        let request = self.store.begin_update(&advance.booking_id, advance.status);
        self.spawn_update(request);
    }

    fn on_status_updated(&mut self, token: RequestToken, result: ApiResult<Booking>) {
        self.state.signature.submitting = false;

        match self.store.complete_update(token, result) {
            UpdateOutcome::Updated { applied } => {
                self.state.alert = Some(Alert::new(CAPTURED_TITLE, CAPTURED_MESSAGE));
                self.state.signature.pad.clear();
                if applied {
                    if let Some(booking) = self.store.current_booking().cloned() {
                        self.state.track.destinations = None;
                        self.spawn_map(booking);
                    }
                }
                if self.state.current_screen == Screen::Signature {
                    self.go_back();
                }
            }
            UpdateOutcome::Failed(alert) => self.state.alert = Some(alert),
        }
    }

    fn submit_incident(&mut self) {
        let form = self.state.incident.form();
        let valid = match form.validate(self.store.current_booking()) {
            Ok(valid) => valid,
            Err(e) => {
                self.state.alert = Some(Alert::error(e.to_string()));
                return;
            }
        };

        self.state.incident.submitting = true;
        let api = self.store.api();
        let mode = self.config.incident_mode;
        let tx = self.events.sender();
        tokio::spawn(async move {
            let result = submit_incident(api.as_ref(), mode, valid)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Event::IncidentSubmitted { result });
        });
    }

    fn on_incident_submitted(&mut self, result: Result<(), String>) {
        self.state.incident.submitting = false;

        match result {
            Ok(()) => {
                self.state.alert = Some(Alert::success(SUBMITTED));
                self.state.incident = IncidentState::new();
                if self.state.current_screen == Screen::ReportIncident {
                    self.go_back();
                }
            }
            Err(e) => {
                warn!(error = %e, "incident submission failed");
                self.state.alert = Some(Alert::error(SUBMIT_FAILED));
            }
        }
    }

    fn spawn_search(&self, request: SearchRequest) {
        let api = self.store.api();
        let tx = self.events.sender();
        tokio::spawn(async move {
            let result = request.execute(api.as_ref()).await;
            let _ = tx.send(Event::SearchCompleted {
                token: request.token,
                result,
            });
        });
    }

    fn spawn_update(&self, request: UpdateRequest) {
        let api = self.store.api();
        let tx = self.events.sender();
        tokio::spawn(async move {
            let result = request.execute(api.as_ref()).await;
            let _ = tx.send(Event::StatusUpdated {
                token: request.token,
                result,
            });
        });
    }

    fn spawn_map(&self, booking: Booking) {
        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.events.sender();
        tokio::spawn(async move {
            let destinations = MapDestinations::resolve(&booking, geocoder.as_ref()).await;
            let _ = tx.send(Event::MapResolved {
                booking_id: booking.id,
                status: booking.status,
                destinations,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use crossterm::event::KeyEventState;
    use signgo_core::incident::{DESCRIPTION_REQUIRED, NO_ACTIVE_BOOKING};
    use signgo_core::store::EMPTY_QUERY;
    use signgo_core::{ApiError, BookingStatus, FixedLocation, IncidentMode, IncidentReport, NoGeocoder};

    use super::*;

    #[derive(Default)]
    struct FakeApi {
        booking: Mutex<Option<Booking>>,
        not_found: bool,
        incidents: Mutex<Vec<IncidentReport>>,
    }

    #[async_trait]
    impl BookingApi for FakeApi {
        async fn search(&self, _query: &str) -> ApiResult<Option<Booking>> {
            if self.not_found {
                return Err(ApiError::NotFound);
            }
            Ok(self.booking.lock().unwrap().clone())
        }

        async fn update_status(&self, _id: &str, status: &BookingStatus) -> ApiResult<Booking> {
            let mut guard = self.booking.lock().unwrap();
            let booking = guard.as_mut().ok_or(ApiError::NotFound)?;
            booking.status = status.clone();
            Ok(booking.clone())
        }

        async fn report_incident(&self, report: &IncidentReport) -> ApiResult<()> {
            self.incidents.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    fn sample_booking(status: &str) -> Booking {
        serde_json::from_value(serde_json::json!({
            "id": "b-42",
            "booking_number": "BK-42",
            "hwb_number": "HWB-42",
            "status": status,
            "shipper": "Mabuhay Traders",
            "consignee": "Visayas Hardware",
            "origin_port": "manila",
            "destination_port": "cebu",
            "created_at": "2024-06-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn app_with(api: FakeApi) -> (App, Arc<FakeApi>) {
        let api = Arc::new(api);
        let config = ClientConfig {
            splash_delay_secs: 0,
            incident_mode: IncidentMode::Upload,
            ..ClientConfig::default()
        };
        let app = App::new(config, api.clone(), Arc::new(NoGeocoder), &FixedLocation(None));
        (app, api)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
    }

    /// Process background events until `done` holds
    async fn pump(app: &mut App, done: impl Fn(&App) -> bool) {
        while !done(app) {
            let event = tokio::time::timeout(Duration::from_secs(2), app.next_event())
                .await
                .expect("timed out waiting for event")
                .expect("event channel closed");
            app.handle_event(event);
        }
    }

    fn open_home(app: &mut App) {
        app.handle_event(Event::Tick);
        assert_eq!(app.state.current_screen, Screen::Home);
    }

    #[test]
    fn test_splash_waits_for_deadline() {
        let api: Arc<dyn BookingApi> = Arc::new(FakeApi::default());
        let config = ClientConfig::default();
        let mut app = App::new(config, api, Arc::new(NoGeocoder), &FixedLocation(None));

        app.handle_event(key(KeyCode::Enter));
        app.handle_event(Event::Tick);
        assert_eq!(app.state.current_screen, Screen::Loading);

        app.state.loading_deadline = Instant::now();
        app.handle_event(Event::Tick);
        assert_eq!(app.state.current_screen, Screen::Home);
        assert!(!app.router.can_go_back());
    }

    #[test]
    fn test_user_location_defaults_to_manila() {
        let (app, _) = app_with(FakeApi::default());
        assert_eq!(app.user_location, signgo_core::geo::MANILA);
    }

    #[test]
    fn test_home_menu_navigation_and_quit() {
        let (mut app, _) = app_with(FakeApi::default());
        open_home(&mut app);

        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.current_screen, Screen::Signature);

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.state.current_screen, Screen::Home);

        for _ in 0..10 {
            app.handle_event(key(KeyCode::Down));
        }
        app.handle_event(key(KeyCode::Enter));
        assert!(app.should_quit);
    }

    #[test]
    fn test_empty_search_alerts_without_request() {
        let (mut app, _) = app_with(FakeApi::default());
        open_home(&mut app);
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.current_screen, Screen::TrackOrder);

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.alert, Some(Alert::error(EMPTY_QUERY)));
        assert_eq!(app.state.track.mode, TrackMode::NoSearchYet);

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.state.alert, None);
        assert_eq!(app.state.current_screen, Screen::TrackOrder);
    }

    #[tokio::test]
    async fn test_search_finds_booking_and_resolves_map() {
        let (mut app, _) = app_with(FakeApi {
            booking: Mutex::new(Some(sample_booking("LOADED_TO_TRUCK"))),
            ..FakeApi::default()
        });
        open_home(&mut app);
        app.handle_event(key(KeyCode::Enter));

        type_text(&mut app, "BK-42");
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.track.mode, TrackMode::Searching);

        pump(&mut app, |a| a.state.track.destinations.is_some()).await;

        assert_eq!(app.state.track.mode, TrackMode::Found);
        assert_eq!(app.state.track.focus, TrackFocus::Actions);
        let destinations = app.state.track.destinations.clone().unwrap();
        assert_eq!(destinations.current.unwrap().label, "Origin Port");
        assert_eq!(destinations.next.unwrap().label, "Next: Destination Port");
    }

    #[tokio::test]
    async fn test_search_not_found_clears_booking() {
        let (mut app, _) = app_with(FakeApi {
            not_found: true,
            ..FakeApi::default()
        });
        open_home(&mut app);
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "BK-404");
        app.handle_event(key(KeyCode::Enter));

        pump(&mut app, |a| a.state.track.mode != TrackMode::Searching).await;

        assert_eq!(app.state.track.mode, TrackMode::Error);
        assert_eq!(app.state.alert.as_ref().map(|a| a.title.as_str()), Some("Not Found"));
        assert!(app.store.current_booking().is_none());
    }

    #[tokio::test]
    async fn test_search_survives_signature_saved_meanwhile() {
        let (mut app, _) = app_with(FakeApi {
            booking: Mutex::new(Some(sample_booking("LOADED_TO_TRUCK"))),
            ..FakeApi::default()
        });
        open_home(&mut app);
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "BK-42");
        app.handle_event(key(KeyCode::Enter));
        pump(&mut app, |a| a.state.track.mode == TrackMode::Found).await;

        // Search again, then sign before the response is handled
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.track.mode, TrackMode::Searching);
        app.handle_event(key(KeyCode::Esc));
        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.current_screen, Screen::Signature);
        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Char('s')));
        assert!(app.state.signature.submitting);

        pump(&mut app, |a| {
            !a.state.signature.submitting && a.state.track.mode != TrackMode::Searching
        })
        .await;

        assert_eq!(app.state.track.mode, TrackMode::Found);
        assert!(app.store.current_booking().is_some());
        assert!(!app.store.is_loading());
    }

    #[tokio::test]
    async fn test_failed_retry_returns_focus_to_search() {
        let (mut app, api) = app_with(FakeApi {
            booking: Mutex::new(Some(sample_booking("IN_TRANSIT"))),
            ..FakeApi::default()
        });
        open_home(&mut app);
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "BK-42");
        app.handle_event(key(KeyCode::Enter));
        pump(&mut app, |a| a.state.track.mode == TrackMode::Found).await;

        let booking = api.booking.lock().unwrap().take();
        for _ in 0..3 {
            app.handle_event(key(KeyCode::Right));
        }
        assert_eq!(app.state.track.selected_action(), TrackAction::Retry);
        app.handle_event(key(KeyCode::Enter));
        pump(&mut app, |a| a.state.track.mode != TrackMode::Searching).await;

        assert_eq!(app.state.track.mode, TrackMode::NotFound);
        assert_eq!(app.state.track.focus, TrackFocus::Search);
        assert!(app.store.current_booking().is_none());

        *api.booking.lock().unwrap() = booking;
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.track.mode, TrackMode::Searching);
        pump(&mut app, |a| a.state.track.mode != TrackMode::Searching).await;
        assert_eq!(app.state.track.mode, TrackMode::Found);
    }

    #[test]
    fn test_signature_without_booking() {
        let (mut app, _) = app_with(FakeApi::default());
        open_home(&mut app);
        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Enter));

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.alert, Some(Alert::error(NO_ACTIVE_BOOKING)));
        assert!(!app.state.signature.submitting);
    }

    #[tokio::test]
    async fn test_signature_advances_status_and_returns() {
        let (mut app, api) = app_with(FakeApi {
            booking: Mutex::new(Some(sample_booking("OUT_FOR_DELIVERY"))),
            ..FakeApi::default()
        });
        open_home(&mut app);
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "BK-42");
        app.handle_event(key(KeyCode::Enter));
        pump(&mut app, |a| a.state.track.mode == TrackMode::Found).await;

        // Sign is the first card action
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.current_screen, Screen::Signature);

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.alert, Some(Alert::error(SIGNATURE_REQUIRED)));
        app.handle_event(key(KeyCode::Enter));

        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Char('s')));
        assert!(app.state.signature.submitting);

        pump(&mut app, |a| !a.state.signature.submitting).await;

        assert_eq!(app.state.alert.as_ref().map(|a| a.title.as_str()), Some(CAPTURED_TITLE));
        assert_eq!(app.state.current_screen, Screen::TrackOrder);
        assert_eq!(
            app.store.current_booking().map(|b| b.status.clone()),
            Some(BookingStatus::Delivered)
        );
        assert!(app.state.signature.pad.is_empty());
        assert!(app
            .state
            .signature
            .captured
            .as_ref()
            .is_some_and(|c| c.data_url.starts_with("data:image/png;base64,")));
        assert_eq!(
            api.booking.lock().unwrap().as_ref().map(|b| b.status.clone()),
            Some(BookingStatus::Delivered)
        );
    }

    #[tokio::test]
    async fn test_incident_validation_and_upload() {
        let (mut app, api) = app_with(FakeApi {
            booking: Mutex::new(Some(sample_booking("IN_TRANSIT"))),
            ..FakeApi::default()
        });
        open_home(&mut app);
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "BK-42");
        app.handle_event(key(KeyCode::Enter));
        pump(&mut app, |a| a.state.track.mode == TrackMode::Found).await;

        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.state.current_screen, Screen::ReportIncident);

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert_eq!(app.state.alert, Some(Alert::error(DESCRIPTION_REQUIRED)));
        app.handle_event(key(KeyCode::Enter));

        type_text(&mut app, "Truck stuck at Lucena");
        app.handle_event(key(KeyCode::BackTab));
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(key(KeyCode::Tab));
        type_text(&mut app, "800");
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(app.state.incident.submitting);

        pump(&mut app, |a| !a.state.incident.submitting).await;

        assert_eq!(app.state.alert, Some(Alert::success(SUBMITTED)));
        assert_eq!(app.state.current_screen, Screen::TrackOrder);
        let sent = api.incidents.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].description, "Truck stuck at Lucena");
        assert_eq!(sent[0].kind, signgo_core::IncidentKind::Sea);
        assert_eq!(sent[0].total_cost, "800");
        assert_eq!(sent[0].booking_id, "b-42");
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let (mut app, _) = app_with(FakeApi::default());
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(app.should_quit);
    }
}
