//! Booking store: the single "current booking" and the calls that replace it
//!
//! Requests are split into `begin_*` (synchronous, issues a token) and
//! `complete_*` (applies the response) so a UI can run the network call on
//! another task. Tokens come from one counter. A search response is dropped
//! once a newer search was issued; a status update is only applied when no
//! newer update or search was issued after it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiResult, BookingApi};
use crate::booking::Booking;
use crate::error::{Alert, Result, SignGoError};
use crate::status::BookingStatus;

pub const EMPTY_QUERY: &str = "Please enter a booking or HWB number";
pub const UPDATE_FAILED: &str = "Failed to update booking status";

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// A search ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub query: String,
}

impl SearchRequest {
    pub async fn execute(&self, api: &dyn BookingApi) -> ApiResult<Option<Booking>> {
        api.search(&self.query).await
    }
}

/// A status update ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub token: RequestToken,
    pub id: String,
    pub status: BookingStatus,
}

impl UpdateRequest {
    pub async fn execute(&self, api: &dyn BookingApi) -> ApiResult<Booking> {
        api.update_status(&self.id, &self.status).await
    }
}

/// What a search did to the store
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Booking),
    /// The server answered with an empty result
    NotFound,
    Failed(Alert),
    /// A newer request was issued; the response was ignored
    Stale,
}

/// What a status update did to the store
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The server accepted the update. `applied` is false when a newer
    /// request superseded it locally.
    Updated { applied: bool },
    Failed(Alert),
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }
}

/// Holds the current booking for the screens
pub struct BookingStore {
    api: Arc<dyn BookingApi>,
    current_booking: Option<Booking>,
    searching: bool,
    updating: bool,
    error: Option<String>,
    issued: u64,
    latest_search: u64,
    latest_update: u64,
}

impl BookingStore {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self {
            api,
            current_booking: None,
            searching: false,
            updating: false,
            error: None,
            issued: 0,
            latest_search: 0,
            latest_update: 0,
        }
    }

    /// Shared handle to the API, for running requests on another task
    pub fn api(&self) -> Arc<dyn BookingApi> {
        Arc::clone(&self.api)
    }

    pub fn current_booking(&self) -> Option<&Booking> {
        self.current_booking.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.searching || self.updating
    }

    /// Message of the last failed request
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        self.error = None;
        RequestToken(self.issued)
    }

    fn is_latest_search(&self, token: RequestToken) -> bool {
        token.0 == self.latest_search
    }

    /// Newest update, and no search was issued after it
    fn is_latest_update(&self, token: RequestToken) -> bool {
        token.0 == self.latest_update && token.0 > self.latest_search
    }

    /// Validate the query and issue a search token
    pub fn begin_search(&mut self, query: &str) -> Result<SearchRequest> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SignGoError::Validation(EMPTY_QUERY.to_string()));
        }

        let token = self.issue();
        self.latest_search = token.0;
        self.searching = true;
        debug!(?token, query, "search issued");
        Ok(SearchRequest {
            token,
            query: query.to_string(),
        })
    }

    /// Apply a search response
    pub fn complete_search(
        &mut self,
        token: RequestToken,
        result: ApiResult<Option<Booking>>,
    ) -> SearchOutcome {
        if !self.is_latest_search(token) {
            debug!(?token, latest = self.latest_search, "dropping stale search response");
            return SearchOutcome::Stale;
        }
        self.searching = false;

        match result {
            Ok(Some(booking)) => {
                info!(booking_number = %booking.booking_number, status = %booking.status, "booking found");
                self.current_booking = Some(booking.clone());
                SearchOutcome::Found(booking)
            }
            Ok(None) => {
                info!("search returned no booking");
                self.current_booking = None;
                SearchOutcome::NotFound
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                self.current_booking = None;
                self.error = Some(e.to_string());
                SearchOutcome::Failed(e.search_alert())
            }
        }
    }

    /// Search and apply in one step
    pub async fn search_booking(&mut self, query: &str) -> SearchOutcome {
        let request = match self.begin_search(query) {
            Ok(request) => request,
            Err(e) => return SearchOutcome::Failed(e.search_alert()),
        };
        let result = request.execute(self.api.as_ref()).await;
        self.complete_search(request.token, result)
    }

    /// Issue a status update token
    pub fn begin_update(&mut self, id: &str, status: BookingStatus) -> UpdateRequest {
        let token = self.issue();
        self.latest_update = token.0;
        self.updating = true;
        debug!(?token, id, %status, "status update issued");
        UpdateRequest {
            token,
            id: id.to_string(),
            status,
        }
    }

    /// Apply a status update response; failure keeps the prior booking
    pub fn complete_update(
        &mut self,
        token: RequestToken,
        result: ApiResult<Booking>,
    ) -> UpdateOutcome {
        if token.0 == self.latest_update {
            self.updating = false;
        }
        let latest = self.is_latest_update(token);

        match result {
            Ok(booking) if latest => {
                info!(booking_number = %booking.booking_number, status = %booking.status, "status updated");
                self.current_booking = Some(booking);
                UpdateOutcome::Updated { applied: true }
            }
            Ok(_) => {
                debug!(?token, "status update superseded locally");
                UpdateOutcome::Updated { applied: false }
            }
            Err(e) => {
                warn!(error = %e, "status update failed");
                if latest {
                    self.error = Some(e.to_string());
                }
                UpdateOutcome::Failed(Alert::error(UPDATE_FAILED))
            }
        }
    }

    /// Update and apply in one step; returns whether the server accepted it
    pub async fn update_booking_status(&mut self, id: &str, status: BookingStatus) -> bool {
        let request = self.begin_update(id, status);
        let result = request.execute(self.api.as_ref()).await;
        self.complete_update(request.token, result).is_success()
    }

    /// Re-issue the last search with the current booking's number
    pub fn begin_retry(&mut self) -> Option<SearchRequest> {
        let number = self.current_booking.as_ref()?.booking_number.clone();
        self.begin_search(&number).ok()
    }

    pub async fn retry_fetch(&mut self) -> Option<SearchOutcome> {
        let request = self.begin_retry()?;
        let result = request.execute(self.api.as_ref()).await;
        Some(self.complete_search(request.token, result))
    }
}
