//! Sign&Go Core - Booking tracking for the courier driver client
//!
//! This crate holds everything below the terminal UI: the booking model and
//! its status lifecycle, the HTTP API client, the shared booking store, the
//! route map document, incident reports and signature capture.

pub mod api;
pub mod booking;
pub mod error;
pub mod geo;
pub mod incident;
pub mod location;
pub mod map;
pub mod port;
pub mod projection;
pub mod signature;
pub mod status;
pub mod store;

pub use api::{ApiResult, BookingApi, HttpBookingApi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use booking::{Booking, NOT_AVAILABLE};
pub use error::{Alert, ApiError, Result, SignGoError};
pub use geo::{distance_km, format_distance, Coordinates};
pub use incident::{IncidentForm, IncidentKind, IncidentMode, IncidentReport, ValidIncident};
pub use location::{FixedLocation, Geocoder, LocationProvider, NoGeocoder, NominatimGeocoder};
pub use map::{MapDestinations, MapDocument, MapPoint, Stop};
pub use port::{Port, PortRole, PH_PORTS};
pub use projection::StatusProjection;
pub use signature::{advance_on_signature, CapturedSignature, SignaturePad, SignedAdvance};
pub use status::{BookingStatus, StatusTone};
pub use store::{BookingStore, RequestToken, SearchOutcome, SearchRequest, UpdateOutcome, UpdateRequest};
