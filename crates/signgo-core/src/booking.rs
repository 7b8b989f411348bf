//! Booking record as returned by the courier API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::status::BookingStatus;

/// Placeholder for an address or port with nothing to show
pub const NOT_AVAILABLE: &str = "N/A";

/// A shipment booking, owned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub booking_number: String,
    #[serde(default)]
    pub hwb_number: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub shipper: String,
    #[serde(default)]
    pub consignee: String,
    #[serde(default)]
    pub origin_port: String,
    #[serde(default)]
    pub destination_port: String,

    #[serde(default)]
    pub pickup_province: Option<String>,
    #[serde(default)]
    pub pickup_city: Option<String>,
    #[serde(default)]
    pub pickup_barangay: Option<String>,
    #[serde(default)]
    pub pickup_street: Option<String>,
    #[serde(default)]
    pub pickup_lat: Option<f64>,
    #[serde(default)]
    pub pickup_lng: Option<f64>,

    #[serde(default)]
    pub delivery_province: Option<String>,
    #[serde(default)]
    pub delivery_city: Option<String>,
    #[serde(default)]
    pub delivery_barangay: Option<String>,
    #[serde(default)]
    pub delivery_street: Option<String>,
    #[serde(default)]
    pub delivery_lat: Option<f64>,
    #[serde(default)]
    pub delivery_lng: Option<f64>,

    #[serde(default)]
    pub preferred_departure: Option<String>,
    #[serde(default, alias = "booking_date")]
    pub created_at: Option<String>,
}

impl Booking {
    /// Pickup address, street first
    pub fn pickup_address(&self) -> String {
        format_address([
            self.pickup_street.as_deref(),
            self.pickup_barangay.as_deref(),
            self.pickup_city.as_deref(),
            self.pickup_province.as_deref(),
        ])
    }

    /// Delivery address, street first
    pub fn delivery_address(&self) -> String {
        format_address([
            self.delivery_street.as_deref(),
            self.delivery_barangay.as_deref(),
            self.delivery_city.as_deref(),
            self.delivery_province.as_deref(),
        ])
    }

    /// Stored pickup coordinates, only when both halves are present
    pub fn pickup_coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.pickup_lat?, self.pickup_lng?))
    }

    pub fn delivery_coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.delivery_lat?, self.delivery_lng?))
    }

    pub fn origin_port_name(&self) -> String {
        port_display_name(&self.origin_port)
    }

    pub fn destination_port_name(&self) -> String {
        port_display_name(&self.destination_port)
    }

    /// "Booked On" date, formatted for the card
    ///
    /// Accepts RFC 3339 timestamps and bare dates; anything else is shown
    /// as the server sent it.
    pub fn booked_on(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ts) = raw.parse::<DateTime<Utc>>() {
            return Some(ts.format("%m/%d/%Y").to_string());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.format("%m/%d/%Y").to_string());
        }
        Some(raw.to_string())
    }
}

/// Join the non-empty parts with ", ", or "N/A" when nothing is left
pub fn format_address<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let joined = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

/// First character uppercased, the rest lowercased
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Port key as shown on the card, e.g. `manila` -> `Manila Port`
pub fn port_display_name(port: &str) -> String {
    let port = port.trim();
    if port.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        format!("{} Port", title_case(port))
    }
}
