//! Status-to-display projection for the tracking card

use crate::booking::{Booking, NOT_AVAILABLE};
use crate::status::{BookingStatus, StatusTone};

/// Text shown when the shipment has reached its consignee
pub const DELIVERED_TEXT: &str = "Delivered";

/// A labelled location line on the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationLine {
    pub label: &'static str,
    pub location: String,
}

/// Everything the card derives from a booking's status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusProjection {
    pub label: String,
    pub tone: StatusTone,
    pub current_location: LocationLine,
    /// `None` once delivered, when the card hides the line
    pub next_destination: Option<String>,
}

impl StatusProjection {
    pub fn of(booking: &Booking) -> Self {
        let status = &booking.status;
        Self {
            label: status.label(),
            tone: status.tone(),
            current_location: current_location(booking),
            next_destination: (!status.is_delivered()).then(|| next_destination(booking)),
        }
    }
}

/// Where the shipment is now, according to its status
pub fn current_location(booking: &Booking) -> LocationLine {
    let (label, location) = match booking.status {
        BookingStatus::PickupScheduled => ("Pickup Location", booking.pickup_address()),
        BookingStatus::LoadedToTruck | BookingStatus::ArrivedOriginPort => {
            ("Origin Port", booking.origin_port_name())
        }
        BookingStatus::ArrivedDestinationPort => {
            ("Destination Port", booking.destination_port_name())
        }
        BookingStatus::OutForDelivery => ("Delivery Location", booking.delivery_address()),
        BookingStatus::Delivered => ("Current Location", DELIVERED_TEXT.to_string()),
        BookingStatus::LoadedToShip | BookingStatus::InTransit | BookingStatus::Unknown(_) => {
            ("Current Location", booking.pickup_address())
        }
    };

    LocationLine { label, location }
}

/// Where the shipment goes after its current stop
pub fn next_destination(booking: &Booking) -> String {
    match booking.status {
        BookingStatus::PickupScheduled => booking.origin_port_name(),
        BookingStatus::LoadedToTruck
        | BookingStatus::ArrivedOriginPort
        | BookingStatus::LoadedToShip
        | BookingStatus::InTransit => booking.destination_port_name(),
        BookingStatus::ArrivedDestinationPort | BookingStatus::OutForDelivery => {
            booking.delivery_address()
        }
        BookingStatus::Delivered => DELIVERED_TEXT.to_string(),
        BookingStatus::Unknown(_) => NOT_AVAILABLE.to_string(),
    }
}
