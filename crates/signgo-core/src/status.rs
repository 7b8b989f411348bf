//! Booking status lifecycle

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a booking in the fixed logistics sequence
///
/// Codes the client does not recognise decode to [`BookingStatus::Unknown`]
/// and keep their raw text, so a newer server never breaks the card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    PickupScheduled,
    LoadedToTruck,
    ArrivedOriginPort,
    LoadedToShip,
    InTransit,
    ArrivedDestinationPort,
    OutForDelivery,
    Delivered,
    Unknown(String),
}

/// Color token used to badge a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Yellow,
    Blue,
    Purple,
    Indigo,
    Orange,
    Teal,
    Cyan,
    Green,
    Gray,
}

impl BookingStatus {
    /// Every known status, in lifecycle order
    pub const SEQUENCE: [BookingStatus; 8] = [
        BookingStatus::PickupScheduled,
        BookingStatus::LoadedToTruck,
        BookingStatus::ArrivedOriginPort,
        BookingStatus::LoadedToShip,
        BookingStatus::InTransit,
        BookingStatus::ArrivedDestinationPort,
        BookingStatus::OutForDelivery,
        BookingStatus::Delivered,
    ];

    /// Wire code, e.g. `PICKUP_SCHEDULED`
    pub fn code(&self) -> &str {
        match self {
            BookingStatus::PickupScheduled => "PICKUP_SCHEDULED",
            BookingStatus::LoadedToTruck => "LOADED_TO_TRUCK",
            BookingStatus::ArrivedOriginPort => "ARRIVED_ORIGIN_PORT",
            BookingStatus::LoadedToShip => "LOADED_TO_SHIP",
            BookingStatus::InTransit => "IN_TRANSIT",
            BookingStatus::ArrivedDestinationPort => "ARRIVED_DESTINATION_PORT",
            BookingStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            BookingStatus::Delivered => "DELIVERED",
            BookingStatus::Unknown(raw) => raw,
        }
    }

    /// Display label: the code with underscores as spaces
    pub fn label(&self) -> String {
        self.code().replace('_', " ")
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            BookingStatus::PickupScheduled => StatusTone::Yellow,
            BookingStatus::LoadedToTruck => StatusTone::Blue,
            BookingStatus::ArrivedOriginPort => StatusTone::Purple,
            BookingStatus::LoadedToShip => StatusTone::Indigo,
            BookingStatus::InTransit => StatusTone::Orange,
            BookingStatus::ArrivedDestinationPort => StatusTone::Teal,
            BookingStatus::OutForDelivery => StatusTone::Cyan,
            BookingStatus::Delivered => StatusTone::Green,
            BookingStatus::Unknown(_) => StatusTone::Gray,
        }
    }

    /// The single status that follows this one, `None` when terminal
    ///
    /// This is advisory: the server decides whether the transition sticks.
    pub fn successor(&self) -> Option<BookingStatus> {
        match self {
            BookingStatus::PickupScheduled => Some(BookingStatus::LoadedToTruck),
            BookingStatus::LoadedToTruck => Some(BookingStatus::ArrivedOriginPort),
            BookingStatus::ArrivedOriginPort => Some(BookingStatus::LoadedToShip),
            BookingStatus::LoadedToShip => Some(BookingStatus::InTransit),
            BookingStatus::InTransit => Some(BookingStatus::ArrivedDestinationPort),
            BookingStatus::ArrivedDestinationPort => Some(BookingStatus::OutForDelivery),
            BookingStatus::OutForDelivery => Some(BookingStatus::Delivered),
            BookingStatus::Delivered | BookingStatus::Unknown(_) => None,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, BookingStatus::Delivered)
    }
}

impl From<String> for BookingStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "PICKUP_SCHEDULED" => BookingStatus::PickupScheduled,
            "LOADED_TO_TRUCK" => BookingStatus::LoadedToTruck,
            "ARRIVED_ORIGIN_PORT" => BookingStatus::ArrivedOriginPort,
            "LOADED_TO_SHIP" => BookingStatus::LoadedToShip,
            "IN_TRANSIT" => BookingStatus::InTransit,
            "ARRIVED_DESTINATION_PORT" => BookingStatus::ArrivedDestinationPort,
            "OUT_FOR_DELIVERY" => BookingStatus::OutForDelivery,
            "DELIVERED" => BookingStatus::Delivered,
            _ => BookingStatus::Unknown(code),
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(code: &str) -> Self {
        BookingStatus::from(code.to_string())
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        status.code().to_string()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BookingStatus::PickupScheduled, Some(BookingStatus::LoadedToTruck))]
    #[case(BookingStatus::LoadedToTruck, Some(BookingStatus::ArrivedOriginPort))]
    #[case(BookingStatus::ArrivedOriginPort, Some(BookingStatus::LoadedToShip))]
    #[case(BookingStatus::LoadedToShip, Some(BookingStatus::InTransit))]
    #[case(BookingStatus::InTransit, Some(BookingStatus::ArrivedDestinationPort))]
    #[case(BookingStatus::ArrivedDestinationPort, Some(BookingStatus::OutForDelivery))]
    #[case(BookingStatus::OutForDelivery, Some(BookingStatus::Delivered))]
    #[case(BookingStatus::Delivered, None)]
    fn test_successor(#[case] status: BookingStatus, #[case] expected: Option<BookingStatus>) {
        assert_eq!(status.successor(), expected);
    }

    #[test]
    fn test_sequence_is_linear() {
        for pair in BookingStatus::SEQUENCE.windows(2) {
            assert_eq!(pair[0].successor().as_ref(), Some(&pair[1]));
        }
    }

    #[test]
    fn test_unknown_status_round_trip() {
        let status: BookingStatus = serde_json::from_str("\"ON_HOLD\"").unwrap();
        assert_eq!(status, BookingStatus::Unknown("ON_HOLD".into()));
        assert_eq!(status.label(), "ON HOLD");
        assert_eq!(status.tone(), StatusTone::Gray);
        assert_eq!(status.successor(), None);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"ON_HOLD\"");
    }

    #[test]
    fn test_known_codes_parse() {
        for status in BookingStatus::SEQUENCE {
            assert_eq!(BookingStatus::from(status.code()), status);
        }
        assert_eq!(
            BookingStatus::ArrivedDestinationPort.label(),
            "ARRIVED DESTINATION PORT"
        );
    }
}
