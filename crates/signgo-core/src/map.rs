//! Map destinations and the Leaflet document that plots them
//!
//! The document itself is rendered by whatever web view opens it; what lives
//! here is the choice of stops for a status and the resolution of their
//! coordinates.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, warn};

use crate::booking::{Booking, NOT_AVAILABLE};
use crate::error::Result;
use crate::geo::{Coordinates, CEBU, MANILA};
use crate::location::Geocoder;
use crate::port::{resolve_port, PortRole};
use crate::status::BookingStatus;

const CURRENT_COLOR: &str = "#EF4444";
const NEXT_COLOR: &str = "#10B981";
const USER_COLOR: &str = "#3B82F6";

/// A leg of the shipment's journey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Pickup,
    OriginPort,
    DestinationPort,
    Delivery,
}

impl Stop {
    /// The stop the shipment is heading to now
    pub fn current_for(status: &BookingStatus) -> Option<Stop> {
        match status {
            BookingStatus::PickupScheduled => Some(Stop::Pickup),
            BookingStatus::LoadedToTruck | BookingStatus::ArrivedOriginPort => {
                Some(Stop::OriginPort)
            }
            BookingStatus::ArrivedDestinationPort => Some(Stop::DestinationPort),
            BookingStatus::OutForDelivery => Some(Stop::Delivery),
            BookingStatus::LoadedToShip
            | BookingStatus::InTransit
            | BookingStatus::Delivered
            | BookingStatus::Unknown(_) => None,
        }
    }

    /// The stop after the current one; nothing once delivered
    pub fn next_for(status: &BookingStatus) -> Option<Stop> {
        match status {
            BookingStatus::PickupScheduled => Some(Stop::OriginPort),
            BookingStatus::LoadedToTruck
            | BookingStatus::ArrivedOriginPort
            | BookingStatus::LoadedToShip
            | BookingStatus::InTransit => Some(Stop::DestinationPort),
            BookingStatus::ArrivedDestinationPort | BookingStatus::OutForDelivery => {
                Some(Stop::Delivery)
            }
            BookingStatus::Delivered | BookingStatus::Unknown(_) => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Stop::Pickup => "Pickup Location",
            Stop::OriginPort => "Origin Port",
            Stop::DestinationPort => "Destination Port",
            Stop::Delivery => "Delivery Location",
        }
    }

    fn next_label(self) -> &'static str {
        match self {
            Stop::Pickup => "Next: Pickup",
            Stop::OriginPort => "Next: Origin Port",
            Stop::DestinationPort => "Next: Destination Port",
            Stop::Delivery => "Next: Delivery",
        }
    }

    fn address(self, booking: &Booking) -> String {
        let text = match self {
            Stop::Pickup => booking.pickup_address(),
            Stop::OriginPort => booking.origin_port_name(),
            Stop::DestinationPort => booking.destination_port_name(),
            Stop::Delivery => booking.delivery_address(),
        };
        if text == NOT_AVAILABLE {
            self.label().to_string()
        } else {
            text
        }
    }

    /// Coordinates of this stop for `booking`
    ///
    /// Stored lat/lng wins; otherwise the address is geocoded, and any
    /// failure lands on Manila (pickup) or Cebu (delivery).
    pub async fn coordinates(self, booking: &Booking, geocoder: &dyn Geocoder) -> Coordinates {
        match self {
            Stop::OriginPort => resolve_port(&booking.origin_port, PortRole::Origin).coordinates(),
            Stop::DestinationPort => {
                resolve_port(&booking.destination_port, PortRole::Destination).coordinates()
            }
            Stop::Pickup => {
                resolve_address(
                    booking.pickup_coordinates(),
                    &booking.pickup_address(),
                    MANILA,
                    geocoder,
                )
                .await
            }
            Stop::Delivery => {
                resolve_address(
                    booking.delivery_coordinates(),
                    &booking.delivery_address(),
                    CEBU,
                    geocoder,
                )
                .await
            }
        }
    }
}

async fn resolve_address(
    stored: Option<Coordinates>,
    address: &str,
    fallback: Coordinates,
    geocoder: &dyn Geocoder,
) -> Coordinates {
    if let Some(coords) = stored {
        return coords;
    }
    if address == NOT_AVAILABLE {
        return fallback;
    }

    match geocoder.geocode(address).await {
        Ok(Some(coords)) => coords,
        Ok(None) => {
            debug!(address, "no geocoding match, using default");
            fallback
        }
        Err(e) => {
            warn!(address, error = %e, "geocoding failed, using default");
            fallback
        }
    }
}

/// A pin on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub coords: Coordinates,
    pub label: String,
    pub address: String,
}

/// Current and next pins for a booking
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapDestinations {
    pub current: Option<MapPoint>,
    pub next: Option<MapPoint>,
}

impl MapDestinations {
    pub async fn resolve(booking: &Booking, geocoder: &dyn Geocoder) -> Self {
        let current = match Stop::current_for(&booking.status) {
            Some(stop) => Some(MapPoint {
                coords: stop.coordinates(booking, geocoder).await,
                label: stop.label().to_string(),
                address: stop.address(booking),
            }),
            None => None,
        };

        let next = match Stop::next_for(&booking.status) {
            Some(stop) => Some(MapPoint {
                coords: stop.coordinates(booking, geocoder).await,
                label: stop.next_label().to_string(),
                address: stop.address(booking),
            }),
            None => None,
        };

        Self { current, next }
    }
}

/// Self-contained HTML map for a booking
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub user: Coordinates,
    pub destinations: MapDestinations,
}

const DOCUMENT_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet-routing-machine@3.2.12/dist/leaflet-routing-machine.css" />
  <style>
    body { margin: 0; padding: 0; }
    #map { height: 100vh; width: 100%; }
    .custom-popup { padding: 8px; font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; font-size: 13px; max-width: 200px; }
    .popup-title { font-weight: bold; color: #1f2937; margin-bottom: 4px; }
    .popup-address { color: #6b7280; line-height: 1.4; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <script src="https://unpkg.com/leaflet-routing-machine@3.2.12/dist/leaflet-routing-machine.js"></script>
  <script>
    function pin(color, size) {
      const svg = '<svg xmlns="http://www.w3.org/2000/svg" width="' + size + '" height="' + size +
        '" viewBox="0 0 24 24" fill="' + color + '" stroke="white" stroke-width="2">' +
        '<path d="M21 10c0 7-9 13-9 13s-9-6-9-13a9 9 0 0 1 18 0z"></path>' +
        '<circle cx="12" cy="10" r="3" fill="white"/></svg>';
      return L.divIcon({ html: svg, className: '', iconSize: [size, size],
        iconAnchor: [size / 2, size], popupAnchor: [0, -size] });
    }
    function route(from, to, style) {
      L.Routing.control({
        waypoints: [L.latLng(from[0], from[1]), L.latLng(to[0], to[1])],
        lineOptions: { styles: [style] },
        addWaypoints: false, draggableWaypoints: false, fitSelectedRoutes: false,
        show: false, createMarker: function() { return null; }
      }).addTo(map);
    }
"#;

const DOCUMENT_TAIL: &str = r#"    if (group.getLayers().length > 1) {
      map.fitBounds(group.getBounds().pad(0.1));
    }
  </script>
</body>
</html>
"#;

impl MapDocument {
    pub fn new(user: Coordinates, destinations: MapDestinations) -> Self {
        Self { user, destinations }
    }

    /// Render the Leaflet document
    pub fn render_html(&self) -> String {
        let mut html = String::from(DOCUMENT_HEAD);
        let user = latlng(self.user);

        let _ = writeln!(html, "    const map = L.map('map').setView({}, 12);", user);
        html.push_str(
            "    L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', \
             { attribution: '&copy; OpenStreetMap contributors' }).addTo(map);\n",
        );
        let _ = writeln!(
            html,
            "    const userMarker = L.circleMarker({}, {{ radius: 12, fillColor: '{}', \
             color: '#FFFFFF', weight: 3, opacity: 1, fillOpacity: 0.8 }}).addTo(map);",
            user, USER_COLOR
        );
        let _ = writeln!(
            html,
            "    userMarker.bindPopup('{}');",
            popup("Your Location", "You are here")
        );
        html.push_str("    const group = new L.featureGroup();\n    group.addLayer(userMarker);\n");

        if let Some(current) = &self.destinations.current {
            let at = latlng(current.coords);
            let _ = writeln!(
                html,
                "    const currentMarker = L.marker({}, {{ icon: pin('{}', 32) }}).addTo(map);",
                at, CURRENT_COLOR
            );
            let _ = writeln!(
                html,
                "    currentMarker.bindPopup('{}');",
                popup(&current.label, &current.address)
            );
            let _ = writeln!(
                html,
                "    route({}, {}, {{ color: '{}', weight: 4, opacity: 0.7 }});",
                user, at, CURRENT_COLOR
            );
            html.push_str("    group.addLayer(currentMarker);\n");
        }

        if let Some(next) = &self.destinations.next {
            let at = latlng(next.coords);
            let _ = writeln!(
                html,
                "    const nextMarker = L.marker({}, {{ icon: pin('{}', 28) }}).addTo(map);",
                at, NEXT_COLOR
            );
            let _ = writeln!(
                html,
                "    nextMarker.bindPopup('{}');",
                popup(&next.label, &next.address)
            );
            if let Some(current) = &self.destinations.current {
                let _ = writeln!(
                    html,
                    "    route({}, {}, {{ color: '{}', weight: 3, opacity: 0.6, dashArray: '10, 5' }});",
                    latlng(current.coords),
                    at,
                    NEXT_COLOR
                );
            }
            html.push_str("    group.addLayer(nextMarker);\n");
        }

        html.push_str(DOCUMENT_TAIL);
        html
    }

    /// Write the rendered document to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render_html())?;
        debug!(path = %path.display(), "map document written");
        Ok(())
    }
}

fn latlng(c: Coordinates) -> String {
    format!("[{}, {}]", c.lat, c.lng)
}

fn popup(title: &str, address: &str) -> String {
    format!(
        "<div class=\"custom-popup\"><div class=\"popup-title\">{}</div>\
         <div class=\"popup-address\">{}</div></div>",
        escape_html(title),
        escape_html(address)
    )
}

/// Escape text for an HTML fragment inside a single-quoted JS string
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\\' => out.push_str("&#92;"),
            '`' => out.push_str("&#96;"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
