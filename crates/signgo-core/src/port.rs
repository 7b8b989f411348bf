//! Static table of Philippine seaports

use crate::geo::Coordinates;

/// A named seaport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    pub value: &'static str,
    pub label: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Port {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

pub static PH_PORTS: [Port; 10] = [
    Port { value: "manila", label: "Manila", lat: 14.5995, lng: 120.9842 },
    Port { value: "subic", label: "Subic", lat: 14.7946, lng: 120.271 },
    Port { value: "batangas", label: "Batangas", lat: 13.7565, lng: 121.0583 },
    Port { value: "cebu", label: "Cebu", lat: 10.3157, lng: 123.8854 },
    Port { value: "iloilo", label: "Iloilo", lat: 10.7202, lng: 122.5621 },
    Port { value: "bacolod", label: "Bacolod", lat: 10.6765, lng: 122.9511 },
    Port { value: "davao", label: "Davao", lat: 7.1907, lng: 125.4553 },
    Port { value: "cagayan-de-oro", label: "Cagayan de Oro", lat: 8.4542, lng: 124.6319 },
    Port { value: "general-santos", label: "General Santos", lat: 6.1164, lng: 125.1716 },
    Port { value: "zamboanga", label: "Zamboanga", lat: 6.9214, lng: 122.079 },
];

/// Which leg a port sits on; decides the fallback for unknown keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    Origin,
    Destination,
}

impl PortRole {
    pub fn default_port(self) -> &'static Port {
        match self {
            PortRole::Origin => &PH_PORTS[0],
            PortRole::Destination => &PH_PORTS[3],
        }
    }
}

/// Look up a port by key, ignoring case and treating spaces as dashes
pub fn port_by_value(value: &str) -> Option<&'static Port> {
    let key = value.trim().to_lowercase().replace(' ', "-");
    PH_PORTS.iter().find(|port| port.value == key)
}

/// Port for `value`, or the role's default when the key is unknown
pub fn resolve_port(value: &str, role: PortRole) -> &'static Port {
    port_by_value(value).unwrap_or_else(|| {
        tracing::debug!(port = value, ?role, "unknown port, using default");
        role.default_port()
    })
}
