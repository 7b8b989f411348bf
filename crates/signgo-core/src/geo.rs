//! Coordinates and great-circle distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Manila, the fallback for pickups, origin ports and the user location
pub const MANILA: Coordinates = Coordinates {
    lat: 14.5995,
    lng: 120.9842,
};

/// Cebu, the fallback for deliveries and destination ports
pub const CEBU: Coordinates = Coordinates {
    lat: 10.3157,
    lng: 123.8854,
};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance to `other`, in km rounded to one decimal
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        distance_km(*self, *other)
    }
}

/// Haversine great-circle distance in kilometers, rounded to one decimal
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_KM * c * 10.0).round() / 10.0
}

/// "X km away" annotation for the tracking card
pub fn format_distance(km: f64) -> String {
    format!("{:.1} km away", km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_manila_to_cebu() {
        let d = distance_km(MANILA, CEBU);
        assert!((d - 570.0).abs() < 5.0, "got {}", d);
        assert_eq!(d, (d * 10.0).round() / 10.0);
        assert_eq!(CEBU.distance_km(&MANILA), d);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(12.0), "12.0 km away");
        assert_eq!(format_distance(0.35), "0.3 km away");
    }

    fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(a in arb_coordinates(), b in arb_coordinates()) {
            prop_assert_eq!(distance_km(a, b), distance_km(b, a));
        }

        #[test]
        fn prop_distance_to_self_is_zero(a in arb_coordinates()) {
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        #[test]
        fn prop_distance_is_bounded(a in arb_coordinates(), b in arb_coordinates()) {
            let d = distance_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= (std::f64::consts::PI * EARTH_RADIUS_KM).ceil());
        }
    }
}
