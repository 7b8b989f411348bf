//! User position and address geocoding
//!
//! Both are best-effort: a missing position or a failed lookup degrades to
//! the default coordinates instead of failing the screen.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, SignGoError};
use crate::geo::{Coordinates, MANILA};

/// Source of the user's current position
pub trait LocationProvider: Send + Sync {
    /// Current position, or `None` when access is denied or unavailable
    fn current_position(&self) -> Option<Coordinates>;
}

/// A position fixed at startup (from configuration or the command line)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinates>);

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> Option<Coordinates> {
        self.0
    }
}

/// The user's position, falling back to Manila
pub fn user_location_or_default(provider: &dyn LocationProvider) -> Coordinates {
    provider.current_position().unwrap_or_else(|| {
        debug!("user location unavailable, using default");
        MANILA
    })
}

/// Forward geocoding of a free-text address
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates of `address`, `Ok(None)` when nothing matched
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}

/// Geocoder that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

#[async_trait]
impl Geocoder for NoGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>> {
        Ok(None)
    }
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("signgo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SignGoError::Geocoding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.endpoint);
        debug!(%url, address, "geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| SignGoError::Geocoding(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SignGoError::Geocoding(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| SignGoError::Geocoding(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => Ok(Some(Coordinates::new(lat, lng))),
            _ => {
                warn!(lat = %place.lat, lon = %place.lon, "geocoder returned unparsable coordinates");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use std::collections::HashMap;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_fixed_location_default() {
        assert_eq!(user_location_or_default(&FixedLocation(None)), MANILA);

        let here = Coordinates::new(7.19, 125.45);
        assert_eq!(user_location_or_default(&FixedLocation(Some(here))), here);
    }

    #[tokio::test]
    async fn test_no_geocoder_finds_nothing() {
        assert_eq!(NoGeocoder.geocode("anywhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_nominatim_first_match() {
        let app = Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("q").map(String::as_str) == Some("Mandaue, Cebu") {
                    Json(serde_json::json!([
                        { "lat": "10.3236", "lon": "123.9223", "display_name": "Mandaue" },
                        { "lat": "0", "lon": "0" }
                    ]))
                } else {
                    Json(serde_json::json!([]))
                }
            }),
        );
        let base = serve(app).await;
        let geocoder = NominatimGeocoder::new(base, Duration::from_secs(5)).unwrap();

        assert_eq!(
            geocoder.geocode("Mandaue, Cebu").await.unwrap(),
            Some(Coordinates::new(10.3236, 123.9223))
        );
        assert_eq!(geocoder.geocode("nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_nominatim_unreachable_is_error() {
        let geocoder =
            NominatimGeocoder::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            geocoder.geocode("Cebu").await,
            Err(SignGoError::Geocoding(_))
        ));
    }
}
