//! Courier booking API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::booking::Booking;
use crate::error::ApiError;
use crate::incident::IncidentReport;
use crate::status::BookingStatus;

/// Result type for API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Default server, matching the courier backend's development setup
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote operations the client depends on
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Look up a booking by booking or HWB number; `Ok(None)` when the
    /// server answers with an empty result
    async fn search(&self, query: &str) -> ApiResult<Option<Booking>>;

    /// Ask the server to move a booking to `status`
    async fn update_status(&self, id: &str, status: &BookingStatus) -> ApiResult<Booking>;

    /// Upload an incident report
    async fn report_incident(&self, report: &IncidentReport) -> ApiResult<()>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    booking: Option<Booking>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    booking: Booking,
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a BookingStatus,
}

/// HTTP implementation of [`BookingApi`]
#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBookingApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Unexpected {
                status: None,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/couriers/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> ApiResult<reqwest::Url> {
        let invalid = |message: String| ApiError::Unexpected {
            status: None,
            message,
        };
        let mut url = reqwest::Url::parse(&format!("{}/couriers", self.base_url))
            .map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("Base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(%status, %body, "request failed");
        Err(ApiError::from_status(status.as_u16(), body))
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn search(&self, query: &str) -> ApiResult<Option<Booking>> {
        let url = self.endpoint(&["public", "search", query])?;
        debug!(%url, "searching booking");
        let response = self.client.get(url).send().await?;
        let body: SearchResponse = Self::check(response).await?.json().await?;
        Ok(body.booking)
    }

    async fn update_status(&self, id: &str, status: &BookingStatus) -> ApiResult<Booking> {
        let url = self.endpoint(&[id, "status"])?;
        debug!(%url, %status, "updating booking status");

        let response = self
            .client
            .put(url)
            .json(&StatusUpdate { status })
            .send()
            .await?;
        let body: UpdateResponse = Self::check(response).await?.json().await?;
        Ok(body.booking)
    }

    async fn report_incident(&self, report: &IncidentReport) -> ApiResult<()> {
        let url = self.endpoint(&["incident"])?;
        debug!(%url, booking_id = %report.booking_id, "uploading incident");

        let mut form = Form::new()
            .text("type", report.kind.code())
            .text("description", report.description.clone())
            .text("bookingId", report.booking_id.clone())
            .text("totalCost", report.total_cost.clone());

        if let Some(image) = &report.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime)
                .map_err(|e| ApiError::Unexpected {
                    status: None,
                    message: e.to_string(),
                })?;
            form = form.part("image", part);
        }

        let response = self.client.post(url).multipart(form).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::{IncidentImage, IncidentKind};
    use axum::{
        extract::{Multipart, Path},
        http::StatusCode,
        routing::{get, post, put},
        Json, Router,
    };
    use std::sync::{Arc, Mutex};

    fn booking_json(id: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "booking_number": "BK-1",
            "hwb_number": "HWB-1",
            "status": status,
            "shipper": "Shipper",
            "consignee": "Consignee",
            "origin_port": "manila",
            "destination_port": "cebu",
            "created_at": "2024-03-05T08:30:00Z"
        })
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn api(base: String) -> HttpBookingApi {
        HttpBookingApi::new(base, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_search_found_and_empty() {
        let app = Router::new().route(
            "/couriers/public/search/:query",
            get(|Path(query): Path<String>| async move {
                if query == "BK 1" {
                    Json(serde_json::json!({ "booking": booking_json("1", "IN_TRANSIT") }))
                } else {
                    Json(serde_json::json!({ "booking": null }))
                }
            }),
        );
        let api = api(serve(app).await);

        let found = api.search("BK 1").await.unwrap().unwrap();
        assert_eq!(found.id, "1");
        assert_eq!(found.status, BookingStatus::InTransit);

        assert_eq!(api.search("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_error_statuses() {
        let app = Router::new()
            .route(
                "/couriers/public/search/missing",
                get(|| async { StatusCode::NOT_FOUND }),
            )
            .route(
                "/couriers/public/search/broken",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/couriers/public/search/teapot",
                get(|| async { StatusCode::IM_A_TEAPOT }),
            );
        let api = api(serve(app).await);

        assert_eq!(api.search("missing").await, Err(ApiError::NotFound));
        assert_eq!(api.search("broken").await, Err(ApiError::Server(500)));
        assert!(matches!(
            api.search("teapot").await,
            Err(ApiError::Unexpected {
                status: Some(418),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_search_timeout() {
        let app = Router::new().route(
            "/couriers/public/search/:query",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({ "booking": null }))
            }),
        );
        let base = serve(app).await;
        let api = HttpBookingApi::new(base, Duration::from_millis(200)).unwrap();

        assert_eq!(api.search("slow").await, Err(ApiError::Timeout));
    }

    #[tokio::test]
    async fn test_search_network_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = api(format!("http://{}", addr));
        assert!(matches!(
            api.search("BK-1").await,
            Err(ApiError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_update_status_sends_code() {
        let app = Router::new().route(
            "/couriers/:id/status",
            put(
                |Path(id): Path<String>, Json(body): Json<serde_json::Value>| async move {
                    let status = body["status"].as_str().unwrap_or_default().to_string();
                    Json(serde_json::json!({ "booking": booking_json(&id, &status) }))
                },
            ),
        );
        let api = api(serve(app).await);

        let updated = api
            .update_status("77", &BookingStatus::LoadedToTruck)
            .await
            .unwrap();
        assert_eq!(updated.id, "77");
        assert_eq!(updated.status, BookingStatus::LoadedToTruck);
    }

    #[tokio::test]
    async fn test_update_status_encodes_id() {
        let app = Router::new().route(
            "/couriers/:id/status",
            put(|Path(id): Path<String>| async move {
                Json(serde_json::json!({ "booking": booking_json(&id, "DELIVERED") }))
            }),
        );
        let api = api(serve(app).await + "/");
        assert!(!api.base_url().ends_with('/'));

        let updated = api
            .update_status("BK/7?x#1", &BookingStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(updated.id, "BK/7?x#1");
    }

    #[tokio::test]
    async fn test_report_incident_multipart_fields() {
        let received: Arc<Mutex<Vec<(String, String)>>> = Arc::default();
        let sink = received.clone();

        let app = Router::new().route(
            "/couriers/incident",
            post(move |mut multipart: Multipart| {
                let sink = sink.clone();
                async move {
                    while let Ok(Some(field)) = multipart.next_field().await {
                        let name = field.name().unwrap_or_default().to_string();
                        let value = if name == "image" {
                            format!(
                                "{}:{}",
                                field.file_name().unwrap_or_default(),
                                field.content_type().unwrap_or_default()
                            )
                        } else {
                            field.text().await.unwrap_or_default()
                        };
                        sink.lock().unwrap().push((name, value));
                    }
                    StatusCode::CREATED
                }
            }),
        );
        let api = api(serve(app).await);

        let report = IncidentReport {
            kind: IncidentKind::Land,
            description: "Flat tire near Lucena".into(),
            booking_id: "bk-9".into(),
            total_cost: "1500".into(),
            image: Some(IncidentImage {
                file_name: "tire.jpg".into(),
                mime: "image/jpg".into(),
                bytes: vec![0xff, 0xd8, 0xff],
            }),
        };
        api.report_incident(&report).await.unwrap();

        let fields = received.lock().unwrap().clone();
        assert!(fields.contains(&("type".into(), "LAND".into())));
        assert!(fields.contains(&("description".into(), "Flat tire near Lucena".into())));
        assert!(fields.contains(&("bookingId".into(), "bk-9".into())));
        assert!(fields.contains(&("totalCost".into(), "1500".into())));
        assert!(fields.contains(&("image".into(), "tire.jpg:image/jpg".into())));
    }
}
