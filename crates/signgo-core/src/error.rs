//! Error types for the Sign&Go client library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SignGoError>;

/// Failure categories of a remote API call
///
/// Categories only decide which alert the user sees; none of them carries a
/// distinct recovery action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Not found")]
    NotFound,

    #[error("Server error (HTTP {0})")]
    Server(u16),

    #[error("Network unreachable: {0}")]
    Network(String),

    #[error("Unexpected response (HTTP {status:?}): {message}")]
    Unexpected {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            404 => ApiError::NotFound,
            500..=599 => ApiError::Server(status),
            _ => ApiError::Unexpected {
                status: Some(status),
                message: body.into(),
            },
        }
    }

    /// Alert shown when a booking search fails
    pub fn search_alert(&self) -> Alert {
        match self {
            ApiError::Timeout => Alert::error("Request timed out. Please try again."),
            ApiError::NotFound => Alert::new("Not Found", "No bookings found with that number."),
            ApiError::Server(_) => Alert::new(
                "Server Error",
                "Server is experiencing issues. Please try again later.",
            ),
            ApiError::Network(_) => Alert::new(
                "Network Error",
                "Please check your internet connection and try again.",
            ),
            ApiError::Unexpected { status, .. } => {
                let code = status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                Alert::error(format!("Failed to search ({}). Please try again.", code))
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), err.to_string())
        } else if err.is_connect() || err.is_request() {
            ApiError::Network(err.to_string())
        } else {
            ApiError::Unexpected {
                status: None,
                message: err.to_string(),
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum SignGoError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SignGoError {
    /// Alert for this error in the context of a booking search
    pub fn search_alert(&self) -> Alert {
        match self {
            SignGoError::Api(api) => api.search_alert(),
            SignGoError::Validation(msg) => Alert::error(msg.clone()),
            other => Alert::error(other.to_string()),
        }
    }
}

/// A modal message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Alert with the generic "Error" title
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("Success", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::from_status(404, ""), ApiError::NotFound);
        assert_eq!(ApiError::from_status(500, ""), ApiError::Server(500));
        assert_eq!(ApiError::from_status(503, ""), ApiError::Server(503));
        assert!(matches!(
            ApiError::from_status(400, "bad"),
            ApiError::Unexpected {
                status: Some(400),
                ..
            }
        ));
    }

    #[test]
    fn test_search_alerts_are_distinct() {
        let alerts = [
            ApiError::Timeout.search_alert(),
            ApiError::NotFound.search_alert(),
            ApiError::Server(502).search_alert(),
            ApiError::Network("refused".into()).search_alert(),
            ApiError::Unexpected {
                status: Some(418),
                message: String::new(),
            }
            .search_alert(),
        ];

        for (i, a) in alerts.iter().enumerate() {
            for b in &alerts[i + 1..] {
                assert_ne!(a.message, b.message);
            }
        }
        assert_eq!(alerts[1].title, "Not Found");
        assert_eq!(alerts[2].title, "Server Error");
        assert_eq!(alerts[3].title, "Network Error");
        assert_eq!(
            alerts[4].message,
            "Failed to search (418). Please try again."
        );
    }

    #[test]
    fn test_unknown_status_alert() {
        let alert = ApiError::Unexpected {
            status: None,
            message: "decode".into(),
        }
        .search_alert();
        assert_eq!(alert.message, "Failed to search (Unknown). Please try again.");
    }
}
