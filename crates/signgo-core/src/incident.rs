//! Incident report form

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::BookingApi;
use crate::booking::Booking;
use crate::error::{Result, SignGoError};

pub const DESCRIPTION_REQUIRED: &str = "Please describe the incident.";
pub const NO_ACTIVE_BOOKING: &str = "No active booking found.";
pub const INVALID_COST: &str = "Total cost must be a number.";
pub const SUBMITTED: &str = "Incident report submitted successfully.";
pub const SUBMIT_FAILED: &str = "Failed to submit incident.";

/// Transport leg the incident happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncidentKind {
    #[default]
    Land,
    Sea,
}

impl IncidentKind {
    pub fn code(self) -> &'static str {
        match self {
            IncidentKind::Land => "LAND",
            IncidentKind::Sea => "SEA",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            IncidentKind::Land => IncidentKind::Sea,
            IncidentKind::Sea => IncidentKind::Land,
        }
    }
}

/// How a validated report leaves the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentMode {
    /// Acknowledge locally without contacting the server
    Acknowledge,
    /// Multipart upload to the incident endpoint
    #[default]
    Upload,
}

/// Photo attached to a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl IncidentImage {
    /// Read an image file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self {
            mime: image_mime(&file_name),
            file_name,
            bytes,
        })
    }
}

/// `image/<ext>` from the file extension, or plain `image`
pub fn image_mime(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_alphanumeric() || c == '_') => {
            format!("image/{}", ext.to_lowercase())
        }
        _ => "image".to_string(),
    }
}

/// Raw form input, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentForm {
    pub kind: IncidentKind,
    pub description: String,
    pub total_cost: String,
    pub image_path: Option<String>,
}

/// A validated report ready to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentReport {
    pub kind: IncidentKind,
    pub description: String,
    pub booking_id: String,
    pub total_cost: String,
    pub image: Option<IncidentImage>,
}

impl IncidentForm {
    /// Check the form against the active booking
    ///
    /// Description is required, cost defaults to "0" and must parse as a
    /// number when given.
    pub fn validate(&self, booking: Option<&Booking>) -> Result<ValidIncident> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(SignGoError::Validation(DESCRIPTION_REQUIRED.to_string()));
        }
        let booking = booking.ok_or_else(|| SignGoError::Validation(NO_ACTIVE_BOOKING.to_string()))?;

        let cost = self.total_cost.trim();
        let total_cost = if cost.is_empty() {
            "0".to_string()
        } else if cost.parse::<f64>().is_ok_and(|c| c.is_finite() && c >= 0.0) {
            cost.to_string()
        } else {
            return Err(SignGoError::Validation(INVALID_COST.to_string()));
        };

        Ok(ValidIncident {
            kind: self.kind,
            description: description.to_string(),
            booking_id: booking.id.clone(),
            total_cost,
            image_path: self
                .image_path
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }
}

/// Validated form fields; the image is still a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidIncident {
    pub kind: IncidentKind,
    pub description: String,
    pub booking_id: String,
    pub total_cost: String,
    pub image_path: Option<String>,
}

impl ValidIncident {
    /// Attach the image (if any) and produce the report
    pub async fn into_report(self) -> Result<IncidentReport> {
        let image = match &self.image_path {
            Some(path) => Some(IncidentImage::load(Path::new(path)).await?),
            None => None,
        };

        Ok(IncidentReport {
            kind: self.kind,
            description: self.description,
            booking_id: self.booking_id,
            total_cost: self.total_cost,
            image,
        })
    }
}

/// Send a validated incident according to `mode`
pub async fn submit_incident(
    api: &dyn BookingApi,
    mode: IncidentMode,
    incident: ValidIncident,
) -> Result<()> {
    match mode {
        IncidentMode::Acknowledge => {
            info!(booking_id = %incident.booking_id, "incident acknowledged locally");
            Ok(())
        }
        IncidentMode::Upload => {
            let report = incident.into_report().await?;
            api.report_incident(&report).await?;
            info!(booking_id = %report.booking_id, "incident uploaded");
            Ok(())
        }
    }
}
