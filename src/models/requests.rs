use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ReportStatus;

/// Request body to create a missing/found pet report.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 2, max = 50))]
    #[serde(alias = "pet_name", rename = "petName")]
    pub pet_name: String,
    #[validate(length(min = 1))]
    pub species: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub breed: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    #[serde(alias = "last_seen_location", rename = "lastSeenLocation")]
    pub last_seen_location: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(url)]
    #[serde(default, alias = "image_url", rename = "imageUrl")]
    pub image_url: Option<String>,
    pub status: ReportStatus,
}

/// Request body to contact a report's owner.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactReporterRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    #[validate(length(min = 1, max = 500))]
    pub message: String,
}

/// Query parameters for the nearby-users endpoint. `lat`/`lon` override
/// the requester's stored location when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyUsersQuery {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    #[serde(default = "default_radius_km")]
    pub radius: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Query parameters for the nearby-reports endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyReportsQuery {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    #[serde(default = "default_radius_km")]
    pub radius: f64,
}

/// Query parameter carrying the caller's identity where the body has none.
#[derive(Debug, Clone, Deserialize)]
pub struct CallerQuery {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
}

fn default_radius_km() -> f64 {
    10.0
}
