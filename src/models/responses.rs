use serde::{Deserialize, Serialize};

use crate::models::domain::{ContactRecord, Located, ReportRecord, ReportStatus, ReportSummary};

/// One nearby user, with road-distance-corrected distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyUserResponse {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

/// A report as returned to callers. `distance_km` is present only on
/// nearby queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub id: i64,
    #[serde(rename = "reporterId")]
    pub reporter_id: i64,
    #[serde(rename = "petName")]
    pub pet_name: String,
    pub species: String,
    pub breed: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "lastSeenLocation")]
    pub last_seen_location: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub status: ReportStatus,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "distanceKm", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl ReportResponse {
    pub fn from_record(record: &ReportRecord) -> Self {
        Self {
            id: record.id,
            reporter_id: record.reporter_id,
            pet_name: record.pet_name.clone(),
            species: record.species.clone(),
            breed: record.breed.clone(),
            description: record.description.clone(),
            last_seen_location: record.last_seen_location.clone(),
            latitude: record.point.lat,
            longitude: record.point.lon,
            image_url: record.image_url.clone(),
            status: record.status,
            created_at: record.created_at,
            distance_km: None,
        }
    }

    pub fn from_hit(entity: &Located<ReportSummary>, distance_km: f64) -> Self {
        let point = entity.point.unwrap_or(crate::models::GeoPoint { lat: 0.0, lon: 0.0 });
        Self {
            id: entity.id,
            reporter_id: entity.owner_id,
            pet_name: entity.payload.pet_name.clone(),
            species: entity.payload.species.clone(),
            breed: entity.payload.breed.clone(),
            description: entity.payload.description.clone(),
            last_seen_location: entity.payload.last_seen_location.clone(),
            latitude: point.lat,
            longitude: point.lon,
            image_url: entity.payload.image_url.clone(),
            status: entity.payload.status,
            created_at: entity.payload.created_at,
            distance_km: Some(distance_km),
        }
    }
}

/// One recorded contact, with the contacting user's display fields
/// resolved through the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: i64,
    #[serde(rename = "contactUserId")]
    pub contact_user_id: i64,
    #[serde(rename = "contactUserName")]
    pub contact_user_name: Option<String>,
    #[serde(rename = "contactUserImage")]
    pub contact_user_image: Option<String>,
    pub message: String,
    #[serde(rename = "contactPhone")]
    pub contact_phone: Option<String>,
    #[serde(rename = "contactEmail")]
    pub contact_email: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ContactResponse {
    pub fn from_record(
        record: &ContactRecord,
        user_name: Option<String>,
        user_image: Option<String>,
    ) -> Self {
        Self {
            id: record.id,
            contact_user_id: record.contact_user_id,
            contact_user_name: user_name,
            contact_user_image: user_image,
            message: record.message.clone(),
            contact_phone: record.contact_phone.clone(),
            contact_email: record.contact_email.clone(),
            created_at: record.created_at,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
