use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A validated geographic coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range coordinates at the boundary.
    pub fn new(lat: f64, lon: f64) -> Result<Self, EngineError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(EngineError::InvalidLocation(format!(
                "latitude {} out of range [-90, 90]",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(EngineError::InvalidLocation(format!(
                "longitude {} out of range [-180, 180]",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }
}

/// Report lifecycle status. Reunited is terminal: such reports are
/// excluded from the index, fan-out and correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "report_status", rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Missing,
    Found,
    Reunited,
}

impl ReportStatus {
    /// The status a correlation pass searches for. None for Reunited,
    /// which never correlates.
    pub fn opposite(self) -> Option<ReportStatus> {
        match self {
            ReportStatus::Missing => Some(ReportStatus::Found),
            ReportStatus::Found => Some(ReportStatus::Missing),
            ReportStatus::Reunited => None,
        }
    }
}

/// A record participating in proximity search. `point` is optional:
/// "no known location" is a valid, common state and such entities are
/// silently skipped by queries.
#[derive(Debug, Clone)]
pub struct Located<T> {
    pub id: i64,
    pub owner_id: i64,
    pub point: Option<GeoPoint>,
    pub payload: T,
}

/// Display fields carried by the user population of the index.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub full_name: String,
    pub image_url: Option<String>,
    pub role: String,
}

/// Fields carried by the report population of the index; enough to
/// answer nearby-report queries without a store round trip.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub status: ReportStatus,
    pub species: String,
    pub breed: Option<String>,
    pub pet_name: String,
    pub description: Option<String>,
    pub last_seen_location: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A user record as served by the user directory collaborator.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub full_name: String,
    pub image_url: Option<String>,
    pub role: String,
    pub point: Option<GeoPoint>,
    pub phone: Option<String>,
    pub email: String,
}

impl UserRecord {
    pub fn summary(&self) -> Located<UserSummary> {
        Located {
            id: self.id,
            owner_id: self.id,
            point: self.point,
            payload: UserSummary {
                full_name: self.full_name.clone(),
                image_url: self.image_url.clone(),
                role: self.role.clone(),
            },
        }
    }
}

/// A persisted missing/found pet report.
#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub id: i64,
    pub reporter_id: i64,
    pub pet_name: String,
    pub species: String,
    pub breed: Option<String>,
    pub description: Option<String>,
    pub last_seen_location: String,
    pub point: GeoPoint,
    pub image_url: Option<String>,
    pub status: ReportStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ReportRecord {
    pub fn summary(&self) -> Located<ReportSummary> {
        Located {
            id: self.id,
            owner_id: self.reporter_id,
            point: Some(self.point),
            payload: ReportSummary {
                status: self.status,
                species: self.species.clone(),
                breed: self.breed.clone(),
                pet_name: self.pet_name.clone(),
                description: self.description.clone(),
                last_seen_location: self.last_seen_location.clone(),
                image_url: self.image_url.clone(),
                created_at: self.created_at,
            },
        }
    }
}

/// A report draft prior to persistence.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub reporter_id: i64,
    pub pet_name: String,
    pub species: String,
    pub breed: Option<String>,
    pub description: Option<String>,
    pub last_seen_location: String,
    pub point: GeoPoint,
    pub image_url: Option<String>,
    pub status: ReportStatus,
}

/// One probable missing/found match produced by a correlation pass.
/// Ephemeral: consumed within the pass, never persisted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidatePair {
    pub source_report_id: i64,
    pub candidate_report_id: i64,
    pub distance_km: f64,
}

/// Notification kinds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Urgent,
    MatchFound,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Urgent => "URGENT",
            NotificationKind::MatchFound => "MATCH_FOUND",
        }
    }
}

/// An event handed to the notification sink. Emitted, not owned, by
/// this engine; delivery and read-state belong to the sink.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub recipient_id: i64,
    pub kind: NotificationKind,
    pub message: String,
    pub related_entity_id: i64,
    pub actor_id: i64,
}

/// A free-text contact message recorded against a report.
#[derive(Debug, Clone)]
pub struct ContactRecord {
    pub id: i64,
    pub report_id: i64,
    pub contact_user_id: i64,
    pub message: String,
    pub contact_phone: Option<String>,
    pub contact_email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A contact draft prior to persistence.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub report_id: i64,
    pub contact_user_id: i64,
    pub message: String,
    pub contact_phone: Option<String>,
    pub contact_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_accepts_valid_ranges() {
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
        assert!(GeoPoint::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn test_geo_point_rejects_out_of_range() {
        assert!(GeoPoint::new(90.01, 0.0).is_err());
        assert!(GeoPoint::new(-90.01, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 180.5).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_opposite_status() {
        assert_eq!(ReportStatus::Missing.opposite(), Some(ReportStatus::Found));
        assert_eq!(ReportStatus::Found.opposite(), Some(ReportStatus::Missing));
        assert_eq!(ReportStatus::Reunited.opposite(), None);
    }

    #[test]
    fn test_notification_kind_wire_values() {
        assert_eq!(NotificationKind::Urgent.as_str(), "URGENT");
        assert_eq!(NotificationKind::MatchFound.as_str(), "MATCH_FOUND");
    }
}
