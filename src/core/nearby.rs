use std::sync::Arc;

use crate::core::geo::round_km;
use crate::core::index::ProximityIndex;
use crate::models::{
    GeoPoint, NearbyUserResponse, ReportResponse, ReportStatus, ReportSummary, UserSummary,
};

/// Multiplier applied to great-circle distance to approximate road
/// travel distance for user-to-user search. Raw great-circle distance
/// systematically understates real travel distance; a constant factor
/// is a cheap, documented approximation, not a routing engine.
pub const DEFAULT_CIRCUITY_FACTOR: f64 = 1.4;

/// Read-side orchestration over the user and report indexes.
pub struct NearbyQueryService {
    users: Arc<dyn ProximityIndex<UserSummary>>,
    reports: Arc<dyn ProximityIndex<ReportSummary>>,
    circuity_factor: f64,
}

impl NearbyQueryService {
    pub fn new(
        users: Arc<dyn ProximityIndex<UserSummary>>,
        reports: Arc<dyn ProximityIndex<ReportSummary>>,
        circuity_factor: f64,
    ) -> Self {
        Self {
            users,
            reports,
            circuity_factor,
        }
    }

    /// Users within `radius_km` of `origin`, by circuity-corrected
    /// distance ascending. The requester and any user matching the
    /// caller-supplied `exclude` predicate (role checks live with the
    /// caller) are left out. `None` origin yields an empty list:
    /// unknown location is an expected state, not an error.
    pub fn nearby_users<F>(
        &self,
        requester_id: i64,
        origin: Option<GeoPoint>,
        radius_km: f64,
        exclude: F,
    ) -> Vec<NearbyUserResponse>
    where
        F: Fn(&UserSummary) -> bool,
    {
        let Some(origin) = origin else {
            return Vec::new();
        };

        let mut out: Vec<NearbyUserResponse> = self
            .users
            .query(origin, radius_km, Some(requester_id))
            .into_iter()
            .filter(|hit| !exclude(&hit.entity.payload))
            .map(|hit| NearbyUserResponse {
                id: hit.entity.id,
                full_name: hit.entity.payload.full_name.clone(),
                image_url: hit.entity.payload.image_url.clone(),
                distance_km: round_km(hit.distance_km * self.circuity_factor),
            })
            .filter(|user| user.distance_km <= radius_km)
            .collect();

        out.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        out
    }

    /// Reports within `radius_km` of `origin`, raw distance ascending.
    /// No circuity correction: reports are about physical proximity for
    /// search and rescue, not travel planning. Reunited reports are
    /// excluded.
    pub fn nearby_reports(&self, origin: Option<GeoPoint>, radius_km: f64) -> Vec<ReportResponse> {
        let Some(origin) = origin else {
            return Vec::new();
        };

        self.reports
            .query(origin, radius_km, None)
            .into_iter()
            .filter(|hit| hit.entity.payload.status != ReportStatus::Reunited)
            .map(|hit| ReportResponse::from_hit(&hit.entity, round_km(hit.distance_km)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::ScanIndex;
    use crate::models::Located;

    fn user(id: i64, lat: f64, role: &str) -> Located<UserSummary> {
        Located {
            id,
            owner_id: id,
            point: Some(GeoPoint { lat, lon: -74.0 }),
            payload: UserSummary {
                full_name: format!("User {}", id),
                image_url: None,
                role: role.to_string(),
            },
        }
    }

    fn report(id: i64, lat: f64, status: ReportStatus) -> Located<ReportSummary> {
        Located {
            id,
            owner_id: id * 100,
            point: Some(GeoPoint { lat, lon: -74.0 }),
            payload: ReportSummary {
                status,
                species: "Dog".to_string(),
                breed: Some("Labrador".to_string()),
                pet_name: format!("Pet {}", id),
                description: None,
                last_seen_location: "park".to_string(),
                image_url: None,
                created_at: chrono::Utc::now(),
            },
        }
    }

    fn service() -> (
        Arc<ScanIndex<UserSummary>>,
        Arc<ScanIndex<ReportSummary>>,
        NearbyQueryService,
    ) {
        let users = Arc::new(ScanIndex::new());
        let reports = Arc::new(ScanIndex::new());
        let svc = NearbyQueryService::new(users.clone(), reports.clone(), DEFAULT_CIRCUITY_FACTOR);
        (users, reports, svc)
    }

    const ORIGIN: GeoPoint = GeoPoint {
        lat: 40.0,
        lon: -74.0,
    };

    #[test]
    fn test_nearby_users_applies_circuity_correction() {
        let (users, _, svc) = service();
        // 0.01 degrees of latitude: ~1.11 km raw, ~1.56 km corrected
        users.upsert(user(2, 40.01, "USER"));

        let result = svc.nearby_users(1, Some(ORIGIN), 5.0, |_| false);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].distance_km, 1.56);
    }

    #[test]
    fn test_nearby_users_filters_on_corrected_distance() {
        let (users, _, svc) = service();
        // ~4.45 km raw, ~6.23 km corrected: inside raw radius, outside corrected
        users.upsert(user(2, 40.04, "USER"));

        let result = svc.nearby_users(1, Some(ORIGIN), 5.0, |_| false);
        assert!(result.is_empty());
    }

    #[test]
    fn test_nearby_users_excludes_requester_and_predicate_matches() {
        let (users, _, svc) = service();
        users.upsert(user(1, 40.001, "USER"));
        users.upsert(user(2, 40.002, "ADMIN"));
        users.upsert(user(3, 40.003, "USER"));

        let result = svc.nearby_users(1, Some(ORIGIN), 10.0, |u| u.role == "ADMIN");
        let ids: Vec<i64> = result.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_nearby_users_sorted_ascending() {
        let (users, _, svc) = service();
        users.upsert(user(2, 40.02, "USER"));
        users.upsert(user(3, 40.005, "USER"));
        users.upsert(user(4, 40.01, "USER"));

        let result = svc.nearby_users(1, Some(ORIGIN), 10.0, |_| false);
        let ids: Vec<i64> = result.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 4, 2]);
    }

    #[test]
    fn test_nearby_users_without_origin_is_empty() {
        let (users, _, svc) = service();
        users.upsert(user(2, 40.01, "USER"));

        assert!(svc.nearby_users(1, None, 10.0, |_| false).is_empty());
    }

    #[test]
    fn test_nearby_reports_excludes_reunited() {
        let (_, reports, svc) = service();
        reports.upsert(report(1, 40.01, ReportStatus::Missing));
        reports.upsert(report(2, 40.02, ReportStatus::Reunited));
        reports.upsert(report(3, 40.03, ReportStatus::Found));

        let result = svc.nearby_reports(Some(ORIGIN), 10.0);
        let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_nearby_reports_uses_raw_distance() {
        let (_, reports, svc) = service();
        // ~4.45 km raw; would be excluded under a 1.4x correction
        reports.upsert(report(1, 40.04, ReportStatus::Missing));

        let result = svc.nearby_reports(Some(ORIGIN), 5.0);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].distance_km, Some(4.45));
    }

    #[test]
    fn test_nearby_reports_empty_cases() {
        let (_, reports, svc) = service();
        reports.upsert(report(1, 45.0, ReportStatus::Missing)); // far away

        assert!(svc.nearby_reports(Some(ORIGIN), 10.0).is_empty());
        assert!(svc.nearby_reports(None, 10.0).is_empty());
    }
}
