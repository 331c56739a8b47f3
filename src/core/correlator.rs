use crate::core::geo::haversine_distance;
use crate::models::{MatchCandidatePair, ReportRecord};

/// Correlates a newly created report against the opposing-status report
/// population.
///
/// A MISSING report is compared against FOUND candidates and vice
/// versa; REUNITED reports never correlate. Species must match
/// case-insensitively, breed must be present on both sides and match
/// case-insensitively, and the candidate must lie within the fixed
/// correlation radius. All matches are reported; a report may match
/// more than one opposing report.
#[derive(Debug, Clone)]
pub struct MatchCorrelator {
    radius_km: f64,
}

/// Fixed correlation radius in kilometers, distinct from any
/// user-specified search radius.
pub const DEFAULT_CORRELATION_RADIUS_KM: f64 = 10.0;

impl MatchCorrelator {
    pub fn new(radius_km: f64) -> Self {
        Self { radius_km }
    }

    /// Run one correlation pass. Pure: the same population and report
    /// always produce the same candidate set, ordered by candidate id.
    pub fn correlate(
        &self,
        new_report: &ReportRecord,
        candidates: &[ReportRecord],
    ) -> Vec<MatchCandidatePair> {
        let Some(opposite) = new_report.status.opposite() else {
            return Vec::new();
        };

        let mut pairs: Vec<MatchCandidatePair> = candidates
            .iter()
            .filter(|c| c.id != new_report.id)
            .filter(|c| c.status == opposite)
            .filter(|c| c.species.eq_ignore_ascii_case(&new_report.species))
            .filter(|c| {
                matches!(
                    (&c.breed, &new_report.breed),
                    (Some(a), Some(b)) if a.eq_ignore_ascii_case(b)
                )
            })
            .filter_map(|c| {
                let distance_km = haversine_distance(new_report.point, c.point);
                (distance_km <= self.radius_km).then_some(MatchCandidatePair {
                    source_report_id: new_report.id,
                    candidate_report_id: c.id,
                    distance_km,
                })
            })
            .collect();

        pairs.sort_by_key(|p| p.candidate_report_id);
        pairs
    }
}

impl Default for MatchCorrelator {
    fn default() -> Self {
        Self::new(DEFAULT_CORRELATION_RADIUS_KM)
    }
}
