use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::geo::haversine_distance;
use crate::models::{GeoPoint, Located};

/// One query result: the entity and its raw great-circle distance from
/// the query center.
#[derive(Debug, Clone)]
pub struct Hit<T> {
    pub entity: Located<T>,
    pub distance_km: f64,
}

/// Radius-bounded proximity search over a changing population.
///
/// Callers depend only on this contract, not on scan order, so a
/// grid/geohash or R-tree implementation can replace [`ScanIndex`]
/// without touching the query or correlation paths.
pub trait ProximityIndex<T>: Send + Sync {
    /// Insert or replace an entity. Safe to call concurrently with
    /// in-flight queries; a query sees either the pre- or post-mutation
    /// state of the entity, never a partial write.
    fn upsert(&self, entity: Located<T>);

    /// Remove an entity by id. Unknown ids are a no-op.
    fn remove(&self, id: i64);

    /// All entities within `radius_km` (inclusive) of `center`,
    /// ascending by distance with ties broken by id. Entities without a
    /// known location are skipped.
    fn query(&self, center: GeoPoint, radius_km: f64, exclude_id: Option<i64>) -> Vec<Hit<T>>;
}

/// Linear-scan index: correct at any scale, fast enough at small scale.
///
/// The coarse read/write lock serializes mutations against readers; a
/// whole entity is replaced under the write lock so readers never see a
/// half-updated record.
pub struct ScanIndex<T> {
    entries: RwLock<HashMap<i64, Located<T>>>,
}

impl<T> ScanIndex<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("index lock poisoned").len()
    }

    /// Swap in a whole new population under one write lock. Readers see
    /// either the old population or the new one, never a mix.
    pub fn replace_all(&self, entities: Vec<Located<T>>) {
        let mut entries = self.entries.write().expect("index lock poisoned");
        entries.clear();
        for entity in entities {
            entries.insert(entity.id, entity);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for ScanIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> ProximityIndex<T> for ScanIndex<T> {
    fn upsert(&self, entity: Located<T>) {
        self.entries
            .write()
            .expect("index lock poisoned")
            .insert(entity.id, entity);
    }

    fn remove(&self, id: i64) {
        self.entries.write().expect("index lock poisoned").remove(&id);
    }

    fn query(&self, center: GeoPoint, radius_km: f64, exclude_id: Option<i64>) -> Vec<Hit<T>> {
        let entries = self.entries.read().expect("index lock poisoned");

        let mut hits: Vec<Hit<T>> = entries
            .values()
            .filter(|e| exclude_id != Some(e.id))
            .filter_map(|e| {
                let point = e.point?;
                let distance_km = haversine_distance(center, point);
                (distance_km <= radius_km).then(|| Hit {
                    entity: e.clone(),
                    distance_km,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.entity.id.cmp(&b.entity.id))
        });

        hits
    }
}
