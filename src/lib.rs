//! PetConnect Geo - geospatial proximity and matching engine
//!
//! This library implements the location-aware subsystem of the
//! PetConnect backend: great-circle distance, radius-bounded
//! nearest-neighbor search over users and missing-pet reports, and the
//! missing/found report correlation pass with its notification
//! fan-out. Accounts, the social graph, feeds and checkout live in
//! other services; they are consumed here through narrow interfaces.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    haversine_distance, round_km, MatchCorrelator, NearbyQueryService, ProximityIndex,
    ReportLifecycle, ScanIndex,
};
pub use crate::error::EngineError;
pub use crate::models::{GeoPoint, NotificationEvent, NotificationKind, ReportStatus};
