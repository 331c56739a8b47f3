// Core engine exports
pub mod correlator;
pub mod geo;
pub mod index;
pub mod lifecycle;
pub mod nearby;
pub mod refresh;

pub use correlator::{MatchCorrelator, DEFAULT_CORRELATION_RADIUS_KM};
pub use geo::{haversine_distance, round_km, EARTH_RADIUS_KM};
pub use index::{Hit, ProximityIndex, ScanIndex};
pub use lifecycle::{CreationHandler, ReportCreated, ReportLifecycle};
pub use nearby::{NearbyQueryService, DEFAULT_CIRCUITY_FACTOR};
pub use refresh::UserIndexRefresher;
