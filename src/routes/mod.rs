// Route exports
pub mod reports;
pub mod users;

use std::sync::Arc;

use actix_web::web;

use crate::core::{NearbyQueryService, ReportLifecycle};
use crate::services::UserDirectory;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub lifecycle: Arc<ReportLifecycle>,
    pub nearby: Arc<NearbyQueryService>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(users::configure)
            .configure(reports::configure),
    );
}
