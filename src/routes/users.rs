use actix_web::{web, HttpResponse, Responder};

use crate::error::EngineError;
use crate::models::{ErrorResponse, GeoPoint, HealthResponse, NearbyUsersQuery};
use crate::routes::AppState;

/// Configure user-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/users/nearby", web::get().to(nearby_users));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Nearby users endpoint
///
/// GET /api/v1/users/nearby?userId={id}&radius={km}[&lat={lat}&lon={lon}]
///
/// Distances are circuity-corrected to approximate road travel. An
/// explicit lat/lon pair overrides the requester's stored location;
/// with neither, an unknown stored location yields an empty list.
async fn nearby_users(
    state: web::Data<AppState>,
    query: web::Query<NearbyUsersQuery>,
) -> Result<HttpResponse, EngineError> {
    if query.radius <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_radius".to_string(),
            message: "radius must be positive".to_string(),
            status_code: 400,
        }));
    }

    let requester = state
        .directory
        .get_by_id(query.user_id)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("user {} not found", query.user_id)))?;

    let origin = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)?),
        (None, None) => requester.point,
        _ => {
            return Ok(HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_location".to_string(),
                message: "lat and lon must be provided together".to_string(),
                status_code: 400,
            }));
        }
    };

    let result =
        state
            .nearby
            .nearby_users(query.user_id, origin, query.radius, |u| u.role == "ADMIN");

    tracing::info!(
        "Nearby users for {}: {} result(s) within {} km",
        query.user_id,
        result.len(),
        query.radius
    );

    Ok(HttpResponse::Ok().json(result))
}
