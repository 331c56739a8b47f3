use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::EngineError;
use crate::models::{
    CallerQuery, ContactReporterRequest, CreateReportRequest, ErrorResponse, MessageResponse,
    NearbyReportsQuery, ReportResponse,
};
use crate::routes::AppState;

/// Configure report-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports/nearby", web::get().to(nearby_reports))
        .route("/reports/my", web::get().to(my_reports))
        .route("/reports/{userId}", web::post().to(create_report))
        .route("/reports/{reportId}", web::delete().to(delete_report))
        .route("/reports/{reportId}/reunite", web::post().to(mark_reunited))
        .route("/reports/{reportId}/contact", web::post().to(contact_reporter))
        .route("/reports/{reportId}/contacts", web::get().to(get_contacts));
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Create report endpoint
///
/// POST /api/v1/reports/{userId}
///
/// Persists the report, then triggers nearby-user fan-out (MISSING
/// only) and missing/found correlation as side effects.
async fn create_report(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<CreateReportRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_report: {}", errors);
        return Ok(validation_failed(errors));
    }

    let reporter_id = path.into_inner();
    let report = state
        .lifecycle
        .create_report(reporter_id, req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ReportResponse::from_record(&report)))
}

/// Nearby reports endpoint
///
/// GET /api/v1/reports/nearby?userId={id}&radius={km}
///
/// Origin is the requester's stored location; an unknown location
/// yields an empty list, not an error.
async fn nearby_reports(
    state: web::Data<AppState>,
    query: web::Query<NearbyReportsQuery>,
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

    let result = state.nearby.nearby_reports(requester.point, query.radius);

    tracing::info!(
        "Nearby reports for {}: {} result(s) within {} km",
        query.user_id,
        result.len(),
        query.radius
    );

    Ok(HttpResponse::Ok().json(result))
}

/// My reports endpoint
///
/// GET /api/v1/reports/my?userId={id}
async fn my_reports(
    state: web::Data<AppState>,
    query: web::Query<CallerQuery>,
) -> Result<HttpResponse, EngineError> {
    let reports = state.lifecycle.reports_by_user(query.user_id).await?;
    let response: Vec<ReportResponse> = reports.iter().map(ReportResponse::from_record).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Delete report endpoint
///
/// DELETE /api/v1/reports/{reportId}?userId={id}
async fn delete_report(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<CallerQuery>,
) -> Result<HttpResponse, EngineError> {
    state
        .lifecycle
        .delete_report(path.into_inner(), query.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Report deleted successfully".to_string(),
    }))
}

/// Reunite endpoint
///
/// POST /api/v1/reports/{reportId}/reunite?userId={id}
///
/// Terminal transition: the report leaves all subsequent nearby and
/// correlation queries.
async fn mark_reunited(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<CallerQuery>,
) -> Result<HttpResponse, EngineError> {
    let report = state
        .lifecycle
        .mark_reunited(path.into_inner(), query.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ReportResponse::from_record(&report)))
}

/// Contact reporter endpoint
///
/// POST /api/v1/reports/{reportId}/contact
///
/// Request body:
/// ```json
/// {
///   "userId": 42,
///   "message": "I think I saw your dog near the river"
/// }
/// ```
async fn contact_reporter(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<ContactReporterRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    state
        .lifecycle
        .contact_reporter(path.into_inner(), req.user_id, req.message.clone())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Message sent successfully".to_string(),
    }))
}

/// List contacts endpoint
///
/// GET /api/v1/reports/{reportId}/contacts?userId={id}
///
/// Only the owning reporter may list a report's contacts.
async fn get_contacts(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<CallerQuery>,
) -> Result<HttpResponse, EngineError> {
    let contacts = state
        .lifecycle
        .contacts_for_report(path.into_inner(), query.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(contacts))
}
