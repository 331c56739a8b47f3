// HTTP-level tests for the request guards on the nearby endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use petconnect_geo::core::{NearbyQueryService, ReportLifecycle, ScanIndex};
use petconnect_geo::models::{GeoPoint, ReportSummary, UserRecord, UserSummary};
use petconnect_geo::routes::{configure_routes, AppState};
use petconnect_geo::services::{
    InMemoryContactLog, InMemoryReportStore, InMemoryUserDirectory, RecordingNotificationSink,
};

async fn state() -> AppState {
    let directory = Arc::new(InMemoryUserDirectory::new());
    directory
        .insert(UserRecord {
            id: 1,
            full_name: "User 1".to_string(),
            image_url: None,
            role: "USER".to_string(),
            point: Some(GeoPoint { lat: 40.0, lon: -74.0 }),
            phone: None,
            email: "user1@example.com".to_string(),
        })
        .await;

    let user_index: Arc<ScanIndex<UserSummary>> = Arc::new(ScanIndex::new());
    let report_index: Arc<ScanIndex<ReportSummary>> = Arc::new(ScanIndex::new());

    let lifecycle = Arc::new(ReportLifecycle::new(
        directory.clone(),
        Arc::new(InMemoryReportStore::new()),
        Arc::new(InMemoryContactLog::new()),
        Arc::new(RecordingNotificationSink::new()),
        user_index.clone(),
        report_index.clone(),
        10.0,
        5.0,
    ));
    let nearby = Arc::new(NearbyQueryService::new(user_index, report_index, 1.4));

    AppState {
        directory,
        lifecycle,
        nearby,
    }
}

async fn get_status(uri: &str) -> StatusCode {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state().await))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri(uri).to_request();
    test::call_service(&app, req).await.status()
}

#[actix_web::test]
async fn test_nearby_users_rejects_non_positive_radius() {
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=1&radius=0").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=1&radius=-2.5").await,
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_nearby_users_rejects_out_of_range_coordinates() {
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=1&radius=5&lat=95.0&lon=0.0").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=1&radius=5&lat=40.0&lon=-181.0").await,
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_nearby_users_rejects_lone_coordinate() {
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=1&radius=5&lat=40.0").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=1&radius=5&lon=-74.0").await,
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_nearby_users_accepts_valid_query() {
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=1&radius=5").await,
        StatusCode::OK
    );
}

#[actix_web::test]
async fn test_nearby_users_unknown_requester_is_not_found() {
    assert_eq!(
        get_status("/api/v1/users/nearby?userId=99&radius=5").await,
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_nearby_reports_rejects_non_positive_radius() {
    assert_eq!(
        get_status("/api/v1/reports/nearby?userId=1&radius=0").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get_status("/api/v1/reports/nearby?userId=1&radius=-1").await,
        StatusCode::BAD_REQUEST
    );
}
