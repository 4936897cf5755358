//! Integration tests for the Laptrend HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_test::TestServer;
use chrono::{NaiveDate, NaiveTime};
use laptrend::api::{
    AppState, BucketResponse, ErrorResponse, HealthResponse, ProgressResponse, StatusResponse,
    create_router,
};
use laptrend::config::HttpConfig;
use laptrend_core::{
    DriverId, InMemorySource, Lap, LaptrendError, ModeKind, ScoreBucket, Session, SessionFilter,
    SessionId, SessionSource, TrackId,
};
use tower::ServiceExt;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn no_limit() -> HttpConfig {
    HttpConfig {
        cors_origins: None,
        rate_limit: 0,
    }
}

fn session(id: &str, track: &str, day: u32, hour: u32, best: u64) -> Session {
    let laps = vec![
        Lap::new(1, best + 900),
        Lap::new(2, best),
        Lap::new(3, best + 300),
    ];
    Session {
        id: SessionId::new(id),
        driver_id: DriverId::new("driver-7"),
        track_id: TrackId::new(track),
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        total_time_ms: laps.iter().map(|l| l.lap_time_ms).sum(),
        best_lap_ms: Some(best),
        laps,
    }
}

/// Create a test server over an empty source.
fn create_test_server() -> TestServer {
    let router = create_router(AppState::new(InMemorySource::new()), &no_limit());
    TestServer::new(router).unwrap()
}

/// Create a test server with one race weekend and two visits to Spa.
fn create_populated_test_server() -> TestServer {
    let source = InMemorySource::with_sessions(vec![
        session("fp1", "zandvoort", 8, 9, 90_500),
        session("fp2", "zandvoort", 8, 12, 89_800),
        session("fp3", "zandvoort", 8, 15, 89_000),
        session("spa-am", "spa", 1, 10, 141_000),
        session("spa-pm", "spa", 1, 15, 140_400),
        session("spa-2", "spa", 15, 9, 139_800),
    ]);
    let router = create_router(AppState::new(source), &no_limit());
    TestServer::new(router).unwrap()
}

/// A source whose backing store is unreachable.
struct FailingSource;

impl SessionSource for FailingSource {
    fn fetch_sessions(&self, _filter: &SessionFilter) -> Result<Vec<Session>, LaptrendError> {
        Err(LaptrendError::UpstreamFailure("connection refused".to_string()))
    }

    fn session_count(&self) -> Result<usize, LaptrendError> {
        Err(LaptrendError::UpstreamFailure("connection refused".to_string()))
    }
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STATUS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_status_empty_source() {
    let server = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.session_count, 0);
}

#[tokio::test]
async fn test_status_populated_source() {
    let server = create_populated_test_server();

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.session_count, 6);
}

#[tokio::test]
async fn test_status_upstream_failure() {
    let router = create_router(AppState::new(FailingSource), &no_limit());
    let server = TestServer::new(router).unwrap();

    let response = server.get("/status").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json();
    assert!(body.error.contains("connection refused"));
}

// =============================================================================
// BUCKET ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_bucket_boundaries() {
    let server = create_test_server();

    let cases = [
        ("100", ScoreBucket::Excellent),
        ("90", ScoreBucket::Excellent),
        ("89.999", ScoreBucket::Strong),
        ("70", ScoreBucket::Moderate),
        ("60", ScoreBucket::NeedsWork),
        ("0", ScoreBucket::Poor),
    ];

    for (raw, expected) in cases {
        let response = server.get(&format!("/scores/{}/bucket", raw)).await;
        response.assert_status_ok();
        let bucket: BucketResponse = response.json();
        assert_eq!(bucket.bucket, expected, "score {}", raw);
        assert_eq!(bucket.label, expected.label());
        assert_eq!(bucket.color_class, expected.color_class());
    }
}

#[tokio::test]
async fn test_bucket_wire_format() {
    let server = create_test_server();

    let response = server.get("/scores/85/bucket").await;
    let json: serde_json::Value = response.json();

    assert_eq!(json["score"], 85.0);
    assert_eq!(json["label"], "Strong");
    assert_eq!(json["variant"], "strong");
    assert_eq!(json["colorClass"], "text-green-500");
}

#[tokio::test]
async fn test_bucket_rejects_non_numeric() {
    let server = create_test_server();

    let response = server.get("/scores/fast/bucket").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert!(body.error.contains("fast"));
}

// =============================================================================
// PROGRESS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_progress_weekend_deltas() {
    let server = create_populated_test_server();

    let response = server
        .get("/drivers/driver-7/progress-summary?mode=weekend&startDate=2024-06-08&endDate=2024-06-08")
        .await;

    response.assert_status_ok();
    let progress: ProgressResponse = response.json();
    assert_eq!(progress.mode, ModeKind::Weekend);
    assert_eq!(progress.driver_id, "driver-7");

    let deltas: Vec<_> = progress.sessions.iter().map(|e| e.delta_ms).collect();
    assert_eq!(deltas, vec![None, Some(-700), Some(-800)]);
    assert_eq!(progress.summary.total_improvement_ms, Some(-1_500));

    let range = progress.date_range.unwrap();
    assert_eq!(range.start_date, NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());
}

#[tokio::test]
async fn test_progress_track_collapses_dates() {
    let server = create_populated_test_server();

    let response = server
        .get("/drivers/driver-7/progress-summary?mode=track&trackId=spa")
        .await;

    response.assert_status_ok();
    let progress: ProgressResponse = response.json();
    assert_eq!(progress.track_id.as_deref(), Some("spa"));
    assert_eq!(progress.sessions.len(), 2);
    assert_eq!(progress.sessions[0].best_lap_ms, Some(140_400));
    assert_eq!(progress.sessions[0].sessions_in_event, 2);
    assert_eq!(progress.sessions[1].delta_ms, Some(-600));
    assert_eq!(progress.summary.total_sessions, 3);
}

#[tokio::test]
async fn test_progress_requires_mode() {
    let server = create_populated_test_server();

    let response = server.get("/drivers/driver-7/progress-summary").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert!(body.error.contains("mode is required"));
}

#[tokio::test]
async fn test_progress_overall_lifetime() {
    let server = create_populated_test_server();

    let response = server
        .get("/drivers/driver-7/progress-summary?mode=overall")
        .await;

    response.assert_status_ok();
    let progress: ProgressResponse = response.json();
    assert_eq!(progress.mode, ModeKind::Overall);
    assert_eq!(progress.sessions.len(), 6);
    assert!(progress.date_range.is_none());
}

#[tokio::test]
async fn test_progress_overall_accepts_multi_decade_range() {
    let server = create_populated_test_server();

    let response = server
        .get("/drivers/driver-7/progress-summary?mode=overall&startDate=2010-01-01&endDate=2024-12-31")
        .await;

    response.assert_status_ok();
    let progress: ProgressResponse = response.json();
    assert_eq!(progress.sessions.len(), 6);
    let range = progress.date_range.unwrap();
    assert_eq!(range.start_date, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
}

#[tokio::test]
async fn test_progress_entries_carry_consistency_rating() {
    let server = create_populated_test_server();

    let json: serde_json::Value = server
        .get("/drivers/driver-7/progress-summary?mode=overall")
        .await
        .json();

    let entry = &json["sessions"][0];
    assert!(entry["consistencyPct"].is_u64());
    assert_eq!(entry["consistencyRating"], "excellent");
    assert!(entry["deltaMs"].is_null());
    assert!(json["summary"]["totalImprovementMs"].is_i64());
}

#[tokio::test]
async fn test_progress_unknown_driver_is_empty() {
    let server = create_populated_test_server();

    let response = server
        .get("/drivers/nobody/progress-summary?mode=overall")
        .await;

    response.assert_status_ok();
    let progress: ProgressResponse = response.json();
    assert!(progress.sessions.is_empty());
    assert_eq!(progress.summary.total_sessions, 0);
}

#[tokio::test]
async fn test_progress_invalid_filters() {
    let server = create_populated_test_server();

    let bad = [
        "trackId=spa",
        "mode=",
        "mode=track",
        "mode=weekend",
        "mode=lap",
        "mode=weekend&startDate=2024-06-09&endDate=2024-06-08",
        "mode=overall&startDate=June",
        "mode=overall&endDate=2024-06-08",
    ];

    for query in bad {
        let response = server
            .get(&format!("/drivers/driver-7/progress-summary?{}", query))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(!body.error.is_empty(), "query {}", query);
    }
}

#[tokio::test]
async fn test_progress_upstream_failure() {
    let router = create_router(AppState::new(FailingSource), &no_limit());
    let server = TestServer::new(router).unwrap();

    let response = server
        .get("/drivers/driver-7/progress-summary?mode=overall")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json();
    assert!(body.error.contains("Upstream failure"));
}

// =============================================================================
// MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_excess() {
    let config = HttpConfig {
        cors_origins: None,
        rate_limit: 1,
    };
    let router = create_router(AppState::new(InMemorySource::new()), &config);
    let server = TestServer::new(router).unwrap();

    server.get("/health").await.assert_status_ok();
    server
        .get("/health")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let config = HttpConfig {
        cors_origins: Some(vec!["https://coach.example.com".to_string()]),
        rate_limit: 0,
    };
    let router = create_router(AppState::new(InMemorySource::new()), &config);

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/health")
        .header(header::ORIGIN, "https://coach.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://coach.example.com"
    );
}
