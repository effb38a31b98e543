use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use fittrack::app::{router, AppState};
use fittrack::authz::{AuthzEngine, AuthzMode};
use fittrack::jwt::JwtConfig;

#[tokio::test]
async fn health_reports_engine_snapshot() -> Result<()> {
    let jwt = JwtConfig {
        secret: Arc::new(b"test-secret".to_vec()),
        exp_hours: 24,
    };
    let app = router(AppState::new(
        Arc::new(AuthzEngine::standard()),
        jwt,
        AuthzMode::Strict,
    ));

    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())?;
    let resp = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["roles"], 3);
    assert_eq!(body["permissions"], 20);

    Ok(())
}
