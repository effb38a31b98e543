use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authz::{AuthzEngine, AuthzMode};
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{health, rbac};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AuthzEngine>,
    pub jwt: Arc<JwtConfig>,
    pub mode: AuthzMode,
}

impl AppState {
    pub fn new(engine: Arc<AuthzEngine>, jwt: JwtConfig, mode: AuthzMode) -> Self {
        Self {
            engine,
            jwt: Arc::new(jwt),
            mode,
        }
    }
}

/// Builds the application router. The engine must be fully constructed before
/// this is called; it is only shared immutably from here on.
pub async fn create_app(engine: Arc<AuthzEngine>) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let mode = AuthzMode::from_env();
    Ok(router(AppState::new(engine, jwt_config, mode)))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health))
        .nest("/rbac", rbac::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
