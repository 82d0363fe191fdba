/// Health check endpoint
///
/// Reports API readiness without touching the network or the database:
/// the service name (the API prefix without its leading slash), a static
/// status, the configured environment, and whether the Supabase client
/// was configured at startup.
///
/// # Endpoint
///
/// ```text
/// GET {prefix}/health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "app": "v1",
///   "status": "ok",
///   "environment": "development",
///   "supabase_configured": false
/// }
/// ```
use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Service name, derived from the API prefix
    pub app: String,

    /// Status literal, always "ok" when the server answers
    pub status: String,

    /// Configured deployment environment
    pub environment: String,

    /// Whether Supabase credentials were present at startup
    pub supabase_configured: bool,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        app: state
            .config
            .api
            .v1_prefix
            .trim_start_matches('/')
            .to_string(),
        status: "ok".to_string(),
        environment: state.config.api.environment.clone(),
        supabase_configured: state.supabase.is_some(),
    })
}
