/// Application state and router builder
///
/// [`AppState`] is the per-process shared state: configuration (read-only
/// after startup), the database pool, and the optionally-configured
/// Supabase client, all constructed in `main` and injected here —
/// nothing in the request path builds clients lazily.
///
/// # Example
///
/// ```no_run
/// use curricula_api::{app::{build_router, AppState}, config::Config};
/// use curricula_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let state = AppState::new(pool, config, None);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::{config::Config, routes};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use curricula_shared::auth::extract::AuthState;
use curricula_shared::supabase::SupabaseClient;
use jsonwebtoken::Algorithm;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via axum's `State` extractor; the contents are
/// cheap handles (`Arc`, pool).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Supabase client, present only when credentials are configured
    pub supabase: Option<Arc<SupabaseClient>>,
}

impl AppState {
    /// Creates new application state.
    pub fn new(db: PgPool, config: Config, supabase: Option<Arc<SupabaseClient>>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            supabase,
        }
    }
}

/// Wires the auth extractors to this server's state.
impl AuthState for AppState {
    fn db(&self) -> &PgPool {
        &self.db
    }

    fn token_secret(&self) -> &str {
        &self.config.auth.secret_key
    }

    fn token_algorithm(&self) -> Algorithm {
        self.config.auth.algorithm
    }
}

/// Builds the complete axum router.
///
/// # Architecture
///
/// ```text
/// /                              # welcome payload (public)
/// {prefix}/                      # versioned API, default /v1
/// ├── /health                    # health check (public)
/// ├── /auth
/// │   ├── POST /register         # public
/// │   ├── POST /login            # public
/// │   └── GET  /me               # authenticated
/// ├── /users                     # admin
/// │   ├── GET  /
/// │   └── PUT  /:user_id/role
/// ├── /courses                   # reads public, writes admin
/// │   ├── GET/POST /
/// │   ├── GET/PUT/DELETE /:course_id
/// │   └── GET/POST /:course_id/modules
/// ├── /modules
/// │   ├── GET/PUT/DELETE /:module_id
/// │   └── GET/POST /:module_id/lessons
/// └── /lessons
///     └── GET/PUT/DELETE /:lesson_id
/// ```
///
/// Route access tiers are enforced by the extractors in each handler's
/// signature, not by router-level middleware, so a handler's requirements
/// are visible where it is defined.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/me", get(routes::auth::me));

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/:user_id/role", put(routes::users::update_role));

    let course_routes = Router::new()
        .route(
            "/",
            get(routes::courses::list_courses).post(routes::courses::create_course),
        )
        .route(
            "/:course_id",
            get(routes::courses::get_course)
                .put(routes::courses::update_course)
                .delete(routes::courses::delete_course),
        )
        .route(
            "/:course_id/modules",
            get(routes::modules::list_modules).post(routes::modules::create_module),
        );

    let module_routes = Router::new()
        .route(
            "/:module_id",
            get(routes::modules::get_module)
                .put(routes::modules::update_module)
                .delete(routes::modules::delete_module),
        )
        .route(
            "/:module_id/lessons",
            get(routes::lessons::list_lessons).post(routes::lessons::create_lesson),
        );

    let lesson_routes = Router::new().route(
        "/:lesson_id",
        get(routes::lessons::get_lesson)
            .put(routes::lessons::update_lesson)
            .delete(routes::lessons::delete_lesson),
    );

    let v1_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/courses", course_routes)
        .nest("/modules", module_routes)
        .nest("/lessons", lesson_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/", get(root))
        .nest(&state.config.api.v1_prefix, v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Welcome payload at the server root.
async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the Curricula API",
        "health": format!("{}/health", state.config.api.v1_prefix),
    }))
}
