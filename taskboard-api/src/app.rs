/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use taskboard_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                      # Health check
/// ├── /api/                             # JSON API, {"data": ...} envelopes
/// │   ├── /users          GET POST
/// │   ├── /users/:id      GET PUT DELETE
/// │   ├── /categories     GET POST
/// │   ├── /categories/:id GET PUT DELETE
/// │   ├── /tasks          GET POST
/// │   └── /tasks/:id      GET PUT PATCH DELETE
/// ├── GET  /                            # Redirects to /tasks
/// ├── /categories, /categories/new, /categories/:id/edit, ...   # HTML pages
/// ├── /tasks, /tasks/new, /tasks/:id/delete                     # HTML pages
/// └── GET  /assets/app.js
/// ```
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Logging (tower-http TraceLayer)
/// 2. Compression (gzip/brotli when the client accepts it)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::{routes, views};

    let api_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route(
            "/categories",
            get(routes::categories::list_categories).post(routes::categories::create_category),
        )
        .route(
            "/categories/:id",
            get(routes::categories::get_category)
                .put(routes::categories::replace_category)
                .delete(routes::categories::delete_category),
        )
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::replace_task)
                .patch(routes::tasks::patch_task)
                .delete(routes::tasks::delete_task),
        );

    let page_routes = Router::new()
        .route("/", get(views::index))
        .route("/assets/app.js", get(views::app_js))
        .route(
            "/categories",
            get(views::categories::list_page).post(views::categories::create),
        )
        .route("/categories/new", get(views::categories::new_page))
        .route("/categories/:id", post(views::categories::update))
        .route("/categories/:id/edit", get(views::categories::edit_page))
        .route("/categories/:id/delete", post(views::categories::delete))
        .route(
            "/tasks",
            get(views::tasks::list_page).post(views::tasks::create),
        )
        .route("/tasks/new", get(views::tasks::new_page))
        .route("/tasks/:id/delete", post(views::tasks::delete));

    let cors = if state.config.cors_permissive() {
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
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .merge(page_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
