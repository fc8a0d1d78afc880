//! Volunteer Management Backend
//!
//! A production-grade REST backend with SQLite persistence and a capacity
//! ledger guarding volunteer-post subscription counts.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod ledger;
mod models;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use ledger::CapacityLedger;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub ledger: Arc<CapacityLedger>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Volunteer Management Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the JWT secret is not configured
    if config.jwt_secret.is_none() {
        tracing::warn!(
            "No JWT secret configured (VOLUNTEER_JWT_SECRET). Protected routes will reject all requests!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool.clone()));
    let ledger = Arc::new(CapacityLedger::new(pool));

    // Create application state
    let state = AppState {
        repo,
        ledger,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Credentialed CORS: the auth cookie must cross origins, so the origin
    // list is explicit rather than a wildcard
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    // Clone the secret for the auth layer
    let secret = state.config.jwt_secret.clone();

    // Routes requiring a verified auth cookie whose email scopes access
    let protected_routes = Router::new()
        .route("/posts/by-organizer/{email}", get(api::posts_by_organizer))
        .route("/requests/by-volunteer/{email}", get(api::list_requests))
        .layer(middleware::from_fn(move |req, next| {
            auth::jwt_auth_layer(secret.clone(), req, next)
        }));

    // Public API routes
    let api_routes = Router::new()
        // Auth
        .route("/auth/token", post(api::issue_token))
        .route("/auth/logout", post(api::logout))
        // Posts
        .route("/posts", get(api::list_posts))
        .route("/posts", post(api::create_post))
        .route("/posts/count", get(api::count_posts))
        .route("/posts/upcoming", get(api::upcoming_posts))
        .route("/posts/{id}", get(api::get_post))
        .route("/posts/{id}", put(api::update_post))
        .route("/posts/{id}", delete(api::delete_post))
        // Requests (capacity ledger)
        .route("/requests", post(api::submit_request))
        .route("/requests/{id}", delete(api::withdraw_request))
        .merge(protected_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
