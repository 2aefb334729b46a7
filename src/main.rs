use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use auth::rate_limit::RateLimitState;
use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walkdiary_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();
    let config = Arc::new(config);

    // Database
    let db = db::create_pool(&config.database_url).await;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let rate_limiter = RateLimitState::new();

    let state = AppState {
        db,
        config: config.clone(),
        rate_limiter,
    };

    // Credential endpoints sit behind the IP rate limiter
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/delete", delete(handlers::auth::delete_account))
        // Day buckets
        .route("/get-calendar", post(handlers::calendar::get_calendar))
        // Walk lifecycle
        .route("/walk-start", post(handlers::walks::walk_start))
        .route("/walk-end/:walk_id", post(handlers::walks::walk_end))
        .route(
            "/walk-satisfy-update/:walk_id",
            put(handlers::walks::walk_satisfy_update),
        )
        // Walk reports
        .route(
            "/walk-once-report/:walk_id",
            get(handlers::walks::walk_once_report),
        )
        .route(
            "/walk-simple-report/:walk_id",
            get(handlers::walks::walk_simple_report),
        )
        .route(
            "/walk-monthly-report/:year/:month",
            get(handlers::reports::walk_monthly_report),
        )
        // SRI surveys
        .route(
            "/sri",
            get(handlers::sri::sri_needed).post(handlers::sri::sri_create),
        )
        // Emotion capture
        .route(
            "/emotion-analyze-large",
            post(handlers::emotion::analyze_large),
        )
        .route("/emotion-save-small", post(handlers::emotion::save_small))
        .route(
            "/emotion-list-create",
            get(handlers::emotion::emotion_list),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .expect("FRONTEND_URL must be a valid origin")];
        // In dev, also allow LAN access (e.g. testing from a device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    // into_make_service_with_connect_info provides client IPs for rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .expect("Server error");
}
