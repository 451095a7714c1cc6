use axum::{
    Router,
    routing::{get, post},
};
use axum::http::{HeaderValue, Method, header};
use skillswap::{Config, get_db_pool, handlers};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skillswap::utils::init_logging();

    let config = Config::from_env()?;
    let db_config = skillswap::db::DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    // Run migrations
    skillswap::db::migrations::run_migrations(&pool).await?;

    let port = config.port;
    let app = create_router(pool, config);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(pool: PgPool, config: Config) -> Router {
    let cors_layer = create_cors_layer();
    let app_state = (pool, config);

    Router::new()
        .route("/health", get(health_check))
        // Profiles
        .route(
            "/users/profile",
            post(handlers::create_profile).put(handlers::update_profile),
        )
        .route("/users/me", get(handlers::get_me))
        // Matching
        .route("/users/findMatches", post(handlers::find_matches))
        // Connection lifecycle
        .route("/users/sendRequest", post(handlers::send_request))
        .route("/users/pendingRequests", get(handlers::pending_requests))
        .route("/users/respondRequest", post(handlers::respond_request))
        .route("/users/connections", get(handlers::list_connections))
        .route("/users/endMatch", post(handlers::end_match))
        // Meetings and reviews
        .route(
            "/meetings",
            post(handlers::schedule_meeting).get(handlers::list_meetings),
        )
        .route("/reviews", post(handlers::create_review))
        .layer(cors_layer)
        .with_state(app_state)
}

fn create_cors_layer() -> CorsLayer {
    // The session cookie only travels cross-origin when credentials are
    // allowed, which in turn requires explicit origins and headers. Without
    // ALLOWED_ORIGINS the layer stays permissive and credential-less for
    // local development.
    if let Ok(cors_origins) = std::env::var("ALLOWED_ORIGINS") {
        let origins: Vec<HeaderValue> = cors_origins
            .split(',')
            .filter_map(|origin| {
                let trimmed = origin.trim();
                if !trimmed.is_empty() {
                    trimmed.parse().ok()
                } else {
                    None
                }
            })
            .collect();

        if !origins.is_empty() {
            return CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true)
                .allow_origin(origins);
        }
    }

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false)
        .allow_origin(Any)
}

async fn health_check() -> &'static str {
    "OK"
}
