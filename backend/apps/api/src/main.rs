//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::{AuthConfig, PgUserStore, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Auth configuration (fatal on a missing or short secret)
    let auth_config = AuthConfig::from_env().context("Invalid auth configuration")?;
    tracing::info!(
        token_ttl_secs = auth_config.token_ttl.as_secs(),
        lookup_timeout_ms = auth_config.lookup_timeout.as_millis() as u64,
        bcrypt_cost = auth_config.hasher.cost(),
        "Auth configuration loaded"
    );

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .expose_headers([http::HeaderName::from_static("x-auth-required")]);

    // Build router
    let app = Router::new()
        .nest("/api/v1/auth", auth_router(PgUserStore::new(pool), auth_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = match env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a valid port number")?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
