use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use survey_engine::adapters::http::{api_router, Repositories, SurveyAppState};
use survey_engine::adapters::memory::InMemoryStore;
use survey_engine::adapters::postgres;
use survey_engine::config::{AppConfig, ServerConfig};
use survey_engine::ports::SystemClock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        "Starting survey engine"
    );

    let repos = if config.database.is_configured() {
        let pool = postgres::connect(&config.database).await?;
        tracing::info!("PostgreSQL connected");
        if config.database.run_migrations {
            postgres::run_migrations(&pool).await?;
            tracing::info!("Migrations applied");
        }
        Repositories::postgres(pool)
    } else {
        tracing::warn!("No database configured, using the in-memory store");
        Repositories::in_memory(Arc::new(InMemoryStore::new()))
    };

    let state = SurveyAppState::new(repos, Arc::new(SystemClock));
    let app = api_router(state)
        .layer(cors_layer(&config.server))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON lines in production, human-readable output elsewhere. `RUST_LOG`
/// overrides the configured level.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let (json, plain) = if server.is_production() {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
