use axum::{
    extract::State,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod domains;
mod shared;
mod system;

use domains::locale::{get_locale, list_locales, locale_support, negotiate_locale};
use shared::state::SharedState;
use system::{
    config::{AppConfig, LogConfig},
    locale::{LoaderRegistry, LocaleResolver},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::load()?;
    init_tracing(&config.log);

    info!("=== LOCALE API SERVICE ===");
    info!("🌍 Environment: {}", config.environment);
    info!("📊 Log Level: {}", config.log.level);

    // Initialize locale system
    let loaders = LoaderRegistry::with_data_dir(&config.locale.data_dir);
    if loaders.is_empty() {
        warn!("⚠️  No locale loaders registered, every locale will fall back to the default");
    }
    info!(
        "🗂️  {} locale loaders registered from {}",
        loaders.len(),
        config.locale.data_dir
    );
    let resolver = Arc::new(LocaleResolver::new(loaders));

    if !config.locale.preload.is_empty() {
        let resolved = resolver.preload(&config.locale.preload).await;
        info!(
            "🔥 Preloaded {}/{} locales",
            resolved,
            config.locale.preload.len()
        );
    }

    let shared_state = Arc::new(SharedState {
        config: Arc::new(config.clone()),
        resolver,
    });

    let app = build_router(shared_state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("🚀 Server running on http://{}", addr);
    info!("📖 Try: http://{}/locales/fr-CA", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config", get(config_handler))
        .route("/locale", get(negotiate_locale))
        .route("/locales", get(list_locales))
        .route("/locales/{tag}", get(get_locale))
        .route("/locales/{tag}/supported", get(locale_support))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

// Health check handler
async fn health_handler(
    State(state): State<Arc<SharedState>>,
) -> axum::response::Json<serde_json::Value> {
    axum::response::Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.environment,
        "cached_locales": state.resolver.cache_len().await
    }))
}

// Config handler
async fn config_handler(
    State(state): State<Arc<SharedState>>,
) -> axum::response::Json<serde_json::Value> {
    axum::response::Json(serde_json::json!({
        "environment": state.config.environment,
        "server": {
            "host": state.config.server.host,
            "port": state.config.server.port
        },
        "locale": {
            "data_dir": state.config.locale.data_dir,
            "preload": state.config.locale.preload,
            "supported": state.resolver.supported_locales().len()
        }
    }))
}
