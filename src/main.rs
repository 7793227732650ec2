use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assistant_relay::adapters::{
    relay_router, OpenAIAssistantsFactory, PluginCredentialResolver, RelayAppState,
    StaticCredentialResolver,
};
use assistant_relay::application::RunOrchestrator;
use assistant_relay::config::{AppConfig, CredentialSource, ValidationError, OPENAI_API_KEY_VAR};
use assistant_relay::ports::CredentialResolver;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config);
    config.validate().context("validating configuration")?;

    let app = build_router(&config)?;
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Assistant relay listening on {}", addr);
    tracing::info!(
        source = ?config.credentials.source,
        poll_interval_ms = config.polling.interval_ms,
        poll_max_attempts = config.polling.max_attempts,
        "Relay configured"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_router(config: &AppConfig) -> Result<Router> {
    let credentials: Arc<dyn CredentialResolver> = match config.credentials.source {
        CredentialSource::Environment => {
            let credential = config
                .openai
                .credential()
                .ok_or(ValidationError::MissingRequired(OPENAI_API_KEY_VAR))?;
            Arc::new(StaticCredentialResolver::new(credential))
        }
        CredentialSource::Plugin => {
            let lookup = config
                .credentials
                .lookup_config()
                .ok_or(ValidationError::MissingRequired("credentials.lookup_url"))?;
            Arc::new(PluginCredentialResolver::new(lookup))
        }
    };

    let state = RelayAppState::new(
        credentials,
        Arc::new(OpenAIAssistantsFactory::new(config.openai.client_config())),
        RunOrchestrator::new(config.polling.policy()),
    );

    Ok(relay_router()
        .with_state(state)
        .layer(cors_layer(&config.server.cors_origins_list())?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {}", o)))
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
