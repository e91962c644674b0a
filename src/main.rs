use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use respire::application::services::{ClassificationService, ResponseAssembler};
use respire::domain::LabelTable;
use respire::infrastructure::audio::SymphoniaAudioDecoder;
use respire::infrastructure::inference::InferenceEngineFactory;
use respire::infrastructure::observability::{TracingConfig, init_tracing};
use respire::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("failed to load settings")?;

    init_tracing(
        TracingConfig {
            environment: environment.to_string(),
            json_format: settings.logging.json,
            filter: Some(settings.logging.level.clone()),
        },
        settings.server.port,
    );

    // Loaded once, before the listener binds; never reloaded.
    let engine = InferenceEngineFactory::create(&settings.model);
    tracing::info!(
        engine = engine.name(),
        model_status = %engine.status(),
        "Inference engine ready"
    );

    let service = Arc::new(ClassificationService::new(
        Arc::new(SymphoniaAudioDecoder),
        engine,
        ResponseAssembler::new(LabelTable::respiratory()),
        settings.limits.to_limits(),
    ));

    let router = create_router(AppState::new(service));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
