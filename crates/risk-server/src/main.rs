mod cli;
mod config;
mod error;
mod logging;
mod routes;
mod state;

use crate::cli::Args;
use crate::config::{load_server_config, resolve_settings};
use crate::logging::init_tracing;
use crate::routes::{cors_layer, router};
use crate::state::AppState;
use anyhow::Context;
use booster::Booster;
use clap::Parser;
use features::{FeatureEncoder, FeatureSchema};
use protocol::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let file_config = match args.config.as_ref() {
        Some(path) => load_server_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    let settings = resolve_settings(&args, file_config)?;
    let _log_guard = init_tracing(
        settings.log_dir.as_deref(),
        settings.log_json,
        settings.log_to_stderr,
    )?;

    info!(
        listen_addr = %settings.listen_addr,
        model = %settings.model_path.display(),
        "credit-risk server starting"
    );

    let booster = Booster::from_json_file(&settings.model_path)
        .with_context(|| format!("failed to load model {}", settings.model_path.display()))?;
    let schema = FeatureSchema::new();
    schema.validate().context("feature schema is inconsistent")?;
    let encoder = FeatureEncoder::new(schema);
    booster
        .check_schema(encoder.schema().columns())
        .context("model does not match the feature schema")?;
    info!(
        trees = booster.num_trees(),
        features = booster.num_features(),
        objective = ?booster.objective(),
        "model loaded"
    );

    let cors = cors_layer(&settings.allowed_origins)?;
    let app = router(AppState::new(booster, encoder), cors);

    let listener = TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;
    info!(addr = %settings.listen_addr, "credit-risk server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    info!("credit-risk server shutting down");
    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
