use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use dtype_infer::app;
use dtype_infer::config::Config;
use dtype_infer::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let state = AppState::from_config(&config)?;
    let router = app::router(state, config.max_upload_bytes, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!("listening on http://{}", config.addr);

    axum::serve(listener, router).await.context("serving HTTP")?;
    Ok(())
}
