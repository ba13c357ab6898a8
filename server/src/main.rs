use empathy_core::{EmpathyEngine, EngineConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // .env first so RUST_LOG and engine keys can live there
    let _ = dotenvy::dotenv();

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,empathy_core=info,empathy_server=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Defaults + env + optional TOML overlay
    let config = EngineConfig::load()?;
    tokio::fs::create_dir_all(&config.output_dir).await?;

    let engine = Arc::new(EmpathyEngine::from_config(config)?);
    empathy_server::log_banner(&engine);

    let host = std::env::var("HOST")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok());
    let listener = empathy_server::bind(&host, port).await?;
    info!(target = "server", "Ready for emotion-aware text-to-speech");

    empathy_server::serve(listener, engine).await?;
    Ok(())
}
