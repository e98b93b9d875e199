use hunter_server::config::ServerConfig;
use hunter_server::{AppState, ConfiguredClientFactory};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_result = dotenv::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        warn!(error = %e, "tracing init failed");
    }
    if let Err(e) = dotenv_result {
        info!(error = %e, "no .env file loaded");
    }

    let config = ServerConfig::from_env()?;
    if config.api_key.is_none() {
        warn!("HUNTER_API_KEY is not set; API requests will fail");
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, base_url = %config.base_url, timeout = ?config.timeout, "listening");
    hunter_server::run(listener, AppState::new(ConfiguredClientFactory::new(config))).await?;
    Ok(())
}
