use anyhow::Context;
use ito_api::{start_server, AppState};
use ito_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ito=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!(chain = %config.chain_id, "Starting ITO claim server");

    let port = config.api_port;
    start_server(AppState::with_config(config), port)
        .await
        .context("running API server")?;

    Ok(())
}
