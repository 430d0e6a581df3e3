use anyhow::Result;
use tracing::info;

use ptero_proxy::modules::{config, logger};
use ptero_proxy::proxy::AxumServer;

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger();

    let app_config = config::load_app_config().map_err(anyhow::Error::msg)?;

    let (server, handle) = AxumServer::start(&app_config.proxy)
        .await
        .map_err(anyhow::Error::msg)?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    server.stop();
    handle.await?;

    Ok(())
}
