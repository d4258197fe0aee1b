//! Vigil Server Binary

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use vigil_server::config::{load_config, validate_config};
use vigil_server::Server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = load_config()?;

    vigil_common_log::init(config.logging.to_log_config())
        .context("Failed to initialize logging")?;

    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        bail!("{} configuration error(s)", errors.len());
    }

    info!("Starting Vigil Server v{}", env!("CARGO_PKG_VERSION"));

    let server = Server::new(config).await?;
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
