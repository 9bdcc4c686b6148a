//! Server binary: load configuration, initialize tracing, serve.

use tracing::info;
use tracing_subscriber::EnvFilter;

use oxldp_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        host = %config.server.host,
        port = config.server.port,
        context = %config.ldp.context_path,
        "starting OxLDP server"
    );

    let server = Server::builder().config(config).build()?;
    server.run().await
}
