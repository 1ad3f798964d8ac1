//! Slotboard server binary
//!
//! Hosts the widget page, the JSON API and the admin socket.

use slotboard_server::{AdminSocket, ServerConfig, SlotboardServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotboard_server=info,slotboard_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        "Starting slotboard (quotas: {:?}, grid: {})",
        config.quotas,
        config.grid
    );

    let server = SlotboardServer::new(config.board());

    let admin = AdminSocket::new(server.state(), config.admin_socket.clone());
    tokio::spawn(async move {
        if let Err(e) = admin.run().await {
            tracing::error!("Admin socket stopped: {}", e);
        }
    });

    server.serve(config.addr).await?;

    Ok(())
}
