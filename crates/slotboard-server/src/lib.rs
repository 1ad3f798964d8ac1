//! Slotboard Server - local host for the placement widget
//!
//! Serves the widget page and a JSON API over one shared [`Board`], and
//! streams every resulting view to connected browsers.
//!
//! # Architecture
//!
//! - **Server**: HTTP endpoints and the `/ws` view stream (axum)
//! - **Admin Socket**: Unix socket for the configuration console (slotboard-admin CLI)
//! - **Config**: `SLOTBOARD_*` environment variables
//!
//! # Example
//!
//! ```no_run
//! use slotboard_server::{ServerConfig, SlotboardServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env()?;
//!     let server = SlotboardServer::new(config.board());
//!     server.serve(config.addr).await?;
//!     Ok(())
//! }
//! ```
//!
//! [`Board`]: slotboard_engine::Board

pub mod admin_socket;
pub mod config;
pub mod error;
pub mod server;

pub use admin_socket::{AdminCommand, AdminResponse, AdminSocket};
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use server::{AppState, SlotboardServer};
