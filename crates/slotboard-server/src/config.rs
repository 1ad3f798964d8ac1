//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use slotboard_engine::{Board, KindMatrix, PlacementEngine, Quotas};

use crate::error::{Error, Result};

/// Configuration for a slotboard server.
///
/// One server process owns one board for a single local operator. The
/// default address is loopback only.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// HTTP listen address
    pub addr: SocketAddr,

    /// Admin socket path (for slotboard-admin)
    pub admin_socket: PathBuf,

    /// Quotas applied at startup
    pub quotas: Quotas,

    /// Slot kinds applied at startup
    pub grid: KindMatrix,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            admin_socket: PathBuf::from("./slotboard.sock"),
            quotas: Quotas::default(),
            grid: KindMatrix::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// - `SLOTBOARD_ADDR` (default `127.0.0.1:3000`)
    /// - `SLOTBOARD_ADMIN_SOCKET` (default `./slotboard.sock`)
    /// - `SLOTBOARD_QUOTAS`, e.g. `fake=1,r1=3,r2=4`
    /// - `SLOTBOARD_GRID`, e.g. `20,40,20;40,60,40;20,40,60;40,20,40`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("SLOTBOARD_ADDR") {
            config.addr = addr
                .parse()
                .map_err(|e| Error::Config(format!("SLOTBOARD_ADDR {addr:?}: {e}")))?;
        }

        if let Some(path) = lookup("SLOTBOARD_ADMIN_SOCKET") {
            config.admin_socket = PathBuf::from(path);
        }

        if let Some(quotas) = lookup("SLOTBOARD_QUOTAS") {
            let parsed: Quotas = quotas
                .parse()
                .map_err(|e| Error::Config(format!("SLOTBOARD_QUOTAS: {e}")))?;
            // Listed types override the defaults, unlisted keep them
            config.quotas = parsed
                .iter()
                .fold(config.quotas, |q, (token, max)| q.with(token, max));
        }

        if let Some(grid) = lookup("SLOTBOARD_GRID") {
            config.grid = grid
                .parse()
                .map_err(|e| Error::Config(format!("SLOTBOARD_GRID: {e}")))?;
        }

        Ok(config)
    }

    /// Fresh board built from this configuration.
    pub fn board(&self) -> Board {
        Board::new(PlacementEngine::new(&self.quotas, self.grid))
    }
}
