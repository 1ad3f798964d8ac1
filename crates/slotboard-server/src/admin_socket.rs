//! Unix socket server for console commands.
//!
//! Provides the imperative configuration API (quotas, slot kinds, grid
//! layout, inspection) to a local operator through `slotboard-admin`.
//! Commands and responses are newline-delimited JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotboard_engine::{KindMatrix, Quotas, SlotDetail, SlotKind};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

use crate::error::Result;
use crate::server::AppState;

/// Admin command sent over the socket.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AdminCommand {
    /// Replace the listed quotas
    Configure { quotas: Quotas },
    /// Overwrite one slot's kind
    SetSlotKind { index: usize, kind: SlotKind },
    /// Replace the whole kind matrix
    SetGrid { grid: Vec<Vec<SlotKind>> },
    /// Current kind matrix
    GetGrid,
    /// Every slot with kind and occupant
    SlotDetails,
    /// Empty the board
    Reset,
    /// Ping (health check)
    Ping,
}

/// Response from an admin command.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdminResponse {
    Ok { message: String },
    Error { error: String },
    Grid { grid: KindMatrix },
    Slots { slots: Vec<SlotDetail> },
    Pong,
}

/// Admin socket server.
pub struct AdminSocket {
    state: Arc<AppState>,
    socket_path: PathBuf,
}

impl AdminSocket {
    /// Create a new admin socket server.
    pub fn new(state: Arc<AppState>, socket_path: impl Into<PathBuf>) -> Self {
        Self {
            state,
            socket_path: socket_path.into(),
        }
    }

    /// Run the admin socket server.
    pub async fn run(&self) -> Result<()> {
        // Remove a stale socket file left by a previous run
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("Admin socket listening on {}", self.socket_path.display());

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, state).await {
                            tracing::error!("Admin connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept admin connection: {}", e);
                }
            }
        }
    }

    /// Get the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

async fn handle_connection(stream: UnixStream, state: Arc<AppState>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while reader.read_line(&mut line).await? > 0 {
        let response = match serde_json::from_str::<AdminCommand>(&line) {
            Ok(cmd) => execute_command(cmd, &state).await,
            Err(e) => AdminResponse::Error {
                error: format!("Invalid command: {}", e),
            },
        };

        let response_json = serde_json::to_string(&response)? + "\n";
        writer.write_all(response_json.as_bytes()).await?;
        line.clear();
    }

    Ok(())
}

/// Run one command against the shared board.
pub async fn execute_command(cmd: AdminCommand, state: &Arc<AppState>) -> AdminResponse {
    match cmd {
        AdminCommand::Configure { quotas } => {
            let (applied, _) = state
                .update(|board| {
                    board.configure(&quotas);
                    board.engine().quotas()
                })
                .await;
            let summary: Vec<String> = applied
                .iter()
                .map(|(token, max)| format!("{}={}", token.as_str(), max))
                .collect();
            AdminResponse::Ok {
                message: format!("Quotas: {}", summary.join(",")),
            }
        }

        AdminCommand::SetSlotKind { index, kind } => {
            let (result, _) = state.update(|board| board.set_slot_kind(index, kind)).await;
            match result {
                Ok(()) => {
                    let pos = state
                        .read(|board| board.engine().slot_details()[index].clone())
                        .await;
                    AdminResponse::Ok {
                        message: format!(
                            "Slot {} (row {}, col {}) set to kind {}",
                            index, pos.row, pos.col, kind
                        ),
                    }
                }
                Err(e) => AdminResponse::Error {
                    error: e.to_string(),
                },
            }
        }

        AdminCommand::SetGrid { grid } => {
            let (result, _) = state
                .update(|board| {
                    board
                        .set_grid_configuration(&grid)
                        .map(|()| board.engine().grid_configuration())
                })
                .await;
            match result {
                Ok(grid) => AdminResponse::Grid { grid },
                Err(e) => AdminResponse::Error {
                    error: e.to_string(),
                },
            }
        }

        AdminCommand::GetGrid => AdminResponse::Grid {
            grid: state.read(|board| board.engine().grid_configuration()).await,
        },

        AdminCommand::SlotDetails => AdminResponse::Slots {
            slots: state.read(|board| board.engine().slot_details()).await,
        },

        AdminCommand::Reset => {
            state.update(|board| board.reset()).await;
            AdminResponse::Ok {
                message: "Board reset".to_string(),
            }
        }

        AdminCommand::Ping => AdminResponse::Pong,
    }
}

/// Default socket path.
pub fn default_socket_path() -> PathBuf {
    std::env::var("SLOTBOARD_ADMIN_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./slotboard.sock"))
}
