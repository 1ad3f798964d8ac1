//! Error types for slotboard-engine.

use slotboard_grid::GridError;
use thiserror::Error;

use crate::token::TokenType;

/// Result type for placement operations.
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Errors that can occur while placing tokens or reconfiguring the board.
///
/// Every variant is recoverable and leaves the board state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The target slot already holds a token.
    #[error("slot {slot} is already occupied by {occupant}")]
    SlotOccupied { slot: usize, occupant: TokenType },

    /// Every token of this type is already on the board.
    #[error("maximum {max} {token} tokens")]
    QuotaExceeded { token: TokenType, max: u32 },

    /// Token name that is not one of the known types.
    #[error("unknown token type {0:?}")]
    UnknownToken(String),

    /// Quota entry that is not `<token>=<count>`.
    #[error("invalid quota entry {0:?}")]
    InvalidQuota(String),

    /// Addressing or reshaping the grid failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl PlacementError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PlacementError::SlotOccupied { .. } => "slot_occupied",
            PlacementError::QuotaExceeded { .. } => "quota_exceeded",
            PlacementError::UnknownToken(_) => "unknown_token",
            PlacementError::InvalidQuota(_) => "invalid_quota",
            PlacementError::Grid(GridError::InvalidIndex { .. }) => "invalid_index",
            PlacementError::Grid(GridError::InvalidShape(_)) => "invalid_shape",
            PlacementError::Grid(GridError::UnknownKind(_))
            | PlacementError::Grid(GridError::UnparsableKind(_)) => "unknown_kind",
        }
    }

    /// Whether the error comes from a placement attempt rather than from a
    /// malformed request.
    pub fn is_placement_conflict(&self) -> bool {
        matches!(
            self,
            PlacementError::SlotOccupied { .. } | PlacementError::QuotaExceeded { .. }
        )
    }
}
