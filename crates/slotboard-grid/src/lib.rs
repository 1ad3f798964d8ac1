//! Slotboard Grid
//!
//! The fixed board a slotboard widget places tokens onto.
//!
//! # Layout
//!
//! The board holds 12 slots arranged as 4 rows of 3 columns. Slots are
//! numbered in row-major order starting from the top-left corner, so slot
//! `i` sits at row `i / 3`, column `i % 3`.
//!
//! Each slot carries a [`SlotKind`] taken from a 4×3 [`KindMatrix`]. Kinds are
//! purely descriptive: they decide how a slot is labelled and styled, never
//! whether a token may be placed on it.

mod error;
mod kind;
mod layout;

pub use error::{GridError, Result};
pub use kind::SlotKind;
pub use layout::{GridPos, KindMatrix, SlotIndex};

/// Number of rows on the board.
pub const ROWS: usize = 4;

/// Number of columns on the board.
pub const COLS: usize = 3;

/// Total number of slots (invariant: always ROWS × COLS).
pub const SLOT_COUNT: usize = 12;

// Compile-time assertion of the grid shape
const _: () = assert!(ROWS * COLS == SLOT_COUNT);
