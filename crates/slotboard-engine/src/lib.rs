//! Slotboard Placement Engine
//!
//! Quota-enforced placement of typed tokens onto the fixed slot grid.
//!
//! # Architecture
//!
//! - **Engine**: owns slot occupancy and per-type counts; place, remove, reset
//! - **Board**: selection, drag and hover state, notices, presentation timers
//! - **View**: pure projection of a board into what a frontend draws
//!
//! Everything here is synchronous and performs no I/O. Hosts (the HTTP
//! server, the browser bindings) deliver one input at a time and run the
//! timers the board hands back.
//!
//! # Usage
//!
//! ```
//! use slotboard_engine::{render, Board, BoardInput, TokenType};
//!
//! let mut board = Board::default();
//! board.apply(BoardInput::SelectToken { token: TokenType::R1 }).unwrap();
//! board.apply(BoardInput::ClickSlot { slot: 4 }).unwrap();
//!
//! let view = render(&board);
//! assert_eq!(view.counters[1].remaining, 2);
//! ```

mod board;
mod engine;
mod error;
mod notice;
mod token;
mod view;

pub use board::{Board, BoardInput};
pub use engine::{PlacementEngine, SlotDetail};
pub use error::{PlacementError, Result};
pub use notice::{Notice, NoticeLevel, Scheduled, Timer, NOTICE_TTL, QUOTA_ALERT_TTL};
pub use token::{Quotas, TokenType};
pub use view::{render, BoardView, CounterView, Cursor, SlotView, TokenView};

pub use slotboard_grid::{GridError, KindMatrix, SlotIndex, SlotKind, COLS, ROWS, SLOT_COUNT};
