//! Placement engine: slot occupancy and per-type quotas.
//!
//! The engine is the single owner of board state. Every counter, flag and
//! remaining-count the UI shows is derived from two facts it stores: which
//! token (if any) sits on each slot, and how many of each type are placed.
//!
//! # Quota rule
//!
//! `place` refuses a token whose type already has `placed >= max` tokens on
//! the board. The only way `placed` can exceed `max` is reconfiguring quotas
//! downwards while tokens are placed; [`PlacementEngine::is_over_quota`]
//! reports that condition but nothing here tries to repair it.

use serde::{Deserialize, Serialize};
use slotboard_grid::{KindMatrix, SlotIndex, SlotKind, SLOT_COUNT};
use tracing::{debug, info};

use crate::error::{PlacementError, Result};
use crate::token::{Quotas, TokenType};

/// One slot as reported by [`PlacementEngine::slot_details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDetail {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub kind: SlotKind,
    pub occupant: Option<TokenType>,
}

/// Owner of slot occupancy and quota counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementEngine {
    max: [u32; TokenType::COUNT],
    placed: [u32; TokenType::COUNT],
    occupants: [Option<TokenType>; SLOT_COUNT],
    kinds: KindMatrix,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(&Quotas::default(), KindMatrix::default())
    }
}

impl PlacementEngine {
    /// Create an empty board. Types missing from `quotas` get a quota of 0.
    pub fn new(quotas: &Quotas, kinds: KindMatrix) -> Self {
        let mut engine = Self {
            max: [0; TokenType::COUNT],
            placed: [0; TokenType::COUNT],
            occupants: [None; SLOT_COUNT],
            kinds,
        };
        engine.configure(quotas);
        engine
    }

    /// Place a token on an empty slot.
    ///
    /// Fails with [`PlacementError::SlotOccupied`] before considering the
    /// quota, and with [`PlacementError::QuotaExceeded`] when every token of
    /// the type is already placed. State is unchanged on failure.
    pub fn place(&mut self, slot: usize, token: TokenType) -> Result<()> {
        let index = SlotIndex::new(slot)?;

        if let Some(occupant) = self.occupants[index.value()] {
            return Err(PlacementError::SlotOccupied { slot, occupant });
        }

        let max = self.max[token.index()];
        if self.placed[token.index()] >= max {
            return Err(PlacementError::QuotaExceeded { token, max });
        }

        self.occupants[index.value()] = Some(token);
        self.placed[token.index()] += 1;
        debug!(slot, %token, remaining = self.remaining_for(token), "placed token");
        Ok(())
    }

    /// Clear a slot, returning the token that was on it.
    ///
    /// Removing from an empty slot is a no-op and returns `Ok(None)`.
    pub fn remove(&mut self, slot: usize) -> Result<Option<TokenType>> {
        let index = SlotIndex::new(slot)?;

        let Some(token) = self.occupants[index.value()].take() else {
            return Ok(None);
        };
        self.placed[token.index()] = self.placed[token.index()].saturating_sub(1);
        debug!(slot, %token, remaining = self.remaining_for(token), "removed token");
        Ok(Some(token))
    }

    /// Clear every slot and zero every counter. Quotas and kinds are kept.
    pub fn reset(&mut self) {
        self.occupants = [None; SLOT_COUNT];
        self.placed = [0; TokenType::COUNT];
        debug!("board reset");
    }

    /// Quota minus placed count. Negative when over quota.
    pub fn remaining_for(&self, token: TokenType) -> i64 {
        i64::from(self.max[token.index()]) - i64::from(self.placed[token.index()])
    }

    /// No more tokens of this type may be placed.
    pub fn is_exhausted(&self, token: TokenType) -> bool {
        self.remaining_for(token) <= 0
    }

    /// Some type has more tokens placed than its quota allows.
    pub fn is_over_quota(&self) -> bool {
        TokenType::ALL
            .into_iter()
            .any(|t| self.placed[t.index()] > self.max[t.index()])
    }

    /// Number of tokens of this type on the board.
    pub fn placed_count(&self, token: TokenType) -> u32 {
        self.placed[token.index()]
    }

    /// Configured maximum for this type.
    pub fn quota(&self, token: TokenType) -> u32 {
        self.max[token.index()]
    }

    /// All quotas as a map.
    pub fn quotas(&self) -> Quotas {
        TokenType::ALL
            .into_iter()
            .fold(Quotas::empty(), |q, t| q.with(t, self.max[t.index()]))
    }

    /// Token on a slot, if any.
    pub fn occupant(&self, slot: usize) -> Result<Option<TokenType>> {
        let index = SlotIndex::new(slot)?;
        Ok(self.occupants[index.value()])
    }

    /// Replace the quotas listed in `quotas`; unlisted types keep theirs.
    ///
    /// Placed tokens are never removed, so lowering a quota below the placed
    /// count leaves the board over quota.
    pub fn configure(&mut self, quotas: &Quotas) {
        for (token, max) in quotas.iter() {
            self.max[token.index()] = max;
            info!(%token, max, "quota configured");
        }
    }

    /// Overwrite one slot's kind.
    pub fn set_slot_kind(&mut self, slot: usize, kind: SlotKind) -> Result<()> {
        let index = SlotIndex::new(slot)?;
        self.kinds.set(index, kind);
        info!(slot, %kind, "slot kind set");
        Ok(())
    }

    /// Replace every slot's kind. The grid is untouched unless `rows` is
    /// exactly 4 rows of 3 columns.
    pub fn set_grid_configuration<R: AsRef<[SlotKind]>>(&mut self, rows: &[R]) -> Result<()> {
        self.kinds = KindMatrix::from_rows(rows)?;
        info!(grid = %self.kinds, "grid configuration replaced");
        Ok(())
    }

    /// Current kind matrix.
    pub fn grid_configuration(&self) -> KindMatrix {
        self.kinds
    }

    /// Every slot with its position, kind and occupant.
    pub fn slot_details(&self) -> Vec<SlotDetail> {
        self.kinds
            .iter()
            .map(|(index, kind)| {
                let pos = index.pos();
                SlotDetail {
                    index: index.value(),
                    row: pos.row,
                    col: pos.col,
                    kind,
                    occupant: self.occupants[index.value()],
                }
            })
            .collect()
    }
}
