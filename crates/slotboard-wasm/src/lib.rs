//! Slotboard WebAssembly bindings.
//!
//! Exposes one [`Board`] to a browser frontend. Inputs and views cross the
//! boundary as plain JavaScript objects with the same shape as the server's
//! JSON, so a page can switch between local and hosted boards freely.
//!
//! The board never sleeps. After each call the page drains `takeTimers()`,
//! waits `delay_ms` with `setTimeout`, and passes each timer to `fire()`.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use slotboard_engine::{
    render, Board, BoardInput, KindMatrix, PlacementEngine, Quotas, SlotKind, Timer, TokenType,
};
use wasm_bindgen::prelude::*;

/// Serialize into a plain JavaScript object.
fn to_object<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {e}")))
}

fn from_object<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {what}: {e}")))
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A placement board owned by the page.
#[wasm_bindgen]
pub struct SlotBoard {
    board: Board,
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SlotBoard {
    /// Board with the default quotas and grid.
    #[wasm_bindgen(constructor)]
    pub fn new() -> SlotBoard {
        SlotBoard {
            board: Board::new(PlacementEngine::new(
                &Quotas::default(),
                KindMatrix::default(),
            )),
        }
    }

    /// Set quotas from an object like `{ r1: 5 }`. Unlisted types keep
    /// their current quota.
    pub fn configure(&mut self, quotas: JsValue) -> Result<(), JsValue> {
        let quotas: Quotas = from_object(quotas, "quotas")?;
        self.board.configure(&quotas);
        Ok(())
    }

    #[wasm_bindgen(js_name = setSlotKind)]
    pub fn set_slot_kind(&mut self, index: usize, kind: u32) -> Result<(), JsValue> {
        let kind = SlotKind::try_from(kind).map_err(js_err)?;
        self.board.set_slot_kind(index, kind).map_err(js_err)
    }

    /// Replace the kind matrix from a 4×3 nested array.
    #[wasm_bindgen(js_name = setGridConfiguration)]
    pub fn set_grid_configuration(&mut self, grid: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Vec<SlotKind>> = from_object(grid, "grid")?;
        self.board.set_grid_configuration(&rows).map_err(js_err)
    }

    #[wasm_bindgen(js_name = getGridConfiguration)]
    pub fn grid_configuration(&self) -> Result<JsValue, JsValue> {
        to_object(&self.board.engine().grid_configuration())
    }

    #[wasm_bindgen(js_name = getSlotDetails)]
    pub fn slot_details(&self) -> Result<JsValue, JsValue> {
        to_object(&self.board.engine().slot_details())
    }

    /// Deliver one UI event, e.g. `{ type: "drop", slot: 4, token: "r1" }`.
    ///
    /// Rejected placements still update the notice; the error is returned
    /// as well.
    pub fn apply(&mut self, input: JsValue) -> Result<(), JsValue> {
        let input: BoardInput = from_object(input, "input")?;
        self.board.apply(input).map_err(js_err)
    }

    pub fn place(&mut self, slot: usize, token: &str) -> Result<(), JsValue> {
        let token: TokenType = token.parse().map_err(js_err)?;
        self.board.place(slot, token).map_err(js_err)
    }

    /// Clear a slot. Returns the removed token's name, or `undefined` when
    /// the slot was empty.
    pub fn remove(&mut self, slot: usize) -> Result<Option<String>, JsValue> {
        self.board
            .remove(slot)
            .map(|removed| removed.map(|t| t.as_str().to_string()))
            .map_err(js_err)
    }

    pub fn reset(&mut self) {
        self.board.reset();
    }

    #[wasm_bindgen(js_name = remainingFor)]
    pub fn remaining_for(&self, token: &str) -> Result<i64, JsValue> {
        let token: TokenType = token.parse().map_err(js_err)?;
        Ok(self.board.engine().remaining_for(token))
    }

    #[wasm_bindgen(js_name = isOverQuota)]
    pub fn is_over_quota(&self) -> bool {
        self.board.engine().is_over_quota()
    }

    /// Everything the page draws.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_object(&render(&self.board))
    }

    /// Timers queued since the last call, as `{ delay_ms, timer }` objects.
    #[wasm_bindgen(js_name = takeTimers)]
    pub fn take_timers(&mut self) -> Result<JsValue, JsValue> {
        to_object(&self.board.take_scheduled())
    }

    /// Run a timer previously returned by `takeTimers`. Returns whether the
    /// view changed.
    pub fn fire(&mut self, timer: JsValue) -> Result<bool, JsValue> {
        let timer: Timer = from_object(timer, "timer")?;
        Ok(self.board.fire(timer))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    // JsValue cannot be built off wasm, so only paths that never touch it
    // are exercised here.

    #[test]
    fn starts_with_default_quotas() {
        let board = SlotBoard::new();
        assert_eq!(board.board.engine().quotas(), Quotas::default());
        assert!(!board.is_over_quota());
    }

    #[test]
    fn place_and_remove_by_name() {
        let mut board = SlotBoard::new();
        assert!(board.place(0, "r1").is_ok());
        assert!(board.place(1, "R1").is_ok());
        assert!(matches!(board.remaining_for("r1"), Ok(1)));
        assert_eq!(board.remove(0).ok().flatten().as_deref(), Some("r1"));
        assert_eq!(board.remove(0).ok().flatten(), None);
    }

    #[test]
    fn set_slot_kind_updates_grid() {
        let mut board = SlotBoard::new();
        assert!(board.set_slot_kind(11, 20).is_ok());
        let kinds = board.board.engine().grid_configuration();
        assert_eq!(kinds.to_rows()[3][2], SlotKind::Small);
    }

    #[test]
    fn reset_clears_everything() {
        let mut board = SlotBoard::new();
        assert!(board.place(5, "fake").is_ok());
        board.reset();
        assert!(matches!(board.remaining_for("fake"), Ok(1)));
        assert!(!board.board.take_scheduled().is_empty());
    }
}
