//! Board controller: turns UI events into engine operations.
//!
//! The controller wraps a [`PlacementEngine`] with the state a widget needs
//! on top of placement itself: the click-to-place selection, the token being
//! dragged, the slot under the cursor, the current notice and the over-quota
//! alert. None of that state feeds back into placement rules.
//!
//! # Timers
//!
//! The controller never sleeps. Anything that should happen later (hiding a
//! notice, lowering the alert) is queued as a [`Scheduled`] timer. The host
//! drains the queue with [`Board::take_scheduled`], waits, and hands each
//! timer back through [`Board::fire`]. Timers carry the id of what they
//! retire, so one that fires after its notice was replaced, or after a
//! reset, does nothing.

use serde::{Deserialize, Serialize};
use slotboard_grid::{SlotIndex, SlotKind};
use tracing::debug;

use crate::engine::PlacementEngine;
use crate::error::{PlacementError, Result};
use crate::notice::{Notice, NoticeLevel, Scheduled, Timer, NOTICE_TTL, QUOTA_ALERT_TTL};
use crate::token::{Quotas, TokenType};

/// A user interaction delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardInput {
    /// Started dragging a token from the supply.
    DragStart { token: TokenType },
    /// A drag entered a slot.
    DragEnter { slot: usize },
    /// A drag left a slot.
    DragLeave { slot: usize },
    /// A dragged token was dropped on a slot.
    Drop { slot: usize, token: TokenType },
    /// Clicked a token in the supply.
    SelectToken { token: TokenType },
    /// Clicked a slot.
    ClickSlot { slot: usize },
    /// Clicked the token placed on a slot.
    ClickPlaced { slot: usize },
    /// Pressed the reset control.
    Reset,
}

/// Placement engine plus interaction state.
#[derive(Debug, Clone, Default)]
pub struct Board {
    engine: PlacementEngine,
    selected: Option<TokenType>,
    dragging: Option<TokenType>,
    hovered: Option<usize>,
    notice: Option<Notice>,
    quota_alert: Option<u64>,
    next_id: u64,
    scheduled: Vec<Scheduled>,
}

impl Board {
    /// Create a controller around an engine.
    pub fn new(engine: PlacementEngine) -> Self {
        let mut board = Self {
            engine,
            ..Self::default()
        };
        board.refresh_quota_alert();
        board
    }

    /// Handle one user interaction.
    ///
    /// Placement failures are shown as an error notice and also returned.
    /// Selecting or dragging an exhausted token is refused silently.
    pub fn apply(&mut self, input: BoardInput) -> Result<()> {
        match input {
            BoardInput::DragStart { token } => {
                if self.engine.is_exhausted(token) {
                    debug!(%token, "drag refused: token exhausted");
                } else {
                    self.dragging = Some(token);
                }
                Ok(())
            }
            BoardInput::DragEnter { slot } => {
                if self.engine.occupant(slot)?.is_none() {
                    self.hovered = Some(slot);
                }
                Ok(())
            }
            BoardInput::DragLeave { slot } => {
                SlotIndex::new(slot)?;
                if self.hovered == Some(slot) {
                    self.hovered = None;
                }
                Ok(())
            }
            BoardInput::Drop { slot, token } => {
                self.hovered = None;
                self.dragging = None;
                self.place(slot, token)
            }
            BoardInput::SelectToken { token } => {
                if self.engine.is_exhausted(token) {
                    debug!(%token, "selection refused: token exhausted");
                } else {
                    self.selected = Some(token);
                }
                Ok(())
            }
            BoardInput::ClickSlot { slot } => match self.selected.take() {
                Some(token) => self.place(slot, token),
                None => self.remove(slot).map(|_| ()),
            },
            BoardInput::ClickPlaced { slot } => self.remove(slot).map(|_| ()),
            BoardInput::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Place a token and announce the outcome.
    pub fn place(&mut self, slot: usize, token: TokenType) -> Result<()> {
        match self.engine.place(slot, token) {
            Ok(()) => {
                self.notify(NoticeLevel::Success, format!("{} placed!", token.label()));
                self.refresh_quota_alert();
                Ok(())
            }
            Err(err) => {
                match &err {
                    PlacementError::SlotOccupied { .. } => {
                        self.notify(NoticeLevel::Error, "Slot already occupied!".to_string());
                    }
                    PlacementError::QuotaExceeded { token, max } => {
                        self.notify(
                            NoticeLevel::Error,
                            format!("Maximum {} {} tokens!", max, token.label()),
                        );
                        self.refresh_quota_alert();
                    }
                    _ => {}
                }
                Err(err)
            }
        }
    }

    /// Clear a slot and announce what was removed. Empty slots are a no-op.
    pub fn remove(&mut self, slot: usize) -> Result<Option<TokenType>> {
        let removed = self.engine.remove(slot)?;
        if let Some(token) = removed {
            self.notify(NoticeLevel::Info, format!("{} removed!", token.label()));
            self.refresh_quota_alert();
        }
        Ok(removed)
    }

    /// Empty the board and drop any selection or drag in progress.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.selected = None;
        self.dragging = None;
        self.hovered = None;
        self.refresh_quota_alert();
        self.notify(NoticeLevel::Info, "Board reset!".to_string());
    }

    /// Replace the listed quotas.
    pub fn configure(&mut self, quotas: &Quotas) {
        self.engine.configure(quotas);
        self.refresh_quota_alert();
    }

    /// Overwrite one slot's kind.
    pub fn set_slot_kind(&mut self, slot: usize, kind: SlotKind) -> Result<()> {
        self.engine.set_slot_kind(slot, kind)?;
        self.refresh_quota_alert();
        Ok(())
    }

    /// Replace every slot's kind.
    pub fn set_grid_configuration<R: AsRef<[SlotKind]>>(&mut self, rows: &[R]) -> Result<()> {
        self.engine.set_grid_configuration(rows)?;
        self.refresh_quota_alert();
        Ok(())
    }

    /// Run a timer the host scheduled earlier. Returns whether anything
    /// visible changed.
    pub fn fire(&mut self, timer: Timer) -> bool {
        match timer {
            Timer::DismissNotice { id } => {
                if self.notice.as_ref().is_some_and(|n| n.id == id) {
                    self.notice = None;
                    return true;
                }
            }
            Timer::ClearQuotaAlert { id } => {
                if self.quota_alert == Some(id) {
                    self.quota_alert = None;
                    return true;
                }
            }
        }
        false
    }

    /// Timers queued since the last call.
    pub fn take_scheduled(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.scheduled)
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// Token chosen for click-to-place.
    pub fn selected(&self) -> Option<TokenType> {
        self.selected
    }

    /// Token currently being dragged.
    pub fn dragging(&self) -> Option<TokenType> {
        self.dragging
    }

    /// Slot highlighted by a drag in progress.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether the over-quota alert is raised.
    pub fn quota_alert_raised(&self) -> bool {
        self.quota_alert.is_some()
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        let id = self.next_id();
        debug!(id, ?level, %message, "notice");
        self.notice = Some(Notice { id, level, message });
        self.scheduled
            .push(Scheduled::new(NOTICE_TTL, Timer::DismissNotice { id }));
    }

    /// Raise the alert when the engine is over quota, lower it otherwise.
    /// Each raise schedules its own clear.
    fn refresh_quota_alert(&mut self) {
        if !self.engine.is_over_quota() {
            self.quota_alert = None;
            return;
        }
        if self.quota_alert.is_none() {
            let id = self.next_id();
            self.quota_alert = Some(id);
            self.scheduled
                .push(Scheduled::new(QUOTA_ALERT_TTL, Timer::ClearQuotaAlert { id }));
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice_text(board: &Board) -> Option<&str> {
        board.notice().map(|n| n.message.as_str())
    }

    #[test]
    fn drop_places_and_announces() {
        let mut board = Board::default();
        board.apply(BoardInput::DragStart { token: TokenType::R1 }).unwrap();
        board.apply(BoardInput::DragEnter { slot: 3 }).unwrap();
        assert_eq!(board.hovered(), Some(3));

        board
            .apply(BoardInput::Drop { slot: 3, token: TokenType::R1 })
            .unwrap();
        assert_eq!(board.engine().occupant(3), Ok(Some(TokenType::R1)));
        assert_eq!(board.hovered(), None);
        assert_eq!(board.dragging(), None);
        assert_eq!(notice_text(&board), Some("R1 placed!"));
        assert_eq!(board.notice().unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn drag_over_occupied_slot_not_highlighted() {
        let mut board = Board::default();
        board.place(0, TokenType::R2).unwrap();
        board.apply(BoardInput::DragEnter { slot: 0 }).unwrap();
        assert_eq!(board.hovered(), None);
    }

    #[test]
    fn drag_leave_only_clears_its_own_slot() {
        let mut board = Board::default();
        board.apply(BoardInput::DragEnter { slot: 1 }).unwrap();
        board.apply(BoardInput::DragLeave { slot: 2 }).unwrap();
        assert_eq!(board.hovered(), Some(1));
        board.apply(BoardInput::DragLeave { slot: 1 }).unwrap();
        assert_eq!(board.hovered(), None);
    }

    #[test]
    fn drop_on_occupied_slot_reports_error() {
        let mut board = Board::default();
        board.place(5, TokenType::R1).unwrap();

        let err = board
            .apply(BoardInput::Drop { slot: 5, token: TokenType::R2 })
            .unwrap_err();
        assert!(matches!(err, PlacementError::SlotOccupied { slot: 5, .. }));
        assert_eq!(notice_text(&board), Some("Slot already occupied!"));
        assert_eq!(board.engine().placed_count(TokenType::R2), 0);
    }

    #[test]
    fn exhausted_token_cannot_be_selected_or_dragged() {
        let mut board = Board::default();
        board.place(0, TokenType::Fake).unwrap();

        board.apply(BoardInput::SelectToken { token: TokenType::Fake }).unwrap();
        assert_eq!(board.selected(), None);

        board.apply(BoardInput::DragStart { token: TokenType::Fake }).unwrap();
        assert_eq!(board.dragging(), None);
    }

    #[test]
    fn selecting_replaces_previous_selection() {
        let mut board = Board::default();
        board.apply(BoardInput::SelectToken { token: TokenType::R1 }).unwrap();
        board.apply(BoardInput::SelectToken { token: TokenType::R2 }).unwrap();
        assert_eq!(board.selected(), Some(TokenType::R2));
    }

    #[test]
    fn click_place_consumes_selection() {
        let mut board = Board::default();
        board.apply(BoardInput::SelectToken { token: TokenType::R2 }).unwrap();
        board.apply(BoardInput::ClickSlot { slot: 6 }).unwrap();

        assert_eq!(board.engine().occupant(6), Ok(Some(TokenType::R2)));
        assert_eq!(board.selected(), None);
    }

    #[test]
    fn failed_click_place_still_consumes_selection() {
        let mut board = Board::default();
        board.place(6, TokenType::R1).unwrap();

        board.apply(BoardInput::SelectToken { token: TokenType::R2 }).unwrap();
        let result = board.apply(BoardInput::ClickSlot { slot: 6 });

        assert!(result.is_err());
        assert_eq!(board.selected(), None);
        assert_eq!(board.engine().occupant(6), Ok(Some(TokenType::R1)));
    }

    #[test]
    fn click_without_selection_removes() {
        let mut board = Board::default();
        board.place(9, TokenType::Fake).unwrap();

        board.apply(BoardInput::ClickSlot { slot: 9 }).unwrap();
        assert_eq!(board.engine().occupant(9), Ok(None));
        assert_eq!(notice_text(&board), Some("Fake removed!"));
        assert_eq!(board.notice().unwrap().level, NoticeLevel::Info);
    }

    #[test]
    fn click_on_empty_slot_without_selection_is_noop() {
        let mut board = Board::default();
        board.apply(BoardInput::ClickSlot { slot: 9 }).unwrap();
        assert!(board.notice().is_none());
        assert!(board.take_scheduled().is_empty());
    }

    #[test]
    fn click_placed_keeps_selection() {
        let mut board = Board::default();
        board.place(1, TokenType::R1).unwrap();
        board.apply(BoardInput::SelectToken { token: TokenType::R2 }).unwrap();

        board.apply(BoardInput::ClickPlaced { slot: 1 }).unwrap();
        assert_eq!(board.engine().occupant(1), Ok(None));
        assert_eq!(board.selected(), Some(TokenType::R2));
    }

    #[test]
    fn quota_failure_message_names_maximum() {
        let mut board = Board::default();
        for slot in 0..3 {
            board.place(slot, TokenType::R1).unwrap();
        }
        let err = board.place(3, TokenType::R1).unwrap_err();
        assert_eq!(
            err,
            PlacementError::QuotaExceeded {
                token: TokenType::R1,
                max: 3
            }
        );
        assert_eq!(notice_text(&board), Some("Maximum 3 R1 tokens!"));
        // Normal placement never drives the board over quota
        assert!(!board.quota_alert_raised());
    }

    #[test]
    fn reset_clears_interaction_state() {
        let mut board = Board::default();
        board.place(0, TokenType::R1).unwrap();
        board.apply(BoardInput::SelectToken { token: TokenType::R2 }).unwrap();
        board.apply(BoardInput::DragEnter { slot: 4 }).unwrap();

        board.apply(BoardInput::Reset).unwrap();
        assert_eq!(board.selected(), None);
        assert_eq!(board.hovered(), None);
        assert_eq!(board.engine().placed_count(TokenType::R1), 0);
        assert_eq!(notice_text(&board), Some("Board reset!"));
    }

    #[test]
    fn notice_dismissed_by_its_timer() {
        let mut board = Board::default();
        board.place(0, TokenType::R1).unwrap();

        let scheduled = board.take_scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].delay(), NOTICE_TTL);

        assert!(board.fire(scheduled[0].timer));
        assert!(board.notice().is_none());
    }

    #[test]
    fn stale_dismiss_keeps_newer_notice() {
        let mut board = Board::default();
        board.place(0, TokenType::R1).unwrap();
        board.place(1, TokenType::R2).unwrap();

        let scheduled = board.take_scheduled();
        assert_eq!(scheduled.len(), 2);

        assert!(!board.fire(scheduled[0].timer));
        assert_eq!(notice_text(&board), Some("R2 placed!"));
        assert!(board.fire(scheduled[1].timer));
        assert!(board.notice().is_none());
    }

    #[test]
    fn timer_after_reset_is_harmless() {
        let mut board = Board::default();
        board.place(0, TokenType::R1).unwrap();
        let pending = board.take_scheduled();

        board.reset();
        assert!(!board.fire(pending[0].timer));
        assert_eq!(notice_text(&board), Some("Board reset!"));
    }

    #[test]
    fn lowering_quota_raises_alert_until_cleared() {
        let mut board = Board::default();
        board.place(0, TokenType::R2).unwrap();
        board.place(1, TokenType::R2).unwrap();
        board.take_scheduled();

        board.configure(&Quotas::empty().with(TokenType::R2, 1));
        assert!(board.quota_alert_raised());

        let scheduled = board.take_scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].delay(), QUOTA_ALERT_TTL);
        assert!(matches!(scheduled[0].timer, Timer::ClearQuotaAlert { .. }));

        assert!(board.fire(scheduled[0].timer));
        assert!(!board.quota_alert_raised());
        assert!(board.engine().is_over_quota());
    }

    #[test]
    fn configuration_reraises_cleared_alert() {
        let mut board = Board::default();
        board.place(0, TokenType::R2).unwrap();
        board.place(1, TokenType::R2).unwrap();
        board.configure(&Quotas::empty().with(TokenType::R2, 1));

        let clear = |board: &mut Board| {
            for s in board.take_scheduled() {
                if let Timer::ClearQuotaAlert { .. } = s.timer {
                    assert!(board.fire(s.timer));
                }
            }
            assert!(!board.quota_alert_raised());
        };

        clear(&mut board);
        board.set_slot_kind(3, SlotKind::Large).unwrap();
        assert!(board.quota_alert_raised());

        clear(&mut board);
        board
            .set_grid_configuration(&[[SlotKind::Medium; 3]; 4])
            .unwrap();
        assert!(board.quota_alert_raised());

        clear(&mut board);
        board.configure(&Quotas::empty().with(TokenType::Fake, 2));
        assert!(board.quota_alert_raised());
    }

    #[test]
    fn rejected_grid_leaves_cleared_alert_down() {
        let mut board = Board::default();
        board.place(0, TokenType::R2).unwrap();
        board.place(1, TokenType::R2).unwrap();
        board.configure(&Quotas::empty().with(TokenType::R2, 1));
        for s in board.take_scheduled() {
            board.fire(s.timer);
        }

        assert!(board.set_grid_configuration(&[[SlotKind::Small; 3]; 3]).is_err());
        assert!(!board.quota_alert_raised());
    }

    #[test]
    fn alert_drops_once_back_within_quota() {
        let mut board = Board::default();
        board.place(0, TokenType::R2).unwrap();
        board.place(1, TokenType::R2).unwrap();
        board.configure(&Quotas::empty().with(TokenType::R2, 1));
        assert!(board.quota_alert_raised());

        board.remove(0).unwrap();
        assert!(!board.quota_alert_raised());
    }

    #[test]
    fn invalid_slot_is_reported() {
        let mut board = Board::default();
        let err = board.apply(BoardInput::DragEnter { slot: 40 }).unwrap_err();
        assert_eq!(err.kind(), "invalid_index");
    }

    #[test]
    fn input_wire_format() {
        let input: BoardInput =
            serde_json::from_str(r#"{"type":"drop","slot":2,"token":"r1"}"#).unwrap();
        assert_eq!(input, BoardInput::Drop { slot: 2, token: TokenType::R1 });

        let json = serde_json::to_string(&BoardInput::Reset).unwrap();
        assert_eq!(json, r#"{"type":"reset"}"#);
    }
}
