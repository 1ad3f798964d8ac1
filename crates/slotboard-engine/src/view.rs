//! Render projection: everything a frontend draws, derived from state.
//!
//! [`render`] is a pure function of the [`Board`]. Frontends replace their
//! whole display from a [`BoardView`] and never read presentation back to
//! decide what the board contains.

use serde::{Deserialize, Serialize};
use slotboard_grid::SlotKind;

use crate::board::Board;
use crate::notice::Notice;
use crate::token::TokenType;

/// Pointer shown over a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    Pointer,
    Crosshair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub kind: SlotKind,
    pub placeholder: String,
    pub occupant: Option<TokenType>,
    pub label: Option<&'static str>,
    pub highlighted: bool,
    pub cursor: Cursor,
}

/// Remaining-count display for one token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub token: TokenType,
    pub label: &'static str,
    pub remaining: i64,
    pub warning: bool,
}

/// A token in the supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView {
    pub token: TokenType,
    pub label: &'static str,
    pub disabled: bool,
    pub selected: bool,
    /// Being dragged from the supply.
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub slots: Vec<SlotView>,
    pub counters: Vec<CounterView>,
    pub tokens: Vec<TokenView>,
    pub over_quota: bool,
    pub notice: Option<Notice>,
}

/// Project the board into its displayable form.
pub fn render(board: &Board) -> BoardView {
    let engine = board.engine();
    let selecting = board.selected().is_some();

    let slots = engine
        .slot_details()
        .into_iter()
        .map(|slot| SlotView {
            index: slot.index,
            row: slot.row,
            col: slot.col,
            kind: slot.kind,
            placeholder: slot.kind.placeholder(),
            occupant: slot.occupant,
            label: slot.occupant.map(TokenType::label),
            highlighted: board.hovered() == Some(slot.index),
            cursor: if selecting && slot.occupant.is_none() {
                Cursor::Crosshair
            } else {
                Cursor::Pointer
            },
        })
        .collect();

    let counters = TokenType::ALL
        .into_iter()
        .map(|token| CounterView {
            token,
            label: token.label(),
            remaining: engine.remaining_for(token),
            warning: engine.is_exhausted(token),
        })
        .collect();

    let tokens = TokenType::ALL
        .into_iter()
        .map(|token| TokenView {
            token,
            label: token.label(),
            disabled: engine.is_exhausted(token),
            selected: board.selected() == Some(token),
            dragging: board.dragging() == Some(token),
        })
        .collect();

    BoardView {
        slots,
        counters,
        tokens,
        over_quota: board.quota_alert_raised(),
        notice: board.notice().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardInput;
    use crate::token::Quotas;

    #[test]
    fn fresh_board_view() {
        let view = render(&Board::default());

        assert_eq!(view.slots.len(), slotboard_grid::SLOT_COUNT);
        assert!(view.slots.iter().all(|s| s.occupant.is_none() && !s.highlighted));
        assert_eq!(view.slots[4].placeholder, "Slot 60");

        let remaining: Vec<_> = view.counters.iter().map(|c| c.remaining).collect();
        assert_eq!(remaining, vec![1, 3, 4]);
        assert!(view.tokens.iter().all(|t| !t.disabled && !t.selected && !t.dragging));
        assert!(!view.over_quota);
        assert!(view.notice.is_none());
    }

    #[test]
    fn exhausted_type_is_warned_and_disabled() {
        let mut board = Board::default();
        board.place(0, TokenType::Fake).unwrap();
        let view = render(&board);

        assert_eq!(view.counters[0].remaining, 0);
        assert!(view.counters[0].warning);
        assert!(view.tokens[0].disabled);
        assert!(!view.tokens[1].disabled);
        assert_eq!(view.slots[0].label, Some("Fake"));
    }

    #[test]
    fn selection_shows_crosshair_on_empty_slots() {
        let mut board = Board::default();
        board.place(2, TokenType::R1).unwrap();
        board
            .apply(BoardInput::SelectToken { token: TokenType::R2 })
            .unwrap();
        let view = render(&board);

        assert!(view.tokens[2].selected);
        assert_eq!(view.slots[2].cursor, Cursor::Pointer);
        assert_eq!(view.slots[3].cursor, Cursor::Crosshair);
    }

    #[test]
    fn dragged_token_is_marked_until_drop() {
        let mut board = Board::default();
        board
            .apply(BoardInput::DragStart { token: TokenType::R1 })
            .unwrap();
        board.apply(BoardInput::DragEnter { slot: 5 }).unwrap();
        let view = render(&board);

        let dragging: Vec<_> = view.tokens.iter().map(|t| t.dragging).collect();
        assert_eq!(dragging, vec![false, true, false]);
        assert!(view.slots[5].highlighted);

        board
            .apply(BoardInput::Drop { slot: 5, token: TokenType::R1 })
            .unwrap();
        let view = render(&board);
        assert!(view.tokens.iter().all(|t| !t.dragging));
        assert!(!view.slots[5].highlighted);
    }

    #[test]
    fn over_quota_shows_negative_remaining() {
        let mut board = Board::default();
        board.place(0, TokenType::R1).unwrap();
        board.place(1, TokenType::R1).unwrap();
        board.configure(&Quotas::empty().with(TokenType::R1, 1));
        let view = render(&board);

        assert_eq!(view.counters[1].remaining, -1);
        assert!(view.counters[1].warning);
        assert!(view.over_quota);
    }

    #[test]
    fn view_serializes_for_frontends() {
        let mut board = Board::default();
        board.place(0, TokenType::R2).unwrap();
        let json = serde_json::to_value(render(&board)).unwrap();

        assert_eq!(json["slots"][0]["occupant"], "r2");
        assert_eq!(json["slots"][0]["cursor"], "pointer");
        assert_eq!(json["counters"][2]["remaining"], 3);
        assert_eq!(json["notice"]["level"], "success");
    }
}
