//! Slot addressing and the kind matrix.
//!
//! A [`SlotIndex`] is a validated position in `0..SLOT_COUNT`. It converts to
//! and from a [`GridPos`] (row, column) in row-major order. The
//! [`KindMatrix`] stores one [`SlotKind`] per position and can only ever hold
//! exactly ROWS × COLS cells; every reshaping entry point validates first and
//! leaves the existing matrix untouched on failure.

use std::str::FromStr;

use crate::error::{GridError, Result};
use crate::kind::SlotKind;
use crate::{COLS, ROWS, SLOT_COUNT};

/// A validated slot position in `0..SLOT_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Validate a raw index.
    pub fn new(index: usize) -> Result<Self> {
        if index < SLOT_COUNT {
            Ok(Self(index))
        } else {
            Err(GridError::InvalidIndex {
                index,
                len: SLOT_COUNT,
            })
        }
    }

    /// The raw index.
    pub const fn value(self) -> usize {
        self.0
    }

    /// Row and column of this slot.
    pub const fn pos(self) -> GridPos {
        GridPos {
            row: self.0 / COLS,
            col: self.0 % COLS,
        }
    }

    /// Every slot in board order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SLOT_COUNT).map(Self)
    }
}

impl TryFrom<usize> for SlotIndex {
    type Error = GridError;

    fn try_from(index: usize) -> Result<Self> {
        Self::new(index)
    }
}

impl From<SlotIndex> for usize {
    fn from(index: SlotIndex) -> usize {
        index.0
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row and column on the board, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    /// Slot at this position, if it is on the board.
    pub fn index(self) -> Result<SlotIndex> {
        if self.row >= ROWS || self.col >= COLS {
            return Err(GridError::InvalidIndex {
                index: self.row * COLS + self.col,
                len: SLOT_COUNT,
            });
        }
        SlotIndex::new(self.row * COLS + self.col)
    }
}

/// The 4×3 matrix of slot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Vec<SlotKind>>", into = "Vec<Vec<SlotKind>>")
)]
pub struct KindMatrix([[SlotKind; COLS]; ROWS]);

impl KindMatrix {
    /// Matrix with every slot set to one kind.
    pub const fn uniform(kind: SlotKind) -> Self {
        Self([[kind; COLS]; ROWS])
    }

    /// Build a matrix from rows, rejecting anything that is not ROWS × COLS.
    pub fn from_rows<R: AsRef<[SlotKind]>>(rows: &[R]) -> Result<Self> {
        if rows.len() != ROWS {
            return Err(GridError::InvalidShape(format!(
                "expected {} rows, got {}",
                ROWS,
                rows.len()
            )));
        }

        let mut cells = [[SlotKind::Small; COLS]; ROWS];
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != COLS {
                return Err(GridError::InvalidShape(format!(
                    "row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    COLS
                )));
            }
            cells[r].copy_from_slice(row);
        }
        Ok(Self(cells))
    }

    /// Rows as owned vectors, row 0 first.
    pub fn to_rows(&self) -> Vec<Vec<SlotKind>> {
        self.0.iter().map(|row| row.to_vec()).collect()
    }

    /// Kind of one slot.
    pub fn get(&self, index: SlotIndex) -> SlotKind {
        let pos = index.pos();
        self.0[pos.row][pos.col]
    }

    /// Overwrite the kind of one slot.
    pub fn set(&mut self, index: SlotIndex, kind: SlotKind) {
        let pos = index.pos();
        self.0[pos.row][pos.col] = kind;
    }

    /// Every slot with its kind, in board order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, SlotKind)> + '_ {
        SlotIndex::all().map(move |i| (i, self.get(i)))
    }
}

impl Default for KindMatrix {
    fn default() -> Self {
        use SlotKind::{Large, Medium, Small};
        Self([
            [Small, Medium, Small],
            [Medium, Large, Medium],
            [Small, Medium, Large],
            [Medium, Small, Medium],
        ])
    }
}

impl TryFrom<Vec<Vec<SlotKind>>> for KindMatrix {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<SlotKind>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<KindMatrix> for Vec<Vec<SlotKind>> {
    fn from(matrix: KindMatrix) -> Self {
        matrix.to_rows()
    }
}

/// Parses `20,40,20;40,60,40;20,40,60;40,20,40` (rows split by `;`).
impl FromStr for KindMatrix {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .split(';')
            .map(|row| row.split(',').map(str::parse).collect::<Result<Vec<SlotKind>>>())
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(&rows)
    }
}

impl std::fmt::Display for KindMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                write!(f, ";")?;
            }
            for (c, kind) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{kind}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SlotKind::{Large, Medium, Small};

    #[test]
    fn index_bounds() {
        assert!(SlotIndex::new(0).is_ok());
        assert!(SlotIndex::new(SLOT_COUNT - 1).is_ok());
        assert_eq!(
            SlotIndex::new(SLOT_COUNT),
            Err(GridError::InvalidIndex { index: 12, len: 12 })
        );
    }

    #[test]
    fn row_major_positions() {
        let pos = SlotIndex::new(7).unwrap().pos();
        assert_eq!(pos, GridPos { row: 2, col: 1 });
        assert_eq!(pos.index().unwrap().value(), 7);

        let last = SlotIndex::new(11).unwrap().pos();
        assert_eq!(last, GridPos { row: 3, col: 2 });
    }

    #[test]
    fn off_board_position_rejected() {
        assert!(GridPos { row: 0, col: 3 }.index().is_err());
        assert!(GridPos { row: 4, col: 0 }.index().is_err());
    }

    #[test]
    fn default_matrix_layout() {
        let m = KindMatrix::default();
        assert_eq!(
            m.to_rows(),
            vec![
                vec![Small, Medium, Small],
                vec![Medium, Large, Medium],
                vec![Small, Medium, Large],
                vec![Medium, Small, Medium],
            ]
        );
        assert_eq!(m.get(SlotIndex::new(4).unwrap()), Large);
        assert_eq!(m.get(SlotIndex::new(8).unwrap()), Large);
    }

    #[test]
    fn wrong_row_count_rejected() {
        let rows = vec![vec![Small; 3]; 3];
        assert!(matches!(
            KindMatrix::from_rows(&rows),
            Err(GridError::InvalidShape(_))
        ));
    }

    #[test]
    fn ragged_row_rejected() {
        let mut rows = vec![vec![Small; 3]; 4];
        rows[2].push(Large);
        assert!(matches!(
            KindMatrix::from_rows(&rows),
            Err(GridError::InvalidShape(_))
        ));
    }

    #[test]
    fn set_updates_single_cell() {
        let mut m = KindMatrix::uniform(Small);
        let idx = SlotIndex::new(5).unwrap();
        m.set(idx, Large);

        let large: Vec<_> = m.iter().filter(|(_, k)| *k == Large).collect();
        assert_eq!(large, vec![(idx, Large)]);
        assert_eq!(m.to_rows()[1][2], Large);
    }

    #[test]
    fn parse_and_display_agree() {
        let text = "20,40,20;40,60,40;20,40,60;40,20,40";
        let m: KindMatrix = text.parse().unwrap();
        assert_eq!(m, KindMatrix::default());
        assert_eq!(m.to_string(), text);
    }

    #[test]
    fn parse_rejects_bad_cells() {
        assert_eq!(
            "20,40,20;40,61,40;20,40,60;40,20,40".parse::<KindMatrix>(),
            Err(GridError::UnknownKind(61))
        );
        assert!("20,40;40,60".parse::<KindMatrix>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn matrix_serializes_as_nested_arrays() {
        let json = serde_json::to_string(&KindMatrix::default()).unwrap();
        assert_eq!(json, "[[20,40,20],[40,60,40],[20,40,60],[40,20,40]]");

        assert!(serde_json::from_str::<KindMatrix>("[[20,40,20],[40,60,40],[20,40,60]]").is_err());
    }
}
