//! Cosmetic slot kinds.

use std::str::FromStr;

use crate::error::GridError;

/// Category of a slot.
///
/// Kinds travel as their bare numeric value (`20`, `40`, `60`), which is also
/// what the kind matrix is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum SlotKind {
    /// Kind 20
    Small,
    /// Kind 40
    Medium,
    /// Kind 60
    Large,
}

impl SlotKind {
    /// Every kind, smallest first.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Numeric value of this kind.
    pub const fn value(self) -> u32 {
        match self {
            SlotKind::Small => 20,
            SlotKind::Medium => 40,
            SlotKind::Large => 60,
        }
    }

    /// Text shown on an empty slot of this kind.
    pub fn placeholder(self) -> String {
        format!("Slot {}", self.value())
    }
}

impl TryFrom<u32> for SlotKind {
    type Error = GridError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|k| k.value() == value)
            .ok_or(GridError::UnknownKind(value))
    }
}

impl From<SlotKind> for u32 {
    fn from(kind: SlotKind) -> u32 {
        kind.value()
    }
}

impl FromStr for SlotKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| GridError::UnparsableKind(s.to_string()))?;
        Self::try_from(value)
    }
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip_through_u32() {
        for kind in SlotKind::ALL {
            assert_eq!(SlotKind::try_from(kind.value()), Ok(kind));
        }
    }

    #[test]
    fn unknown_value_rejected() {
        assert_eq!(SlotKind::try_from(30), Err(GridError::UnknownKind(30)));
        assert_eq!(SlotKind::try_from(0), Err(GridError::UnknownKind(0)));
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(" 60 ".parse::<SlotKind>(), Ok(SlotKind::Large));
        assert!("sixty".parse::<SlotKind>().is_err());
    }

    #[test]
    fn placeholder_text() {
        assert_eq!(SlotKind::Medium.placeholder(), "Slot 40");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&SlotKind::Large).unwrap(), "60");
        let parsed: SlotKind = serde_json::from_str("20").unwrap();
        assert_eq!(parsed, SlotKind::Small);
        assert!(serde_json::from_str::<SlotKind>("25").is_err());
    }
}
