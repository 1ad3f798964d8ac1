//! Token types and their quotas.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlacementError;

/// A category of placeable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Fake,
    R1,
    R2,
}

impl TokenType {
    /// Number of token types.
    pub const COUNT: usize = 3;

    /// Every token type in display order.
    pub const ALL: [Self; Self::COUNT] = [Self::Fake, Self::R1, Self::R2];

    /// Position of this type in [`TokenType::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name (`fake`, `r1`, `r2`).
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenType::Fake => "fake",
            TokenType::R1 => "r1",
            TokenType::R2 => "r2",
        }
    }

    /// Label printed on a placed token.
    pub const fn label(self) -> &'static str {
        match self {
            TokenType::Fake => "Fake",
            TokenType::R1 => "R1",
            TokenType::R2 => "R2",
        }
    }
}

impl FromStr for TokenType {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| PlacementError::UnknownToken(s.to_string()))
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Maximum simultaneous count per token type.
///
/// A `Quotas` value may list only some types; when applied to an engine the
/// unlisted types keep whatever quota they had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quotas(BTreeMap<TokenType, u32>);

impl Quotas {
    /// Quotas with no entries.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the quota for one type.
    pub fn with(mut self, token: TokenType, max: u32) -> Self {
        self.0.insert(token, max);
        self
    }

    /// Quota for one type, if listed.
    pub fn get(&self, token: TokenType) -> Option<u32> {
        self.0.get(&token).copied()
    }

    /// Listed quotas in token order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenType, u32)> + '_ {
        self.0.iter().map(|(t, m)| (*t, *m))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Quotas {
    fn default() -> Self {
        Self::empty()
            .with(TokenType::Fake, 1)
            .with(TokenType::R1, 3)
            .with(TokenType::R2, 4)
    }
}

/// Parses `fake=1,r1=3,r2=4`.
impl FromStr for Quotas {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut quotas = Self::empty();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, max) = entry
                .split_once('=')
                .ok_or_else(|| PlacementError::InvalidQuota(entry.to_string()))?;
            let token: TokenType = name.parse()?;
            let max = max
                .trim()
                .parse()
                .map_err(|_| PlacementError::InvalidQuota(entry.to_string()))?;
            quotas = quotas.with(token, max);
        }
        Ok(quotas)
    }
}
