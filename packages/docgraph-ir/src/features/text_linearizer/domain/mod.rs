// Text Linearizer Domain Models
//
// Spacing rules and the linearized datasource (text plus per-token offsets).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::ConfigError;
use crate::shared::models::{TextRange, TokenSlot};

// ============================================================
// Spacing Policy
// ============================================================

/// Decides whether a single space separates two consecutive text-bearing tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingPolicy {
    /// Space after tokens flagged as followed by whitespace, and whenever the
    /// immediate container changes
    #[default]
    ContainerBoundary,
    /// Only the followed-by-whitespace flag counts
    SpaceFlag,
    /// Tokens are concatenated without separator
    Never,
}

impl SpacingPolicy {
    pub const VARIANTS: &'static [&'static str] = &["container-boundary", "space-flag", "never"];

    /// Separator rule between `prev` and `next` (both text-bearing, `prev` first)
    pub fn needs_separator(&self, prev: &TokenSlot<'_>, next: &TokenSlot<'_>) -> bool {
        match self {
            Self::ContainerBoundary => prev.token.space || prev.parent != next.parent,
            Self::SpaceFlag => prev.token.space,
            Self::Never => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContainerBoundary => "container-boundary",
            Self::SpaceFlag => "space-flag",
            Self::Never => "never",
        }
    }
}

impl FromStr for SpacingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "container-boundary" => Ok(Self::ContainerBoundary),
            "space-flag" => Ok(Self::SpaceFlag),
            "never" => Ok(Self::Never),
            _ => Err(ConfigError::unknown_value_with_suggestion(
                "spacing",
                s,
                Self::VARIANTS,
            )),
        }
    }
}

// ============================================================
// Linearized Text
// ============================================================

/// Which token content is linearized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChannel {
    Text,
    Phon,
}

impl TextChannel {
    pub fn content<'t>(&self, slot: &TokenSlot<'t>) -> Option<&'t str> {
        match self {
            Self::Text => slot.token.text(),
            Self::Phon => slot.token.phon(),
        }
    }
}

/// Concatenated datasource string with the char range of each token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearizedText {
    pub text: String,
    /// Indexed by token position; `None` for tokens without content
    pub offsets: Vec<Option<TextRange>>,
    /// Length of `text` in chars
    pub char_len: usize,
}

impl LinearizedText {
    /// No token contributed content
    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn offset(&self, position: usize) -> Option<TextRange> {
        self.offsets.get(position).copied().flatten()
    }

    /// Positions and ranges of content-bearing tokens, in document order
    pub fn ranges(&self) -> impl Iterator<Item = (usize, TextRange)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .filter_map(|(position, range)| range.map(|r| (position, r)))
    }
}
