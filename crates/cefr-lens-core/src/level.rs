//! CEFR proficiency levels and the difficulty policy.
//!
//! Each level carries an integer weight (A1 = 1 … C2 = 6). A text's
//! difficulty score is the weighted mean over its classified words, and
//! [`CefrLevel::from_score`] maps that mean back onto the scale by banding
//! around each integer weight.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the six CEFR proficiency levels, easiest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CefrLevel {
    /// Breakthrough.
    #[cfg_attr(feature = "clap", value(name = "A1", alias = "a1"))]
    #[serde(alias = "a1")]
    A1,
    /// Waystage.
    #[cfg_attr(feature = "clap", value(name = "A2", alias = "a2"))]
    #[serde(alias = "a2")]
    A2,
    /// Threshold.
    #[cfg_attr(feature = "clap", value(name = "B1", alias = "b1"))]
    #[serde(alias = "b1")]
    B1,
    /// Vantage.
    #[cfg_attr(feature = "clap", value(name = "B2", alias = "b2"))]
    #[serde(alias = "b2")]
    B2,
    /// Effective operational proficiency.
    #[cfg_attr(feature = "clap", value(name = "C1", alias = "c1"))]
    #[serde(alias = "c1")]
    C1,
    /// Mastery.
    #[cfg_attr(feature = "clap", value(name = "C2", alias = "c2"))]
    #[serde(alias = "c2")]
    C2,
}

impl CefrLevel {
    /// All levels in ascending order of difficulty.
    pub const ALL: [Self; 6] = [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1, Self::C2];

    /// Returns the level label (`"A1"` … `"C2"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }

    /// Integer weight used by the difficulty score.
    pub const fn weight(&self) -> u32 {
        match self {
            Self::A1 => 1,
            Self::A2 => 2,
            Self::B1 => 3,
            Self::B2 => 4,
            Self::C1 => 5,
            Self::C2 => 6,
        }
    }

    /// Position in [`CefrLevel::ALL`].
    pub const fn index(&self) -> usize {
        self.weight() as usize - 1
    }

    /// Parse a lexicon level label.
    ///
    /// The label is trimmed and uppercased first. Returns `None` for anything
    /// outside A1..C2, including the empty string.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            "B2" => Some(Self::B2),
            "C1" => Some(Self::C1),
            "C2" => Some(Self::C2),
            _ => None,
        }
    }

    /// Map a difficulty score onto the scale.
    ///
    /// Intervals are half-open with an inclusive lower bound:
    /// `< 1.5` A1, `< 2.5` A2, `< 3.5` B1, `< 4.5` B2, `< 5.5` C1, else C2.
    pub fn from_score(score: f64) -> Self {
        if score < 1.5 {
            Self::A1
        } else if score < 2.5 {
            Self::A2
        } else if score < 3.5 {
            Self::B1
        } else if score < 4.5 {
            Self::B2
        } else if score < 5.5 {
            Self::C1
        } else {
            Self::C2
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a CEFR level label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a CEFR level: {0:?} (expected A1, A2, B1, B2, C1 or C2)")]
pub struct ParseLevelError(pub String);

impl FromStr for CefrLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ParseLevelError(s.to_string()))
    }
}
