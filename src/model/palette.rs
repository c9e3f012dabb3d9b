//! Enumerated palettes used by `Person`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DbError, Result};

/// Eye and hair color palette, in declaration order.
///
/// The declaration order is significant: `filter_less_than_hair_color`
/// compares colors by their position here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    White,
    Brown,
}

impl Color {
    /// All colors in declaration order
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::White,
        Color::Brown,
    ];

    /// Position of the color in the palette (0-based)
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Upper-case name used on the console
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Yellow => "YELLOW",
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
            Color::White => "WHITE",
            Color::Brown => "BROWN",
        }
    }

    /// "RED, YELLOW, ..." hint for prompts
    pub fn list_values() -> String {
        Self::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| DbError::Validation(format!("Unknown color: {}", s.trim())))
    }
}

/// Nationality palette, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    India,
    Vatican,
    SouthKorea,
}

impl Country {
    pub const ALL: [Country; 3] = [Country::India, Country::Vatican, Country::SouthKorea];

    pub fn name(self) -> &'static str {
        match self {
            Country::India => "INDIA",
            Country::Vatican => "VATICAN",
            Country::SouthKorea => "SOUTH_KOREA",
        }
    }

    pub fn list_values() -> String {
        Self::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| DbError::Validation(format!("Unknown country: {}", s.trim())))
    }
}
