use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BingoError;

/// A CSS colour as typed by the user: a colour name or `#rgb` / `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour(String);

impl Colour {
    pub fn as_css(&self) -> &str {
        &self.0
    }

    /// The form used in file names: upper-case, without the leading `#`.
    pub fn file_tag(&self) -> String {
        self.0.trim_start_matches('#').to_ascii_uppercase()
    }
}

impl FromStr for Colour {
    type Err = BingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = match s.strip_prefix('#') {
            Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()),
        };
        if !valid {
            return Err(BingoError::config(format!(
                "invalid colour '{s}': use a CSS colour name or #rrggbb"
            )));
        }
        Ok(Colour(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Colour {
    type Error = BingoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.0
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn blue() -> Colour {
    Colour("blue".to_string())
}

pub fn red() -> Colour {
    Colour("red".to_string())
}
