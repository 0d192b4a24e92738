//! Numeric filière/classe codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A numeric code read from a student's groups cell.
///
/// Codes are compared as integers only; a code carries no kind until it is
/// looked up in a taxonomy registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(pub u64);

impl Code {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parse a run of ASCII digits, saturating at `u64::MAX`.
    ///
    /// Saturated values are never registry codes, so they always classify
    /// as unknown while still occupying their slot in the extracted sequence.
    pub fn from_digits(digits: &str) -> Self {
        let mut value: u64 = 0;
        for byte in digits.bytes() {
            let digit = u64::from(byte.wrapping_sub(b'0'));
            value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(next) => next,
                None => return Self(u64::MAX),
            };
        }
        Self(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Code {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for Code {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ModelError::InvalidCode {
                value: s.to_string(),
            })
    }
}

/// The two kinds of registered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Filiere,
    Classe,
}

impl CodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Filiere => "Filière",
            Self::Classe => "Classe",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digits_parses_plain_runs() {
        assert_eq!(Code::from_digits("5016"), Code(5016));
        assert_eq!(Code::from_digits("007"), Code(7));
    }

    #[test]
    fn from_digits_saturates_on_overflow() {
        assert_eq!(Code::from_digits("99999999999999999999999"), Code(u64::MAX));
    }

    #[test]
    fn from_str_rejects_non_numeric() {
        assert!("59a".parse::<Code>().is_err());
        assert_eq!(" 5944 ".parse::<Code>(), Ok(Code(5944)));
    }
}
