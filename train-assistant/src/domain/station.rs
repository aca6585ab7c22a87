//! Station code types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A canonical station code, e.g. `NDLS` or `MAS`.
///
/// Codes are non-empty runs of uppercase ASCII letters and digits. Any
/// `StationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use train_assistant::domain::StationCode;
///
/// let ndls = StationCode::parse("NDLS").unwrap();
/// assert_eq!(ndls.as_str(), "NDLS");
///
/// // Lowercase is rejected by `parse`...
/// assert!(StationCode::parse("ndls").is_err());
///
/// // ...but accepted by `parse_normalized`.
/// assert_eq!(StationCode::parse_normalized(" ndls ").unwrap(), ndls);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code from an already-canonical string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        if s.is_empty() {
            return Err(InvalidStationCode {
                reason: "must not be empty",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidStationCode {
                reason: "must be uppercase ASCII letters or digits",
            });
        }

        Ok(StationCode(s.to_string()))
    }

    /// Parse a station code after trimming, stripping quotes and uppercasing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| *c != '\'' && *c != '"')
            .collect::<String>()
            .to_uppercase();
        Self::parse(&cleaned)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z0-9]{1,8}") {
            let code = StationCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Normalizing any case variant yields the same code
        #[test]
        fn normalization_is_case_insensitive(s in "[a-zA-Z]{1,8}") {
            let a = StationCode::parse_normalized(&s).unwrap();
            let b = StationCode::parse_normalized(&s.to_uppercase()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
