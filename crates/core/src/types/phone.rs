//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("phone number must be at most {max} digits")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a non-digit character.
    #[error("phone number must contain only digits")]
    NonNumeric,
}

/// A customer phone number.
///
/// The marketplace validates phone numbers only for presence and numeric
/// content (checkout and registration both accept any digit string); no
/// country-code or carrier validation happens client-side.
///
/// ## Constraints
///
/// - 1-15 digits (ITU-T E.164 limit)
/// - Digits only; a single leading `+` is accepted and stripped
///
/// ## Examples
///
/// ```
/// use mboa_market_core::Phone;
///
/// assert!(Phone::parse("675123456").is_ok());
/// assert!(Phone::parse("+237675123456").is_ok());
///
/// assert!(Phone::parse("").is_err());          // empty
/// assert!(Phone::parse("67 51 23").is_err());  // spaces are not digits
/// assert!(Phone::parse("six-seven").is_err()); // not numeric
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum number of digits (ITU-T E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 15 digits, or
    /// contains anything other than digits (after an optional leading `+`).
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits = s.strip_prefix('+').unwrap_or(s);

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NonNumeric);
        }

        Ok(Self(digits.to_owned()))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
