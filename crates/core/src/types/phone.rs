//! WhatsApp phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("phone number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that is not valid in a phone number.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// The input does not contain enough digits.
    #[error("phone number must contain at least {min} digits")]
    TooFewDigits {
        /// Minimum number of digits.
        min: usize,
    },
}

/// A WhatsApp phone number.
///
/// The number is stored as received (after trimming), since it doubles as the
/// contact identifier on the messaging channel. Validation only checks shape:
/// digits with optional `+` prefix and common separators.
///
/// ## Examples
///
/// ```
/// use dona_oferta_core::Phone;
///
/// assert!(Phone::parse("+5511999998888").is_ok());
/// assert!(Phone::parse("(11) 99999-8888").is_ok());
///
/// assert!(Phone::parse("").is_err());          // empty
/// assert!(Phone::parse("not a phone").is_err()); // letters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum length of a phone number.
    pub const MAX_LENGTH: usize = 20;

    /// Minimum number of digits a phone number must contain.
    pub const MIN_DIGITS: usize = 8;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty (after trimming)
    /// - Is longer than 20 characters
    /// - Contains characters other than digits, `+`, `-`, `(`, `)` or spaces
    /// - Contains fewer than 8 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(PhoneError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        for c in trimmed.chars() {
            if !c.is_ascii_digit() && !matches!(c, '+' | '-' | '(' | ')' | ' ') {
                return Err(PhoneError::InvalidCharacter(c));
            }
        }

        let digits = trimmed.chars().filter(char::is_ascii_digit).count();
        if digits < Self::MIN_DIGITS {
            return Err(PhoneError::TooFewDigits {
                min: Self::MIN_DIGITS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
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

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_phones() {
        assert!(Phone::parse("+5511999998888").is_ok());
        assert!(Phone::parse("5511999998888").is_ok());
        assert!(Phone::parse("(11) 99999-8888").is_ok());
        assert!(Phone::parse("11 3333-4444").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let phone = Phone::parse("  +5511999998888  ").unwrap();
        assert_eq!(phone.as_str(), "+5511999998888");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(Phone::parse("   "), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "9".repeat(21);
        assert!(matches!(
            Phone::parse(&long),
            Err(PhoneError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Phone::parse("abc1234567"),
            Err(PhoneError::InvalidCharacter('a'))
        ));
    }

    #[test]
    fn test_parse_too_few_digits() {
        assert!(matches!(
            Phone::parse("+55 11"),
            Err(PhoneError::TooFewDigits { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("+5511999998888").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+5511999998888\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
