//! Postal code (CEP) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PostalCodeError {
    /// The input contains no digits at all.
    #[error("postal code must contain digits")]
    NoDigits,
    /// The digits do not form a valid CEP.
    #[error("postal code out of range: {0}")]
    OutOfRange(u64),
}

/// A Brazilian postal code (CEP), held as its numeric value.
///
/// Supermarket coverage areas are expressed as inclusive numeric CEP ranges,
/// so the code is compared as an integer. Parsing strips every non-digit
/// character first, which accepts both `"02010000"` and `"02010-000"`.
///
/// ## Examples
///
/// ```
/// use dona_oferta_core::PostalCode;
///
/// let cep = PostalCode::parse("02010-000").unwrap();
/// assert_eq!(cep.as_i32(), 2_010_000);
/// assert_eq!(cep.to_string(), "02010000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(i32);

impl PostalCode {
    /// Largest value a CEP can take (eight digits).
    pub const MAX: i32 = 99_999_999;

    /// Parse a `PostalCode` from a string, stripping non-digit characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains no digits, or if the digits
    /// exceed the eight-digit CEP range.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PostalCodeError::NoDigits);
        }

        let value: u64 = digits
            .parse()
            .map_err(|_| PostalCodeError::OutOfRange(u64::MAX))?;

        let code = i32::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .ok_or(PostalCodeError::OutOfRange(value))?;

        Ok(Self(code))
    }

    /// Get the numeric value of the postal code.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // CEPs are always written with eight digits, leading zeros included
        write!(f, "{:08}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<PostalCode> for i32 {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PostalCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PostalCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(v))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PostalCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        let cep = PostalCode::parse("01000000").unwrap();
        assert_eq!(cep.as_i32(), 1_000_000);
    }

    #[test]
    fn test_parse_strips_formatting() {
        let cep = PostalCode::parse("02010-000").unwrap();
        assert_eq!(cep.as_i32(), 2_010_000);

        let cep = PostalCode::parse("CEP 02010-000").unwrap();
        assert_eq!(cep.as_i32(), 2_010_000);
    }

    #[test]
    fn test_parse_no_digits() {
        assert!(matches!(
            PostalCode::parse("abc"),
            Err(PostalCodeError::NoDigits)
        ));
        assert!(matches!(
            PostalCode::parse(""),
            Err(PostalCodeError::NoDigits)
        ));
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(matches!(
            PostalCode::parse("123456789"),
            Err(PostalCodeError::OutOfRange(123_456_789))
        ));
    }

    #[test]
    fn test_display_pads_to_eight_digits() {
        let cep = PostalCode::parse("01000-000").unwrap();
        assert_eq!(cep.to_string(), "01000000");
    }

    #[test]
    fn test_serde_is_numeric() {
        let cep = PostalCode::parse("05999999").unwrap();
        assert_eq!(serde_json::to_string(&cep).unwrap(), "5999999");

        let parsed: PostalCode = serde_json::from_str("5999999").unwrap();
        assert_eq!(parsed, cep);
    }
}
