//! Delivery format and extraction mode enums.

use serde::{Deserialize, Deserializer, Serialize};

/// How a user wants to receive their offers.
///
/// The wire representation keeps the reference values `"Texto"` and `"PDF"`;
/// deserialization is case-insensitive so `"texto"`/`"pdf"` are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum DeliveryFormat {
    #[default]
    #[serde(rename = "Texto")]
    Text,
    #[serde(rename = "PDF")]
    Pdf,
}

impl DeliveryFormat {
    /// Parse a stored or wire value, case-insensitively.
    ///
    /// Returns `None` for anything that is not a known format; callers decide
    /// whether that is a validation failure or an unsupported-format outcome.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "texto" | "text" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Canonical stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Texto",
            Self::Pdf => "PDF",
        }
    }
}

impl std::fmt::Display for DeliveryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeliveryFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid delivery format: {s}")))
    }
}

/// How offer data is obtained for a supermarket.
///
/// `Site` supermarkets are scraped from their web pages; `Pdf` supermarkets
/// publish a flyer document, which is also registered for pdf-format users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    #[default]
    Site,
    Pdf,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Site => write!(f, "site"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

impl std::str::FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site" => Ok(Self::Site),
            "pdf" => Ok(Self::Pdf),
            _ => Err(format!("invalid extraction mode: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(DeliveryFormat::parse("Texto"), Some(DeliveryFormat::Text));
        assert_eq!(DeliveryFormat::parse("texto"), Some(DeliveryFormat::Text));
        assert_eq!(DeliveryFormat::parse("PDF"), Some(DeliveryFormat::Pdf));
        assert_eq!(DeliveryFormat::parse("pdf"), Some(DeliveryFormat::Pdf));
        assert_eq!(DeliveryFormat::parse("fax"), None);
    }

    #[test]
    fn test_serialize_uses_reference_values() {
        assert_eq!(
            serde_json::to_string(&DeliveryFormat::Text).unwrap(),
            "\"Texto\""
        );
        assert_eq!(
            serde_json::to_string(&DeliveryFormat::Pdf).unwrap(),
            "\"PDF\""
        );
    }

    #[test]
    fn test_deserialize_accepts_lowercase() {
        let f: DeliveryFormat = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(f, DeliveryFormat::Pdf);

        assert!(serde_json::from_str::<DeliveryFormat>("\"fax\"").is_err());
    }

    #[test]
    fn test_extraction_mode_from_str() {
        assert_eq!("site".parse::<ExtractionMode>(), Ok(ExtractionMode::Site));
        assert_eq!("pdf".parse::<ExtractionMode>(), Ok(ExtractionMode::Pdf));
        assert!("ftp".parse::<ExtractionMode>().is_err());
    }
}
