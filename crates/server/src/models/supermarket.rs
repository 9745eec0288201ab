//! Supermarket domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use dona_oferta_core::{ExtractionMode, PostalCode, SupermarketId};

/// A registered supermarket with its CEP coverage range.
///
/// The range is inclusive on both ends and compared numerically; creation and
/// edits happen through the admin CLI, not through the public API.
#[derive(Debug, Clone, Serialize)]
pub struct Supermarket {
    /// Unique supermarket ID.
    pub id: SupermarketId,
    /// Display name shown in rendered offers.
    #[serde(rename = "nome")]
    pub name: String,
    /// Region label (e.g., "Zona Norte - SP").
    #[serde(rename = "regiao")]
    pub region: String,
    /// First CEP covered, inclusive.
    #[serde(rename = "cep_faixa_inicial")]
    pub postal_range_start: i32,
    /// Last CEP covered, inclusive.
    #[serde(rename = "cep_faixa_final")]
    pub postal_range_end: i32,
    /// How offer data is obtained for this supermarket.
    #[serde(rename = "tipo_extracao")]
    pub extraction_mode: ExtractionMode,
    /// When the supermarket was registered.
    pub created_at: DateTime<Utc>,
}

impl Supermarket {
    /// Whether this supermarket's coverage range contains the postal code.
    #[must_use]
    pub const fn covers(&self, code: PostalCode) -> bool {
        self.postal_range_start <= code.as_i32() && code.as_i32() <= self.postal_range_end
    }
}

/// Data for registering a new supermarket (admin CLI).
#[derive(Debug, Clone)]
pub struct NewSupermarket {
    pub name: String,
    pub region: String,
    pub postal_range_start: i32,
    pub postal_range_end: i32,
    pub extraction_mode: ExtractionMode,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn market(start: i32, end: i32) -> Supermarket {
        Supermarket {
            id: SupermarketId::new(1),
            name: "Mercado Bom Preço".to_string(),
            region: "Centro - SP".to_string(),
            postal_range_start: start,
            postal_range_end: end,
            extraction_mode: ExtractionMode::Site,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_covers_inside_range() {
        let m = market(1_000_000, 5_999_999);
        assert!(m.covers(PostalCode::parse("02010-000").unwrap()));
    }

    #[test]
    fn test_covers_is_inclusive_on_both_ends() {
        let m = market(1_000_000, 5_999_999);
        assert!(m.covers(PostalCode::parse("01000-000").unwrap()));
        assert!(m.covers(PostalCode::parse("05999-999").unwrap()));
    }

    #[test]
    fn test_covers_outside_range() {
        let m = market(1_000_000, 5_999_999);
        assert!(!m.covers(PostalCode::parse("00999-999").unwrap()));
        assert!(!m.covers(PostalCode::parse("06000-000").unwrap()));
    }

    #[test]
    fn test_single_cep_range() {
        let m = market(2_010_000, 2_010_000);
        assert!(m.covers(PostalCode::parse("02010-000").unwrap()));
        assert!(!m.covers(PostalCode::parse("02010-001").unwrap()));
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(market(1, 2)).unwrap();
        assert!(json.get("nome").is_some());
        assert!(json.get("regiao").is_some());
        assert!(json.get("cep_faixa_inicial").is_some());
        assert!(json.get("cep_faixa_final").is_some());
        assert_eq!(json["tipo_extracao"], "site");
    }
}
