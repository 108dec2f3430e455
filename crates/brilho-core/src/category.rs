//! # Product Categories
//!
//! The jewelry category vocabulary is closed: category codes arriving from
//! forms, scanners, or imports are parsed through [`Category::from_code`] and
//! unknown codes are rejected at the boundary instead of being carried
//! through as raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

/// A jewelry product category.
///
/// Serialized using the short lowercase codes stored in the database
/// (`"aneis"`, `"brincos"`, ...); [`Category::label`] provides the
/// display name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Anéis (rings).
    Aneis,
    /// Brincos (earrings).
    Brincos,
    /// Colares (necklaces).
    Colares,
    /// Pulseiras (bracelets).
    Pulseiras,
    /// Pingentes (pendants).
    Pingentes,
    /// Relógios (watches).
    Relogios,
}

impl Category {
    /// All known categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Aneis,
        Category::Brincos,
        Category::Colares,
        Category::Pulseiras,
        Category::Pingentes,
        Category::Relogios,
    ];

    /// Parses a category code.
    ///
    /// ## Example
    /// ```rust
    /// use brilho_core::category::Category;
    ///
    /// assert_eq!(Category::from_code("aneis").unwrap(), Category::Aneis);
    /// assert!(Category::from_code("tiaras").is_err());
    /// ```
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code.trim() {
            "aneis" => Ok(Category::Aneis),
            "brincos" => Ok(Category::Brincos),
            "colares" => Ok(Category::Colares),
            "pulseiras" => Ok(Category::Pulseiras),
            "pingentes" => Ok(Category::Pingentes),
            "relogios" => Ok(Category::Relogios),
            other => Err(ValidationError::UnknownCategory {
                code: other.to_string(),
            }),
        }
    }

    /// The short code stored in the database and sent over the wire.
    pub const fn code(&self) -> &'static str {
        match self {
            Category::Aneis => "aneis",
            Category::Brincos => "brincos",
            Category::Colares => "colares",
            Category::Pulseiras => "pulseiras",
            Category::Pingentes => "pingentes",
            Category::Relogios => "relogios",
        }
    }

    /// Human-readable display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Aneis => "Anéis",
            Category::Brincos => "Brincos",
            Category::Colares => "Colares",
            Category::Pulseiras => "Pulseiras",
            Category::Pingentes => "Pingentes",
            Category::Relogios => "Relógios",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_code(category.code()).unwrap(), category);
        }
    }

    #[test]
    fn test_from_code_trims() {
        assert_eq!(Category::from_code(" colares ").unwrap(), Category::Colares);
    }

    #[test]
    fn test_unknown_code_rejected() {
        let err = Category::from_code("tiaras").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory { .. }));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::Aneis.label(), "Anéis");
        assert_eq!(Category::Relogios.label(), "Relógios");
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Category::Pulseiras).unwrap();
        assert_eq!(json, "\"pulseiras\"");

        let parsed: Category = serde_json::from_str("\"brincos\"").unwrap();
        assert_eq!(parsed, Category::Brincos);
    }
}
