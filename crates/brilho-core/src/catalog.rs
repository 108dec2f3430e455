//! # Catalog Lookup
//!
//! Pure barcode lookup against an in-memory product catalog.
//!
//! This is the first tier of the two-tier lookup: the UI keeps a snapshot of
//! the catalog loaded, and only falls back to the database (see the db
//! crate's `CatalogLookup`) when the barcode is not in the snapshot.

use crate::types::Product;

/// Finds a product by barcode in a local catalog slice.
///
/// The input barcode is trimmed; comparison is exact string equality against
/// the stored (trimmed) barcodes. Read-only, no side effects.
///
/// ## Example
/// ```rust,ignore
/// if let Some(product) = find_by_barcode(" 12345678 ", &catalog) {
///     draft.add_product(product, quantity)?;
/// }
/// ```
pub fn find_by_barcode<'a>(barcode: &str, catalog: &'a [Product]) -> Option<&'a Product> {
    let barcode = barcode.trim();
    if barcode.is_empty() {
        return None;
    }

    catalog.iter().find(|p| p.barcode.trim() == barcode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use chrono::Utc;

    fn product(barcode: &str) -> Product {
        Product {
            id: format!("id-{}", barcode),
            barcode: barcode.to_string(),
            name: format!("Produto {}", barcode),
            description: None,
            category: Category::Aneis,
            subcategory: None,
            raw_cost_cents: 10000,
            plating_cost_cents: 2000,
            stock_quantity: 3,
            min_stock_quantity: 1,
            stock_location: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_exact_match() {
        let catalog = vec![product("12345678"), product("23456789")];

        let found = find_by_barcode("23456789", &catalog).unwrap();
        assert_eq!(found.barcode, "23456789");
    }

    #[test]
    fn test_input_is_trimmed() {
        let catalog = vec![product("12345678")];
        assert!(find_by_barcode("  12345678  ", &catalog).is_some());
    }

    #[test]
    fn test_miss_and_empty() {
        let catalog = vec![product("12345678")];
        assert!(find_by_barcode("99999999", &catalog).is_none());
        assert!(find_by_barcode("   ", &catalog).is_none());
        // No prefix matching: exact equality only
        assert!(find_by_barcode("1234", &catalog).is_none());
    }
}
