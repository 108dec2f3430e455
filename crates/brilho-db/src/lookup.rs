//! # Catalog Lookup
//!
//! Two-tier barcode resolution for the order form.
//!
//! ## Lookup Tiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Two-Tier Barcode Resolution                           │
//! │                                                                         │
//! │  Scanner emits barcode                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tier 1: local snapshot (brilho_core::catalog, synchronous)            │
//! │       │                                                                 │
//! │       ├── hit ──► Product (no database round trip)                     │
//! │       │                                                                 │
//! │       ▼ miss                                                            │
//! │  Tier 2: products table (ProductRepository, async)                     │
//! │       │                                                                 │
//! │       ├── hit ──► Product                                              │
//! │       │                                                                 │
//! │       ▼ miss                                                            │
//! │  DbError::NotFound: surfaced as "product not found", no retry,         │
//! │  and the draft is never touched                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use brilho_core::{catalog, validation, Product};

/// How many products the snapshot holds; a small jewelry catalog fits
/// comfortably, larger ones fall through to the database tier.
pub const SNAPSHOT_LIMIT: u32 = 1000;

/// Resolves scanned barcodes against a local catalog snapshot, falling back
/// to the database on a miss.
///
/// ## Usage
/// ```rust,ignore
/// let mut lookup = CatalogLookup::new(db.products());
/// lookup.refresh().await?;
///
/// let product = lookup.find_by_barcode("12345678").await?;
/// draft.add_product(&product, quantity)?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogLookup {
    snapshot: Vec<Product>,
    products: ProductRepository,
}

impl CatalogLookup {
    /// Creates a lookup with an empty snapshot. Every barcode resolves
    /// through the database until [`refresh`] is called.
    ///
    /// [`refresh`]: CatalogLookup::refresh
    pub fn new(products: ProductRepository) -> Self {
        CatalogLookup {
            snapshot: Vec::new(),
            products,
        }
    }

    /// Reloads the snapshot from the products table.
    ///
    /// ## Returns
    /// The number of products now held locally.
    pub async fn refresh(&mut self) -> DbResult<usize> {
        self.snapshot = self.products.list(SNAPSHOT_LIMIT).await?;
        debug!(count = self.snapshot.len(), "Catalog snapshot refreshed");
        Ok(self.snapshot.len())
    }

    /// The current local snapshot.
    pub fn snapshot(&self) -> &[Product] {
        &self.snapshot
    }

    /// Resolves a barcode: local snapshot first, then the database.
    ///
    /// Empty or oversized input is rejected as `DbError::Validation`
    /// before either tier is consulted. This is the only async step in an
    /// add-item flow, and it completes before any draft mutation. A miss
    /// in both tiers is a hard `DbError::NotFound`; nothing is retried.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Product> {
        let trimmed = validation::validate_barcode(barcode).map_err(DbError::Validation)?;

        if let Some(product) = catalog::find_by_barcode(&trimmed, &self.snapshot) {
            debug!(barcode = %trimmed, "Barcode resolved from snapshot");
            return Ok(product.clone());
        }

        debug!(barcode = %trimmed, "Snapshot miss, querying database");
        self.products
            .get_by_barcode(&trimmed)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &trimmed))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
