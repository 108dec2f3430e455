//! # Product Repository
//!
//! Database operations for the jewelry catalog.
//!
//! ## Key Operations
//! - Barcode lookup (the database tier of the catalog lookup)
//! - Listing for the catalog snapshot
//! - Stock adjustments
//!
//! ## Barcode Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How Barcode Lookup Works                               │
//! │                                                                         │
//! │  Scanner emits: "12345678"                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Exact match against the UNIQUE barcode column                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ products                                 │                           │
//! │  │                                          │                           │
//! │  │ 12345678 | Anel Solitário Diamante  ... │ ← MATCH!                  │
//! │  │ 23456789 | Brinco Argola Ouro       ... │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Some(product) / None (no prefix matching, no LIKE)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use brilho_core::{Category, Product};

/// Raw row shape for the `products` table.
///
/// Enum-coded columns come back as TEXT and are validated in
/// [`ProductRow::into_domain`]; a bad code is corrupt data, not user error.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    barcode: String,
    name: String,
    description: Option<String>,
    category: String,
    subcategory: Option<String>,
    raw_cost_cents: i64,
    plating_cost_cents: i64,
    stock_quantity: i64,
    min_stock_quantity: i64,
    stock_location: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_domain(self) -> DbResult<Product> {
        Ok(Product {
            id: self.id,
            barcode: self.barcode,
            name: self.name,
            description: self.description,
            category: Category::from_code(&self.category)?,
            subcategory: self.subcategory,
            raw_cost_cents: self.raw_cost_cents,
            plating_cost_cents: self.plating_cost_cents,
            stock_quantity: self.stock_quantity,
            min_stock_quantity: self.min_stock_quantity,
            stock_location: self.stock_location,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, barcode, name, description, category, subcategory, \
     raw_cost_cents, plating_cost_cents, stock_quantity, min_stock_quantity, \
     stock_location, image_url, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Barcode lookup (scanner input)
/// let product = repo.get_by_barcode("12345678").await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its barcode.
    ///
    /// The input is trimmed; matching is exact equality against the UNIQUE
    /// barcode column. An empty barcode short-circuits to `None`.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product with that barcode
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Ok(None);
        }

        debug!(barcode = %barcode, "Looking up product by barcode");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProductRow::into_domain).transpose()
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProductRow::into_domain).transpose()
    }

    /// Lists products ordered by name.
    ///
    /// ## Usage
    /// Loads the catalog snapshot held by the lookup layer and the
    /// product pickers.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name LIMIT ?1");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ProductRow::into_domain).collect()
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Insert successful
    /// * `Err(DbError::UniqueViolation)` - Barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(barcode = %product.barcode, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, barcode, name, description, category, subcategory,
                raw_cost_cents, plating_cost_cents,
                stock_quantity, min_stock_quantity, stock_location,
                image_url, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13, ?14
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category.code())
        .bind(&product.subcategory)
        .bind(product.raw_cost_cents)
        .bind(product.plating_cost_cents)
        .bind(product.stock_quantity)
        .bind(product.min_stock_quantity)
        .bind(&product.stock_location)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Adjusts product stock by a delta.
    ///
    /// ## Delta Pattern
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │                    Stock Update Strategy                            │
    /// │                                                                     │
    /// │  ❌ WRONG: Absolute update (races with concurrent writers)         │
    /// │     UPDATE products SET stock_quantity = 7 WHERE id = ?            │
    /// │                                                                     │
    /// │  ✅ CORRECT: Delta update                                          │
    /// │     UPDATE products SET stock_quantity = stock_quantity - 3        │
    /// │                                                                     │
    /// │  The CHECK (stock_quantity >= 0) constraint rejects a delta        │
    /// │  that would drive stock negative.                                  │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for goods leaving, positive for restocking)
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                stock_quantity = stock_quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
