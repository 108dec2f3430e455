//! # Repository Module
//!
//! Database repository implementations for the Brilho consignment module.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Command handler                                                       │
//! │       │                                                                 │
//! │       │  db.products().get_by_barcode("12345678")                      │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_barcode(&self, barcode)                                    │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list(&self, limit)                                                │
//! │  └── adjust_stock(&self, id, delta)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database per test)                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog lookup and stock adjustments
//! - [`seller::SellerRepository`] - The seller directory
//! - [`consignment::ConsignmentRepository`] - Orders, items, settlements

pub mod consignment;
pub mod product;
pub mod seller;

/// Shared fixtures for repository tests.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, Utc};

    use brilho_core::{
        default_settlement_date, Category, ConsignmentOrder, DraftOrder, NewOrderForm, Product,
        Seller, SellerStatus,
    };

    pub fn sample_product(
        barcode: &str,
        category: Category,
        raw_cost_cents: i64,
        plating_cost_cents: i64,
        stock: i64,
    ) -> Product {
        Product {
            id: format!("id-{}", barcode),
            barcode: barcode.to_string(),
            name: format!("Produto {}", barcode),
            description: None,
            category,
            subcategory: None,
            raw_cost_cents,
            plating_cost_cents,
            stock_quantity: stock,
            min_stock_quantity: 1,
            stock_location: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn sample_seller(
        id: &str,
        name: &str,
        commission_bps: u32,
        status: SellerStatus,
    ) -> Seller {
        Seller {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            position: Some("vendedor".to_string()),
            commission_bps,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// A two-line pending order built through the draft flow.
    pub fn sample_pending_order(
        created_by: &str,
        seller_id: &str,
        seller_name: &str,
    ) -> ConsignmentOrder {
        let mut draft = DraftOrder::new();
        draft
            .add_product(&sample_product("12345678", Category::Aneis, 25000, 5000, 5), 2)
            .expect("add ring");
        draft
            .add_product(&sample_product("23456789", Category::Brincos, 9000, 2000, 8), 1)
            .expect("add earring");

        let order_date = NaiveDate::from_ymd_opt(2023, 6, 1).expect("valid date");
        let form = NewOrderForm {
            created_by: created_by.to_string(),
            seller_id: seller_id.to_string(),
            order_date,
            settlement_date: default_settlement_date(order_date),
        };
        draft.submit(&form, seller_name).expect("submit draft")
    }
}
