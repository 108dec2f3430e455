//! # Draft Order Builder
//!
//! Accumulates scanned items into a draft consignment order, enforcing stock
//! and pricing rules, and computes order-level aggregates.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Builder Operations                             │
//! │                                                                         │
//! │  Frontend Action          Core Call                Draft State Change   │
//! │  ───────────────          ─────────                ──────────────────   │
//! │                                                                         │
//! │  Scan barcode ───────────► add_product() ────────► merge or append      │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ────────► drop matching line   │
//! │                                                                         │
//! │  Any change ─────────────► totals() ─────────────► (read only)          │
//! │                                                                         │
//! │  Click Create ───────────► submit() ─────────────► ConsignmentOrder     │
//! │                                                      (status: pending)  │
//! │                                                                         │
//! │  NOTE: stock is checked but NOT decremented here. Stock only moves     │
//! │        at an actual sale, which is outside the consignment core.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{ConsignmentOrder, LineItem, OrderStatus, OrderTotals, Product};
use crate::validation::{validate_quantity, validate_required};
use crate::{MAX_DRAFT_ITEMS, SETTLEMENT_TERM_DAYS};

// =============================================================================
// Totals
// =============================================================================

/// Computes order-level aggregates from a list of line items.
///
/// Pure and idempotent: calling it twice on the same list yields identical
/// results, and stored totals on an order must always equal a recomputation.
///
/// - `total_value_cents = Σ quantity × unit_price`
/// - `total_items = Σ quantity`
/// - `category_counts` accumulates quantity per category
pub fn compute_totals(items: &[LineItem]) -> OrderTotals {
    let mut category_counts: BTreeMap<_, i64> = BTreeMap::new();
    for item in items {
        *category_counts.entry(item.category).or_insert(0) += item.quantity;
    }

    OrderTotals {
        total_value_cents: items.iter().map(|i| i.line_total().cents()).sum(),
        total_items: items.iter().map(|i| i.quantity).sum(),
        category_counts,
    }
}

// =============================================================================
// New Order Form
// =============================================================================

/// The settlement date offered by default when opening the form:
/// order date + 30 days.
pub fn default_settlement_date(order_date: NaiveDate) -> NaiveDate {
    order_date + Duration::days(SETTLEMENT_TERM_DAYS)
}

/// The typed form payload for creating (or editing) a consignment order.
///
/// Replaces the untyped form blobs the dashboard used to pass around; every
/// field is validated before it reaches the builder.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderForm {
    /// Name of the user creating the order.
    pub created_by: String,

    /// Selected seller id.
    pub seller_id: String,

    /// When the goods leave the store.
    #[ts(as = "String")]
    pub order_date: NaiveDate,

    /// Agreed settlement date.
    #[ts(as = "String")]
    pub settlement_date: NaiveDate,
}

impl NewOrderForm {
    /// Validates required fields, returning trimmed copies.
    fn validated(&self) -> CoreResult<(String, String)> {
        let created_by = validate_required("createdBy", &self.created_by)?;
        let seller_id = validate_required("sellerId", &self.seller_id)?;
        Ok((created_by, seller_id))
    }
}

// =============================================================================
// Draft Order
// =============================================================================

/// A draft consignment order being assembled on the order form.
///
/// ## Invariants
/// - Lines are unique by barcode (adding the same product merges quantities)
/// - Every line quantity is > 0
/// - At most MAX_DRAFT_ITEMS distinct lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrder {
    items: Vec<LineItem>,
}

impl DraftOrder {
    /// Creates a new empty draft.
    pub fn new() -> Self {
        DraftOrder { items: Vec::new() }
    }

    /// Reopens a pending order for editing, seeding the draft with its items.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        DraftOrder { items }
    }

    /// The current line items.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Checks if the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a resolved product to the draft.
    ///
    /// ## Behavior
    /// - `quantity` must be positive and within the per-line maximum
    /// - Fails with `InsufficientStock` (carrying the available quantity)
    ///   when the requested quantity exceeds current stock; the draft is
    ///   left unchanged
    /// - Unit price is the consignment price, `(raw + plating) × 2`,
    ///   frozen at add time, never recomputed
    /// - If a line with the same barcode exists, its quantity is
    ///   incremented; otherwise a new line is appended
    ///
    /// ## Returns
    /// The resulting line item (for the "last added" UI feedback card).
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<LineItem> {
        validate_quantity(quantity)?;

        if !product.has_stock(quantity) {
            return Err(CoreError::InsufficientStock {
                barcode: product.barcode.clone(),
                available: product.stock_quantity,
                requested: quantity,
            });
        }

        // Merge with an existing line for the same barcode
        if let Some(item) = self.items.iter_mut().find(|i| i.barcode == product.barcode) {
            item.quantity += quantity;
            return Ok(item.clone());
        }

        if self.items.len() >= MAX_DRAFT_ITEMS {
            return Err(CoreError::DraftTooLarge {
                max: MAX_DRAFT_ITEMS,
            });
        }

        let item = LineItem {
            product_id: product.id.clone(),
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            category: product.category,
            quantity,
            unit_price_cents: product.consignment_price().cents(),
            image_url: product.image_url.clone(),
        };
        self.items.push(item.clone());

        Ok(item)
    }

    /// Removes the line matching the barcode. No-op if absent.
    pub fn remove_item(&mut self, barcode: &str) {
        let barcode = barcode.trim();
        self.items.retain(|i| i.barcode != barcode);
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Current aggregates, recomputed from the lines.
    pub fn totals(&self) -> OrderTotals {
        compute_totals(&self.items)
    }

    /// Finalizes the draft into a pending consignment order.
    ///
    /// ## Rules
    /// - The draft must contain at least one line (`EmptyOrder`)
    /// - `created_by` and `seller_id` must be present (`Required`)
    /// - Totals are frozen via [`compute_totals`]
    ///
    /// `seller_name` is resolved by the caller from the seller directory and
    /// denormalized onto the order for list display. The store assigns the
    /// definitive id on `create`.
    pub fn submit(self, form: &NewOrderForm, seller_name: &str) -> CoreResult<ConsignmentOrder> {
        let (created_by, seller_id) = form.validated()?;

        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        let totals = compute_totals(&self.items);
        let now = Utc::now();

        Ok(ConsignmentOrder {
            id: uuid::Uuid::new_v4().to_string(),
            created_by,
            seller_id,
            seller_name: seller_name.to_string(),
            order_date: form.order_date,
            settlement_date: form.settlement_date,
            items: self.items,
            total_value_cents: totals.total_value_cents,
            total_items: totals.total_items,
            category_counts: totals.category_counts,
            status: OrderStatus::Pending,
            settlement_details: None,
            created_at: now,
            updated_at: now,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn product(barcode: &str, category: Category, raw: i64, plating: i64, stock: i64) -> Product {
        Product {
            id: format!("id-{}", barcode),
            barcode: barcode.to_string(),
            name: format!("Produto {}", barcode),
            description: None,
            category,
            subcategory: None,
            raw_cost_cents: raw,
            plating_cost_cents: plating,
            stock_quantity: stock,
            min_stock_quantity: 1,
            stock_location: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn form() -> NewOrderForm {
        let order_date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        NewOrderForm {
            created_by: "Jane Doe".to_string(),
            seller_id: "2".to_string(),
            order_date,
            settlement_date: default_settlement_date(order_date),
        }
    }

    #[test]
    fn test_add_product_freezes_consignment_price() {
        let mut draft = DraftOrder::new();
        // raw 250.00 + plating 50.00 → unit 600.00
        let product = product("12345678", Category::Aneis, 25000, 5000, 5);

        let item = draft.add_product(&product, 2).unwrap();

        assert_eq!(item.unit_price_cents, 60000);
        assert_eq!(item.quantity, 2);
        assert_eq!(draft.totals().total_value_cents, 120000);
    }

    #[test]
    fn test_add_same_barcode_merges_quantity() {
        let mut draft = DraftOrder::new();
        let product = product("12345678", Category::Aneis, 25000, 5000, 10);

        draft.add_product(&product, 2).unwrap();
        let merged = draft.add_product(&product, 3).unwrap();

        assert_eq!(draft.items().len(), 1); // one line, not two
        assert_eq!(merged.quantity, 5);
        assert_eq!(draft.totals().total_items, 5);
    }

    #[test]
    fn test_insufficient_stock_leaves_draft_unchanged() {
        let mut draft = DraftOrder::new();
        let product = product("12345678", Category::Aneis, 25000, 5000, 3);

        let err = draft.add_product(&product, 4).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 3);
                assert_eq!(requested, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(draft.is_empty());
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let mut draft = DraftOrder::new();
        let product = product("12345678", Category::Aneis, 25000, 5000, 5);

        assert!(draft.add_product(&product, 0).is_err());
        assert!(draft.add_product(&product, -2).is_err());
        assert!(draft.is_empty());
    }

    #[test]
    fn test_remove_item_is_noop_when_absent() {
        let mut draft = DraftOrder::new();
        let product = product("12345678", Category::Aneis, 25000, 5000, 5);
        draft.add_product(&product, 1).unwrap();

        draft.remove_item("99999999"); // silent no-op
        assert_eq!(draft.items().len(), 1);

        draft.remove_item("12345678");
        assert!(draft.is_empty());
    }

    #[test]
    fn test_compute_totals_across_categories() {
        let mut draft = DraftOrder::new();
        draft
            .add_product(&product("11111111", Category::Aneis, 10000, 2000, 9), 2)
            .unwrap();
        draft
            .add_product(&product("22222222", Category::Brincos, 9000, 2000, 9), 5)
            .unwrap();
        draft
            .add_product(&product("33333333", Category::Aneis, 6000, 1500, 9), 1)
            .unwrap();

        let totals = draft.totals();
        assert_eq!(totals.total_items, 8);
        // 2×240.00 + 5×220.00 + 1×150.00 = 1730.00
        assert_eq!(totals.total_value_cents, 173000);
        assert_eq!(totals.category_counts[&Category::Aneis], 3);
        assert_eq!(totals.category_counts[&Category::Brincos], 5);
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let mut draft = DraftOrder::new();
        draft
            .add_product(&product("11111111", Category::Colares, 12000, 3000, 9), 4)
            .unwrap();

        assert_eq!(draft.totals(), draft.totals());
    }

    #[test]
    fn test_submit_requires_items_and_fields() {
        let draft = DraftOrder::new();
        assert!(matches!(
            draft.submit(&form(), "Carla Souza"),
            Err(CoreError::EmptyOrder)
        ));

        let mut draft = DraftOrder::new();
        draft
            .add_product(&product("12345678", Category::Aneis, 25000, 5000, 5), 1)
            .unwrap();
        let mut bad_form = form();
        bad_form.created_by = "   ".to_string();
        assert!(draft.submit(&bad_form, "Carla Souza").is_err());
    }

    #[test]
    fn test_submit_freezes_totals_and_status() {
        let mut draft = DraftOrder::new();
        let product = product("12345678", Category::Aneis, 25000, 5000, 5);
        draft.add_product(&product, 2).unwrap();

        let order = draft.submit(&form(), "Carla Souza").unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_value_cents, 120000);
        assert_eq!(order.total_items, 2);
        assert_eq!(order.category_counts[&Category::Aneis], 2);
        assert_eq!(order.seller_name, "Carla Souza");
        assert!(order.settlement_details.is_none());
        assert!(!order.id.is_empty());
    }

    #[test]
    fn test_default_settlement_date_is_thirty_days_out() {
        let order_date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        assert_eq!(
            default_settlement_date(order_date),
            NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
        );
    }
}
