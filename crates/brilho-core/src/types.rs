//! # Domain Types
//!
//! Core domain types for the consignment module.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌───────────────────┐    │
//! │  │    Product      │   │ ConsignmentOrder │   │ SettlementDetails │    │
//! │  │  ─────────────  │   │  ──────────────  │   │  ───────────────  │    │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  settled_by       │    │
//! │  │  barcode        │   │  status          │   │  commission_bps   │    │
//! │  │  raw_cost_cents │   │  items[]         │   │  payment_method   │    │
//! │  │  stock_quantity │   │  total_value     │   │  returned_items[] │    │
//! │  └─────────────────┘   └──────────────────┘   └───────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │   OrderStatus   │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  barcode        │   │  Pending        │   │  Cash           │       │
//! │  │  quantity       │   │  Settled        │   │  Pix            │       │
//! │  │  unit_price     │   │  Canceled       │   │  CreditCard ... │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` freezes the product's name, category, and derived unit price
//! at the moment it is added to a draft. Later catalog edits never rewrite
//! the history of an order.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::Category;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the jewelry catalog. Read-only to the consignment core.
///
/// Invariant: `stock_quantity >= 0`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode - unique, fixed-length numeric string (e.g., "12345678").
    pub barcode: String,

    /// Display name.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Jewelry category.
    pub category: Category,

    /// Free-form subcategory code (e.g., "solitario", "argola").
    pub subcategory: Option<String>,

    /// Raw material cost in centavos.
    pub raw_cost_cents: i64,

    /// Plating/finishing cost in centavos.
    pub plating_cost_cents: i64,

    /// Current stock level.
    pub stock_quantity: i64,

    /// Minimum stock level before a restock alert.
    pub min_stock_quantity: i64,

    /// Physical location in the store (e.g., "Vitrine 1, Prateleira A").
    pub stock_location: Option<String>,

    /// Product photo URL.
    pub image_url: Option<String>,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The consignment unit price: `(raw cost + plating cost) × 2`.
    ///
    /// Consigned goods are priced at cost plus 100% markup, NOT at any
    /// catalog list price. The derived price is frozen on the line item at
    /// add time and never recomputed, even if costs change later.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // raw 250.00 + plating 50.00 → unit price 600.00
    /// assert_eq!(product.consignment_price().cents(), 60000);
    /// ```
    #[inline]
    pub fn consignment_price(&self) -> Money {
        Money::from_cents((self.raw_cost_cents + self.plating_cost_cents) * 2)
    }

    /// Checks whether the requested quantity is covered by current stock.
    #[inline]
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Seller
// =============================================================================

/// Employment status of a seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SellerStatus {
    /// Actively selling.
    Active,
    /// Temporarily away.
    Vacation,
    /// No longer active.
    Inactive,
}

impl SellerStatus {
    /// The short code stored in the database.
    pub const fn code(&self) -> &'static str {
        match self {
            SellerStatus::Active => "active",
            SellerStatus::Vacation => "vacation",
            SellerStatus::Inactive => "inactive",
        }
    }

    /// Parses a stored seller status code.
    pub fn from_code(code: &str) -> Result<Self, crate::error::ValidationError> {
        match code {
            "active" => Ok(SellerStatus::Active),
            "vacation" => Ok(SellerStatus::Vacation),
            "inactive" => Ok(SellerStatus::Inactive),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "sellerStatus".to_string(),
                reason: format!("unknown seller status '{other}'"),
            }),
        }
    }
}

impl Default for SellerStatus {
    fn default() -> Self {
        SellerStatus::Active
    }
}

/// A seller who takes goods on consignment. Read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Role within the store (e.g., "vendedor", "consultor", "gerente").
    pub position: Option<String>,
    /// The seller's agreed commission rate in basis points (500 = 5%).
    /// Used to prefill the commission field on the settlement screen.
    pub commission_bps: u32,
    pub status: SellerStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a consignment order.
///
/// ## Lifecycle
/// ```text
///              ┌──────────┐  settle   ┌──────────┐
///   create ──► │ Pending  │ ────────► │ Settled  │ (terminal)
///              └────┬─────┘           └──────────┘
///                   │ cancel
///                   ▼
///              ┌──────────┐
///              │ Canceled │ (terminal)
///              └──────────┘
/// ```
/// Only pending orders may be edited, settled, canceled, or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Goods are with the seller; order may still be edited.
    Pending,
    /// Settlement completed; order is immutable history.
    Settled,
    /// Order was called off; order is immutable history.
    Canceled,
}

impl OrderStatus {
    /// The short code stored in the database.
    pub const fn code(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Settled => "settled",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Parses a stored status code.
    pub fn from_code(code: &str) -> Result<Self, crate::error::ValidationError> {
        match code {
            "pending" => Ok(OrderStatus::Pending),
            "settled" => Ok(OrderStatus::Settled),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown status code '{other}'"),
            }),
        }
    }

    /// Human-readable display label.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::Settled => "Acertado",
            OrderStatus::Canceled => "Cancelado",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the settlement payout is made to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    BankTransfer,
}

impl PaymentMethod {
    /// The short code stored in the database.
    pub const fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    /// Parses a stored payment method code.
    pub fn from_code(code: &str) -> Result<Self, crate::error::ValidationError> {
        match code {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "pix" => Ok(PaymentMethod::Pix),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "paymentMethod".to_string(),
                reason: format!("unknown payment method '{other}'"),
            }),
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A line item on a consignment order.
/// Uses snapshot pattern to freeze product data at time of adding.
///
/// Identity within an order is the barcode: an order holds at most one line
/// per barcode, and repeated adds increment the quantity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product ID (UUID).
    pub product_id: String,

    /// Barcode at time of adding (frozen).
    pub barcode: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Category at time of adding (frozen).
    pub category: Category,

    /// Quantity consigned. Always > 0 on a pending order; a settled order
    /// may carry 0 for a removed-but-partially-returned line.
    pub quantity: i64,

    /// Consignment unit price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Product photo URL (frozen).
    pub image_url: Option<String>,
}

impl LineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Order-level aggregates, always derived from the line items.
///
/// Computed by [`crate::draft::compute_totals`]; stored copies on an order
/// must never drift from what a recomputation over `items` would produce.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Σ quantity × unit price, in centavos.
    pub total_value_cents: i64,

    /// Σ quantity.
    pub total_items: i64,

    /// Quantity summed per category.
    pub category_counts: BTreeMap<Category, i64>,
}

// =============================================================================
// Settlement Details
// =============================================================================

/// A returned line recorded on a settled order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedItem {
    pub product_id: String,
    pub name: String,
    pub returned_quantity: i64,
    /// True when the whole line came back (removed, or returned in full).
    pub is_fully_returned: bool,
}

/// The outcome of a settlement, attached to the order when it is settled.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettlementDetails {
    /// Who performed the settlement.
    pub settled_by: String,

    /// Commission rate applied, in basis points.
    pub commission_bps: u32,

    /// Commission amount in centavos (= sold value × rate).
    pub commission_value_cents: i64,

    /// How the payout was made.
    pub payment_method: PaymentMethod,

    /// Every line with a return or a removal.
    pub returned_items: Vec<ReturnedItem>,
}

// =============================================================================
// Consignment Order
// =============================================================================

/// A consigned-goods order.
///
/// Created in `Pending` status by the draft builder; mutated only while
/// pending; transitions to exactly one terminal status (`Settled` via the
/// settlement engine, or `Canceled` by explicit action).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentOrder {
    /// Unique identifier (UUID v4), assigned by the order store.
    pub id: String,

    /// Name of the user who created the order.
    pub created_by: String,

    /// Seller reference.
    pub seller_id: String,

    /// Seller name, denormalized for list display.
    pub seller_name: String,

    /// When the goods left the store.
    #[ts(as = "String")]
    pub order_date: NaiveDate,

    /// Agreed (or actual, once settled) settlement date.
    #[ts(as = "String")]
    pub settlement_date: NaiveDate,

    /// Line items. See [`LineItem`] for the merge-by-barcode rule.
    pub items: Vec<LineItem>,

    /// While pending: Σ quantity × unit price.
    /// Once settled: the final post-commission payout.
    pub total_value_cents: i64,

    /// Σ quantity over `items`.
    pub total_items: i64,

    /// Quantity summed per category (zero-quantity lines excluded).
    pub category_counts: BTreeMap<Category, i64>,

    pub status: OrderStatus,

    /// Present only on settled orders.
    pub settlement_details: Option<SettlementDetails>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ConsignmentOrder {
    /// Whether the order can still be edited, settled, canceled, or deleted.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Total value as Money.
    #[inline]
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "1".to_string(),
            barcode: "12345678".to_string(),
            name: "Anel Solitário Diamante".to_string(),
            description: None,
            category: Category::Aneis,
            subcategory: Some("solitario".to_string()),
            raw_cost_cents: 25000,
            plating_cost_cents: 5000,
            stock_quantity: 5,
            min_stock_quantity: 2,
            stock_location: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_consignment_price_is_cost_plus_full_markup() {
        // raw 250.00 + plating 50.00 = 300.00; ×2 = 600.00
        let product = sample_product();
        assert_eq!(product.consignment_price().cents(), 60000);
    }

    #[test]
    fn test_has_stock() {
        let product = sample_product();
        assert!(product.has_stock(5));
        assert!(!product.has_stock(6));
    }

    #[test]
    fn test_line_total() {
        let item = LineItem {
            product_id: "1".to_string(),
            barcode: "12345678".to_string(),
            name: "Anel".to_string(),
            category: Category::Aneis,
            quantity: 2,
            unit_price_cents: 60000,
            image_url: None,
        };
        assert_eq!(item.line_total().cents(), 120000);
    }

    #[test]
    fn test_order_status_defaults_and_labels() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Settled.label(), "Acertado");
        assert_eq!(OrderStatus::Canceled.code(), "canceled");
    }

    #[test]
    fn test_payment_method_codes() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::BankTransfer.code(), "bank_transfer");
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"credit_card\""
        );
    }
}
