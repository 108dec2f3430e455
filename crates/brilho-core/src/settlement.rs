//! # Settlement Engine
//!
//! Drives the settlement of a pending consignment order: recording returns,
//! removing and restoring lines, and computing the commission payout.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Settlement Session                                 │
//! │                                                                         │
//! │  Pending order ──► open() ──► per-line state                            │
//! │                                 ├── returned_quantity (starts at 0)     │
//! │                                 └── is_removed       (starts false)     │
//! │                                                                         │
//! │  Scan barcode ──► remove_by_barcode_scan()  first live match → removed  │
//! │  Type count  ───► set_returned_quantity()   clamped to [0, quantity]    │
//! │  Click ✕     ───► remove_item()             removed, returned := qty    │
//! │  Click undo  ───► restore_item()            live again, returned := 0   │
//! │                                                                         │
//! │  total  = Σ live lines (quantity − returned) × unit price               │
//! │  commission = total × rate                                              │
//! │  final = total − commission                                             │
//! │                                                                         │
//! │  complete() ──► Settled order (immutable history)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{CommissionRate, Money};
use crate::types::{
    ConsignmentOrder, LineItem, OrderStatus, PaymentMethod, ReturnedItem, SettlementDetails,
};
use crate::validation::validate_required;

// =============================================================================
// Per-Line State
// =============================================================================

/// One order line with its mutable settlement state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementLine {
    /// The frozen line item from the order.
    pub item: LineItem,

    /// How many units came back unsold. Always in `[0, item.quantity]`.
    pub returned_quantity: i64,

    /// Line was struck from the settlement entirely.
    pub is_removed: bool,
}

impl SettlementLine {
    fn new(item: LineItem) -> Self {
        SettlementLine {
            item,
            returned_quantity: 0,
            is_removed: false,
        }
    }

    /// Units actually sold on this line, zero for removed lines.
    pub fn sold_quantity(&self) -> i64 {
        if self.is_removed {
            0
        } else {
            self.item.quantity - self.returned_quantity
        }
    }

    /// Value of the sold units.
    pub fn sold_value(&self) -> Money {
        self.item.unit_price().multiply_quantity(self.sold_quantity())
    }
}

// =============================================================================
// Settlement Totals
// =============================================================================

/// Live money figures shown while the session is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTotals {
    /// Σ sold quantity × unit price over live lines, in centavos.
    pub total_value_cents: i64,

    /// Commission on the sold value, in centavos.
    pub commission_value_cents: i64,

    /// Payout to the store: sold − commission, in centavos.
    pub final_value_cents: i64,

    /// Σ returned quantity over all lines.
    pub returned_count: i64,
}

// =============================================================================
// Settlement Session
// =============================================================================

/// An in-progress settlement of a single pending order.
///
/// The session owns a copy of the order; nothing is persisted until
/// [`SettlementSession::complete`] produces the settled order and the caller
/// writes it back through the store.
#[derive(Debug, Clone)]
pub struct SettlementSession {
    order: ConsignmentOrder,
    lines: Vec<SettlementLine>,
    commission: CommissionRate,
    payment_method: PaymentMethod,
}

impl SettlementSession {
    /// Opens a settlement session for a pending order.
    ///
    /// Seeds each line with zero returns, the default 5% commission, and
    /// cash payment. Callers normally follow up with [`set_commission`] to
    /// prefill the seller's agreed rate.
    ///
    /// Fails with `InvalidStatus` for settled or canceled orders.
    ///
    /// [`set_commission`]: SettlementSession::set_commission
    pub fn open(order: ConsignmentOrder) -> CoreResult<Self> {
        if !order.is_pending() {
            return Err(CoreError::InvalidStatus {
                order_id: order.id.clone(),
                status: order.status,
            });
        }

        let lines = order.items.iter().cloned().map(SettlementLine::new).collect();

        Ok(SettlementSession {
            order,
            lines,
            commission: CommissionRate::default(),
            payment_method: PaymentMethod::default(),
        })
    }

    /// The order under settlement.
    pub fn order(&self) -> &ConsignmentOrder {
        &self.order
    }

    /// The per-line settlement state.
    pub fn lines(&self) -> &[SettlementLine] {
        &self.lines
    }

    /// The commission rate currently applied.
    pub fn commission(&self) -> CommissionRate {
        self.commission
    }

    /// Overrides the commission rate.
    pub fn set_commission(&mut self, rate: CommissionRate) {
        self.commission = rate;
    }

    /// Selects how the payout is made.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Sets the returned quantity for the line with the given product id,
    /// clamped to `[0, quantity]`. No-op if the line does not exist.
    pub fn set_returned_quantity(&mut self, product_id: &str, quantity: i64) {
        if let Some(line) = self.line_mut(product_id) {
            line.returned_quantity = quantity.clamp(0, line.item.quantity);
        }
    }

    /// Strikes a line from the settlement: marks it removed and records the
    /// full quantity as returned. No-op if the line does not exist.
    pub fn remove_item(&mut self, product_id: &str) {
        if let Some(line) = self.line_mut(product_id) {
            line.is_removed = true;
            line.returned_quantity = line.item.quantity;
        }
    }

    /// Reverses a removal: the line is live again with no returns recorded.
    /// No-op if the line does not exist.
    pub fn restore_item(&mut self, product_id: &str) {
        if let Some(line) = self.line_mut(product_id) {
            line.is_removed = false;
            line.returned_quantity = 0;
        }
    }

    /// Processes a scanned barcode as a removal.
    ///
    /// Targets the FIRST live (not yet removed) line whose barcode matches
    /// and strikes it, so scanning the same barcode twice removes two
    /// distinct lines when duplicates exist.
    ///
    /// Returns the struck line, or `None` when no live line matches (the
    /// session is left unchanged).
    pub fn remove_by_barcode_scan(&mut self, barcode: &str) -> Option<&SettlementLine> {
        let barcode = barcode.trim();
        let line = self
            .lines
            .iter_mut()
            .find(|l| !l.is_removed && l.item.barcode == barcode)?;

        line.is_removed = true;
        line.returned_quantity = line.item.quantity;
        Some(line)
    }

    /// Computes the live money figures for the current per-line state.
    pub fn totals(&self) -> SettlementTotals {
        let total = self
            .lines
            .iter()
            .map(|l| l.sold_value())
            .fold(Money::zero(), |acc, v| acc + v);
        let commission = total.commission(self.commission);

        SettlementTotals {
            total_value_cents: total.cents(),
            commission_value_cents: commission.cents(),
            final_value_cents: (total - commission).cents(),
            returned_count: self.lines.iter().map(|l| l.returned_quantity).sum(),
        }
    }

    /// Completes the settlement dated today. See [`complete_on`].
    ///
    /// [`complete_on`]: SettlementSession::complete_on
    pub fn complete(self, settled_by: &str) -> CoreResult<ConsignmentOrder> {
        let date = Utc::now().date_naive();
        self.complete_on(settled_by, date)
    }

    /// Completes the settlement, consuming the session.
    ///
    /// ## Resulting order
    /// - Lines are kept unless removed with everything returned; a kept
    ///   removed line carries quantity 0, other kept lines carry the sold
    ///   quantity
    /// - `total_value_cents` becomes the FINAL post-commission payout, not
    ///   the gross consigned value
    /// - `category_counts` is recomputed over kept lines, skipping
    ///   zero-quantity lines
    /// - `settlement_date` is set to the actual settlement day
    /// - `settlement_details` records operator, rate, commission amount,
    ///   payment method, and every line with a return or removal
    /// - Status becomes `Settled` (terminal)
    pub fn complete_on(self, settled_by: &str, date: NaiveDate) -> CoreResult<ConsignmentOrder> {
        let settled_by = validate_required("settledBy", settled_by)?;
        let totals = self.totals();

        let returned_items: Vec<ReturnedItem> = self
            .lines
            .iter()
            .filter(|l| l.returned_quantity > 0 || l.is_removed)
            .map(|l| ReturnedItem {
                product_id: l.item.product_id.clone(),
                name: l.item.name.clone(),
                returned_quantity: l.returned_quantity,
                is_fully_returned: l.is_removed || l.returned_quantity == l.item.quantity,
            })
            .collect();

        let kept: Vec<LineItem> = self
            .lines
            .into_iter()
            .filter(|l| !l.is_removed || l.returned_quantity < l.item.quantity)
            .map(|l| {
                let quantity = if l.is_removed {
                    0
                } else {
                    l.item.quantity - l.returned_quantity
                };
                LineItem { quantity, ..l.item }
            })
            .collect();

        let mut category_counts = std::collections::BTreeMap::new();
        for item in kept.iter().filter(|i| i.quantity > 0) {
            *category_counts.entry(item.category).or_insert(0) += item.quantity;
        }

        let mut order = self.order;
        order.items = kept;
        order.total_value_cents = totals.final_value_cents;
        order.total_items = order.items.iter().map(|i| i.quantity).sum();
        order.category_counts = category_counts;
        order.status = OrderStatus::Settled;
        order.settlement_date = date;
        order.settlement_details = Some(SettlementDetails {
            settled_by,
            commission_bps: self.commission.bps(),
            commission_value_cents: totals.commission_value_cents,
            payment_method: self.payment_method,
            returned_items,
        });
        order.updated_at = Utc::now();

        Ok(order)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut SettlementLine> {
        self.lines.iter_mut().find(|l| l.item.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use std::collections::BTreeMap;

    fn item(product_id: &str, barcode: &str, category: Category, qty: i64, unit: i64) -> LineItem {
        LineItem {
            product_id: product_id.to_string(),
            barcode: barcode.to_string(),
            name: format!("Produto {}", barcode),
            category,
            quantity: qty,
            unit_price_cents: unit,
            image_url: None,
        }
    }

    fn pending_order(items: Vec<LineItem>) -> ConsignmentOrder {
        let totals = crate::draft::compute_totals(&items);
        let now = Utc::now();
        ConsignmentOrder {
            id: "order-1".to_string(),
            created_by: "Jane Doe".to_string(),
            seller_id: "2".to_string(),
            seller_name: "Carla Souza".to_string(),
            order_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            settlement_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
            items,
            total_value_cents: totals.total_value_cents,
            total_items: totals.total_items,
            category_counts: totals.category_counts,
            status: OrderStatus::Pending,
            settlement_details: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_open_rejects_non_pending() {
        let mut order = pending_order(vec![item("1", "12345678", Category::Aneis, 1, 60000)]);
        order.status = OrderStatus::Settled;

        let err = SettlementSession::open(order).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatus { .. }));
    }

    #[test]
    fn test_totals_everything_sold() {
        // 2 × 600.00 = 1200.00; commission 5% = 60.00; final 1140.00
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 2, 60000)]);
        let session = SettlementSession::open(order).unwrap();

        let totals = session.totals();
        assert_eq!(totals.total_value_cents, 120000);
        assert_eq!(totals.commission_value_cents, 6000);
        assert_eq!(totals.final_value_cents, 114000);
        assert_eq!(totals.returned_count, 0);
    }

    #[test]
    fn test_set_returned_quantity_is_clamped() {
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 3, 60000)]);
        let mut session = SettlementSession::open(order).unwrap();

        session.set_returned_quantity("1", 99);
        assert_eq!(session.lines()[0].returned_quantity, 3);

        session.set_returned_quantity("1", -5);
        assert_eq!(session.lines()[0].returned_quantity, 0);

        session.set_returned_quantity("missing", 1); // silent no-op
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn test_remove_and_restore_item() {
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 2, 60000)]);
        let mut session = SettlementSession::open(order).unwrap();

        session.remove_item("1");
        assert!(session.lines()[0].is_removed);
        assert_eq!(session.lines()[0].returned_quantity, 2);
        assert_eq!(session.totals().total_value_cents, 0);

        session.restore_item("1");
        assert!(!session.lines()[0].is_removed);
        assert_eq!(session.lines()[0].returned_quantity, 0);
        assert_eq!(session.totals().total_value_cents, 120000);
    }

    #[test]
    fn test_barcode_scan_hits_first_live_match() {
        let order = pending_order(vec![
            item("1", "12345678", Category::Aneis, 1, 60000),
            item("2", "12345678", Category::Aneis, 1, 60000),
        ]);
        let mut session = SettlementSession::open(order).unwrap();

        assert!(session.remove_by_barcode_scan("12345678").is_some());
        assert!(session.lines()[0].is_removed);
        assert!(!session.lines()[1].is_removed);

        assert!(session.remove_by_barcode_scan(" 12345678 ").is_some());
        assert!(session.lines()[1].is_removed);

        // All matching lines already removed: miss, nothing changes
        assert!(session.remove_by_barcode_scan("12345678").is_none());
    }

    #[test]
    fn test_partial_return_math() {
        // 3 consigned at 600.00, 1 comes back → sold 1200.00
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 3, 60000)]);
        let mut session = SettlementSession::open(order).unwrap();
        session.set_returned_quantity("1", 1);

        let totals = session.totals();
        assert_eq!(totals.total_value_cents, 120000);
        assert_eq!(totals.commission_value_cents, 6000);
        assert_eq!(totals.final_value_cents, 114000);
        assert_eq!(totals.returned_count, 1);
    }

    #[test]
    fn test_one_of_two_returned() {
        // 2 consigned at 600.00, 1 returned → sold 600.00, payout 570.00
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 2, 60000)]);
        let mut session = SettlementSession::open(order).unwrap();
        session.set_returned_quantity("1", 1);

        let totals = session.totals();
        assert_eq!(totals.total_value_cents, 60000);
        assert_eq!(totals.commission_value_cents, 3000);
        assert_eq!(totals.final_value_cents, 57000);
        assert_eq!(totals.returned_count, 1);
    }

    #[test]
    fn test_complete_records_settlement() {
        let order = pending_order(vec![
            item("1", "12345678", Category::Aneis, 2, 60000),
            item("2", "23456789", Category::Brincos, 1, 22000),
        ]);
        let mut session = SettlementSession::open(order).unwrap();
        session.set_payment_method(PaymentMethod::Pix);
        session.set_returned_quantity("2", 1); // the earring came back

        // sold = 2 × 600.00 = 1200.00; commission 60.00; final 1140.00
        let date = NaiveDate::from_ymd_opt(2023, 7, 3).unwrap();
        let settled = session.complete_on("Maria Silva", date).unwrap();

        assert_eq!(settled.status, OrderStatus::Settled);
        assert_eq!(settled.total_value_cents, 114000);
        assert_eq!(settled.total_items, 2);
        assert_eq!(settled.settlement_date, date);

        let details = settled.settlement_details.as_ref().unwrap();
        assert_eq!(details.settled_by, "Maria Silva");
        assert_eq!(details.commission_bps, 500);
        assert_eq!(details.commission_value_cents, 6000);
        assert_eq!(details.payment_method, PaymentMethod::Pix);
        assert_eq!(details.returned_items.len(), 1);
        assert_eq!(details.returned_items[0].product_id, "2");
        assert!(details.returned_items[0].is_fully_returned);

        // A fully returned line that was never removed survives at zero
        // quantity; the sold line keeps its quantity
        assert_eq!(settled.items.len(), 2);
        assert_eq!(settled.items[0].product_id, "1");
        assert_eq!(settled.items[0].quantity, 2);
        assert_eq!(settled.items[1].product_id, "2");
        assert_eq!(settled.items[1].quantity, 0);

        // Zero-quantity lines stay out of the category counts
        let mut expected_counts = BTreeMap::new();
        expected_counts.insert(Category::Aneis, 2);
        assert_eq!(settled.category_counts, expected_counts);
    }

    #[test]
    fn test_complete_keeps_partially_returned_removed_line() {
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 3, 60000)]);
        let mut session = SettlementSession::open(order).unwrap();

        // Removed, then the operator dials the return count back down
        session.remove_item("1");
        session.set_returned_quantity("1", 2);

        let settled = session.complete("Maria Silva").unwrap();

        // Line survives with zero quantity and is excluded from counts
        assert_eq!(settled.items.len(), 1);
        assert_eq!(settled.items[0].quantity, 0);
        assert_eq!(settled.total_items, 0);
        assert!(settled.category_counts.is_empty());
        assert_eq!(settled.total_value_cents, 0);
    }

    #[test]
    fn test_complete_requires_operator_name() {
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 1, 60000)]);
        let session = SettlementSession::open(order).unwrap();

        assert!(session.complete("   ").is_err());
    }

    #[test]
    fn test_commission_override() {
        let order = pending_order(vec![item("1", "12345678", Category::Aneis, 2, 60000)]);
        let mut session = SettlementSession::open(order).unwrap();
        session.set_commission(CommissionRate::from_bps(800));

        let totals = session.totals();
        // 8% of 1200.00 = 96.00
        assert_eq!(totals.commission_value_cents, 9600);
        assert_eq!(totals.final_value_cents, 110400);
    }
}
