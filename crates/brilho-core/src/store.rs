//! # Order Store
//!
//! In-memory collection of consignment orders keyed by id, plus the
//! session-state wrapper handed to the UI layer.
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple dashboard actions may access/modify orders
//! 2. Only one mutation should run at a time
//! 3. UI command handlers can run concurrently
//!
//! ## Status Gating
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Mutations by Order Status                              │
//! │                                                                         │
//! │  Operation       Pending    Settled    Canceled                         │
//! │  ─────────       ───────    ───────    ────────                         │
//! │  update            ✓        InvalidStatus                               │
//! │  cancel            ✓        InvalidStatus                               │
//! │  delete            ✓        InvalidStatus                               │
//! │  settle            ✓        InvalidStatus                               │
//! │  find / list       ✓          ✓          ✓                              │
//! │                                                                         │
//! │  NOTE: gating lives here, not in the UI. Both terminal statuses are    │
//! │        immutable history.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::compute_totals;
use crate::error::{CoreError, CoreResult};
use crate::types::{ConsignmentOrder, LineItem, OrderStatus};

// =============================================================================
// List Filter
// =============================================================================

/// Search criteria for the orders list screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    /// Case-insensitive substring matched against seller name, order id,
    /// and creator name. Empty or absent matches everything.
    pub query: Option<String>,

    /// Restrict to a single status.
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    fn matches(&self, order: &ConsignmentOrder) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }

        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                order.seller_name.to_lowercase().contains(&query)
                    || order.id.to_lowercase().contains(&query)
                    || order.created_by.to_lowercase().contains(&query)
            }
        }
    }
}

// =============================================================================
// Order Patch
// =============================================================================

/// A partial update applied to a pending order. `None` fields are untouched.
///
/// When `items` changes, the stored totals are re-frozen from the new lines;
/// callers never pass totals directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub created_by: Option<String>,
    /// Seller reference and denormalized name change together.
    pub seller: Option<(String, String)>,
    pub order_date: Option<NaiveDate>,
    pub settlement_date: Option<NaiveDate>,
    pub items: Option<Vec<LineItem>>,
}

// =============================================================================
// Order Store
// =============================================================================

/// The collection of consignment orders.
///
/// ## Invariants
/// - Ids are unique (uuid v4, assigned on create)
/// - Settled and canceled orders are never mutated
/// - Stored totals always match a recomputation over `items`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStore {
    orders: Vec<ConsignmentOrder>,
}

impl OrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        OrderStore { orders: Vec::new() }
    }

    /// Inserts a new order, assigning its definitive id and timestamps.
    ///
    /// ## Returns
    /// The assigned id.
    pub fn create(&mut self, mut order: ConsignmentOrder) -> String {
        order.id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        order.created_at = now;
        order.updated_at = now;

        let id = order.id.clone();
        self.orders.push(order);
        id
    }

    /// Looks up an order by id.
    pub fn find_by_id(&self, id: &str) -> Option<&ConsignmentOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Lists orders matching the filter, newest first.
    pub fn list(&self, filter: &OrderFilter) -> Vec<ConsignmentOrder> {
        let mut orders: Vec<ConsignmentOrder> = self
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Applies a partial update to a pending order.
    ///
    /// ## Errors
    /// - `OrderNotFound` when the id is unknown
    /// - `InvalidStatus` unless the order is pending
    pub fn update(&mut self, id: &str, patch: OrderUpdate) -> CoreResult<&ConsignmentOrder> {
        let order = Self::pending_mut(&mut self.orders, id)?;

        if let Some(created_by) = patch.created_by {
            order.created_by = created_by;
        }
        if let Some((seller_id, seller_name)) = patch.seller {
            order.seller_id = seller_id;
            order.seller_name = seller_name;
        }
        if let Some(order_date) = patch.order_date {
            order.order_date = order_date;
        }
        if let Some(settlement_date) = patch.settlement_date {
            order.settlement_date = settlement_date;
        }
        if let Some(items) = patch.items {
            let totals = compute_totals(&items);
            order.items = items;
            order.total_value_cents = totals.total_value_cents;
            order.total_items = totals.total_items;
            order.category_counts = totals.category_counts;
        }
        order.updated_at = Utc::now();

        Ok(order)
    }

    /// Cancels a pending order. Terminal: canceled orders stay in the list
    /// as history but accept no further mutations.
    pub fn cancel(&mut self, id: &str) -> CoreResult<()> {
        let order = Self::pending_mut(&mut self.orders, id)?;
        order.status = OrderStatus::Canceled;
        order.updated_at = Utc::now();
        Ok(())
    }

    /// Deletes a pending order outright.
    ///
    /// Settled and canceled orders are history and cannot be deleted; this
    /// is enforced here rather than trusted to the caller.
    pub fn delete(&mut self, id: &str) -> CoreResult<()> {
        // Validate status before touching the collection
        Self::pending_mut(&mut self.orders, id)?;
        self.orders.retain(|o| o.id != id);
        Ok(())
    }

    /// Replaces a pending order with the settled version produced by the
    /// settlement engine.
    ///
    /// ## Errors
    /// - `OrderNotFound` when the id is unknown
    /// - `InvalidStatus` when the stored order is no longer pending, or the
    ///   replacement is not settled
    pub fn settle(&mut self, id: &str, settled: ConsignmentOrder) -> CoreResult<()> {
        if settled.status != OrderStatus::Settled {
            return Err(CoreError::InvalidStatus {
                order_id: settled.id,
                status: settled.status,
            });
        }

        let order = Self::pending_mut(&mut self.orders, id)?;
        *order = settled;
        Ok(())
    }

    /// Number of stored orders, across all statuses.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Checks if the store holds no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn pending_mut<'a>(
        orders: &'a mut [ConsignmentOrder],
        id: &str,
    ) -> CoreResult<&'a mut ConsignmentOrder> {
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;

        if !order.is_pending() {
            return Err(CoreError::InvalidStatus {
                order_id: order.id.clone(),
                status: order.status,
            });
        }

        Ok(order)
    }
}

// =============================================================================
// Session State Wrapper
// =============================================================================

/// Shared order-store state passed to UI command handlers.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<OrderStore>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Ensures only one handler mutates the store at a time
///
/// ## Why Not RwLock?
/// Store operations are quick and most of them mutate. A RwLock would add
/// complexity with minimal benefit.
#[derive(Debug, Clone)]
pub struct OrderStoreState {
    store: Arc<Mutex<OrderStore>>,
}

impl OrderStoreState {
    /// Creates a new empty store state.
    pub fn new() -> Self {
        OrderStoreState {
            store: Arc::new(Mutex::new(OrderStore::new())),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let orders = state.with_store(|store| store.list(&filter));
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&OrderStore) -> R,
    {
        let store = self.store.lock().expect("Order store mutex poisoned");
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_store_mut(|store| store.cancel(&order_id))?;
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut OrderStore) -> R,
    {
        let mut store = self.store.lock().expect("Order store mutex poisoned");
        f(&mut store)
    }
}

impl Default for OrderStoreState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::draft::{default_settlement_date, DraftOrder, NewOrderForm};
    use crate::settlement::SettlementSession;
    use crate::types::{PaymentMethod, Product};

    fn product(barcode: &str, raw: i64, plating: i64, stock: i64) -> Product {
        Product {
            id: format!("id-{}", barcode),
            barcode: barcode.to_string(),
            name: format!("Produto {}", barcode),
            description: None,
            category: Category::Aneis,
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

    fn sample_order(created_by: &str, seller_name: &str) -> ConsignmentOrder {
        let mut draft = DraftOrder::new();
        draft
            .add_product(&product("12345678", 25000, 5000, 5), 2)
            .unwrap();

        let order_date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let form = NewOrderForm {
            created_by: created_by.to_string(),
            seller_id: "2".to_string(),
            order_date,
            settlement_date: default_settlement_date(order_date),
        };
        draft.submit(&form, seller_name).unwrap()
    }

    #[test]
    fn test_create_assigns_id_and_find() {
        let mut store = OrderStore::new();
        let id = store.create(sample_order("Jane Doe", "Carla Souza"));

        let found = store.find_by_id(&id).unwrap();
        assert_eq!(found.seller_name, "Carla Souza");
        assert_eq!(found.total_value_cents, 120000);
        assert!(store.find_by_id("missing").is_none());
    }

    #[test]
    fn test_list_filters_by_query_and_status() {
        let mut store = OrderStore::new();
        store.create(sample_order("Jane Doe", "Carla Souza"));
        let id = store.create(sample_order("Maria Silva", "Pedro Almeida"));
        store.cancel(&id).unwrap();

        // Case-insensitive match on seller name
        let filter = OrderFilter {
            query: Some("carla".to_string()),
            status: None,
        };
        assert_eq!(store.list(&filter).len(), 1);

        // Match on creator name
        let filter = OrderFilter {
            query: Some("MARIA".to_string()),
            status: None,
        };
        assert_eq!(store.list(&filter).len(), 1);

        // Status restriction
        let filter = OrderFilter {
            query: None,
            status: Some(OrderStatus::Pending),
        };
        assert_eq!(store.list(&filter).len(), 1);

        // Empty filter matches everything
        assert_eq!(store.list(&OrderFilter::default()).len(), 2);
    }

    #[test]
    fn test_update_refreezes_totals_when_items_change() {
        let mut store = OrderStore::new();
        let id = store.create(sample_order("Jane Doe", "Carla Souza"));

        let items = vec![LineItem {
            product_id: "id-23456789".to_string(),
            barcode: "23456789".to_string(),
            name: "Brinco Argola Ouro".to_string(),
            category: Category::Brincos,
            quantity: 3,
            unit_price_cents: 22000,
            image_url: None,
        }];
        let patch = OrderUpdate {
            items: Some(items),
            ..Default::default()
        };
        let updated = store.update(&id, patch).unwrap();

        assert_eq!(updated.total_value_cents, 66000);
        assert_eq!(updated.total_items, 3);
        assert_eq!(updated.category_counts[&Category::Brincos], 3);
    }

    #[test]
    fn test_update_unknown_order() {
        let mut store = OrderStore::new();
        let err = store.update("missing", OrderUpdate::default()).unwrap_err();
        assert!(matches!(err, CoreError::OrderNotFound(_)));
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut store = OrderStore::new();
        let id = store.create(sample_order("Jane Doe", "Carla Souza"));

        store.cancel(&id).unwrap();
        assert_eq!(store.find_by_id(&id).unwrap().status, OrderStatus::Canceled);

        // No further mutations on a canceled order
        assert!(matches!(
            store.cancel(&id),
            Err(CoreError::InvalidStatus { .. })
        ));
        assert!(matches!(
            store.update(&id, OrderUpdate::default()),
            Err(CoreError::InvalidStatus { .. })
        ));
        assert!(matches!(
            store.delete(&id),
            Err(CoreError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_delete_only_while_pending() {
        let mut store = OrderStore::new();
        let id = store.create(sample_order("Jane Doe", "Carla Souza"));

        store.delete(&id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_settle_replaces_pending_order() {
        let mut store = OrderStore::new();
        let id = store.create(sample_order("Jane Doe", "Carla Souza"));

        let order = store.find_by_id(&id).unwrap().clone();
        let mut session = SettlementSession::open(order).unwrap();
        session.set_payment_method(PaymentMethod::Pix);
        let settled = session.complete("Maria Silva").unwrap();

        store.settle(&id, settled).unwrap();

        let stored = store.find_by_id(&id).unwrap();
        assert_eq!(stored.status, OrderStatus::Settled);
        // Everything sold at 5%: final = 1200.00 − 60.00
        assert_eq!(stored.total_value_cents, 114000);

        // A settled order cannot be settled, updated, or deleted again
        let order = stored.clone();
        assert!(SettlementSession::open(order).is_err());
        assert!(matches!(
            store.delete(&id),
            Err(CoreError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_settle_rejects_non_settled_replacement() {
        let mut store = OrderStore::new();
        let id = store.create(sample_order("Jane Doe", "Carla Souza"));
        let still_pending = store.find_by_id(&id).unwrap().clone();

        assert!(matches!(
            store.settle(&id, still_pending),
            Err(CoreError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_list_is_newest_first() {
        let mut store = OrderStore::new();
        let first = store.create(sample_order("Jane Doe", "Carla Souza"));
        let second = store.create(sample_order("Jane Doe", "Pedro Almeida"));

        // created_at ties are possible within one test run; nudge the
        // second order forward explicitly
        if let Some(order) = store.orders.iter_mut().find(|o| o.id == second) {
            order.created_at = order.created_at + chrono::Duration::seconds(1);
        }

        let listed = store.list(&OrderFilter::default());
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[1].id, first);
    }

    #[test]
    fn test_state_wrapper_round_trip() {
        let state = OrderStoreState::new();

        let id = state.with_store_mut(|store| store.create(sample_order("Jane Doe", "Carla Souza")));
        let count = state.with_store(|store| store.len());

        assert_eq!(count, 1);
        assert!(state.with_store(|store| store.find_by_id(&id).is_some()));
    }
}
