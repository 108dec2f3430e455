//! # Consignment Repository
//!
//! Database operations for consignment orders, their line items, and the
//! returned items recorded at settlement.
//!
//! ## Order Lifecycle in SQL
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Consignment Order Lifecycle                            │
//! │                                                                         │
//! │  1. INSERT (status: pending)                                           │
//! │     └── insert() → order row + item rows in one transaction            │
//! │                                                                         │
//! │  2. EDIT (only while pending)                                          │
//! │     └── update() → rewrite order row, replace item rows                │
//! │                                                                         │
//! │  3a. SETTLE                                                            │
//! │     └── settle() → status = settled, settlement columns filled,        │
//! │                    items replaced with remaining quantities,           │
//! │                    returned items inserted, all in one transaction     │
//! │                                                                         │
//! │  3b. CANCEL / DELETE (only while pending)                              │
//! │     └── cancel() → status = canceled                                   │
//! │     └── delete() → row removed, items cascade                          │
//! │                                                                         │
//! │  Status gating lives in SQL: every mutation carries                    │
//! │  WHERE status = 'pending' and checks rows_affected, so a stale UI      │
//! │  can never mutate settled history.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use brilho_core::{
    Category, ConsignmentOrder, LineItem, OrderFilter, OrderStatus, PaymentMethod, ReturnedItem,
    SettlementDetails,
};

// =============================================================================
// Row Shapes
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    created_by: String,
    seller_id: String,
    seller_name: String,
    order_date: NaiveDate,
    settlement_date: NaiveDate,
    total_value_cents: i64,
    total_items: i64,
    category_counts: String,
    status: String,
    settled_by: Option<String>,
    commission_bps: Option<u32>,
    commission_value_cents: Option<i64>,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Assembles the domain order from the row plus its child tables.
    ///
    /// Settlement columns are written together at settle time; a settled row
    /// missing any of them is corrupt.
    fn into_domain(
        self,
        items: Vec<LineItem>,
        returned_items: Vec<ReturnedItem>,
    ) -> DbResult<ConsignmentOrder> {
        let status = OrderStatus::from_code(&self.status)?;
        let category_counts: BTreeMap<Category, i64> = serde_json::from_str(&self.category_counts)?;

        let settlement_details = match status {
            OrderStatus::Settled => {
                let settled_by = self.settled_by.ok_or_else(|| {
                    DbError::CorruptData(format!("settled order {} has no settled_by", self.id))
                })?;
                let commission_bps = self.commission_bps.ok_or_else(|| {
                    DbError::CorruptData(format!("settled order {} has no commission_bps", self.id))
                })?;
                let commission_value_cents = self.commission_value_cents.ok_or_else(|| {
                    DbError::CorruptData(format!(
                        "settled order {} has no commission_value_cents",
                        self.id
                    ))
                })?;
                let payment_method = self.payment_method.ok_or_else(|| {
                    DbError::CorruptData(format!(
                        "settled order {} has no payment_method",
                        self.id
                    ))
                })?;

                Some(SettlementDetails {
                    settled_by,
                    commission_bps,
                    commission_value_cents,
                    payment_method: PaymentMethod::from_code(&payment_method)?,
                    returned_items,
                })
            }
            _ => None,
        };

        Ok(ConsignmentOrder {
            id: self.id,
            created_by: self.created_by,
            seller_id: self.seller_id,
            seller_name: self.seller_name,
            order_date: self.order_date,
            settlement_date: self.settlement_date,
            items,
            total_value_cents: self.total_value_cents,
            total_items: self.total_items,
            category_counts,
            status,
            settlement_details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    product_id: String,
    barcode: String,
    name: String,
    category: String,
    quantity: i64,
    unit_price_cents: i64,
    image_url: Option<String>,
}

impl ItemRow {
    fn into_domain(self) -> DbResult<LineItem> {
        Ok(LineItem {
            product_id: self.product_id,
            barcode: self.barcode,
            name: self.name,
            category: Category::from_code(&self.category)?,
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
            image_url: self.image_url,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReturnedRow {
    product_id: String,
    name: String,
    returned_quantity: i64,
    is_fully_returned: bool,
}

impl From<ReturnedRow> for ReturnedItem {
    fn from(row: ReturnedRow) -> Self {
        ReturnedItem {
            product_id: row.product_id,
            name: row.name,
            returned_quantity: row.returned_quantity,
            is_fully_returned: row.is_fully_returned,
        }
    }
}

const ORDER_COLUMNS: &str = "id, created_by, seller_id, seller_name, order_date, settlement_date, \
     total_value_cents, total_items, category_counts, status, \
     settled_by, commission_bps, commission_value_cents, payment_method, \
     created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for consignment order database operations.
#[derive(Debug, Clone)]
pub struct ConsignmentRepository {
    pool: SqlitePool,
}

impl ConsignmentRepository {
    /// Creates a new ConsignmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConsignmentRepository { pool }
    }

    /// Inserts a new order with its line items in one transaction.
    ///
    /// ## Returns
    /// The order id.
    pub async fn insert(&self, order: &ConsignmentOrder) -> DbResult<String> {
        debug!(id = %order.id, seller = %order.seller_name, "Inserting consignment order");

        let mut tx = self.pool.begin().await?;

        let category_counts = serde_json::to_string(&order.category_counts)?;
        sqlx::query(
            r#"
            INSERT INTO consignment_orders (
                id, created_by, seller_id, seller_name,
                order_date, settlement_date,
                total_value_cents, total_items, category_counts, status,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.created_by)
        .bind(&order.seller_id)
        .bind(&order.seller_name)
        .bind(order.order_date)
        .bind(order.settlement_date)
        .bind(order.total_value_cents)
        .bind(order.total_items)
        .bind(&category_counts)
        .bind(order.status.code())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut tx, &order.id, &order.items).await?;

        tx.commit().await?;
        Ok(order.id.clone())
    }

    /// Gets an order by id, with its items and any returned items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ConsignmentOrder>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM consignment_orders WHERE id = ?1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items = self.load_items(id).await?;
                let returned = self.load_returned_items(id).await?;
                row.into_domain(items, returned).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Lists orders matching the filter, newest first.
    ///
    /// The text query is a case-insensitive substring match over seller
    /// name, order id, and creator name, mirroring the in-memory store.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<ConsignmentOrder>> {
        // Empty binds act as catch-alls so the SQL stays static
        let status = filter.status.map(|s| s.code()).unwrap_or("");
        let pattern = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", q.to_lowercase()))
            .unwrap_or_default();

        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM consignment_orders
            WHERE (?1 = '' OR status = ?1)
              AND (?2 = ''
                   OR lower(seller_name) LIKE ?2
                   OR lower(id) LIKE ?2
                   OR lower(created_by) LIKE ?2)
            ORDER BY created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(status)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.load_items(&row.id).await?;
            let returned = self.load_returned_items(&row.id).await?;
            orders.push(row.into_domain(items, returned)?);
        }
        Ok(orders)
    }

    /// Rewrites a pending order and replaces its line items.
    ///
    /// ## Errors
    /// - `NotFound` when the id is unknown
    /// - `NotPending` when the stored order has left the pending state
    pub async fn update(&self, order: &ConsignmentOrder) -> DbResult<()> {
        debug!(id = %order.id, "Updating consignment order");

        let mut tx = self.pool.begin().await?;

        let category_counts = serde_json::to_string(&order.category_counts)?;
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE consignment_orders SET
                created_by = ?2,
                seller_id = ?3,
                seller_name = ?4,
                order_date = ?5,
                settlement_date = ?6,
                total_value_cents = ?7,
                total_items = ?8,
                category_counts = ?9,
                updated_at = ?10
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(&order.id)
        .bind(&order.created_by)
        .bind(&order.seller_id)
        .bind(&order.seller_name)
        .bind(order.order_date)
        .bind(order.settlement_date)
        .bind(order.total_value_cents)
        .bind(order.total_items)
        .bind(&category_counts)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Release the transaction's connection before the status probe,
            // which takes its own connection from the pool
            tx.rollback().await?;
            return Err(self.pending_gate_error(&order.id).await);
        }

        replace_items(&mut tx, &order.id, &order.items).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Cancels a pending order. Terminal.
    pub async fn cancel(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Canceling consignment order");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE consignment_orders
            SET status = 'canceled', updated_at = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.pending_gate_error(id).await);
        }
        Ok(())
    }

    /// Deletes a pending order outright; items and returned items cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting consignment order");

        let result = sqlx::query(
            "DELETE FROM consignment_orders WHERE id = ?1 AND status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.pending_gate_error(id).await);
        }
        Ok(())
    }

    /// Writes the settlement engine's output over the pending order.
    ///
    /// One transaction: order row (status, totals, settlement columns),
    /// item replacement (remaining quantities), and returned item rows.
    pub async fn settle(&self, settled: &ConsignmentOrder) -> DbResult<()> {
        debug!(id = %settled.id, "Settling consignment order");

        let details = settled.settlement_details.as_ref().ok_or_else(|| {
            DbError::Internal(format!(
                "order {} passed to settle without settlement details",
                settled.id
            ))
        })?;

        let mut tx = self.pool.begin().await?;

        let category_counts = serde_json::to_string(&settled.category_counts)?;
        let result = sqlx::query(
            r#"
            UPDATE consignment_orders SET
                status = 'settled',
                total_value_cents = ?2,
                total_items = ?3,
                category_counts = ?4,
                settlement_date = ?5,
                settled_by = ?6,
                commission_bps = ?7,
                commission_value_cents = ?8,
                payment_method = ?9,
                updated_at = ?10
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(&settled.id)
        .bind(settled.total_value_cents)
        .bind(settled.total_items)
        .bind(&category_counts)
        .bind(settled.settlement_date)
        .bind(&details.settled_by)
        .bind(details.commission_bps)
        .bind(details.commission_value_cents)
        .bind(details.payment_method.code())
        .bind(settled.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(self.pending_gate_error(&settled.id).await);
        }

        replace_items(&mut tx, &settled.id, &settled.items).await?;

        for item in &details.returned_items {
            sqlx::query(
                r#"
                INSERT INTO consignment_returned_items (
                    id, order_id, product_id, name,
                    returned_quantity, is_fully_returned
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&settled.id)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.returned_quantity)
            .bind(item.is_fully_returned)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Counts orders per status code (for the list screen header).
    pub async fn count_by_status(&self, status: OrderStatus) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM consignment_orders WHERE status = ?1")
                .bind(status.code())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn load_items(&self, order_id: &str) -> DbResult<Vec<LineItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT product_id, barcode, name, category,
                   quantity, unit_price_cents, image_url
            FROM consignment_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ItemRow::into_domain).collect()
    }

    async fn load_returned_items(&self, order_id: &str) -> DbResult<Vec<ReturnedItem>> {
        let rows = sqlx::query_as::<_, ReturnedRow>(
            r#"
            SELECT product_id, name, returned_quantity, is_fully_returned
            FROM consignment_returned_items
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReturnedItem::from).collect())
    }

    /// Distinguishes "no such order" from "order left the pending state"
    /// after a gated mutation matched zero rows.
    ///
    /// Takes its own pool connection: any open transaction must be rolled
    /// back first, or a single-connection pool would starve the probe.
    async fn pending_gate_error(&self, id: &str) -> DbError {
        let status: Result<Option<String>, _> =
            sqlx::query_scalar("SELECT status FROM consignment_orders WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;

        match status {
            Ok(Some(_)) => DbError::NotPending { id: id.to_string() },
            Ok(None) => DbError::not_found("Consignment order", id),
            Err(e) => e.into(),
        }
    }
}

async fn insert_items(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: &str,
    items: &[LineItem],
) -> DbResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO consignment_items (
                id, order_id, product_id, barcode, name, category,
                quantity, unit_price_cents, image_url, position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(order_id)
        .bind(&item.product_id)
        .bind(&item.barcode)
        .bind(&item.name)
        .bind(item.category.code())
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(&item.image_url)
        .bind(position as i64)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn replace_items(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: &str,
    items: &[LineItem],
) -> DbResult<()> {
    sqlx::query("DELETE FROM consignment_items WHERE order_id = ?1")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    insert_items(tx, order_id, items).await
}

// =============================================================================
// Unit Tests
// =============================================================================
