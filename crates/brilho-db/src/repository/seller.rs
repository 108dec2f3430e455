//! # Seller Repository
//!
//! Database operations for the consignment seller directory.
//!
//! Read-mostly: the dashboard loads the directory once to fill the seller
//! picker and to prefill commission rates on the settlement screen.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use brilho_core::{Seller, SellerStatus};

/// Raw row shape for the `sellers` table.
#[derive(Debug, sqlx::FromRow)]
struct SellerRow {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    position: Option<String>,
    commission_bps: u32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SellerRow {
    fn into_domain(self) -> DbResult<Seller> {
        Ok(Seller {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            position: self.position,
            commission_bps: self.commission_bps,
            status: SellerStatus::from_code(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELLER_COLUMNS: &str =
    "id, name, email, phone, position, commission_bps, status, created_at, updated_at";

/// Repository for seller database operations.
#[derive(Debug, Clone)]
pub struct SellerRepository {
    pool: SqlitePool,
}

impl SellerRepository {
    /// Creates a new SellerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SellerRepository { pool }
    }

    /// Lists all sellers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Seller>> {
        let sql = format!("SELECT {SELLER_COLUMNS} FROM sellers ORDER BY name");
        let rows = sqlx::query_as::<_, SellerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SellerRow::into_domain).collect()
    }

    /// Gets a seller by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Seller>> {
        let sql = format!("SELECT {SELLER_COLUMNS} FROM sellers WHERE id = ?1");
        let row = sqlx::query_as::<_, SellerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(SellerRow::into_domain).transpose()
    }

    /// Inserts a new seller.
    pub async fn insert(&self, seller: &Seller) -> DbResult<()> {
        debug!(name = %seller.name, "Inserting seller");

        sqlx::query(
            r#"
            INSERT INTO sellers (
                id, name, email, phone, position,
                commission_bps, status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9
            )
            "#,
        )
        .bind(&seller.id)
        .bind(&seller.name)
        .bind(&seller.email)
        .bind(&seller.phone)
        .bind(&seller.position)
        .bind(seller.commission_bps)
        .bind(seller.status.code())
        .bind(seller.created_at)
        .bind(seller.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::test_support::sample_seller;

    #[tokio::test]
    async fn test_insert_list_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sellers();

        repo.insert(&sample_seller("1", "Pedro Almeida", 800, SellerStatus::Active))
            .await
            .unwrap();
        repo.insert(&sample_seller("2", "Carla Souza", 500, SellerStatus::Active))
            .await
            .unwrap();
        repo.insert(&sample_seller("3", "Roberto Ferreira", 500, SellerStatus::Vacation))
            .await
            .unwrap();

        // Ordered by name
        let sellers = repo.list().await.unwrap();
        assert_eq!(sellers.len(), 3);
        assert_eq!(sellers[0].name, "Carla Souza");

        let pedro = repo.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(pedro.commission_bps, 800);
        assert_eq!(pedro.status, SellerStatus::Active);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }
}
