//! # brilho-db: Database Layer for the Brilho Consignment Module
//!
//! This crate provides database access for the consignment lifecycle.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Brilho Consignment Data Flow                        │
//! │                                                                         │
//! │  Command handler (scan_barcode, create_order, settle_order)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     brilho-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SellerRepo    │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ Consignment-  │    │ ...          │  │   │
//! │  │   │ Management    │    │   Repo        │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────────────────────────────────────────────┐   │   │
//! │  │   │  CatalogLookup (lookup.rs)                            │   │   │
//! │  │   │  local snapshot ──miss──► products table              │   │   │
//! │  │   └───────────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, seller, consignment)
//! - [`lookup`] - Two-tier catalog lookup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brilho_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/brilho.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let product = db.products().get_by_barcode("12345678").await?;
//! let orders = db.consignments().list(&filter).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lookup;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use lookup::CatalogLookup;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::consignment::ConsignmentRepository;
pub use repository::product::ProductRepository;
pub use repository::seller::SellerRepository;
