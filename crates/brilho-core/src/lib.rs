//! # brilho-core: Pure Business Logic for the Brilho Consignment Module
//!
//! This crate is the **heart** of the consignment lifecycle. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Brilho Consignment Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard Frontend                           │   │
//! │  │   Order Form ──► Orders List ──► Settlement Screen             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ command handlers                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brilho-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft    │  │  store   │  │   │
//! │  │   │  Product  │  │   Money   │  │ DraftOrder │  │OrderStore│  │   │
//! │  │   │   Order   │  │Commission │  │   totals   │  │ filters  │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐                 │   │
//! │  │   │ category  │  │  catalog  │  │ settlement │                 │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   brilho-db (Database Layer)                    │   │
//! │  │             SQLite queries, migrations, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ConsignmentOrder, LineItem, etc.)
//! - [`money`] - Money and commission types with integer arithmetic (no floats!)
//! - [`category`] - The closed jewelry category vocabulary
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`catalog`] - Pure barcode lookup against a catalog snapshot
//! - [`draft`] - The order builder (scan, merge, totals, submit)
//! - [`settlement`] - The settlement engine (returns, commission, payout)
//! - [`store`] - The in-memory order store and its session wrapper
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use brilho_core::money::{CommissionRate, Money};
//!
//! // Create money from centavos (never from floats!)
//! let sold = Money::from_cents(60000); // R$ 600.00
//!
//! // The store keeps a 5% commission on settled consignments
//! let rate = CommissionRate::from_bps(500);
//! let commission = sold.commission(rate);
//!
//! assert_eq!(commission.cents(), 3000); // R$ 30.00
//! assert_eq!((sold - commission).cents(), 57000); // R$ 570.00 payout
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod category;
pub mod draft;
pub mod error;
pub mod money;
pub mod settlement;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use brilho_core::Money` instead of
// `use brilho_core::money::Money`

pub use category::Category;
pub use draft::{compute_totals, default_settlement_date, DraftOrder, NewOrderForm};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CommissionRate, Money};
pub use settlement::{SettlementLine, SettlementSession, SettlementTotals};
pub use store::{OrderFilter, OrderStore, OrderStoreState, OrderUpdate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default commission rate in basis points (5%)
///
/// ## Business Reason
/// The store's standard cut on settled consignments. The settlement screen
/// prefills either this or the seller's agreed rate; the operator can
/// override per settlement.
pub const DEFAULT_COMMISSION_BPS: u32 = 500;

/// Days between the order date and the default settlement date
///
/// ## Business Reason
/// Consigned goods are reviewed after a month by default. The form prefills
/// order date + 30 days; the operator can pick any other date.
pub const SETTLEMENT_TERM_DAYS: i64 = 30;

/// Maximum distinct lines in a draft order
///
/// ## Business Reason
/// Prevents runaway drafts and keeps order documents printable.
pub const MAX_DRAFT_ITEMS: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Prevents accidental over-consigning (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
