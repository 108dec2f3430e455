//! # Error Types
//!
//! Domain-specific error types for brilho-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brilho-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  brilho-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → Frontend                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, order id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A scanned barcode does not resolve to a product.
    ///
    /// ## When This Occurs
    /// - Barcode not in the local catalog snapshot
    /// - Barcode not in the product database either
    /// - Typo in a manually entered barcode
    #[error("Product not found for barcode: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds available stock.
    ///
    /// ## When This Occurs
    /// - Adding a line to a draft consignment order with more units than
    ///   the product currently has in stock
    ///
    /// ## User Workflow
    /// ```text
    /// Scan barcode (qty: 7)
    ///      │
    ///      ▼
    /// Check stock: available=5
    ///      │
    ///      ▼
    /// InsufficientStock { barcode: "12345678", available: 5, requested: 7 }
    ///      │
    ///      ▼
    /// UI shows: "Estoque insuficiente! Disponível: 5 unidades."
    /// ```
    #[error("Insufficient stock for {barcode}: available {available}, requested {requested}")]
    InsufficientStock {
        barcode: String,
        available: i64,
        requested: i64,
    },

    /// Consignment order not found.
    #[error("Consignment order not found: {0}")]
    OrderNotFound(String),

    /// Order is not in a status that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Editing, settling, canceling, or deleting a settled order
    /// - Settling an already canceled order
    ///
    /// The UI disables these actions for non-pending orders, but the core
    /// must still reject them defensively.
    #[error("Order {order_id} is {status}, operation requires a pending order")]
    InvalidStatus {
        order_id: String,
        status: OrderStatus,
    },

    /// A consignment order must contain at least one line item.
    #[error("Consignment order must contain at least one item")]
    EmptyOrder,

    /// Draft has exceeded maximum allowed line items.
    #[error("Draft order cannot have more than {max} items")]
    DraftTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric barcode, non-finite commission).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Category code is not in the known vocabulary.
    ///
    /// Unknown codes are rejected at the input boundary instead of being
    /// carried through as raw strings.
    #[error("unknown category code: '{code}'")]
    UnknownCategory { code: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            barcode: "12345678".to_string(),
            available: 5,
            requested: 7,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 12345678: available 5, requested 7"
        );
    }

    #[test]
    fn test_invalid_status_message() {
        let err = CoreError::InvalidStatus {
            order_id: "42".to_string(),
            status: OrderStatus::Settled,
        };
        assert_eq!(
            err.to_string(),
            "Order 42 is settled, operation requires a pending order"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::UnknownCategory {
            code: "tiaras".to_string(),
        };
        assert_eq!(err.to_string(), "unknown category code: 'tiaras'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
