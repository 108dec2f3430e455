//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `CommissionRate` type for seller commission percentages.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a settlement with dozens of lines, float drift means the payout    │
//! │  shown to the seller and the payout written to the order disagree.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    R$ 600,00 = 60000 centavos. The database, calculations, and API     │
//! │    all use centavos. Only the UI formats currency for display.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brilho_core::money::{CommissionRate, Money};
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(60000); // R$ 600.00
//!
//! // Arithmetic operations
//! let line_total = price * 2i64;                      // R$ 1200.00
//! let commission = line_total.commission(CommissionRate::from_bps(500));
//! assert_eq!(commission.cents(), 6000);               // R$ 60.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for adjustments and corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the consignment flow goes through this type:
/// product costs, frozen unit prices, order totals, commission values,
/// and the final settlement payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use brilho_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use brilho_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(60000); // R$ 600.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 120000); // R$ 1200.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates the commission amount for a given rate.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// rounding to the nearest centavo (5000/10000 = 0.5). Uses i128
    /// intermediates to prevent overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use brilho_core::money::{CommissionRate, Money};
    ///
    /// let sold = Money::from_cents(60000);     // R$ 600.00
    /// let rate = CommissionRate::from_bps(500); // 5%
    ///
    /// let commission = sold.commission(rate);
    /// assert_eq!(commission.cents(), 3000);    // R$ 30.00
    /// ```
    pub fn commission(&self, rate: CommissionRate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Money Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {}.{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Commission Rate
// =============================================================================

/// Seller commission rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (the default seller commission)
///
/// The settlement screen edits commission as a percentage; the core stores
/// it in basis points so commission math stays in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommissionRate(u32);

impl CommissionRate {
    /// Creates a commission rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        CommissionRate(bps)
    }

    /// Creates a commission rate from a user-entered percentage.
    ///
    /// ## Rules
    /// - Must be a finite number (NaN and infinities rejected)
    /// - Must be in [0, 100]
    ///
    /// ## Example
    /// ```rust
    /// use brilho_core::money::CommissionRate;
    ///
    /// let rate = CommissionRate::from_percent(5.0).unwrap();
    /// assert_eq!(rate.bps(), 500);
    ///
    /// assert!(CommissionRate::from_percent(-1.0).is_err());
    /// assert!(CommissionRate::from_percent(f64::NAN).is_err());
    /// assert!(CommissionRate::from_percent(101.0).is_err());
    /// ```
    pub fn from_percent(pct: f64) -> Result<Self, ValidationError> {
        if !pct.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "commission".to_string(),
                reason: "must be a number".to_string(),
            });
        }

        if !(0.0..=100.0).contains(&pct) {
            return Err(ValidationError::OutOfRange {
                field: "commission".to_string(),
                min: 0,
                max: 100,
            });
        }

        Ok(CommissionRate((pct * 100.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero commission.
    #[inline]
    pub const fn zero() -> Self {
        CommissionRate(0)
    }
}

/// Default commission is the store-wide 5%.
impl Default for CommissionRate {
    fn default() -> Self {
        CommissionRate(crate::DEFAULT_COMMISSION_BPS)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "R$ 10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_commission_basic() {
        // R$ 400.00 at 10% = R$ 40.00
        let amount = Money::from_cents(40000);
        let rate = CommissionRate::from_bps(1000); // 10%
        assert_eq!(amount.commission(rate).cents(), 4000);
    }

    #[test]
    fn test_commission_with_rounding() {
        // R$ 3.33 at 5% = R$ 0.16650 → rounds to R$ 0.17
        let amount = Money::from_cents(333);
        let rate = CommissionRate::from_bps(500);
        assert_eq!(amount.commission(rate).cents(), 17);
    }

    #[test]
    fn test_commission_rate_from_percent() {
        let rate = CommissionRate::from_percent(5.0).unwrap();
        assert_eq!(rate.bps(), 500);
        assert!((rate.percent() - 5.0).abs() < f64::EPSILON);

        let rate = CommissionRate::from_percent(8.25).unwrap();
        assert_eq!(rate.bps(), 825);

        // Boundaries are inclusive
        assert_eq!(CommissionRate::from_percent(0.0).unwrap().bps(), 0);
        assert_eq!(CommissionRate::from_percent(100.0).unwrap().bps(), 10000);
    }

    #[test]
    fn test_commission_rate_rejects_bad_input() {
        assert!(matches!(
            CommissionRate::from_percent(f64::NAN),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            CommissionRate::from_percent(f64::INFINITY),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            CommissionRate::from_percent(-0.5),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            CommissionRate::from_percent(100.01),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_default_commission_is_five_percent() {
        assert_eq!(CommissionRate::default().bps(), 500);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
