//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `ExactAmount` accumulator used while a total is still being summed.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    13.0 × 0.8 × 3 = 31.200000000000003  ❌ WRONG!                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer fen + basis-point rates                          │
//! │    1300 fen × 3 × 8000 bps = 31_200_000 (1/10000 fen)                   │
//! │    Exact until the single final round-half-up to fen                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use grocer_core::money::Money;
//!
//! // Create from the smallest unit (preferred)
//! let price = Money::from_cents(1300); // ¥13.00
//!
//! // Or parse a decimal string (configuration files)
//! let same: Money = "13.00".parse().unwrap();
//! assert_eq!(price, same);
//!
//! // Quantities are checked, never wrapped
//! let doubled = price.multiply_quantity(2).unwrap();   // ¥26.00
//! let total = price + Money::from_cents(800);          // ¥21.00
//! assert_eq!(doubled.cents(), 2600);
//! assert_eq!(total.to_string(), "¥21.00");
//! assert!(price.multiply_quantity(i64::MAX).is_err());
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::DiscountRate;
use crate::validation::ValidationResult;

/// Number of decimal places carried by [`Money`].
pub const MONEY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (fen / cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a bulk rebate can in principle push a total below zero
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No float constructor**: amounts come from fen or decimal strings only
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► × quantity × rate ──► ExactAmount (summed)           │
/// │                                               │                         │
/// │                                               ▼ round half-up, once     │
/// │                                          subtotal: Money                │
/// │                                               │                         │
/// │                             BulkDiscount: ≥ threshold? − rebate         │
/// │                                               │                         │
/// │                                               ▼                         │
/// │                                          total: Money                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents ¥10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (yuan) portion.
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
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
    /// Two-decimal prices times integer quantities are always exact, so this
    /// equals `round2(quantity × price)` without any rounding step.
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(800); // ¥8.00 per jin
    /// assert_eq!(unit_price.multiply_quantity(2).unwrap().cents(), 1600);
    /// ```
    ///
    /// ## Errors
    /// [`ValidationError::Overflow`] when the product does not fit in fen.
    pub fn multiply_quantity(&self, qty: i64) -> ValidationResult<Self> {
        self.0
            .checked_mul(qty)
            .map(Money)
            .ok_or_else(|| overflow("subtotal"))
    }

    /// Converts a decimal amount such as `13.00` to fen.
    ///
    /// More than two significant decimal places is an error, never rounded:
    /// `13.50` and `13.5` are accepted, `13.505` is not.
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(1350, 2)).unwrap().cents(), 1350);
    /// assert!(Money::from_decimal(Decimal::new(13505, 3)).is_err());
    /// ```
    pub fn from_decimal(value: Decimal) -> ValidationResult<Self> {
        decimal_to_scaled(value, MONEY_DECIMAL_PLACES, "amount").map(Money)
    }
}

// =============================================================================
// Exact Amount
// =============================================================================

/// An un-rounded monetary amount in 1/10000 of a fen.
///
/// Discounted line items (`price × quantity × rate`) are accumulated here
/// so that no rounding happens until the whole subtotal is known. Every
/// step is checked; an amount that leaves `i128` or a total that leaves
/// `Money`'s range is a [`ValidationError::Overflow`].
///
/// ## Example
/// ```rust
/// use grocer_core::money::{ExactAmount, Money};
/// use grocer_core::types::DiscountRate;
///
/// let rate = DiscountRate::try_from_bps(3333).unwrap();
/// let price = Money::from_cents(1);
///
/// // Three lines of 0.3333 fen each: rounding per line would give 0 fen,
/// // summing first gives 0.9999 fen → 1 fen.
/// let mut total = ExactAmount::zero();
/// for _ in 0..3 {
///     total = total.checked_add(ExactAmount::line(price, 1, rate).unwrap()).unwrap();
/// }
/// assert_eq!(total.round().unwrap().cents(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ExactAmount(i128);

impl ExactAmount {
    /// Sub-units of one fen.
    pub const SCALE: i128 = DiscountRate::SCALE as i128;

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        ExactAmount(0)
    }

    /// Computes one discounted line: `unit_price × quantity × rate`.
    pub fn line(unit_price: Money, quantity: i64, rate: DiscountRate) -> ValidationResult<Self> {
        i128::from(unit_price.0)
            .checked_mul(i128::from(quantity))
            .and_then(|amount| amount.checked_mul(i128::from(rate.bps())))
            .map(ExactAmount)
            .ok_or_else(|| overflow("line amount"))
    }

    pub fn checked_add(self, other: Self) -> ValidationResult<Self> {
        self.0
            .checked_add(other.0)
            .map(ExactAmount)
            .ok_or_else(|| overflow("total"))
    }

    /// Rounds to two decimal places using round-half-up (ties away from zero).
    pub fn round(self) -> ValidationResult<Money> {
        i64::try_from(div_round_half_up(self.0, Self::SCALE))
            .map(Money)
            .map_err(|_| overflow("total"))
    }
}

/// Integer division rounding half away from zero.
fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
}

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Parses a decimal string with `rust_decimal`.
pub(crate) fn parse_decimal(input: &str, field: &str) -> ValidationResult<Decimal> {
    Decimal::from_str(input.trim()).map_err(|err| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}': {}", input.trim(), err),
    })
}

/// Scales `value` by `10^places` into an integer.
///
/// Values needing more than `places` decimal places are rejected rather
/// than rounded.
pub(crate) fn decimal_to_scaled(value: Decimal, places: u32, field: &str) -> ValidationResult<i64> {
    let value = value.normalize();
    if value.scale() > places {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("at most {places} decimal places allowed, got {value}"),
        });
    }

    value
        .checked_mul(Decimal::from(10_i64.pow(places)))
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| overflow(field))
}

/// Parses `"13.00"`, `"8"`, `"0.5"`, `"-2.10"`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_decimal(parse_decimal(s, "amount")?)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders two decimal places with a yuan sign.
///
/// ## Note
/// This is for logs and the demo binary. Presentation layers should format
/// `cents()` themselves for localisation.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}¥{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(bps: u32) -> DiscountRate {
        DiscountRate::try_from_bps(bps).unwrap()
    }

    fn line(cents: i64, qty: i64, bps: u32) -> ExactAmount {
        ExactAmount::line(Money::from_cents(cents), qty, rate(bps)).unwrap()
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "¥10.99");
        assert_eq!(Money::from_cents(500).to_string(), "¥5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-¥5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-¥0.05");
        assert_eq!(Money::zero().to_string(), "¥0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3).unwrap().cents(), 3000);
        let summed: Money = [a, b, b].into_iter().sum();
        assert_eq!(summed.cents(), 2000);
    }

    #[test]
    fn test_multiply_quantity_overflow() {
        let err = Money::from_cents(i64::MAX / 2).multiply_quantity(3).unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { .. }));
    }

    #[test]
    fn test_parse_amounts() {
        assert_eq!("13.00".parse::<Money>().unwrap().cents(), 1300);
        assert_eq!("8".parse::<Money>().unwrap().cents(), 800);
        assert_eq!("0.5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(" 99.99 ".parse::<Money>().unwrap().cents(), 9999);
        assert_eq!("-2.10".parse::<Money>().unwrap().cents(), -210);
        // Trailing zeros beyond two places are not extra precision.
        assert_eq!("1.2500".parse::<Money>().unwrap().cents(), 125);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("¥8.00".parse::<Money>().is_err());
        assert!(matches!(
            "1.005".parse::<Money>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            "99999999999999999999".parse::<Money>(),
            Err(ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_subtotal_is_exact() {
        // subtotal(q, p) == round2(q * p) for every two-place price
        for cents in [1, 99, 800, 1300, 2000, 4599] {
            for qty in 0..25 {
                let price = Money::from_cents(cents);
                let rounded = line(cents, qty, DiscountRate::SCALE).round().unwrap();
                assert_eq!(price.multiply_quantity(qty).unwrap(), rounded);
            }
        }
    }

    #[test]
    fn test_single_line_rounding() {
        assert_eq!(line(1300, 1, 8000).round().unwrap().cents(), 1040);
        // ¥9.99 × 0.85 = 8.4915 → 8.49
        assert_eq!(line(999, 1, 8500).round().unwrap().cents(), 849);
        // ¥0.05 × 0.5 = 0.025 → 0.03 (half-up)
        assert_eq!(line(5, 1, 5000).round().unwrap().cents(), 3);
    }

    #[test]
    fn test_round_half_up_ties_away_from_zero() {
        assert_eq!(div_round_half_up(5_000, 10_000), 1);
        assert_eq!(div_round_half_up(4_999, 10_000), 0);
        assert_eq!(div_round_half_up(15_000, 10_000), 2);
        assert_eq!(div_round_half_up(-5_000, 10_000), -1);
        assert_eq!(div_round_half_up(-4_999, 10_000), 0);
        assert_eq!(div_round_half_up(i128::MAX, 10_000), i128::MAX / 10_000 + 1);
    }

    /// Rounding each line first would lose a fen here; summing first does not.
    #[test]
    fn test_sum_before_rounding() {
        let per_line: Money = (0..2).map(|_| line(5, 1, 5000).round().unwrap()).sum();
        let summed = line(5, 1, 5000).checked_add(line(5, 1, 5000)).unwrap();

        assert_eq!(per_line.cents(), 6); // 0.03 + 0.03
        assert_eq!(summed.round().unwrap().cents(), 5); // 0.025 + 0.025 = 0.05
    }

    #[test]
    fn test_total_outside_money_range_is_overflow() {
        // Fits in i128, but not in i64 fen once rounded.
        let huge = line(i64::MAX / 2, 3, DiscountRate::SCALE);
        assert!(matches!(huge.round(), Err(ValidationError::Overflow { .. })));

        // i64::MAX² × 10000 leaves i128.
        assert!(matches!(
            ExactAmount::line(Money::from_cents(i64::MAX), i64::MAX, DiscountRate::FULL_PRICE),
            Err(ValidationError::Overflow { .. })
        ));

        // Each line fits; three of them do not.
        let big = line(i64::MAX, i64::MAX / 10_000, DiscountRate::SCALE);
        let twice = big.checked_add(big).unwrap();
        assert!(matches!(twice.checked_add(big), Err(ValidationError::Overflow { .. })));
    }
}
