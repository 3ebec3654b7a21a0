//! Common utility functions for cost calculations.
//!
//! This module provides the guarded arithmetic shared by every calculator:
//! presentation rounding, percentage conversion, zero-safe division and
//! sharing-ratio allocation.
//!
//! `Decimal` arithmetic panics when a result does not fit in 96 bits. The
//! calculators therefore work with `checked_*` operations and
//! [`guarded_div`], and a component whose arithmetic overflows is reported
//! as zero.

use rust_decimal::Decimal;
use tracing::warn;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use mhr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(108.7328)), dec!(108.73));
/// assert_eq!(round_half_up(dec!(8.335)), dec!(8.34));
/// assert_eq!(round_half_up(dec!(-8.335)), dec!(-8.34)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a percentage (e.g. `85` for 85%) into a fraction (`0.85`).
pub fn percent(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}

/// Divides `numerator` by `denominator`, yielding zero when the denominator
/// is zero or negative, or when the quotient does not fit.
///
/// Inputs arrive incrementally, so a denominator the user has not filled in
/// yet makes the dependent component zero instead of an error.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use mhr_core::calculations::common::safe_div;
///
/// assert_eq!(safe_div(dec!(50000), dec!(5000)), dec!(10));
/// assert_eq!(safe_div(dec!(50000), Decimal::ZERO), Decimal::ZERO);
/// assert_eq!(safe_div(dec!(50000), dec!(-5)), Decimal::ZERO);
/// ```
pub fn safe_div(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    guarded_div(numerator, denominator).unwrap_or(Decimal::ZERO)
}

/// Like [`safe_div`], but `None` when the quotient does not fit in a
/// `Decimal`.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use mhr_core::calculations::common::guarded_div;
///
/// assert_eq!(guarded_div(dec!(2400), dec!(240)), Some(dec!(10)));
/// assert_eq!(guarded_div(dec!(2400), Decimal::ZERO), Some(Decimal::ZERO));
/// assert_eq!(guarded_div(Decimal::MAX, dec!(0.5)), None);
/// ```
pub fn guarded_div(
    numerator: Decimal,
    denominator: Decimal,
) -> Option<Decimal> {
    if denominator <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    numerator.checked_div(denominator)
}

/// Clamps a sharing ratio (machines served by one person or resource) to at
/// least one.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use mhr_core::calculations::common::sharing_ratio;
///
/// assert_eq!(sharing_ratio(dec!(5)), dec!(5));
/// assert_eq!(sharing_ratio(Decimal::ZERO), Decimal::ONE);
/// assert_eq!(sharing_ratio(dec!(0.5)), Decimal::ONE);
/// ```
pub fn sharing_ratio(machines: Decimal) -> Decimal {
    machines.max(Decimal::ONE)
}

/// Fallback for a component whose arithmetic overflowed.
pub(crate) fn overflowed<T: Default>(component: &'static str) -> T {
    warn!(component, "Arithmetic overflow; component is zero");
    T::default()
}
