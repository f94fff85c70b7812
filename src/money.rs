//! Exact fixed-point money arithmetic and rounding rules
//!
//! Every monetary value in the engine is a base-10 `Decimal` built from its
//! textual form. Binary floating point never enters the calculation path.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Fractional digits carried by currency amounts at output boundaries.
pub const CURRENCY_DP: u32 = 2;

/// Round to currency precision, half-up.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round up to the next multiple of 100.
///
/// Used by the parser to derive a transaction's ceiling from its amount.
/// Amounts already on a multiple of 100 are returned unchanged.
pub fn ceil_to_hundred(value: Decimal) -> Decimal {
    (value / dec!(100)).ceil() * dec!(100)
}

/// Compound growth factor (1 + rate)^years.
///
/// Iterative product rather than a decimal power function, so the factor
/// stays within `Decimal` arithmetic for the whole computation.
pub fn compound_factor(rate: Decimal, years: u32) -> Decimal {
    let base = Decimal::ONE + rate;
    (0..years).fold(Decimal::ONE, |acc, _| acc * base)
}
