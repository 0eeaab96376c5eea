//! Native-asset amount representation.
//!
//! All value accounting is integer-domain: amounts are `u128` base units
//! and every division rounds toward zero. [`ONE_UNIT`] is the indivisible
//! scale factor the exchange-rate functions apply to avoid precision loss.

/// Native-asset value in base units.
pub type Amount = u128;

/// One whole unit of the native asset, in base units (10^9).
///
/// Exchange rates are expressed scaled by this factor, so a 1:1 rate is
/// exactly `ONE_UNIT`.
pub const ONE_UNIT: Amount = 1_000_000_000;

/// Basis-point denominator for fee arithmetic.
pub const BASIS_POINTS: Amount = 10_000;
