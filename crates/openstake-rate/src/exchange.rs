//! Rate computation and amount conversion.
//!
//! Two-step on purpose: the rate is computed first (scaled by [`ONE_UNIT`])
//! and then applied, matching the reference accounting exactly. Collapsing
//! the two divisions into one mul-div changes rounding on some inputs and
//! diverges from the test oracles.

use openstake_types::{Amount, ONE_UNIT, OpenstakeError, Result};

/// Receipts per [`ONE_UNIT`] of native asset.
///
/// Unity when either counter is zero. The caller must feed `controlled`
/// from the ledger counters only — never from a raw held balance — so
/// force-funded, unaccounted value cannot depress the rate below the floor.
pub fn asset_to_receipt_rate(controlled: Amount, supply: Amount) -> Result<Amount> {
    if controlled == 0 || supply == 0 {
        return Ok(ONE_UNIT);
    }
    supply
        .checked_mul(ONE_UNIT)
        .map(|scaled| scaled / controlled)
        .ok_or(OpenstakeError::ArithmeticOverflow)
}

/// Native asset per [`ONE_UNIT`] of receipts.
pub fn receipt_to_asset_rate(controlled: Amount, supply: Amount) -> Result<Amount> {
    if controlled == 0 || supply == 0 {
        return Ok(ONE_UNIT);
    }
    controlled
        .checked_mul(ONE_UNIT)
        .map(|scaled| scaled / supply)
        .ok_or(OpenstakeError::ArithmeticOverflow)
}

/// Receipts minted for a native-asset deposit of `amount`.
pub fn receipts_for_assets(amount: Amount, controlled: Amount, supply: Amount) -> Result<Amount> {
    let rate = asset_to_receipt_rate(controlled, supply)?;
    amount
        .checked_mul(rate)
        .map(|scaled| scaled / ONE_UNIT)
        .ok_or(OpenstakeError::ArithmeticOverflow)
}

/// Native asset owed for `receipt_amount` receipts.
pub fn assets_for_receipts(
    receipt_amount: Amount,
    controlled: Amount,
    supply: Amount,
) -> Result<Amount> {
    let rate = receipt_to_asset_rate(controlled, supply)?;
    receipt_amount
        .checked_mul(rate)
        .map(|scaled| scaled / ONE_UNIT)
        .ok_or(OpenstakeError::ArithmeticOverflow)
}
