//! # openstake-rate
//!
//! **Exchange-rate ledger**: pure conversion between the native asset and
//! the non-rebasing receipt token.
//!
//! The rate is derived, never stored — computed fresh on demand from the
//! protocol-controlled value and the receipt total supply, so deposits and
//! claims never need a rebase:
//!
//! ```text
//! rate_asset_to_receipt = controlled == 0 ? 1 : supply / controlled
//! rate_receipt_to_asset = controlled == 0 ? 1 : controlled / supply
//! ```
//!
//! Both rates are scaled by [`ONE_UNIT`] and default to unity when either
//! counter is zero (the bootstrap case, and the recovery case after the
//! pool drains to a residual of the smallest indivisible unit). All math is
//! integer-domain, rounding toward zero; converting back and forth agrees
//! only within one indivisible unit.
//!
//! No side effects, no mutable state — the only inputs are the two counters
//! the caller reads under its own serialization.

pub mod exchange;

pub use exchange::{
    asset_to_receipt_rate, assets_for_receipts, receipt_to_asset_rate, receipts_for_assets,
};
