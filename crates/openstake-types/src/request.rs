//! The unstake (redemption) request model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::Address;

/// A pending redemption request.
///
/// `amount_requested` is computed **once at creation** from the receipt
/// amount and the exchange rate at that instant; later rate movements never
/// change it. `amount_filled` and `amount_claimed` only ever increase, and
/// `claimed ≤ filled ≤ requested` holds at every observation point. The
/// escrowed receipts are burned only on full claim, at which point the
/// request is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeRequest {
    /// Identity that created the request.
    pub requester: Address,
    /// Creation timestamp; claims are gated on a minimum wait from here.
    pub requested_at: DateTime<Utc>,
    /// Native-asset value owed, rate-locked at creation.
    pub amount_requested: Amount,
    /// Cumulative native asset matched against this request so far.
    pub amount_filled: Amount,
    /// Cumulative native asset paid out to the requester.
    pub amount_claimed: Amount,
    /// Receipt amount held in escrow until full claim.
    pub receipt_locked: Amount,
}

impl UnstakeRequest {
    #[must_use]
    pub fn new(
        requester: Address,
        requested_at: DateTime<Utc>,
        amount_requested: Amount,
        receipt_locked: Amount,
    ) -> Self {
        Self {
            requester,
            requested_at,
            amount_requested,
            amount_filled: 0,
            amount_claimed: 0,
            receipt_locked,
        }
    }

    /// Still waiting for principal: `filled < requested`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.amount_filled < self.amount_requested
    }

    /// Native asset this request still needs to be fully filled.
    #[must_use]
    pub fn unfilled(&self) -> Amount {
        self.amount_requested - self.amount_filled
    }

    /// Filled-but-unclaimed portion available to the requester right now.
    #[must_use]
    pub fn claimable(&self) -> Amount {
        self.amount_filled - self.amount_claimed
    }

    /// Fully paid out; the owning queue deletes the entry at this point.
    #[must_use]
    pub fn is_fully_claimed(&self) -> bool {
        self.amount_claimed == self.amount_requested
    }

    /// Inspection tuple: `(requester, requested_at, requested, filled,
    /// claimed, receipt_locked)`.
    #[must_use]
    pub fn as_tuple(&self) -> (Address, DateTime<Utc>, Amount, Amount, Amount, Amount) {
        (
            self.requester,
            self.requested_at,
            self.amount_requested,
            self.amount_filled,
            self.amount_claimed,
            self.receipt_locked,
        )
    }
}
