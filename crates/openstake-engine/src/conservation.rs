//! Conservation invariant checker.
//!
//! Invariant checked after settlement activity:
//!
//! ```text
//! Σ(claimed) + pendingStake + pendingUnstakeFill + Σ(filled - claimed)
//!     ≤ Σ(native asset ever received)
//! ```
//!
//! If this ever breaks, value has been conjured from nowhere and the
//! system must halt with a critical alert.

use openstake_types::{Amount, OpenstakeError, Result};

/// Tracks lifetime native-asset inflows and claim payouts.
pub struct ConservationTracker {
    /// Deposits + returned principal + net rewards, since genesis.
    total_inflow: Amount,
    /// Total paid out to requesters, since genesis.
    total_claimed: Amount,
}

impl ConservationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_inflow: 0,
            total_claimed: 0,
        }
    }

    /// Record a native-asset inflow.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the lifetime total would overflow.
    pub fn record_inflow(&mut self, amount: Amount) -> Result<()> {
        self.total_inflow = self
            .total_inflow
            .checked_add(amount)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Record a claim payout.
    pub fn record_claim(&mut self, amount: Amount) {
        self.total_claimed += amount;
    }

    #[must_use]
    pub fn total_inflow(&self) -> Amount {
        self.total_inflow
    }

    #[must_use]
    pub fn total_claimed(&self) -> Amount {
        self.total_claimed
    }

    /// Verify the conservation inequality against the current counters.
    ///
    /// # Errors
    /// [`OpenstakeError::ConservationViolation`] when owed value exceeds
    /// what was ever received.
    pub fn verify(
        &self,
        pending_stake: Amount,
        pending_unstake_fill: Amount,
        unpaid_filled: Amount,
    ) -> Result<()> {
        let owed = self
            .total_claimed
            .checked_add(pending_stake)
            .and_then(|sum| sum.checked_add(pending_unstake_fill))
            .and_then(|sum| sum.checked_add(unpaid_filled))
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        if owed > self.total_inflow {
            return Err(OpenstakeError::ConservationViolation {
                reason: format!(
                    "owed {owed} exceeds lifetime inflow {} \
                     (claimed={}, pending_stake={pending_stake}, \
                     pending_fill={pending_unstake_fill}, unpaid_filled={unpaid_filled})",
                    self.total_inflow, self.total_claimed,
                ),
            });
        }
        Ok(())
    }
}

impl Default for ConservationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_verifies() {
        let tracker = ConservationTracker::new();
        assert!(tracker.verify(0, 0, 0).is_ok());
    }

    #[test]
    fn inflows_cover_owed_value() {
        let mut tracker = ConservationTracker::new();
        tracker.record_inflow(100).unwrap();
        assert!(tracker.verify(60, 10, 30).is_ok());
        assert!(tracker.verify(60, 10, 31).is_err());
    }

    #[test]
    fn claims_count_against_inflow() {
        let mut tracker = ConservationTracker::new();
        tracker.record_inflow(100).unwrap();
        tracker.record_claim(40);
        assert_eq!(tracker.total_claimed(), 40);
        assert!(tracker.verify(60, 0, 0).is_ok());
        assert!(tracker.verify(61, 0, 0).is_err());
    }

    #[test]
    fn violation_error_is_named() {
        let tracker = ConservationTracker::new();
        let err = tracker.verify(1, 0, 0).unwrap_err();
        assert!(matches!(err, OpenstakeError::ConservationViolation { .. }));
        assert!(format!("{err}").starts_with("OST_ERR_901"));
    }
}
