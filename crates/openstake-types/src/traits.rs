//! Collaborator interfaces consumed by the settlement engine.
//!
//! The validator-selection oracle and the fee-split payment distributor are
//! external to the core and re-specified nowhere here: the engine only
//! depends on these narrow traits.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::ValidatorId;

/// One validator allocation produced by the selection oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeAllocation {
    pub validator: ValidatorId,
    pub amount: Amount,
}

/// Result of asking the oracle to place `available` pending stake.
///
/// `remainder` is whatever the oracle chose not to allocate; it stays in
/// the pending-stake pool.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StakePlan {
    pub allocations: Vec<StakeAllocation>,
    pub remainder: Amount,
}

/// Validator-selection oracle: decides which validators receive stake.
pub trait ValidatorSelector {
    fn select_validators_for_stake(&self, available: Amount) -> StakePlan;
}

/// Fee-split collaborator: opaque forwarding of protocol fees to its own
/// payee bookkeeping.
pub trait FeeSplitter {
    fn distribute(&mut self, amount: Amount);
}
