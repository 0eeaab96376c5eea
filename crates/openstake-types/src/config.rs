//! Configuration for the settlement engine.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::constants;

/// Tunable parameters of the settlement engine.
///
/// `drain_loop_bound` and `deposit_ceiling` are additionally adjustable at
/// runtime through admin-gated setters on the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum protocol-controlled value; deposits that would exceed it
    /// are rejected.
    pub deposit_ceiling: Amount,
    /// Pending stake below this amount tolerates an empty validator
    /// selection; above it, an empty selection is `NoAvailableValidators`.
    pub min_stake_batch: Amount,
    /// Maximum concurrently open unstake requests per user.
    pub max_open_requests_per_user: usize,
    /// Seconds a request must age before any claim against it.
    pub min_claim_wait_secs: i64,
    /// Maximum requests visited per queue-drain invocation.
    pub drain_loop_bound: usize,
    /// Protocol fee on rewards, in basis points.
    pub protocol_fee_bps: u16,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            deposit_ceiling: constants::DEFAULT_DEPOSIT_CEILING,
            min_stake_batch: constants::DEFAULT_MIN_STAKE_BATCH,
            max_open_requests_per_user: constants::DEFAULT_MAX_OPEN_REQUESTS_PER_USER,
            min_claim_wait_secs: constants::DEFAULT_MIN_CLAIM_WAIT_SECS,
            drain_loop_bound: constants::DEFAULT_DRAIN_LOOP_BOUND,
            protocol_fee_bps: constants::DEFAULT_PROTOCOL_FEE_BPS,
        }
    }
}
