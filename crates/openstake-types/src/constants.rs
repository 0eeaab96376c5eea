//! System-wide constants for the OpenStake pool.

use crate::amount::{Amount, ONE_UNIT};

/// Default ceiling on protocol-controlled value (base units).
pub const DEFAULT_DEPOSIT_CEILING: Amount = 1_000_000 * ONE_UNIT;

/// Default minimum pending-stake batch before an empty validator selection
/// is treated as an error rather than "nothing to do yet".
pub const DEFAULT_MIN_STAKE_BATCH: Amount = 25 * ONE_UNIT;

/// Default maximum open unstake requests per user.
pub const DEFAULT_MAX_OPEN_REQUESTS_PER_USER: usize = 10;

/// Default minimum wait between requesting a withdrawal and claiming it.
pub const DEFAULT_MIN_CLAIM_WAIT_SECS: i64 = 3_600;

/// Default maximum unstake requests processed per queue-drain invocation.
///
/// Bounds the work done by a single principal/reward intake; leftover
/// principal carries over and the drain resumes from the same position.
pub const DEFAULT_DRAIN_LOOP_BOUND: usize = 10;

/// Default protocol fee on rewards, in basis points (10%).
pub const DEFAULT_PROTOCOL_FEE_BPS: u16 = 1_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenStake";
