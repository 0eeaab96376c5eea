//! Error types for the OpenStake liquid-staking pool.
//!
//! All errors use the `OST_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input validation
//! - 2xx: State not found
//! - 3xx: Authorization
//! - 4xx: Quorum / ordering conflicts
//! - 5xx: Resource ceilings
//! - 6xx: Receipt / balance errors
//! - 9xx: General / internal errors
//!
//! Every rejected operation surfaces as one of these named conditions —
//! never a generic failure — with no partial state change left behind.

use thiserror::Error;

use crate::{Amount, CustodyRequestId, GroupId, MemberIndex, Role, UnstakeRequestId};

/// Central error enum for all OpenStake operations.
#[derive(Debug, Error)]
pub enum OpenstakeError {
    // =================================================================
    // Input Validation (1xx)
    // =================================================================
    /// Zero amounts are never meaningful for deposits, withdrawals or claims.
    #[error("OST_ERR_100: Amount must be non-zero")]
    ZeroAmount,

    /// A custody group needs at least two members.
    #[error("OST_ERR_101: Custody group too small: {size} member(s), need at least 2")]
    GroupTooSmall { size: usize },

    /// Threshold must lie in `[1, size-1]`.
    #[error("OST_ERR_102: Invalid threshold {threshold} for group of {size}")]
    InvalidThreshold { threshold: usize, size: usize },

    /// The queue-drain loop bound must be at least 1.
    #[error("OST_ERR_103: Drain loop bound must be at least 1")]
    InvalidLoopBound,

    /// The protocol fee cannot exceed 100%.
    #[error("OST_ERR_104: Invalid protocol fee: {bps} bps exceeds 10000")]
    InvalidFeeBps { bps: u16 },

    // =================================================================
    // State Not Found (2xx)
    // =================================================================
    /// No custody group registered under this ID.
    #[error("OST_ERR_200: Custody group not found: {0}")]
    GroupNotFound(GroupId),

    /// The referenced custody key is unknown or not confirmed.
    #[error("OST_ERR_201: Custody key not found or not confirmed")]
    KeyNotFound,

    /// No custody request with this ID.
    #[error("OST_ERR_202: Custody request not found: {0}")]
    RequestNotFound(CustodyRequestId),

    /// No unstake request with this ID.
    #[error("OST_ERR_203: Unstake request not found: {0}")]
    UnstakeRequestNotFound(UnstakeRequestId),

    // =================================================================
    // Authorization (3xx)
    // =================================================================
    /// Caller lacks the role this operation is gated on.
    #[error("OST_ERR_300: Caller lacks required role: {role}")]
    RoleRequired { role: Role },

    /// Caller's address does not derive from the claimed member identity.
    #[error("OST_ERR_301: Invalid group membership claim")]
    InvalidGroupMembership,

    /// Only the request's creator may claim against it.
    #[error("OST_ERR_302: Caller is not the requester of {0}")]
    NotRequester(UnstakeRequestId),

    // =================================================================
    // Quorum / Ordering Conflicts (4xx)
    // =================================================================
    /// A group with identical membership and threshold already exists.
    #[error("OST_ERR_400: Attempt to re-add existing custody group: {0}")]
    AttemptToReaddGroup(GroupId),

    /// The generated key has already been fully confirmed.
    #[error("OST_ERR_401: Attempt to reconfirm an already-confirmed key")]
    AttemptToReconfirmKey,

    /// This member already joined the custody request.
    #[error("OST_ERR_402: {member} attempted to rejoin request")]
    AttemptToRejoin { member: MemberIndex },

    /// The join list already holds `threshold + 1` members.
    #[error("OST_ERR_403: Quorum already reached on {0}")]
    QuorumAlreadyReached(CustodyRequestId),

    /// The minimum claim wait period has not elapsed.
    #[error("OST_ERR_404: Claim too soon: {remaining_secs}s of wait period remain")]
    ClaimTooSoon { remaining_secs: i64 },

    /// Claim exceeds the filled-but-unclaimed portion of the request.
    #[error("OST_ERR_405: Claim too large: requested {amount}, claimable {claimable}")]
    ClaimTooLarge { amount: Amount, claimable: Amount },

    // =================================================================
    // Resource Ceilings (5xx)
    // =================================================================
    /// The deposit would push protocol-controlled value past its ceiling.
    #[error("OST_ERR_500: Deposit ceiling exceeded: would control {would_control}, ceiling {ceiling}")]
    DepositCeilingExceeded { would_control: Amount, ceiling: Amount },

    /// The caller already holds the maximum number of open unstake requests.
    #[error("OST_ERR_501: Too many open unstake requests: limit {max}")]
    TooManyOpenRequests { max: usize },

    /// The validator-selection collaborator returned no allocations while
    /// more than the minimum batch is waiting to be staked.
    #[error("OST_ERR_502: No available validators for pending stake")]
    NoAvailableValidators,

    // =================================================================
    // Receipt / Balance Errors (6xx)
    // =================================================================
    /// Not enough free receipt balance to escrow.
    #[error("OST_ERR_600: Insufficient receipts: need {needed}, have {available}")]
    InsufficientReceipts { needed: Amount, available: Amount },

    /// Not enough escrowed receipts to unlock or burn.
    #[error("OST_ERR_601: Insufficient locked receipts")]
    InsufficientLocked,

    /// An accounting operation would produce a negative value.
    #[error("OST_ERR_602: Balance underflow")]
    BalanceUnderflow,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Checked arithmetic overflowed; the operation is rejected whole.
    #[error("OST_ERR_900: Arithmetic overflow")]
    ArithmeticOverflow,

    /// Conservation invariant violated — critical safety alert.
    #[error("OST_ERR_901: Conservation violation: {reason}")]
    ConservationViolation { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenstakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = OpenstakeError::UnstakeRequestNotFound(UnstakeRequestId(7));
        let msg = format!("{err}");
        assert!(msg.starts_with("OST_ERR_203"), "Got: {msg}");
        assert!(msg.contains("unstake:7"));
    }

    #[test]
    fn claim_too_large_display() {
        let err = OpenstakeError::ClaimTooLarge {
            amount: 900,
            claimable: 500,
        };
        let msg = format!("{err}");
        assert!(msg.contains("OST_ERR_405"));
        assert!(msg.contains("900"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn all_errors_have_ost_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(OpenstakeError::ZeroAmount),
            Box::new(OpenstakeError::InvalidFeeBps { bps: 10_001 }),
            Box::new(OpenstakeError::KeyNotFound),
            Box::new(OpenstakeError::AttemptToReconfirmKey),
            Box::new(OpenstakeError::NoAvailableValidators),
            Box::new(OpenstakeError::InvalidGroupMembership),
            Box::new(OpenstakeError::ArithmeticOverflow),
            Box::new(OpenstakeError::ConservationViolation {
                reason: "test".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("OST_ERR_"),
                "Error missing OST_ERR_ prefix: {msg}"
            );
        }
    }
}
