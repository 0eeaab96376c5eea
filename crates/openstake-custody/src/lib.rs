//! # openstake-custody
//!
//! **MPC threshold-custody coordination**: group formation, quorum-confirmed
//! key generation, and quorum-gated authorization for custody-changing
//! requests.
//!
//! The signing cryptography itself lives with the off-core key-holders;
//! this crate coordinates *who may act*:
//!
//! 1. An admin registers a group of `n ≥ 2` member identities with a
//!    threshold `t ∈ [1, n-1]`.
//! 2. Keygen is requested (advisory signal to the members).
//! 3. Every member reports the generated public key; the key is confirmed
//!    only when all `n` reports agree, and its derived address becomes the
//!    dispatch target for new stakes.
//! 4. Each fund-movement request must be joined by `t + 1` distinct
//!    members before the settlement flow may act on it.
//!
//! Per-group state machine:
//!
//! ```text
//! Unregistered → Registered → KeygenRequested → KeyConfirmed(key)
//! ```
//!
//! with `KeyConfirmed` repeatable — a group can hold multiple confirmed
//! keys over time, one active at a time.
//!
//! Membership claims are verified by deriving the caller-comparable address
//! from the stored member public identity; a declared identity alone is
//! never trusted.

pub mod group;
pub mod keys;
pub mod quorum;
pub mod requests;

pub use group::{CustodyGroup, GroupPhase};
pub use keys::GeneratedKey;
pub use quorum::{CustodyQuorum, JoinOutcome};
pub use requests::{CustodyRequest, RequestStatus};
