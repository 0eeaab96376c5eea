//! # openstake-engine
//!
//! **Settlement engine**: the accounting state machine that converts
//! deposits to receipts, tracks protocol-controlled value, and drains a
//! FIFO queue of redemption requests against incoming principal and reward
//! inflows under a bounded per-call work limit.
//!
//! ## Flow
//!
//! 1. A deposit mints receipts via the exchange-rate ledger and increases
//!    pending stake.
//! 2. Stake initiation forwards pending value to the custody group's
//!    active address, one quorum-gated request per validator allocation.
//! 3. A redemption request escrows receipts and locks in the owed amount
//!    at the current rate.
//! 4. Principal and reward inflows from custody drain the queue oldest
//!    first, visiting at most the configured loop bound per call.
//! 5. Claims release native asset against the filled portion; the full
//!    claim burns the escrowed receipts and deletes the request.
//!
//! The whole core is synchronous: the surrounding environment serializes
//! state-mutating operations, so atomicity needs no locks.

pub mod conservation;
pub mod engine;
pub mod queue;
pub mod receipts;

pub use conservation::ConservationTracker;
pub use engine::SettlementEngine;
pub use queue::{DrainReport, UnstakeQueue};
pub use receipts::ReceiptLedger;
