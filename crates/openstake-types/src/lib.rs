//! # openstake-types
//!
//! Shared types, errors, and configuration for the **OpenStake**
//! liquid-staking pool.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`PublicKey`], [`GroupId`], [`MemberIndex`],
//!   [`UnstakeRequestId`], [`CustodyRequestId`], [`ValidatorId`]
//! - **Amounts**: [`Amount`] in native base units, [`ONE_UNIT`] scale factor
//! - **Request model**: [`UnstakeRequest`]
//! - **Collaborator traits**: [`ValidatorSelector`], [`FeeSplitter`],
//!   [`AccessControl`]
//! - **Roles**: [`Role`] with [`StaticAccessControl`] for tests and simple
//!   deployments
//! - **Events**: [`PoolEvent`], [`CustodyEvent`]
//! - **Configuration**: [`PoolConfig`]
//! - **Errors**: [`OpenstakeError`] with `OST_ERR_` prefix codes

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod ids;
pub mod request;
pub mod roles;
pub mod traits;

// Re-export all primary types at crate root for ergonomic imports:
//   use openstake_types::{Address, Amount, UnstakeRequest, ...};

pub use amount::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use ids::*;
pub use request::*;
pub use roles::*;
pub use traits::*;

// Constants are accessed via `openstake_types::constants::FOO`
// (not re-exported to avoid name collisions).
