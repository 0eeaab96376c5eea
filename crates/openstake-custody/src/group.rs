//! Custody-group membership and identity verification.

use serde::{Deserialize, Serialize};

use openstake_types::{Address, GroupId, MemberIndex, OpenstakeError, PublicKey, Result};

/// Lifecycle phase of a registered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupPhase {
    /// Membership stored, no keygen activity yet.
    Registered,
    /// Off-core participants were signalled to begin key generation.
    KeygenRequested,
    /// At least one key has been confirmed by all members.
    KeyConfirmed,
}

/// A fixed set of key-holders with a cooperation threshold.
///
/// Members are an ordered sequence addressed by 1-based [`MemberIndex`].
/// `threshold + 1` members must cooperate to authorize an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyGroup {
    members: Vec<PublicKey>,
    threshold: usize,
}

impl CustodyGroup {
    /// Validate and build a group.
    ///
    /// # Errors
    /// - `GroupTooSmall` for fewer than 2 members
    /// - `InvalidThreshold` outside `[1, size - 1]`
    pub fn new(members: Vec<PublicKey>, threshold: usize) -> Result<Self> {
        let size = members.len();
        if size < 2 {
            return Err(OpenstakeError::GroupTooSmall { size });
        }
        if threshold < 1 || threshold > size - 1 {
            return Err(OpenstakeError::InvalidThreshold { threshold, size });
        }
        Ok(Self { members, threshold })
    }

    /// Deterministic identifier from `(threshold, member₁, member₂, …)`.
    #[must_use]
    pub fn id(&self) -> GroupId {
        GroupId::derive(self.threshold, &self.members)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Joins needed to authorize an operation: `threshold + 1`.
    #[must_use]
    pub fn quorum_size(&self) -> usize {
        self.threshold + 1
    }

    #[must_use]
    pub fn members(&self) -> &[PublicKey] {
        &self.members
    }

    /// Stored public identity at a 1-based index.
    ///
    /// # Errors
    /// `InvalidGroupMembership` for index 0 or out-of-range.
    pub fn member_at(&self, index: MemberIndex) -> Result<&PublicKey> {
        index
            .slot(self.members.len())
            .map(|slot| &self.members[slot])
            .ok_or(OpenstakeError::InvalidGroupMembership)
    }

    /// Verify that `caller` is the member it claims to be: the address
    /// derived from the stored identity at `index` must match.
    ///
    /// # Errors
    /// `InvalidGroupMembership` on index or derivation mismatch.
    pub fn verify_member(&self, caller: &Address, index: MemberIndex) -> Result<()> {
        let declared = self.member_at(index)?;
        if declared.derive_address() == *caller {
            Ok(())
        } else {
            Err(OpenstakeError::InvalidGroupMembership)
        }
    }
}
