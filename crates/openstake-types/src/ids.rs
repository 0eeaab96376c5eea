//! Identifiers used throughout OpenStake.
//!
//! Request IDs are plain monotonic integers (never reused); custody
//! identities are derived one-way from declared public keys with SHA-256.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Caller-comparable identity: a 20-byte account address.
///
/// User accounts and custody addresses share this representation. Custody
/// addresses are derived from member public keys via [`PublicKey::derive_address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// Declared public identity of a custody-group member, or a generated
/// custody-held key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// One-way, collision-resistant derivation from a public identity to a
    /// caller-comparable [`Address`]: the trailing 20 bytes of SHA-256 over
    /// the key bytes.
    ///
    /// Membership claims are meaningless unless this derivation matches the
    /// authenticated caller. Pure function, usable in tests without any
    /// surrounding environment.
    #[must_use]
    pub fn derive_address(&self) -> Address {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(self.0);
        let bytes: [u8; 20] = hash[12..32].try_into().expect("SHA-256 produces 32 bytes");
        Address(bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pk:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// GroupId
// ---------------------------------------------------------------------------

/// Deterministic custody-group identifier.
///
/// SHA-256 over a domain tag, the threshold, and the ordered member keys.
/// Two groups with identical membership and threshold collide by design —
/// re-registration of the same group is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GroupId(pub [u8; 32]);

impl GroupId {
    /// Derive the group ID from `(threshold, member₁, member₂, …)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn derive(threshold: usize, members: &[PublicKey]) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"openstake:custody_group:v1:");
        hasher.update((threshold as u64).to_be_bytes());
        for member in members {
            hasher.update(member.as_bytes());
        }
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// MemberIndex
// ---------------------------------------------------------------------------

/// 1-based position of a member within its custody group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MemberIndex(pub u32);

impl MemberIndex {
    /// Zero-based slot into the member list, or `None` for index 0 or
    /// out-of-range values.
    #[must_use]
    pub fn slot(self, group_size: usize) -> Option<usize> {
        let idx = self.0 as usize;
        (1..=group_size).contains(&idx).then(|| idx - 1)
    }
}

impl fmt::Display for MemberIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UnstakeRequestId
// ---------------------------------------------------------------------------

/// Globally monotonic redemption-request identifier; never reused.
///
/// IDs are global, not per-user: a user's second request can have a
/// non-contiguous ID if other users requested in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct UnstakeRequestId(pub u64);

impl UnstakeRequestId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for UnstakeRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unstake:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CustodyRequestId
// ---------------------------------------------------------------------------

/// Monotonic identifier for a quorum-gated fund-movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CustodyRequestId(pub u64);

impl CustodyRequestId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CustodyRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "custody:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ValidatorId
// ---------------------------------------------------------------------------

/// External validator node identifier (opaque to the core).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ValidatorId(pub String);

impl ValidatorId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
