//! Quorum-gated fund-movement requests.

use serde::{Deserialize, Serialize};

use openstake_types::{Amount, MemberIndex, PublicKey, ValidatorId};

/// Join progress of a custody request. An absent request is the implicit
/// third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Joins are being collected.
    Started,
    /// `threshold + 1` members have joined; the operation is authorized.
    QuorumReached,
}

/// One fund-movement operation awaiting quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyRequest {
    key: PublicKey,
    amount: Amount,
    validator: Option<ValidatorId>,
    /// Ordered member indices that have joined; no duplicates.
    joined: Vec<MemberIndex>,
    status: RequestStatus,
}

impl CustodyRequest {
    #[must_use]
    pub fn new(key: PublicKey, amount: Amount, validator: Option<ValidatorId>) -> Self {
        Self {
            key,
            amount,
            validator,
            joined: Vec::new(),
            status: RequestStatus::Started,
        }
    }

    #[must_use]
    pub fn key(&self) -> PublicKey {
        self.key
    }

    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    #[must_use]
    pub fn validator(&self) -> Option<&ValidatorId> {
        self.validator.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    #[must_use]
    pub fn joined(&self) -> &[MemberIndex] {
        &self.joined
    }

    #[must_use]
    pub fn has_joined(&self, member: MemberIndex) -> bool {
        self.joined.contains(&member)
    }

    /// Append a join; flips to `QuorumReached` at `quorum_size` members.
    /// Caller is responsible for duplicate and capacity checks.
    pub fn join(&mut self, member: MemberIndex, quorum_size: usize) -> RequestStatus {
        self.joined.push(member);
        if self.joined.len() >= quorum_size {
            self.status = RequestStatus::QuorumReached;
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_flips_at_exact_count() {
        let mut req = CustodyRequest::new(PublicKey([1; 32]), 100, None);
        assert_eq!(req.join(MemberIndex(1), 3), RequestStatus::Started);
        assert_eq!(req.join(MemberIndex(2), 3), RequestStatus::Started);
        assert_eq!(req.join(MemberIndex(3), 3), RequestStatus::QuorumReached);
        assert_eq!(req.joined().len(), 3);
    }

    #[test]
    fn tracks_duplicate_membership() {
        let mut req = CustodyRequest::new(PublicKey([1; 32]), 0, None);
        req.join(MemberIndex(2), 3);
        assert!(req.has_joined(MemberIndex(2)));
        assert!(!req.has_joined(MemberIndex(1)));
    }
}
