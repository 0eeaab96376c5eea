//! Generated-key confirmation tracking.

use serde::{Deserialize, Serialize};

use openstake_types::{GroupId, PublicKey};

/// A custody-held key reported by group members.
///
/// Confirmation is all-or-nothing: the key becomes `confirmed` only when
/// every member of the owning group has reported this identical public
/// identity. Members reporting a different value accumulate confirmations
/// on a separate entry that can never complete alongside this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedKey {
    group: GroupId,
    key: PublicKey,
    /// Per-member confirmation bitmap, indexed by member slot.
    confirmations: Vec<bool>,
    confirmed: bool,
}

impl GeneratedKey {
    #[must_use]
    pub fn new(group: GroupId, key: PublicKey, group_size: usize) -> Self {
        Self {
            group,
            key,
            confirmations: vec![false; group_size],
            confirmed: false,
        }
    }

    #[must_use]
    pub fn group(&self) -> GroupId {
        self.group
    }

    #[must_use]
    pub fn key(&self) -> PublicKey {
        self.key
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    #[must_use]
    pub fn confirmation_count(&self) -> usize {
        self.confirmations.iter().filter(|c| **c).count()
    }

    /// Record a member's confirmation (idempotent before confirmation).
    /// Returns `true` when this report completes the bitmap, flipping the
    /// key to confirmed.
    pub fn record_confirmation(&mut self, slot: usize) -> bool {
        self.confirmations[slot] = true;
        if self.confirmations.iter().all(|c| *c) {
            self.confirmed = true;
        }
        self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> GeneratedKey {
        GeneratedKey::new(GroupId([0; 32]), PublicKey([1; 32]), 3)
    }

    #[test]
    fn confirms_only_when_all_report() {
        let mut k = key();
        assert!(!k.record_confirmation(0));
        assert!(!k.record_confirmation(2));
        assert_eq!(k.confirmation_count(), 2);
        assert!(!k.is_confirmed());

        assert!(k.record_confirmation(1));
        assert!(k.is_confirmed());
    }

    #[test]
    fn repeat_report_is_idempotent() {
        let mut k = key();
        k.record_confirmation(0);
        k.record_confirmation(0);
        assert_eq!(k.confirmation_count(), 1);
        assert!(!k.is_confirmed());
    }
}
