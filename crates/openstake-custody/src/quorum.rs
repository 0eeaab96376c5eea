//! The custody quorum: owns groups, generated keys, and pending requests.

use std::collections::HashMap;

use openstake_types::{
    AccessControl, Address, Amount, CustodyEvent, CustodyRequestId, GroupId, MemberIndex,
    OpenstakeError, PublicKey, Result, Role, ValidatorId, require_role,
};

use crate::group::{CustodyGroup, GroupPhase};
use crate::keys::GeneratedKey;
use crate::requests::{CustodyRequest, RequestStatus};

/// Result of a member joining a custody request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Join recorded; quorum not yet reached.
    Pending { joined: usize },
    /// Quorum reached with this join: the operation is authorized and the
    /// settlement flow may act on the carried fund-movement details.
    Authorized { amount: Amount },
}

/// Coordination state for all custody groups.
///
/// All entry points take `&mut self`; the surrounding environment
/// serializes operations whole, so no internal locking exists.
pub struct CustodyQuorum {
    groups: HashMap<GroupId, (CustodyGroup, GroupPhase)>,
    /// Generated keys by reported public identity. A key reported under
    /// one group cannot be re-reported under another.
    keys: HashMap<PublicKey, GeneratedKey>,
    requests: HashMap<CustodyRequestId, CustodyRequest>,
    next_request_id: CustodyRequestId,
    /// Most recently confirmed key; its derived address is the dispatch
    /// target for new stakes.
    active_key: Option<PublicKey>,
    events: Vec<CustodyEvent>,
}

impl CustodyQuorum {
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            keys: HashMap::new(),
            requests: HashMap::new(),
            next_request_id: CustodyRequestId(0),
            active_key: None,
            events: Vec::new(),
        }
    }

    // =====================================================================
    // Group formation
    // =====================================================================

    /// Register a custody group. Admin-gated.
    ///
    /// # Errors
    /// - `RoleRequired` without the admin role
    /// - `GroupTooSmall` / `InvalidThreshold` from validation
    /// - `AttemptToReaddGroup` when identical membership + threshold exists
    pub fn create_group(
        &mut self,
        roles: &dyn AccessControl,
        caller: &Address,
        members: Vec<PublicKey>,
        threshold: usize,
    ) -> Result<GroupId> {
        require_role(roles, Role::Admin, caller)?;

        let group = CustodyGroup::new(members, threshold)?;
        let group_id = group.id();
        if self.groups.contains_key(&group_id) {
            return Err(OpenstakeError::AttemptToReaddGroup(group_id));
        }

        tracing::info!(%group_id, size = group.size(), threshold, "custody group registered");
        self.events.push(CustodyEvent::GroupCreated {
            group: group_id,
            size: group.size(),
            threshold,
        });
        self.groups.insert(group_id, (group, GroupPhase::Registered));
        Ok(group_id)
    }

    /// Signal off-core participants to begin key generation. Admin-gated,
    /// purely advisory: no state change beyond the phase and the event.
    pub fn request_keygen(
        &mut self,
        roles: &dyn AccessControl,
        caller: &Address,
        group_id: GroupId,
    ) -> Result<()> {
        require_role(roles, Role::Admin, caller)?;

        let (_, phase) = self
            .groups
            .get_mut(&group_id)
            .ok_or(OpenstakeError::GroupNotFound(group_id))?;
        if *phase == GroupPhase::Registered {
            *phase = GroupPhase::KeygenRequested;
        }

        tracing::info!(%group_id, "keygen requested");
        self.events.push(CustodyEvent::KeygenRequested { group: group_id });
        Ok(())
    }

    // =====================================================================
    // Key confirmation
    // =====================================================================

    /// A member reports the key its group generated.
    ///
    /// The caller's address must derive from the stored identity at
    /// `member_index`. When all members have reported the identical key it
    /// becomes confirmed and active; repeat reports before confirmation are
    /// idempotent.
    ///
    /// # Errors
    /// - `GroupNotFound` for unknown groups
    /// - `InvalidGroupMembership` on index or derivation mismatch, or when
    ///   the key is already owned by a different group
    /// - `AttemptToReconfirmKey` once the key is fully confirmed
    pub fn report_generated_key(
        &mut self,
        caller: &Address,
        group_id: GroupId,
        member_index: MemberIndex,
        generated_key: PublicKey,
    ) -> Result<()> {
        let (group, phase) = self
            .groups
            .get_mut(&group_id)
            .ok_or(OpenstakeError::GroupNotFound(group_id))?;
        group.verify_member(caller, member_index)?;
        let slot = member_index
            .slot(group.size())
            .ok_or(OpenstakeError::InvalidGroupMembership)?;

        let entry = self
            .keys
            .entry(generated_key)
            .or_insert_with(|| GeneratedKey::new(group_id, generated_key, group.size()));
        if entry.group() != group_id {
            return Err(OpenstakeError::InvalidGroupMembership);
        }
        if entry.is_confirmed() {
            return Err(OpenstakeError::AttemptToReconfirmKey);
        }

        if entry.record_confirmation(slot) {
            *phase = GroupPhase::KeyConfirmed;
            self.active_key = Some(generated_key);
            let custody_address = generated_key.derive_address();
            tracing::info!(%group_id, key = %generated_key, %custody_address, "custody key confirmed");
            self.events.push(CustodyEvent::KeyConfirmed {
                group: group_id,
                key: generated_key,
                custody_address,
            });
        } else {
            tracing::debug!(
                %group_id,
                %member_index,
                confirmations = entry.confirmation_count(),
                "key confirmation recorded"
            );
        }
        Ok(())
    }

    // =====================================================================
    // Fund-movement requests
    // =====================================================================

    /// Open a quorum-gated request against a confirmed key. Engine-facing.
    ///
    /// # Errors
    /// `KeyNotFound` unless the key exists and is confirmed.
    pub fn open_stake_request(
        &mut self,
        key: PublicKey,
        amount: Amount,
        validator: Option<ValidatorId>,
    ) -> Result<CustodyRequestId> {
        if !self.keys.get(&key).is_some_and(GeneratedKey::is_confirmed) {
            return Err(OpenstakeError::KeyNotFound);
        }

        let request_id = self.next_request_id;
        self.next_request_id = request_id.next();
        self.requests
            .insert(request_id, CustodyRequest::new(key, amount, validator));

        tracing::info!(%request_id, %key, amount, "custody request opened");
        self.events.push(CustodyEvent::StakeRequestStarted {
            request: request_id,
            key,
            amount,
        });
        Ok(request_id)
    }

    /// A member joins a pending request. At exactly `threshold + 1` joins
    /// the operation is authorized.
    ///
    /// # Errors
    /// - `RequestNotFound` / `KeyNotFound` / `GroupNotFound` for missing state
    /// - `QuorumAlreadyReached` past `threshold + 1` joins
    /// - `InvalidGroupMembership` on identity mismatch
    /// - `AttemptToRejoin` for duplicate joins
    pub fn join_request(
        &mut self,
        caller: &Address,
        request_id: CustodyRequestId,
        member_index: MemberIndex,
    ) -> Result<JoinOutcome> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(OpenstakeError::RequestNotFound(request_id))?;
        let key = self
            .keys
            .get(&request.key())
            .filter(|k| k.is_confirmed())
            .ok_or(OpenstakeError::KeyNotFound)?;
        let (group, _) = self
            .groups
            .get(&key.group())
            .ok_or(OpenstakeError::GroupNotFound(key.group()))?;

        if request.status() == RequestStatus::QuorumReached {
            return Err(OpenstakeError::QuorumAlreadyReached(request_id));
        }
        group.verify_member(caller, member_index)?;
        if request.has_joined(member_index) {
            return Err(OpenstakeError::AttemptToRejoin {
                member: member_index,
            });
        }

        let status = request.join(member_index, group.quorum_size());
        let joined = request.joined().len();
        self.events.push(CustodyEvent::RequestJoined {
            request: request_id,
            member: member_index,
            joined,
        });

        if status == RequestStatus::QuorumReached {
            let amount = request.amount();
            let key = request.key();
            tracing::info!(%request_id, amount, "quorum reached, operation authorized");
            if amount > 0 {
                self.events.push(CustodyEvent::StakeAuthorized {
                    request: request_id,
                    key,
                    amount,
                });
            }
            Ok(JoinOutcome::Authorized { amount })
        } else {
            tracing::debug!(%request_id, %member_index, joined, "request joined");
            Ok(JoinOutcome::Pending { joined })
        }
    }

    // =====================================================================
    // Read surface
    // =====================================================================

    /// The currently active (most recently confirmed) key.
    #[must_use]
    pub fn active_key(&self) -> Option<PublicKey> {
        self.active_key
    }

    /// Dispatch target derived from the active key.
    #[must_use]
    pub fn active_custody_address(&self) -> Option<Address> {
        self.active_key.map(|k| k.derive_address())
    }

    #[must_use]
    pub fn group(&self, group_id: &GroupId) -> Option<&CustodyGroup> {
        self.groups.get(group_id).map(|(g, _)| g)
    }

    #[must_use]
    pub fn group_phase(&self, group_id: &GroupId) -> Option<GroupPhase> {
        self.groups.get(group_id).map(|(_, p)| *p)
    }

    #[must_use]
    pub fn key(&self, key: &PublicKey) -> Option<&GeneratedKey> {
        self.keys.get(key)
    }

    #[must_use]
    pub fn request(&self, id: &CustodyRequestId) -> Option<&CustodyRequest> {
        self.requests.get(id)
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<CustodyEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for CustodyQuorum {
    fn default() -> Self {
        Self::new()
    }
}
