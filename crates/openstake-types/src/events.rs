//! Informational events exposed to collaborators and observers.
//!
//! Events carry the literal amounts and identifiers involved. They are
//! informational, never authoritative state. Components buffer them and
//! observers drain via `take_events()`.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::{
    Address, CustodyRequestId, GroupId, MemberIndex, PublicKey, UnstakeRequestId, ValidatorId,
};

/// Events emitted by the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    Deposited {
        user: Address,
        amount: Amount,
        receipts_minted: Amount,
    },
    StakeDispatched {
        validator: ValidatorId,
        amount: Amount,
        custody_address: Address,
        custody_request: CustodyRequestId,
    },
    WithdrawalRequested {
        request: UnstakeRequestId,
        requester: Address,
        receipt_amount: Amount,
        amount_requested: Amount,
    },
    PrincipalsReceived {
        amount: Amount,
        matched: Amount,
    },
    RewardsReceived {
        gross: Amount,
        net: Amount,
    },
    FeeTaken {
        amount: Amount,
    },
    Claimed {
        request: UnstakeRequestId,
        requester: Address,
        amount: Amount,
    },
    RequestCompleted {
        request: UnstakeRequestId,
        receipts_burned: Amount,
    },
    UnattributedReceived {
        amount: Amount,
    },
}

/// Events emitted by the custody quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustodyEvent {
    GroupCreated {
        group: GroupId,
        size: usize,
        threshold: usize,
    },
    KeygenRequested {
        group: GroupId,
    },
    KeyConfirmed {
        group: GroupId,
        key: PublicKey,
        custody_address: Address,
    },
    StakeRequestStarted {
        request: CustodyRequestId,
        key: PublicKey,
        amount: Amount,
    },
    RequestJoined {
        request: CustodyRequestId,
        member: MemberIndex,
        joined: usize,
    },
    /// Quorum reached on a fund-movement request: the settlement flow may
    /// now trust the custody-originated transfer.
    StakeAuthorized {
        request: CustodyRequestId,
        key: PublicKey,
        amount: Amount,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_event_serde_roundtrip() {
        let ev = PoolEvent::Deposited {
            user: Address([3; 20]),
            amount: 10,
            receipts_minted: 10,
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: PoolEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }

    #[test]
    fn custody_event_serde_roundtrip() {
        let ev = CustodyEvent::StakeAuthorized {
            request: CustodyRequestId(4),
            key: PublicKey([9; 32]),
            amount: 77,
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: CustodyEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
