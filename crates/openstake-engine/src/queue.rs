//! The unstake queue: ordered pending redemptions and the bounded drain.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use openstake_types::{Address, Amount, UnstakeRequest, UnstakeRequestId};

/// Outcome of one bounded drain invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Native asset matched against requests in this call.
    pub matched: Amount,
    /// Requests visited (the loop bound caps this).
    pub iterations: usize,
    /// Available principal left unmatched.
    pub leftover: Amount,
    /// Whether open requests remain after this call.
    pub open_remaining: bool,
}

/// FIFO collection of pending redemption requests.
///
/// Requests are keyed by globally monotonic IDs and drained strictly in ID
/// order. The drain position survives across invocations via an explicit
/// cursor (the oldest request not yet fully filled) — a drain never
/// rescans from ID zero.
pub struct UnstakeQueue {
    requests: BTreeMap<UnstakeRequestId, UnstakeRequest>,
    by_user: HashMap<Address, Vec<UnstakeRequestId>>,
    next_id: UnstakeRequestId,
    /// All requests with IDs below this are fully filled (or deleted).
    cursor: UnstakeRequestId,
}

impl UnstakeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: BTreeMap::new(),
            by_user: HashMap::new(),
            next_id: UnstakeRequestId(0),
            cursor: UnstakeRequestId(0),
        }
    }

    /// Append a new request, assigning the next global ID.
    pub fn append(
        &mut self,
        requester: Address,
        requested_at: DateTime<Utc>,
        amount_requested: Amount,
        receipt_locked: Amount,
    ) -> UnstakeRequestId {
        let id = self.next_id;
        self.next_id = id.next();
        self.requests.insert(
            id,
            UnstakeRequest::new(requester, requested_at, amount_requested, receipt_locked),
        );
        self.by_user.entry(requester).or_default().push(id);
        id
    }

    /// Delete a fully claimed request, clearing the per-user index slot.
    pub fn remove(&mut self, id: UnstakeRequestId) -> Option<UnstakeRequest> {
        let request = self.requests.remove(&id)?;
        if let Some(ids) = self.by_user.get_mut(&request.requester) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                self.by_user.remove(&request.requester);
            }
        }
        Some(request)
    }

    #[must_use]
    pub fn get(&self, id: UnstakeRequestId) -> Option<&UnstakeRequest> {
        self.requests.get(&id)
    }

    pub fn get_mut(&mut self, id: UnstakeRequestId) -> Option<&mut UnstakeRequest> {
        self.requests.get_mut(&id)
    }

    /// Live (not yet fully claimed) requests held by a user.
    #[must_use]
    pub fn open_count(&self, user: &Address) -> usize {
        self.by_user.get(user).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn ids_for(&self, user: &Address) -> Vec<UnstakeRequestId> {
        self.by_user.get(user).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Any request still waiting for principal?
    #[must_use]
    pub fn has_open(&self) -> bool {
        self.requests
            .range(self.cursor..)
            .any(|(_, req)| req.is_open())
    }

    /// Filled-but-unclaimed value across all live requests; still counted
    /// as protocol-controlled until paid out.
    #[must_use]
    pub fn total_unpaid_filled(&self) -> Amount {
        self.requests.values().map(UnstakeRequest::claimable).sum()
    }

    /// Oldest request not yet fully filled, advancing the cursor past
    /// requests filled by earlier drains.
    fn oldest_open_id(&mut self) -> Option<UnstakeRequestId> {
        let (id, _) = self
            .requests
            .range(self.cursor..)
            .find(|(_, req)| req.is_open())?;
        let id = *id;
        self.cursor = id;
        Some(id)
    }

    /// Bounded queue-drain: match `available` principal against open
    /// requests in ID order, visiting at most `loop_bound` requests.
    ///
    /// A request is left partially filled when `available` runs out; the
    /// cursor stays on it and the next invocation resumes there. Routing
    /// the leftover (carry-forward vs. restake) is the caller's concern.
    pub fn drain(&mut self, available: Amount, loop_bound: usize) -> DrainReport {
        let mut remaining = available;
        let mut matched: Amount = 0;
        let mut iterations = 0usize;

        while remaining > 0 && iterations < loop_bound {
            let Some(id) = self.oldest_open_id() else {
                break;
            };
            let request = self
                .requests
                .get_mut(&id)
                .expect("cursor points at a live request");

            let fill = request.unfilled().min(remaining);
            request.amount_filled += fill;
            remaining -= fill;
            matched += fill;
            iterations += 1;

            if !request.is_open() {
                self.cursor = id.next();
            }
        }

        DrainReport {
            matched,
            iterations,
            leftover: remaining,
            open_remaining: self.has_open(),
        }
    }
}

impl Default for UnstakeQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(seed: u8) -> Address {
        Address([seed; 20])
    }

    fn queue_with(requests: &[(u8, Amount)]) -> UnstakeQueue {
        let mut queue = UnstakeQueue::new();
        for (seed, amount) in requests {
            queue.append(user(*seed), Utc::now(), *amount, *amount);
        }
        queue
    }

    #[test]
    fn ids_are_global_and_monotonic() {
        let mut queue = UnstakeQueue::new();
        let a = queue.append(user(1), Utc::now(), 10, 10);
        let b = queue.append(user(2), Utc::now(), 10, 10);
        let c = queue.append(user(1), Utc::now(), 10, 10);
        assert_eq!(a, UnstakeRequestId(0));
        assert_eq!(b, UnstakeRequestId(1));
        // Same user's second request is non-contiguous.
        assert_eq!(c, UnstakeRequestId(2));
        assert_eq!(queue.open_count(&user(1)), 2);
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut queue = UnstakeQueue::new();
        let a = queue.append(user(1), Utc::now(), 10, 10);
        queue.remove(a);
        let b = queue.append(user(1), Utc::now(), 10, 10);
        assert_eq!(b, UnstakeRequestId(1));
        assert_eq!(queue.open_count(&user(1)), 1);
    }

    #[test]
    fn drain_fills_in_id_order() {
        let mut queue = queue_with(&[(1, 10), (2, 20), (3, 30)]);
        let report = queue.drain(25, 10);

        assert_eq!(report.matched, 25);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.leftover, 0);
        assert!(report.open_remaining);

        assert_eq!(queue.get(UnstakeRequestId(0)).unwrap().amount_filled, 10);
        assert_eq!(queue.get(UnstakeRequestId(1)).unwrap().amount_filled, 15);
        assert_eq!(queue.get(UnstakeRequestId(2)).unwrap().amount_filled, 0);
    }

    #[test]
    fn loop_bound_caps_work_and_resumes() {
        // 5 requests needing 10 each; bound 3 with exactly 30 available.
        let mut queue = queue_with(&[(1, 10), (2, 10), (3, 10), (4, 10), (5, 10)]);
        let report = queue.drain(30, 3);
        assert_eq!(report.matched, 30);
        assert_eq!(report.iterations, 3);
        assert!(report.open_remaining);
        for i in 0..3 {
            assert!(!queue.get(UnstakeRequestId(i)).unwrap().is_open());
        }
        for i in 3..5 {
            assert_eq!(queue.get(UnstakeRequestId(i)).unwrap().amount_filled, 0);
        }

        // Second call continues from request 3, not from the front.
        let report = queue.drain(20, 3);
        assert_eq!(report.matched, 20);
        assert_eq!(report.iterations, 2);
        assert!(!report.open_remaining);
        assert!(!queue.get(UnstakeRequestId(3)).unwrap().is_open());
        assert!(!queue.get(UnstakeRequestId(4)).unwrap().is_open());
    }

    #[test]
    fn bound_hit_reports_leftover() {
        let mut queue = queue_with(&[(1, 10), (2, 10), (3, 10)]);
        let report = queue.drain(25, 2);
        assert_eq!(report.matched, 20);
        assert_eq!(report.leftover, 5);
        assert!(report.open_remaining);
    }

    #[test]
    fn excess_after_all_filled_is_leftover_without_open() {
        let mut queue = queue_with(&[(1, 10)]);
        let report = queue.drain(17, 5);
        assert_eq!(report.matched, 10);
        assert_eq!(report.leftover, 7);
        assert!(!report.open_remaining);
    }

    #[test]
    fn partial_fill_keeps_cursor_in_place() {
        let mut queue = queue_with(&[(1, 10), (2, 10)]);
        let report = queue.drain(4, 5);
        assert_eq!(report.matched, 4);
        assert_eq!(queue.get(UnstakeRequestId(0)).unwrap().amount_filled, 4);

        // Resume tops up request 0 before touching request 1.
        queue.drain(8, 5);
        assert!(!queue.get(UnstakeRequestId(0)).unwrap().is_open());
        assert_eq!(queue.get(UnstakeRequestId(1)).unwrap().amount_filled, 2);
    }

    #[test]
    fn drain_skips_deleted_requests() {
        let mut queue = queue_with(&[(1, 10), (2, 10)]);
        queue.drain(10, 5);
        // Request 0 fully filled, then claimed out and deleted.
        queue.remove(UnstakeRequestId(0)).unwrap();

        let report = queue.drain(10, 5);
        assert_eq!(report.matched, 10);
        assert!(!queue.get(UnstakeRequestId(1)).unwrap().is_open());
    }

    #[test]
    fn unpaid_filled_counts_live_requests_only() {
        let mut queue = queue_with(&[(1, 10), (2, 10)]);
        queue.drain(15, 5);
        assert_eq!(queue.total_unpaid_filled(), 15);

        queue.get_mut(UnstakeRequestId(0)).unwrap().amount_claimed = 10;
        queue.remove(UnstakeRequestId(0));
        assert_eq!(queue.total_unpaid_filled(), 5);
    }
}
