//! The settlement engine: deposits, stake dispatch, inflow intake, claims.
//!
//! All entry points take `&mut self` and run to completion before the next
//! begins — atomicity comes from whole-operation serialization, and every
//! rejection leaves state untouched. Internal counters are always mutated
//! before any outward payout is recorded, so re-entry has nothing to
//! exploit.

use chrono::{DateTime, Duration, Utc};

use openstake_custody::CustodyQuorum;
use openstake_types::{
    AccessControl, Address, Amount, BASIS_POINTS, FeeSplitter, OpenstakeError, PoolConfig,
    PoolEvent, Result, Role, UnstakeRequest, UnstakeRequestId, ValidatorSelector, require_role,
};

use crate::conservation::ConservationTracker;
use crate::queue::{DrainReport, UnstakeQueue};
use crate::receipts::ReceiptLedger;

/// Orchestrates the exchange-rate ledger, the unstake queue, and custody
/// dispatch. Owns the three pool counters.
pub struct SettlementEngine {
    config: PoolConfig,
    receipts: ReceiptLedger,
    queue: UnstakeQueue,
    conservation: ConservationTracker,

    /// Total native-asset value the protocol is accountable for: staked +
    /// pending + unclaimed-filled, excluding amounts already claimed.
    protocol_controlled_value: Amount,
    /// Collected from users and reward inflows, not yet forwarded to custody.
    pending_stake_value: Amount,
    /// Principal received from custody that no open request could absorb
    /// within the loop bound; carried into the next drain.
    pending_unstake_fill_value: Amount,

    /// Native asset physically held by the engine.
    native_held: Amount,
    /// Force-funded value outside any deposit path. Held, but excluded
    /// from `protocol_controlled_value` so it can never move the rate.
    untracked_received: Amount,

    events: Vec<PoolEvent>,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            receipts: ReceiptLedger::new(),
            queue: UnstakeQueue::new(),
            conservation: ConservationTracker::new(),
            protocol_controlled_value: 0,
            pending_stake_value: 0,
            pending_unstake_fill_value: 0,
            native_held: 0,
            untracked_received: 0,
            events: Vec::new(),
        }
    }

    // =====================================================================
    // Deposits and stake dispatch
    // =====================================================================

    /// Accept a native-asset deposit, minting receipts at the current rate.
    ///
    /// # Errors
    /// - `ZeroAmount`
    /// - `DepositCeilingExceeded` past the configured maximum controlled value
    pub fn deposit(&mut self, caller: Address, amount: Amount) -> Result<Amount> {
        if amount == 0 {
            return Err(OpenstakeError::ZeroAmount);
        }
        let would_control = self
            .protocol_controlled_value
            .checked_add(amount)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        if would_control > self.config.deposit_ceiling {
            return Err(OpenstakeError::DepositCeilingExceeded {
                would_control,
                ceiling: self.config.deposit_ceiling,
            });
        }

        // Rate is read before the counters move.
        let receipts_minted = openstake_rate::receipts_for_assets(
            amount,
            self.protocol_controlled_value,
            self.receipts.total_supply(),
        )?;
        self.receipts.mint(caller, receipts_minted)?;
        self.protocol_controlled_value = would_control;
        self.pending_stake_value += amount;
        self.native_held += amount;
        self.conservation.record_inflow(amount)?;

        tracing::info!(user = %caller, amount, receipts_minted, "deposit accepted");
        self.events.push(PoolEvent::Deposited {
            user: caller,
            amount,
            receipts_minted,
        });
        Ok(receipts_minted)
    }

    /// Forward pending stake to the custody group's active address, one
    /// custody request per validator allocation. Returns the total
    /// dispatched; any remainder stays pending.
    ///
    /// # Errors
    /// - `KeyNotFound` without a confirmed active custody key
    /// - `NoAvailableValidators` when the oracle returns nothing while more
    ///   than the minimum batch is pending
    pub fn initiate_stake(
        &mut self,
        custody: &mut CustodyQuorum,
        selector: &dyn ValidatorSelector,
    ) -> Result<Amount> {
        let active_key = custody.active_key().ok_or(OpenstakeError::KeyNotFound)?;
        let custody_address = active_key.derive_address();

        if self.pending_stake_value == 0 {
            return Ok(0);
        }
        let plan = selector.select_validators_for_stake(self.pending_stake_value);
        if plan.allocations.is_empty() {
            if self.pending_stake_value > self.config.min_stake_batch {
                return Err(OpenstakeError::NoAvailableValidators);
            }
            return Ok(0);
        }

        let mut dispatched: Amount = 0;
        for allocation in plan.allocations {
            // Never dispatch more than is actually pending.
            let amount = allocation.amount.min(self.pending_stake_value);
            if amount == 0 {
                continue;
            }
            let custody_request =
                custody.open_stake_request(active_key, amount, Some(allocation.validator.clone()))?;
            self.pending_stake_value -= amount;
            self.native_held -= amount;
            dispatched += amount;

            tracing::info!(
                validator = %allocation.validator,
                amount,
                %custody_address,
                "stake dispatched to custody"
            );
            self.events.push(PoolEvent::StakeDispatched {
                validator: allocation.validator,
                amount,
                custody_address,
                custody_request,
            });
        }
        Ok(dispatched)
    }

    // =====================================================================
    // Redemption requests
    // =====================================================================

    /// Escrow receipts and append a redemption request at the current rate.
    ///
    /// The owed amount is locked in at this instant; later rate movements
    /// never change it.
    ///
    /// # Errors
    /// - `ZeroAmount` for zero receipts, or when the owed value floors to zero
    /// - `TooManyOpenRequests` at the per-user cap
    /// - `InsufficientReceipts` if the caller's free balance is short
    pub fn request_withdrawal(
        &mut self,
        caller: Address,
        receipt_amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<UnstakeRequestId> {
        if receipt_amount == 0 {
            return Err(OpenstakeError::ZeroAmount);
        }
        let max = self.config.max_open_requests_per_user;
        if self.queue.open_count(&caller) >= max {
            return Err(OpenstakeError::TooManyOpenRequests { max });
        }

        let amount_requested = openstake_rate::assets_for_receipts(
            receipt_amount,
            self.protocol_controlled_value,
            self.receipts.total_supply(),
        )?;
        // Owed value floored to zero could never be claimed out; reject
        // rather than strand the escrowed receipts.
        if amount_requested == 0 {
            return Err(OpenstakeError::ZeroAmount);
        }
        self.receipts.lock(caller, receipt_amount)?;
        let request = self
            .queue
            .append(caller, now, amount_requested, receipt_amount);

        tracing::info!(%request, requester = %caller, receipt_amount, amount_requested, "withdrawal requested");
        self.events.push(PoolEvent::WithdrawalRequested {
            request,
            requester: caller,
            receipt_amount,
            amount_requested,
        });
        Ok(request)
    }

    // =====================================================================
    // Custody inflows
    // =====================================================================

    /// Principal returned from custody. Drains the queue under the loop
    /// bound; unmatched principal carries forward (or restakes when no
    /// open request remains). `protocol_controlled_value` is untouched —
    /// fills reduce it only at claim time.
    ///
    /// # Errors
    /// - `RoleRequired` unless the caller is the custody forwarder
    /// - `ZeroAmount`
    pub fn claim_unstaked_principals(
        &mut self,
        roles: &dyn AccessControl,
        caller: &Address,
        amount: Amount,
    ) -> Result<DrainReport> {
        require_role(roles, Role::Custodian, caller)?;
        if amount == 0 {
            return Err(OpenstakeError::ZeroAmount);
        }

        // Every fallible step precedes the first counter change.
        let new_held = self
            .native_held
            .checked_add(amount)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        let available = amount
            .checked_add(self.pending_unstake_fill_value)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        self.conservation.record_inflow(amount)?;
        self.native_held = new_held;
        let report = self.run_drain(available);

        tracing::info!(amount, matched = report.matched, "unstaked principals received");
        self.events.push(PoolEvent::PrincipalsReceived {
            amount,
            matched: report.matched,
        });
        Ok(report)
    }

    /// Rewards returned from custody. Takes the protocol fee, accounts the
    /// net remainder as new controlled value, and offers it to the queue
    /// before it is restaked.
    ///
    /// # Errors
    /// - `RoleRequired` unless the caller is the custody forwarder
    /// - `ZeroAmount`
    /// - `InvalidFeeBps` when the configured fee exceeds 100%
    pub fn claim_rewards(
        &mut self,
        roles: &dyn AccessControl,
        caller: &Address,
        gross: Amount,
        fee_split: &mut dyn FeeSplitter,
    ) -> Result<DrainReport> {
        require_role(roles, Role::Custodian, caller)?;
        if gross == 0 {
            return Err(OpenstakeError::ZeroAmount);
        }
        let bps = self.config.protocol_fee_bps;
        if Amount::from(bps) > BASIS_POINTS {
            return Err(OpenstakeError::InvalidFeeBps { bps });
        }

        // bps <= BASIS_POINTS guarantees fee <= gross.
        let fee = gross
            .checked_mul(Amount::from(bps))
            .ok_or(OpenstakeError::ArithmeticOverflow)?
            / BASIS_POINTS;
        let net = gross - fee;

        // Every fallible step precedes the first counter change.
        let new_held = self
            .native_held
            .checked_add(net)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        let new_controlled = self
            .protocol_controlled_value
            .checked_add(net)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        let available = net
            .checked_add(self.pending_unstake_fill_value)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        self.conservation.record_inflow(net)?;

        // Fee is forwarded before the remainder enters the pool.
        if fee > 0 {
            fee_split.distribute(fee);
            self.events.push(PoolEvent::FeeTaken { amount: fee });
        }
        self.native_held = new_held;
        self.protocol_controlled_value = new_controlled;
        let report = self.run_drain(available);

        tracing::info!(gross, fee, net, matched = report.matched, "rewards received");
        self.events.push(PoolEvent::RewardsReceived { gross, net });
        Ok(report)
    }

    /// Shared drain over `available` (carried-over principal already
    /// included by the caller), routing the leftover.
    fn run_drain(&mut self, available: Amount) -> DrainReport {
        self.pending_unstake_fill_value = 0;

        let report = self.queue.drain(available, self.config.drain_loop_bound);
        if report.leftover > 0 {
            if report.open_remaining {
                // Loop bound hit: carry forward, resume next call.
                self.pending_unstake_fill_value = report.leftover;
            } else {
                // Nothing left to fill: excess restakes.
                self.pending_stake_value += report.leftover;
            }
        }
        report
    }

    // =====================================================================
    // Claims
    // =====================================================================

    /// Pay out a filled portion of a request to its creator. On full claim
    /// the escrowed receipts are burned and the request deleted.
    ///
    /// # Errors
    /// - `UnstakeRequestNotFound`
    /// - `NotRequester` for anyone but the creator
    /// - `ClaimTooSoon` before the minimum wait elapses
    /// - `ZeroAmount`
    /// - `ClaimTooLarge` past the filled-but-unclaimed portion
    pub fn claim(
        &mut self,
        caller: Address,
        request_id: UnstakeRequestId,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let min_wait = Duration::seconds(self.config.min_claim_wait_secs);
        let request = self
            .queue
            .get(request_id)
            .ok_or(OpenstakeError::UnstakeRequestNotFound(request_id))?;
        if request.requester != caller {
            return Err(OpenstakeError::NotRequester(request_id));
        }
        let claimable_at = request.requested_at + min_wait;
        if now < claimable_at {
            return Err(OpenstakeError::ClaimTooSoon {
                remaining_secs: (claimable_at - now).num_seconds(),
            });
        }
        if amount == 0 {
            return Err(OpenstakeError::ZeroAmount);
        }
        let claimable = request.claimable();
        if amount > claimable {
            return Err(OpenstakeError::ClaimTooLarge { amount, claimable });
        }

        // All counters move before the payout is recorded.
        let request = self
            .queue
            .get_mut(request_id)
            .expect("request existence checked above");
        request.amount_claimed += amount;
        let completed = request.is_fully_claimed();
        let receipt_locked = request.receipt_locked;

        self.protocol_controlled_value = self
            .protocol_controlled_value
            .checked_sub(amount)
            .ok_or(OpenstakeError::BalanceUnderflow)?;
        self.native_held = self
            .native_held
            .checked_sub(amount)
            .ok_or(OpenstakeError::BalanceUnderflow)?;
        self.conservation.record_claim(amount);

        tracing::info!(%request_id, requester = %caller, amount, completed, "claim paid");
        self.events.push(PoolEvent::Claimed {
            request: request_id,
            requester: caller,
            amount,
        });

        if completed {
            self.receipts.burn_locked(caller, receipt_locked)?;
            self.queue.remove(request_id);
            self.events.push(PoolEvent::RequestCompleted {
                request: request_id,
                receipts_burned: receipt_locked,
            });
        }
        Ok(())
    }

    // =====================================================================
    // Unattributed value
    // =====================================================================

    /// Absorb native asset that arrived outside any deposit path. Held,
    /// but never accounted as controlled value: the rate cannot be pushed
    /// below the unity floor by force-funding.
    pub fn receive_unattributed(&mut self, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(OpenstakeError::ZeroAmount);
        }
        self.native_held += amount;
        self.untracked_received += amount;
        tracing::warn!(amount, "unattributed native asset received");
        self.events.push(PoolEvent::UnattributedReceived { amount });
        Ok(())
    }

    // =====================================================================
    // Admin configuration
    // =====================================================================

    /// Adjust the queue-drain loop bound. Admin-gated; must be ≥ 1.
    pub fn set_drain_loop_bound(
        &mut self,
        roles: &dyn AccessControl,
        caller: &Address,
        bound: usize,
    ) -> Result<()> {
        require_role(roles, Role::Admin, caller)?;
        if bound == 0 {
            return Err(OpenstakeError::InvalidLoopBound);
        }
        tracing::info!(bound, "drain loop bound updated");
        self.config.drain_loop_bound = bound;
        Ok(())
    }

    /// Adjust the deposit ceiling. Admin-gated.
    pub fn set_deposit_ceiling(
        &mut self,
        roles: &dyn AccessControl,
        caller: &Address,
        ceiling: Amount,
    ) -> Result<()> {
        require_role(roles, Role::Admin, caller)?;
        tracing::info!(ceiling, "deposit ceiling updated");
        self.config.deposit_ceiling = ceiling;
        Ok(())
    }

    // =====================================================================
    // Read surface
    // =====================================================================

    #[must_use]
    pub fn protocol_controlled_value(&self) -> Amount {
        self.protocol_controlled_value
    }

    #[must_use]
    pub fn pending_stake_value(&self) -> Amount {
        self.pending_stake_value
    }

    #[must_use]
    pub fn pending_unstake_fill_value(&self) -> Amount {
        self.pending_unstake_fill_value
    }

    #[must_use]
    pub fn native_held(&self) -> Amount {
        self.native_held
    }

    #[must_use]
    pub fn untracked_received(&self) -> Amount {
        self.untracked_received
    }

    /// Receipts per [`openstake_types::ONE_UNIT`] of native asset, right now.
    pub fn asset_to_receipt_rate(&self) -> Result<Amount> {
        openstake_rate::asset_to_receipt_rate(
            self.protocol_controlled_value,
            self.receipts.total_supply(),
        )
    }

    /// Native asset per [`openstake_types::ONE_UNIT`] of receipts, right now.
    pub fn receipt_to_asset_rate(&self) -> Result<Amount> {
        openstake_rate::receipt_to_asset_rate(
            self.protocol_controlled_value,
            self.receipts.total_supply(),
        )
    }

    #[must_use]
    pub fn receipts(&self) -> &ReceiptLedger {
        &self.receipts
    }

    #[must_use]
    pub fn request(&self, id: UnstakeRequestId) -> Option<&UnstakeRequest> {
        self.queue.get(id)
    }

    #[must_use]
    pub fn open_request_count(&self, user: &Address) -> usize {
        self.queue.open_count(user)
    }

    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Verify the conservation inequality against current state.
    ///
    /// # Errors
    /// `ConservationViolation` when owed value exceeds lifetime inflows.
    pub fn verify_conservation(&self) -> Result<()> {
        self.conservation.verify(
            self.pending_stake_value,
            self.pending_unstake_fill_value,
            self.queue.total_unpaid_filled(),
        )
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }
}
