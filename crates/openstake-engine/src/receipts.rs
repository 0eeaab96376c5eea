//! The receipt-token ledger.
//!
//! Non-rebasing: balances never change automatically, value accrues via the
//! exchange rate. Only the mint / escrow / burn surface the settlement
//! engine needs is modeled here; transfer and approval bookkeeping live
//! with the external token collaborator.

use std::collections::HashMap;

use openstake_types::{Address, Amount, OpenstakeError, Result};

/// Tracks free and escrow-locked receipt balances per holder.
///
/// Total supply includes escrowed receipts until they are burned on full
/// claim — the exchange rate must see them as outstanding.
pub struct ReceiptLedger {
    free: HashMap<Address, Amount>,
    locked: HashMap<Address, Amount>,
    total_supply: Amount,
}

impl ReceiptLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            free: HashMap::new(),
            locked: HashMap::new(),
            total_supply: 0,
        }
    }

    /// Mint receipts to a holder.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if total supply would overflow.
    pub fn mint(&mut self, holder: Address, amount: Amount) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(OpenstakeError::ArithmeticOverflow)?;
        *self.free.entry(holder).or_insert(0) += amount;
        Ok(())
    }

    /// Move receipts from a holder's free balance into escrow.
    ///
    /// # Errors
    /// `InsufficientReceipts` if the free balance is short.
    pub fn lock(&mut self, holder: Address, amount: Amount) -> Result<()> {
        let free = self.free.entry(holder).or_insert(0);
        if *free < amount {
            return Err(OpenstakeError::InsufficientReceipts {
                needed: amount,
                available: *free,
            });
        }
        *free -= amount;
        *self.locked.entry(holder).or_insert(0) += amount;
        Ok(())
    }

    /// Return escrowed receipts to the holder's free balance.
    ///
    /// # Errors
    /// `InsufficientLocked` if the escrow balance is short.
    pub fn unlock(&mut self, holder: Address, amount: Amount) -> Result<()> {
        let locked = self.locked.entry(holder).or_insert(0);
        if *locked < amount {
            return Err(OpenstakeError::InsufficientLocked);
        }
        *locked -= amount;
        *self.free.entry(holder).or_insert(0) += amount;
        Ok(())
    }

    /// Burn escrowed receipts, shrinking total supply. Called on full claim.
    ///
    /// # Errors
    /// `InsufficientLocked` if the escrow balance is short.
    pub fn burn_locked(&mut self, holder: Address, amount: Amount) -> Result<()> {
        let locked = self.locked.entry(holder).or_insert(0);
        if *locked < amount {
            return Err(OpenstakeError::InsufficientLocked);
        }
        *locked -= amount;
        self.total_supply -= amount;
        Ok(())
    }

    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> Amount {
        self.free.get(holder).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn locked_of(&self, holder: &Address) -> Amount {
        self.locked.get(holder).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }
}

impl Default for ReceiptLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(seed: u8) -> Address {
        Address([seed; 20])
    }

    #[test]
    fn mint_and_lock() {
        let mut ledger = ReceiptLedger::new();
        ledger.mint(holder(1), 100).unwrap();
        assert_eq!(ledger.balance_of(&holder(1)), 100);
        assert_eq!(ledger.total_supply(), 100);

        ledger.lock(holder(1), 60).unwrap();
        assert_eq!(ledger.balance_of(&holder(1)), 40);
        assert_eq!(ledger.locked_of(&holder(1)), 60);
        // Escrowed receipts still count toward supply.
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn lock_insufficient_rejected() {
        let mut ledger = ReceiptLedger::new();
        ledger.mint(holder(1), 50).unwrap();
        let err = ledger.lock(holder(1), 51).unwrap_err();
        assert!(matches!(
            err,
            OpenstakeError::InsufficientReceipts {
                needed: 51,
                available: 50
            }
        ));
        // Nothing changed.
        assert_eq!(ledger.balance_of(&holder(1)), 50);
    }

    #[test]
    fn burn_locked_shrinks_supply() {
        let mut ledger = ReceiptLedger::new();
        ledger.mint(holder(1), 100).unwrap();
        ledger.lock(holder(1), 100).unwrap();
        ledger.burn_locked(holder(1), 100).unwrap();
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.locked_of(&holder(1)), 0);
    }

    #[test]
    fn unlock_returns_to_free() {
        let mut ledger = ReceiptLedger::new();
        ledger.mint(holder(2), 30).unwrap();
        ledger.lock(holder(2), 30).unwrap();
        ledger.unlock(holder(2), 10).unwrap();
        assert_eq!(ledger.balance_of(&holder(2)), 10);
        assert_eq!(ledger.locked_of(&holder(2)), 20);

        let err = ledger.burn_locked(holder(2), 25).unwrap_err();
        assert!(matches!(err, OpenstakeError::InsufficientLocked));
    }

    #[test]
    fn holders_are_independent() {
        let mut ledger = ReceiptLedger::new();
        ledger.mint(holder(1), 10).unwrap();
        ledger.mint(holder(2), 20).unwrap();
        assert_eq!(ledger.total_supply(), 30);
        assert!(ledger.lock(holder(1), 15).is_err());
    }
}
