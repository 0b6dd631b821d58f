//! In-memory bank keeper
//!
//! Implements the `BankKeeper` port over a hash map. Used by tests and by the
//! integration suite to stand in for ledger state; it also executes simple
//! sends the way the bank module does, emitting the matching events.

use crate::ports::outbound::{AddressCodec, BankKeeper};
use parking_lot::{Mutex, RwLock};
use shared_types::{AccAddress, AddressError, BlockContext, CoinError, Coins, Event, U256};
use std::collections::HashMap;
use thiserror::Error;

/// Failures of a simulated send.
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Coins(#[from] CoinError),
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Hash-map backed balances with per-address query counters.
#[derive(Default)]
pub struct InMemoryBankKeeper {
    balances: RwLock<HashMap<AccAddress, Coins>>,
    queries: Mutex<HashMap<AccAddress, usize>>,
}

impl InMemoryBankKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the holding of one denomination.
    pub fn set_balance(
        &self,
        address: &AccAddress,
        denom: &str,
        amount: U256,
    ) -> Result<(), CoinError> {
        let mut balances = self.balances.write();
        let coins = balances.entry(address.clone()).or_default();
        let current = coins.amount_of(denom);
        coins.sub(denom, current)?;
        coins.add(denom, amount)
    }

    /// Move `amount` of `denom` and record the bank events for it.
    ///
    /// Nothing is changed when the sender cannot cover the amount.
    pub fn send(
        &self,
        ctx: &mut BlockContext,
        codec: &dyn AddressCodec,
        from: &AccAddress,
        to: &AccAddress,
        denom: &str,
        amount: U256,
    ) -> Result<(), SendError> {
        let sender = codec.encode(from)?;
        let recipient = codec.encode(to)?;
        {
            let mut balances = self.balances.write();
            let mut from_coins = balances.get(from).cloned().unwrap_or_default();
            from_coins.sub(denom, amount)?;
            let mut to_coins = balances.get(to).cloned().unwrap_or_default();
            if from == to {
                to_coins = from_coins.clone();
            }
            to_coins.add(denom, amount)?;
            if from != to {
                balances.insert(from.clone(), from_coins);
            }
            balances.insert(to.clone(), to_coins);
        }

        let em = ctx.event_manager_mut();
        em.emit(Event::transfer(&sender, &recipient, &format!("{amount}{denom}")));
        em.emit(Event::bank_message(&sender, "send"));
        Ok(())
    }

    /// Balance queries served for `address` so far.
    pub fn query_count(&self, address: &AccAddress) -> usize {
        self.queries.lock().get(address).copied().unwrap_or(0)
    }

    /// Balance queries served in total.
    pub fn total_queries(&self) -> usize {
        self.queries.lock().values().sum()
    }

    pub fn reset_query_counts(&self) {
        self.queries.lock().clear();
    }
}

impl BankKeeper for InMemoryBankKeeper {
    fn get_all_balances(&self, _ctx: &BlockContext, address: &AccAddress) -> Coins {
        *self.queries.lock().entry(address.clone()).or_insert(0) += 1;
        self.balances
            .read()
            .get(address)
            .cloned()
            .unwrap_or_default()
    }
}
