//! Balance aggregation
//!
//! Builds the block's `PendingUpdateSet`: one authoritative balance per
//! distinct address named by a transfer.
//!
//! ## Invariants
//!
//! - An address is queried from the keeper at most once per block, however
//!   many events or attributes name it.
//! - A string that does not decode never reaches the keeper and never appears
//!   in the set.
//! - Keys are canonical address strings, so two spellings of one account
//!   (e.g. upper- and lower-case bech32) collapse into a single entry.
//! - Iteration order is lexicographic, independent of event order.

use crate::ports::outbound::{AddressCodec, BankKeeper};
use shared_types::{AddressError, BlockContext, Coins};
use std::collections::btree_map;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Address → post-block balance for one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUpdateSet {
    entries: BTreeMap<String, Coins>,
}

impl PendingUpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }

    pub fn get(&self, address: &str) -> Option<&Coins> {
        self.entries.get(address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical address order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Coins> {
        self.entries.iter()
    }

    pub(crate) fn entries(&self) -> &BTreeMap<String, Coins> {
        &self.entries
    }

    /// Insert unless present. Returns whether the entry was added.
    pub(crate) fn insert_new(&mut self, address: String, balance: Coins) -> bool {
        match self.entries.entry(address) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(balance);
                true
            }
        }
    }
}

/// What `ensure_present` did with one address string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Balance fetched and recorded.
    Inserted,
    /// Already recorded this block; keeper not consulted.
    AlreadyPresent,
    /// Address could not be resolved; nothing recorded.
    Skipped(AddressError),
}

/// Per-block counters reported alongside the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Address strings seen, duplicates included.
    pub addresses_seen: usize,
    /// Keeper balance queries issued.
    pub balance_queries: usize,
    /// Address strings rejected by the codec.
    pub skipped: usize,
}

/// Accumulates balances for a single block.
///
/// Constructed fresh in every `end_block` and consumed by [`finish`]; it is
/// never shared across blocks.
///
/// [`finish`]: BalanceAggregator::finish
pub struct BalanceAggregator<'a, K, A>
where
    K: BankKeeper + ?Sized,
    A: AddressCodec + ?Sized,
{
    ctx: &'a BlockContext,
    keeper: &'a K,
    codec: &'a A,
    pending: PendingUpdateSet,
    summary: AggregationSummary,
}

impl<'a, K, A> BalanceAggregator<'a, K, A>
where
    K: BankKeeper + ?Sized,
    A: AddressCodec + ?Sized,
{
    pub fn new(ctx: &'a BlockContext, keeper: &'a K, codec: &'a A) -> Self {
        Self {
            ctx,
            keeper,
            codec,
            pending: PendingUpdateSet::new(),
            summary: AggregationSummary::default(),
        }
    }

    /// Make sure `address` has an entry, fetching its balance if needed.
    ///
    /// Decode failures are logged and absorbed here; they never escalate.
    pub fn ensure_present(&mut self, address: &str) -> EnsureOutcome {
        self.summary.addresses_seen += 1;

        let canonical = match self
            .codec
            .decode(address)
            .and_then(|acc| self.codec.encode(&acc).map(|s| (acc, s)))
        {
            Ok(pair) => pair,
            Err(err) => {
                warn!(
                    block_height = self.ctx.block_height(),
                    address = %address,
                    error = %err,
                    "Cannot ensure vpurse balance"
                );
                self.summary.skipped += 1;
                return EnsureOutcome::Skipped(err);
            }
        };
        let (account, key) = canonical;

        if self.pending.contains(&key) {
            return EnsureOutcome::AlreadyPresent;
        }

        let balance = self.keeper.get_all_balances(self.ctx, &account);
        self.summary.balance_queries += 1;
        debug!(
            block_height = self.ctx.block_height(),
            address = %key,
            balance = %balance,
            "Recorded vpurse balance"
        );
        self.pending.insert_new(key, balance);
        EnsureOutcome::Inserted
    }

    /// Feed every address of an iterator through `ensure_present`.
    pub fn extend<I, S>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for address in addresses {
            self.ensure_present(address.as_ref());
        }
    }

    /// Entries collected so far.
    pub fn pending(&self) -> &PendingUpdateSet {
        &self.pending
    }

    /// Release the set and the block's counters.
    pub fn finish(self) -> (PendingUpdateSet, AggregationSummary) {
        (self.pending, self.summary)
    }
}
