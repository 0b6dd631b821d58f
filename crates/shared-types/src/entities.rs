//! # Core Ledger Entities
//!
//! Account identifiers and multi-denomination balances as they are read from
//! ledger state and mirrored to the controller.
//!
//! ## Clusters
//!
//! - **Accounts**: `AccAddress`
//! - **Balances**: `Coin`, `Coins` (a balance snapshot)

use crate::errors::CoinError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Re-export U256 from primitive-types for amounts across all crates
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: ACCOUNTS
// =============================================================================

/// Maximum length of an account address in bytes.
pub const MAX_ADDRESS_LEN: usize = 255;

/// A ledger-native account identifier.
///
/// Addresses travel through events as human-readable strings (bech32 or hex)
/// and are resolved to this raw form by an address codec before any state
/// lookup. Module accounts use 32 bytes, user accounts 20, so the length is
/// not fixed.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccAddress(Vec<u8>);

impl AccAddress {
    /// Build an address from raw bytes.
    ///
    /// Returns `None` for an empty input or one longer than `MAX_ADDRESS_LEN`.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() || bytes.len() > MAX_ADDRESS_LEN {
            return None;
        }
        Some(Self(bytes))
    }

    /// Borrow the raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the address.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an `AccAddress` is never constructed empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for AccAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccAddress({})", hex::encode(&self.0))
    }
}

// =============================================================================
// CLUSTER B: BALANCES
// =============================================================================

/// A single (denomination, amount) holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Currency unit identifier, e.g. `ubld`.
    pub denom: String,
    /// Non-negative amount, serialized as a decimal string.
    #[serde(with = "decimal_u256")]
    pub amount: U256,
}

impl Coin {
    /// Create a coin, validating the denomination.
    pub fn new(denom: impl Into<String>, amount: impl Into<U256>) -> Result<Self, CoinError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self {
            denom,
            amount: amount.into(),
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Denominations follow the ledger's rule: 3..=128 chars, leading ASCII
/// letter, then letters, digits or `/:._-`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let len = denom.len();
    let mut chars = denom.chars();
    let leading_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));
    if !(3..=128).contains(&len) || !leading_ok || !rest_ok {
        return Err(CoinError::InvalidDenom(denom.to_string()));
    }
    Ok(())
}

/// A balance snapshot: the full set of holdings of one account.
///
/// ## Invariants
///
/// - At most one entry per denomination.
/// - Entries are sorted by denomination.
/// - Zero amounts are never stored.
///
/// Together these make the serialized form a pure function of the holdings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// An empty balance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalized balance from arbitrary coins.
    ///
    /// Duplicate denominations are summed and zero amounts dropped.
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self, CoinError> {
        let mut by_denom: BTreeMap<String, U256> = BTreeMap::new();
        for coin in coins {
            validate_denom(&coin.denom)?;
            let entry = by_denom.entry(coin.denom).or_insert_with(U256::zero);
            *entry = entry
                .checked_add(coin.amount)
                .ok_or(CoinError::AmountOverflow)?;
        }
        Ok(Self(
            by_denom
                .into_iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        ))
    }

    /// Amount held in `denom` (zero when absent).
    pub fn amount_of(&self, denom: &str) -> U256 {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|idx| self.0[idx].amount)
            .unwrap_or_else(|_| U256::zero())
    }

    /// Add `amount` of `denom`, keeping the invariants.
    pub fn add(&mut self, denom: &str, amount: U256) -> Result<(), CoinError> {
        validate_denom(denom)?;
        if amount.is_zero() {
            return Ok(());
        }
        match self.0.binary_search_by(|c| c.denom.as_str().cmp(denom)) {
            Ok(idx) => {
                let coin = &mut self.0[idx];
                coin.amount = coin
                    .amount
                    .checked_add(amount)
                    .ok_or(CoinError::AmountOverflow)?;
            }
            Err(idx) => self.0.insert(
                idx,
                Coin {
                    denom: denom.to_string(),
                    amount,
                },
            ),
        }
        Ok(())
    }

    /// Subtract `amount` of `denom`. Fails rather than going negative.
    pub fn sub(&mut self, denom: &str, amount: U256) -> Result<(), CoinError> {
        if amount.is_zero() {
            return Ok(());
        }
        let idx = self
            .0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map_err(|_| CoinError::InsufficientFunds {
                denom: denom.to_string(),
                available: U256::zero(),
                required: amount,
            })?;
        let available = self.0[idx].amount;
        if available < amount {
            return Err(CoinError::InsufficientFunds {
                denom: denom.to_string(),
                available,
                required: amount,
            });
        }
        if available == amount {
            self.0.remove(idx);
        } else {
            self.0[idx].amount = available - amount;
        }
        Ok(())
    }

    /// Iterate holdings in denomination order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

/// Serde adapter writing `U256` as a base-10 string.
///
/// `U256`'s own serde and `FromStr` impls are hexadecimal, which is not what
/// the controller reads.
pub mod decimal_u256 {
    use super::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(serde::de::Error::custom(format!(
                "invalid decimal amount: {s:?}"
            )));
        }
        U256::from_dec_str(&s).map_err(|e| serde::de::Error::custom(format!("{e:?}")))
    }
}
