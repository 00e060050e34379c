use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SimsError;

/// An amount of a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Denominations are 3 to 128 characters, start with a letter and
    /// contain only alphanumerics, `/`, `:`, `.`, `_` or `-`.
    pub fn validate(&self) -> Result<(), SimsError> {
        let valid_len = (3..=128).contains(&self.denom.len());
        let valid_start = self
            .denom
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        let valid_chars = self
            .denom
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));

        if valid_len && valid_start && valid_chars {
            Ok(())
        } else {
            Err(SimsError::InvalidArgument(format!(
                "invalid denom: {}",
                self.denom
            )))
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins kept sorted by denomination, one entry per denomination.
///
/// Deserializing a list that repeats a denomination fails, so a decoded
/// value holds the same invariant as a constructed one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Sorts the coins by denomination and merges duplicate denominations.
    /// Zero amounts are kept.
    ///
    /// # Panics
    ///
    /// Panics if merging a denomination overflows `u128`. Use
    /// [`Coins::try_new`] for amounts that are not known to fit.
    pub fn new(coins: Vec<Coin>) -> Self {
        match Self::try_new(coins) {
            Ok(coins) => coins,
            Err(err) => panic!("{}", err),
        }
    }

    /// Like [`Coins::new`], but reports an overflowing denomination as an
    /// error.
    pub fn try_new(coins: Vec<Coin>) -> Result<Self, SimsError> {
        Self::merge(coins).map_err(|denom| {
            SimsError::InvalidArgument(format!("amount of {} overflows", denom))
        })
    }

    fn merge(mut coins: Vec<Coin>) -> Result<Self, String> {
        let mut merged: Vec<Coin> = Vec::with_capacity(coins.len());
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        for coin in coins {
            match merged.last_mut() {
                Some(last) if last.denom == coin.denom => {
                    last.amount = last.amount.checked_add(coin.amount).ok_or(coin.denom)?;
                }
                _ => merged.push(coin),
            }
        }
        Ok(Self(merged))
    }

    pub fn single(denom: impl Into<String>, amount: u128) -> Self {
        Self(vec![Coin::new(denom, amount)])
    }

    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| c.amount == 0)
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or_default()
    }

    /// Checks every denomination and that the list is sorted without
    /// repeats.
    pub fn validate(&self) -> Result<(), SimsError> {
        self.0.iter().try_for_each(Coin::validate)?;
        match self.0.windows(2).find(|pair| pair[0].denom >= pair[1].denom) {
            Some(pair) => Err(SimsError::InvalidArgument(format!(
                "duplicate or unsorted denom: {}",
                pair[1].denom
            ))),
            None => Ok(()),
        }
    }

    /// Adds `other`, returning `None` when any denomination overflows.
    pub fn checked_add(&self, other: &Coins) -> Option<Coins> {
        Self::merge(self.0.iter().chain(other.0.iter()).cloned().collect()).ok()
    }

    /// Subtracts `other`, returning `None` when any denomination would go
    /// negative. Denominations that reach zero are removed.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut result = self.0.clone();
        for coin in &other.0 {
            if coin.amount == 0 {
                continue;
            }
            let entry = result.iter_mut().find(|c| c.denom == coin.denom)?;
            entry.amount = entry.amount.checked_sub(coin.amount)?;
        }
        result.retain(|c| c.amount > 0);
        Some(Coins(result))
    }

    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other
            .0
            .iter()
            .all(|coin| self.amount_of(&coin.denom) >= coin.amount)
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Self(vec![coin])
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = SimsError;

    /// Sorts the list and rejects repeated denominations.
    fn try_from(mut coins: Vec<Coin>) -> Result<Self, Self::Error> {
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(pair) = coins.windows(2).find(|pair| pair[0].denom == pair[1].denom) {
            return Err(SimsError::InvalidArgument(format!(
                "duplicate denom: {}",
                pair[0].denom
            )));
        }
        Ok(Self(coins))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}
