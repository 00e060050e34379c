use std::{env, path::Path, str::FromStr};

use crate::error::SimsError;

/// Chain id used by generated transactions and by default applications.
pub const CHAIN_ID: &str = "simulation-app";

/// Gas limit of transactions generated by the test driver.
pub const DEFAULT_GEN_TX_GAS: u64 = 10_000_000;

pub const DEFAULT_BOND_DENOM: &str = "stake";

pub const BECH32_PREFIX: &str = "cosmos";

pub const MAX_MEMO_CHARACTERS: usize = 256;

/// Settings of a simulated chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub chain_id: String,
    pub bond_denom: String,
    pub bech32_prefix: String,
    pub max_memo_characters: usize,
    /// Gas limit for callers that generate transactions from configuration,
    /// such as batches built with [`crate::gen_sequence_of_txs`].
    /// [`crate::sign_check_deliver`] does not read it and always uses
    /// [`DEFAULT_GEN_TX_GAS`].
    pub default_gen_tx_gas: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID.to_string(),
            bond_denom: DEFAULT_BOND_DENOM.to_string(),
            bech32_prefix: BECH32_PREFIX.to_string(),
            max_memo_characters: MAX_MEMO_CHARACTERS,
            default_gen_tx_gas: DEFAULT_GEN_TX_GAS,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `SIMS_*` environment variables, after loading a
    /// `.env` file from the current directory if there is one.
    ///
    /// | variable                   | field                 |
    /// |----------------------------|-----------------------|
    /// | `SIMS_CHAIN_ID`            | `chain_id`            |
    /// | `SIMS_BOND_DENOM`          | `bond_denom`          |
    /// | `SIMS_BECH32_PREFIX`       | `bech32_prefix`       |
    /// | `SIMS_MAX_MEMO_CHARACTERS` | `max_memo_characters` |
    /// | `SIMS_DEFAULT_GEN_TX_GAS`  | `default_gen_tx_gas`  |
    pub fn from_env() -> Result<Self, SimsError> {
        dotenv::dotenv().ok();
        Self::default().with_env_overrides()
    }

    /// Like [`SimConfig::from_env`], loading the given env file instead.
    pub fn from_env_file(path: &Path) -> Result<Self, SimsError> {
        dotenv::from_path(path).map_err(|e| {
            SimsError::InvalidConfig(format!("failed to load {}: {}", path.display(), e))
        })?;
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, SimsError> {
        if let Some(chain_id) = env_string("SIMS_CHAIN_ID") {
            self.chain_id = chain_id;
        }
        if let Some(denom) = env_string("SIMS_BOND_DENOM") {
            self.bond_denom = denom;
        }
        if let Some(prefix) = env_string("SIMS_BECH32_PREFIX") {
            self.bech32_prefix = prefix;
        }
        if let Some(max) = env_parsed("SIMS_MAX_MEMO_CHARACTERS")? {
            self.max_memo_characters = max;
        }
        if let Some(gas) = env_parsed("SIMS_DEFAULT_GEN_TX_GAS")? {
            self.default_gen_tx_gas = gas;
        }

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Loaded simulation config: {:?}", self);
        }
        Ok(self)
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_parsed<T: FromStr>(key: &str) -> Result<Option<T>, SimsError>
where
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| SimsError::InvalidConfig(format!("{}={:?}: {}", key, value, e)))
        })
        .transpose()
}
