use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::gas::{
    GasMeter, DELETE_COST, READ_COST_FLAT, READ_COST_PER_BYTE, WRITE_COST_FLAT,
    WRITE_COST_PER_BYTE,
};
use crate::{
    abci::Event,
    coin::Coins,
    error::{sdk, AbciError},
    msg::Any,
    signer::PubKey,
};

/// An account known to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAccount {
    pub address: String,
    /// Set by the first transaction the account signs, unless known earlier.
    pub pub_key: Option<PubKey>,
    pub account_number: u64,
    pub sequence: u64,
}

/// The complete state of a [`MockApp`](super::MockApp).
///
/// Branching is done by cloning; a branch replaces its parent when it is
/// written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub(crate) accounts: BTreeMap<String, BaseAccount>,
    pub(crate) balances: BTreeMap<String, Coins>,
    pub(crate) store: BTreeMap<String, Vec<u8>>,
    pub(crate) next_account_number: u64,
}

impl State {
    pub(crate) fn new_account(&mut self, address: &str, pub_key: Option<PubKey>) -> BaseAccount {
        let account = BaseAccount {
            address: address.to_string(),
            pub_key,
            account_number: self.next_account_number,
            sequence: 0,
        };
        self.next_account_number += 1;
        self.accounts.insert(address.to_string(), account.clone());
        account
    }

    pub(crate) fn balance(&self, address: &str) -> Coins {
        self.balances.get(address).cloned().unwrap_or_default()
    }

    pub(crate) fn set_balance(&mut self, address: &str, coins: Coins) {
        if coins.is_zero() {
            self.balances.remove(address);
        } else {
            self.balances.insert(address.to_string(), coins);
        }
    }
}

/// Execution context handed to message handlers.
///
/// Every state access is charged to the transaction's gas meter.
pub struct Context<'a> {
    state: &'a mut State,
    gas_meter: &'a mut GasMeter,
    height: i64,
    time: DateTime<Utc>,
    chain_id: &'a str,
    bech32_prefix: &'a str,
    simulate: bool,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        state: &'a mut State,
        gas_meter: &'a mut GasMeter,
        height: i64,
        time: DateTime<Utc>,
        chain_id: &'a str,
        bech32_prefix: &'a str,
        simulate: bool,
    ) -> Self {
        Self {
            state,
            gas_meter,
            height,
            time,
            chain_id,
            bech32_prefix,
            simulate,
            events: Vec::new(),
        }
    }

    pub fn block_height(&self) -> i64 {
        self.height
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn chain_id(&self) -> &str {
        self.chain_id
    }

    pub fn bech32_prefix(&self) -> &str {
        self.bech32_prefix
    }

    /// Whether the transaction runs in simulation mode.
    pub fn is_simulate(&self) -> bool {
        self.simulate
    }

    pub fn gas_consumed(&self) -> u64 {
        self.gas_meter.consumed()
    }

    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<(), AbciError> {
        self.gas_meter.consume(amount, descriptor)
    }

    pub fn emit_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, AbciError> {
        self.charge_read(key.len(), 0)?;
        let value = self.state.store.get(key).cloned();
        if let Some(value) = &value {
            self.consume_gas(READ_COST_PER_BYTE * value.len() as u64, "ReadPerByte")?;
        }
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), AbciError> {
        self.charge_write(key.len(), value.len())?;
        self.state.store.insert(key.to_string(), value);
        Ok(())
    }

    pub fn delete(&mut self, key: &str) -> Result<(), AbciError> {
        self.consume_gas(DELETE_COST, "Delete")?;
        self.state.store.remove(key);
        Ok(())
    }

    pub fn account(&mut self, address: &str) -> Result<Option<BaseAccount>, AbciError> {
        self.charge_read(address.len(), 0)?;
        Ok(self.state.accounts.get(address).cloned())
    }

    pub fn set_account(&mut self, account: BaseAccount) -> Result<(), AbciError> {
        self.charge_write(account.address.len(), 0)?;
        self.state.accounts.insert(account.address.clone(), account);
        Ok(())
    }

    pub fn balance(&mut self, address: &str) -> Result<Coins, AbciError> {
        self.charge_read(address.len(), 0)?;
        Ok(self.state.balance(address))
    }

    /// Moves `amount` from `from` to `to`, creating the recipient account if
    /// it does not exist yet.
    pub fn send_coins(&mut self, from: &str, to: &str, amount: &Coins) -> Result<(), AbciError> {
        let spendable = self.balance(from)?;
        let remaining = spendable.checked_sub(amount).ok_or_else(|| {
            AbciError::wrap(
                &sdk::ERR_INSUFFICIENT_FUNDS,
                format!("spendable balance {} is smaller than {}", spendable, amount),
            )
        })?;
        self.charge_write(from.len(), 0)?;
        self.state.set_balance(from, remaining);

        if self.account(to)?.is_none() {
            self.charge_write(to.len(), 0)?;
            self.state.new_account(to, None);
        }
        let received = self.balance(to)?.checked_add(amount).ok_or_else(|| {
            AbciError::wrap(
                &sdk::ERR_INVALID_COINS,
                format!("balance of {} overflows when adding {}", to, amount),
            )
        })?;
        self.charge_write(to.len(), 0)?;
        self.state.set_balance(to, received);

        Ok(())
    }

    fn charge_read(&mut self, key_len: usize, value_len: usize) -> Result<(), AbciError> {
        self.consume_gas(READ_COST_FLAT, "ReadFlat")?;
        self.consume_gas(
            READ_COST_PER_BYTE * (key_len + value_len) as u64,
            "ReadPerByte",
        )
    }

    fn charge_write(&mut self, key_len: usize, value_len: usize) -> Result<(), AbciError> {
        self.consume_gas(WRITE_COST_FLAT, "WriteFlat")?;
        self.consume_gas(
            WRITE_COST_PER_BYTE * (key_len + value_len) as u64,
            "WritePerByte",
        )
    }
}

/// Executes one message type.
///
/// Handlers are registered with a [`MockApp`](super::MockApp) under the type
/// URL of the message they execute.
pub trait MsgHandler {
    /// Addresses whose signatures the message requires, in order.
    fn signers(&self, msg: &Any) -> Result<Vec<String>, AbciError>;

    /// Executes the message, returning its packed response.
    fn handle(&self, ctx: &mut Context<'_>, msg: &Any) -> Result<Any, AbciError>;
}
