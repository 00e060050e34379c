//! # Block Execution Types
//!
//! Requests and responses exchanged with an application while driving a
//! block: the block header, per-transaction execution results, events, and
//! the gas and result summaries returned to test code.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AbciError;

/// Height and time of the block a test delivers transactions in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub height: i64,
    pub time: DateTime<Utc>,
}

impl Header {
    pub fn new(height: i64, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }

    /// The header following this one, `seconds` later.
    pub fn next(&self, seconds: i64) -> Self {
        Self {
            height: self.height + 1,
            time: self.time + chrono::Duration::seconds(seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
    pub index: bool,
}

/// A typed event with key/value attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an indexed attribute.
    pub fn add_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(EventAttribute {
            key: key.into(),
            value: value.to_string(),
            index: true,
        });
        self
    }

    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// Gas requested by a transaction and gas it consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasInfo {
    pub gas_wanted: u64,
    pub gas_used: u64,
}

/// Outcome of executing the messages of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxResult {
    pub data: Vec<u8>,
    pub log: String,
    pub events: Vec<Event>,
}

/// Response of a successful simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulateResponse {
    pub gas_info: GasInfo,
    pub result: TxResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeBlockRequest {
    pub height: i64,
    pub time: DateTime<Utc>,
    pub txs: Vec<Vec<u8>>,
}

/// Execution result of one transaction in a finalized block. Code 0 is
/// success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecTxResult {
    pub code: u32,
    pub data: Vec<u8>,
    pub log: String,
    pub gas_wanted: i64,
    pub gas_used: i64,
    pub events: Vec<Event>,
    pub codespace: String,
}

impl ExecTxResult {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    pub fn gas_info(&self) -> GasInfo {
        GasInfo {
            gas_wanted: u64::try_from(self.gas_wanted).unwrap_or_default(),
            gas_used: u64::try_from(self.gas_used).unwrap_or_default(),
        }
    }

    pub fn to_tx_result(&self) -> TxResult {
        TxResult {
            data: self.data.clone(),
            log: self.log.clone(),
            events: self.events.clone(),
        }
    }

    /// Structured error of a failed result, `None` on success.
    pub fn error(&self) -> Option<AbciError> {
        if self.is_ok() {
            None
        } else {
            Some(AbciError::new(&self.codespace, self.code, &self.log))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeBlockResponse {
    /// Block-level events, not tied to a transaction.
    pub events: Vec<Event>,
    pub tx_results: Vec<ExecTxResult>,
    pub app_hash: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitResponse {
    pub retain_height: i64,
}
