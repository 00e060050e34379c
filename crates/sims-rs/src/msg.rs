use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{coin::Coins, error::SimsError};

/// A message packed together with the URL of its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Any {
    pub type_url: String,
    #[serde(with = "hex::serde")]
    pub value: Vec<u8>,
}

impl Any {
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Packs a typed message.
    pub fn pack<M: Msg>(msg: &M) -> Result<Self, SimsError> {
        let value = serde_json::to_vec(msg).map_err(|e| {
            SimsError::TransactionEncodingFailed(format!(
                "Failed to pack {}: {}",
                M::TYPE_URL,
                e
            ))
        })?;
        Ok(Self::new(M::TYPE_URL, value))
    }

    /// Unpacks the message into `M`, checking the type URL first.
    pub fn unpack<M: Msg>(&self) -> Result<M, SimsError> {
        if self.type_url != M::TYPE_URL {
            return Err(SimsError::TransactionDecodingFailed(format!(
                "expected {}, got {}",
                M::TYPE_URL,
                self.type_url
            )));
        }
        serde_json::from_slice(&self.value)
            .map_err(|e| SimsError::TransactionDecodingFailed(e.to_string()))
    }

    pub fn is<M: Msg>(&self) -> bool {
        self.type_url == M::TYPE_URL
    }
}

/// A transaction message with a stable type URL.
pub trait Msg: Serialize + DeserializeOwned {
    const TYPE_URL: &'static str;

    fn to_any(&self) -> Result<Any, SimsError> {
        Any::pack(self)
    }
}

/// Transfers coins from one account to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Coins,
}

impl MsgSend {
    pub fn new(
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        amount: Coins,
    ) -> Self {
        Self {
            from_address: from_address.into(),
            to_address: to_address.into(),
            amount,
        }
    }
}

impl Msg for MsgSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";
}

/// Empty response of a successful [`MsgSend`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSendResponse {}

impl Msg for MsgSendResponse {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSendResponse";
}

/// Responses of every message of a transaction, in message order. This is the
/// `data` of a successful transaction result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxMsgData {
    pub msg_responses: Vec<Any>,
}

impl TxMsgData {
    pub fn encode(&self) -> Result<Vec<u8>, SimsError> {
        serde_json::to_vec(self).map_err(|e| SimsError::TransactionEncodingFailed(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SimsError> {
        serde_json::from_slice(bytes).map_err(|e| SimsError::TransactionDecodingFailed(e.to_string()))
    }
}
