use serde::{Deserialize, Serialize};

use crate::{
    coin::Coins, error::SimsError, msg::Any, sign_mode::SignMode, signer::PubKey,
};

/// Messages and metadata of a transaction; everything that is not about who
/// signs it or what it pays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBody {
    pub messages: Vec<Any>,
    pub memo: String,
    pub timeout_height: u64,
}

/// Signer metadata committed to by every signature of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    pub public_key: PubKey,
    pub mode_info: SignMode,
    pub sequence: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Coins,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub signer_infos: Vec<SignerInfo>,
    pub fee: Fee,
}

/// A transaction. Read-only once built; use a [`TxBuilder`] to change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    body: TxBody,
    auth_info: AuthInfo,
    #[serde(with = "signatures_hex")]
    signatures: Vec<Vec<u8>>,
}

impl Tx {
    pub fn body(&self) -> &TxBody {
        &self.body
    }

    pub fn auth_info(&self) -> &AuthInfo {
        &self.auth_info
    }

    pub fn msgs(&self) -> &[Any] {
        &self.body.messages
    }

    pub fn memo(&self) -> &str {
        &self.body.memo
    }

    pub fn timeout_height(&self) -> u64 {
        self.body.timeout_height
    }

    pub fn fee(&self) -> &Coins {
        &self.auth_info.fee.amount
    }

    pub fn gas(&self) -> u64 {
        self.auth_info.fee.gas_limit
    }

    pub fn signer_infos(&self) -> &[SignerInfo] {
        &self.auth_info.signer_infos
    }

    /// Raw signature bytes, one per signer info.
    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }

    pub fn pub_keys(&self) -> Vec<PubKey> {
        self.auth_info
            .signer_infos
            .iter()
            .map(|info| info.public_key.clone())
            .collect()
    }

    /// Pairs every signer info with its signature bytes.
    ///
    /// Signer infos without a signature yield empty signature bytes.
    pub fn get_signatures_v2(&self) -> Vec<SignatureV2> {
        self.auth_info
            .signer_infos
            .iter()
            .enumerate()
            .map(|(i, info)| SignatureV2 {
                pub_key: info.public_key.clone(),
                data: SingleSignatureData {
                    sign_mode: info.mode_info,
                    signature: self.signatures.get(i).cloned().unwrap_or_default(),
                },
                sequence: info.sequence,
            })
            .collect()
    }

    /// Canonical bytes of the body, as committed to by direct sign bytes.
    pub fn body_bytes(&self) -> Result<Vec<u8>, SimsError> {
        serde_json::to_vec(&self.body)
            .map_err(|e| SimsError::TransactionEncodingFailed(format!("tx body: {}", e)))
    }

    /// Canonical bytes of the auth info, as committed to by direct sign bytes.
    pub fn auth_info_bytes(&self) -> Result<Vec<u8>, SimsError> {
        serde_json::to_vec(&self.auth_info)
            .map_err(|e| SimsError::TransactionEncodingFailed(format!("tx auth info: {}", e)))
    }
}

mod signatures_hex {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(sigs: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<String> = sigs.iter().map(hex::encode).collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Signature data of a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSignatureData {
    pub sign_mode: SignMode,
    pub signature: Vec<u8>,
}

/// A signature together with the signer metadata it commits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureV2 {
    pub pub_key: PubKey,
    pub data: SingleSignatureData,
    pub sequence: u64,
}

impl SignatureV2 {
    /// A signature slot with signer metadata but no signature bytes yet.
    pub fn placeholder(pub_key: PubKey, sign_mode: SignMode, sequence: u64) -> Self {
        Self {
            pub_key,
            data: SingleSignatureData {
                sign_mode,
                signature: Vec::new(),
            },
            sequence,
        }
    }
}

/// Accumulates the parts of a transaction.
///
/// # Example
///
/// ```rust
/// use sims_rs::{Coins, MsgSend, Msg, TxBuilder};
///
/// let msg = MsgSend::new("cosmos1from", "cosmos1to", Coins::single("stake", 1));
///
/// let mut builder = TxBuilder::new();
/// builder.set_msgs(&[msg.to_any().unwrap()]).unwrap();
/// builder.set_memo("hello");
/// builder.set_gas_limit(200_000);
///
/// let tx = builder.get_tx();
/// assert_eq!(tx.memo(), "hello");
/// assert!(tx.signatures().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    tx: Tx,
}

impl TxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing transaction.
    pub fn wrap(tx: Tx) -> Self {
        Self { tx }
    }

    /// Sets the messages. Every message needs a type URL starting with `/`.
    pub fn set_msgs(&mut self, msgs: &[Any]) -> Result<(), SimsError> {
        if let Some(msg) = msgs.iter().find(|m| !m.type_url.starts_with('/')) {
            return Err(SimsError::TransactionBuildFailed(format!(
                "invalid message type url: {:?}",
                msg.type_url
            )));
        }
        self.tx.body.messages = msgs.to_vec();
        Ok(())
    }

    /// Replaces signer infos and signatures with the given set, keeping its
    /// order.
    pub fn set_signatures(&mut self, sigs: &[SignatureV2]) -> Result<(), SimsError> {
        let mut signer_infos = Vec::with_capacity(sigs.len());
        let mut raw_sigs = Vec::with_capacity(sigs.len());

        for sig in sigs {
            if sig.data.sign_mode == SignMode::Unspecified {
                return Err(SimsError::InvalidSignMode(format!(
                    "signature of {} has no sign mode",
                    sig.pub_key
                )));
            }
            signer_infos.push(SignerInfo {
                public_key: sig.pub_key.clone(),
                mode_info: sig.data.sign_mode,
                sequence: sig.sequence,
            });
            raw_sigs.push(sig.data.signature.clone());
        }

        self.tx.auth_info.signer_infos = signer_infos;
        self.tx.signatures = raw_sigs;
        Ok(())
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.tx.body.memo = memo.into();
    }

    pub fn set_fee_amount(&mut self, amount: Coins) {
        self.tx.auth_info.fee.amount = amount;
    }

    pub fn set_gas_limit(&mut self, gas: u64) {
        self.tx.auth_info.fee.gas_limit = gas;
    }

    pub fn set_timeout_height(&mut self, height: u64) {
        self.tx.body.timeout_height = height;
    }

    pub fn get_tx(&self) -> Tx {
        self.tx.clone()
    }
}
