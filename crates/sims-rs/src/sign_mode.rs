//! # Sign Modes
//!
//! A sign mode decides which bytes a signer signs. The handler in this module
//! produces those bytes for a transaction and the signer-specific context in
//! [`SignerData`].
//!
//! Two modes are supported:
//!
//! - [`SignMode::Direct`]: a `SignDoc` carrying the encoded body and auth info
//!   together with the chain id and the account number.
//! - [`SignMode::LegacyAminoJson`]: a `StdSignDoc` in canonical JSON (sorted
//!   keys, numbers as strings).
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::{error::SimsError, signer::PubKey, transaction::Tx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignMode {
    #[serde(rename = "SIGN_MODE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "SIGN_MODE_DIRECT")]
    Direct,
    #[serde(rename = "SIGN_MODE_TEXTUAL")]
    Textual,
    #[serde(rename = "SIGN_MODE_DIRECT_AUX")]
    DirectAux,
    #[serde(rename = "SIGN_MODE_LEGACY_AMINO_JSON")]
    LegacyAminoJson,
}

impl SignMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "SIGN_MODE_UNSPECIFIED",
            Self::Direct => "SIGN_MODE_DIRECT",
            Self::Textual => "SIGN_MODE_TEXTUAL",
            Self::DirectAux => "SIGN_MODE_DIRECT_AUX",
            Self::LegacyAminoJson => "SIGN_MODE_LEGACY_AMINO_JSON",
        }
    }
}

impl fmt::Display for SignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signer-specific context mixed into the sign bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerData {
    pub address: String,
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
    pub pub_key: PubKey,
}

#[derive(Serialize)]
struct SignDoc<'a> {
    #[serde(with = "hex::serde")]
    body_bytes: Vec<u8>,
    #[serde(with = "hex::serde")]
    auth_info_bytes: Vec<u8>,
    chain_id: &'a str,
    account_number: u64,
}

/// Produces sign bytes for the sign modes it has enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignModeHandler {
    default_mode: SignMode,
    modes: Vec<SignMode>,
}

impl Default for SignModeHandler {
    fn default() -> Self {
        Self {
            default_mode: SignMode::Direct,
            modes: vec![SignMode::Direct, SignMode::LegacyAminoJson],
        }
    }
}

impl SignModeHandler {
    /// Creates a handler with `default_mode` and the enabled `modes`.
    /// The default mode is always enabled.
    pub fn new(default_mode: SignMode, mut modes: Vec<SignMode>) -> Self {
        if !modes.contains(&default_mode) {
            modes.insert(0, default_mode);
        }
        Self {
            default_mode,
            modes,
        }
    }

    pub fn default_mode(&self) -> SignMode {
        self.default_mode
    }

    pub fn modes(&self) -> &[SignMode] {
        &self.modes
    }

    /// Resolves a mode to one that can be used for signing.
    ///
    /// Fails for [`SignMode::Unspecified`].
    pub fn resolve(&self, mode: SignMode) -> Result<SignMode, SimsError> {
        match mode {
            SignMode::Unspecified => Err(SimsError::InvalidSignMode(format!(
                "unsupported sign mode {}",
                mode
            ))),
            other => Ok(other),
        }
    }

    /// Bytes `data`'s signer must sign for `tx` in `mode`.
    pub fn get_sign_bytes(
        &self,
        mode: SignMode,
        data: &SignerData,
        tx: &Tx,
    ) -> Result<Vec<u8>, SimsError> {
        if !self.modes.contains(&mode) {
            return Err(SimsError::UnsupportedSignMode(format!(
                "sign mode {} is not enabled",
                mode
            )));
        }

        match mode {
            SignMode::Direct => direct_sign_bytes(data, tx),
            SignMode::LegacyAminoJson => legacy_amino_json_sign_bytes(data, tx),
            other => Err(SimsError::UnsupportedSignMode(format!(
                "no sign bytes for {}",
                other
            ))),
        }
    }
}

fn direct_sign_bytes(data: &SignerData, tx: &Tx) -> Result<Vec<u8>, SimsError> {
    let doc = SignDoc {
        body_bytes: tx.body_bytes()?,
        auth_info_bytes: tx.auth_info_bytes()?,
        chain_id: &data.chain_id,
        account_number: data.account_number,
    };
    serde_json::to_vec(&doc)
        .map_err(|e| SimsError::TransactionEncodingFailed(format!("sign doc: {}", e)))
}

fn legacy_amino_json_sign_bytes(data: &SignerData, tx: &Tx) -> Result<Vec<u8>, SimsError> {
    let msgs = tx
        .msgs()
        .iter()
        .map(|msg| {
            let value: Value = serde_json::from_slice(&msg.value).map_err(|e| {
                SimsError::TransactionEncodingFailed(format!(
                    "message {} is not amino JSON: {}",
                    msg.type_url, e
                ))
            })?;
            Ok(json!({ "type": msg.type_url, "value": value }))
        })
        .collect::<Result<Vec<Value>, SimsError>>()?;

    let amount: Vec<Value> = tx
        .fee()
        .as_slice()
        .iter()
        .map(|coin| json!({ "amount": coin.amount.to_string(), "denom": coin.denom }))
        .collect();

    // serde_json maps are ordered by key, which makes the document canonical.
    let doc = json!({
        "account_number": data.account_number.to_string(),
        "chain_id": data.chain_id,
        "fee": { "amount": amount, "gas": tx.gas().to_string() },
        "memo": tx.memo(),
        "msgs": msgs,
        "sequence": data.sequence.to_string(),
        "timeout_height": tx.timeout_height().to_string(),
    });

    serde_json::to_vec(&doc)
        .map_err(|e| SimsError::TransactionEncodingFailed(format!("std sign doc: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::mock_signer1;
    use crate::{Coins, Msg, MsgSend, PrivKey, SignatureV2, TxBuilder};

    fn signer_data(chain_id: &str, account_number: u64, sequence: u64) -> SignerData {
        let pub_key = mock_signer1().pub_key();
        SignerData {
            address: pub_key.address("cosmos").unwrap(),
            chain_id: chain_id.to_string(),
            account_number,
            sequence,
            pub_key,
        }
    }

    fn sample_tx() -> Tx {
        let msg = MsgSend::new("cosmos1from", "cosmos1to", Coins::single("stake", 10));
        let mut builder = TxBuilder::new();
        builder.set_msgs(&[msg.to_any().unwrap()]).unwrap();
        builder.set_memo("memo");
        builder.set_fee_amount(Coins::single("stake", 0));
        builder.set_gas_limit(100);
        builder
            .set_signatures(&[SignatureV2::placeholder(
                mock_signer1().pub_key(),
                SignMode::Direct,
                4,
            )])
            .unwrap();
        builder.get_tx()
    }

    #[test]
    fn test_direct_sign_bytes_are_deterministic() {
        let handler = SignModeHandler::default();
        let tx = sample_tx();

        let first = handler
            .get_sign_bytes(SignMode::Direct, &signer_data("chain", 1, 4), &tx)
            .unwrap();
        let second = handler
            .get_sign_bytes(SignMode::Direct, &signer_data("chain", 1, 4), &tx)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_direct_sign_bytes_depend_on_signer_context() {
        let handler = SignModeHandler::default();
        let tx = sample_tx();
        let base = handler
            .get_sign_bytes(SignMode::Direct, &signer_data("chain", 1, 4), &tx)
            .unwrap();

        let other_chain = handler
            .get_sign_bytes(SignMode::Direct, &signer_data("other", 1, 4), &tx)
            .unwrap();
        let other_account = handler
            .get_sign_bytes(SignMode::Direct, &signer_data("chain", 2, 4), &tx)
            .unwrap();

        assert_ne!(base, other_chain);
        assert_ne!(base, other_account);
    }

    #[test]
    fn test_direct_sign_bytes_ignore_signature_bytes() {
        let handler = SignModeHandler::default();
        let tx = sample_tx();
        let data = signer_data("chain", 1, 4);

        let mut sigs = tx.get_signatures_v2();
        sigs[0].data.signature = mock_signer1().sign(b"anything").unwrap();
        let mut builder = TxBuilder::wrap(tx.clone());
        builder.set_signatures(&sigs).unwrap();

        assert_eq!(
            handler.get_sign_bytes(SignMode::Direct, &data, &tx).unwrap(),
            handler
                .get_sign_bytes(SignMode::Direct, &data, &builder.get_tx())
                .unwrap()
        );
    }

    #[test]
    fn test_legacy_amino_json_is_sorted() {
        let handler = SignModeHandler::default();
        let bytes = handler
            .get_sign_bytes(
                SignMode::LegacyAminoJson,
                &signer_data("chain", 1, 4),
                &sample_tx(),
            )
            .unwrap();
        let doc = String::from_utf8(bytes).unwrap();

        assert!(doc.starts_with(r#"{"account_number":"1","chain_id":"chain","fee":"#));
        assert!(doc.contains(r#""sequence":"4""#));
        assert!(doc.contains(r#""type":"/cosmos.bank.v1beta1.MsgSend""#));
        assert!(doc.contains(r#"{"amount":[{"amount":"0","denom":"stake"}],"gas":"100"}"#));
    }

    #[test]
    fn test_resolve() {
        let handler = SignModeHandler::default();
        assert_eq!(handler.resolve(SignMode::Direct).unwrap(), SignMode::Direct);
        assert!(matches!(
            handler.resolve(SignMode::Unspecified),
            Err(SimsError::InvalidSignMode(_))
        ));
    }

    #[test]
    fn test_unsupported_modes() {
        let handler = SignModeHandler::new(SignMode::Textual, vec![SignMode::Direct]);
        assert_eq!(handler.modes(), &[SignMode::Textual, SignMode::Direct]);

        let err = handler
            .get_sign_bytes(SignMode::Textual, &signer_data("chain", 1, 4), &sample_tx())
            .unwrap_err();
        assert!(matches!(err, SimsError::UnsupportedSignMode(_)));

        let err = handler
            .get_sign_bytes(
                SignMode::LegacyAminoJson,
                &signer_data("chain", 1, 4),
                &sample_tx(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("not enabled"));
    }

    #[test]
    fn test_sign_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&SignMode::LegacyAminoJson).unwrap(),
            r#""SIGN_MODE_LEGACY_AMINO_JSON""#
        );
        assert_eq!(SignMode::Direct.to_string(), "SIGN_MODE_DIRECT");
    }
}
