use crate::{
    error::SimsError,
    sign_mode::{SignMode, SignModeHandler},
    transaction::{Tx, TxBuilder},
};

/// Encodes a transaction to bytes.
pub type TxEncoder = fn(&Tx) -> Result<Vec<u8>, SimsError>;

/// Decodes a transaction from bytes.
pub type TxDecoder = fn(&[u8]) -> Result<Tx, SimsError>;

/// Transaction encoding configuration: how transactions are built, signed and
/// turned into bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxConfig {
    sign_mode_handler: SignModeHandler,
}

impl TxConfig {
    pub fn new(sign_mode_handler: SignModeHandler) -> Self {
        Self { sign_mode_handler }
    }

    /// A configuration signing with `mode` by default.
    pub fn with_default_sign_mode(mode: SignMode) -> Self {
        let handler = SignModeHandler::default();
        Self::new(SignModeHandler::new(mode, handler.modes().to_vec()))
    }

    pub fn sign_mode_handler(&self) -> &SignModeHandler {
        &self.sign_mode_handler
    }

    pub fn new_tx_builder(&self) -> TxBuilder {
        TxBuilder::new()
    }

    pub fn tx_encoder(&self) -> TxEncoder {
        encode_tx
    }

    pub fn tx_decoder(&self) -> TxDecoder {
        decode_tx
    }
}

fn encode_tx(tx: &Tx) -> Result<Vec<u8>, SimsError> {
    serde_json::to_vec(tx).map_err(|e| SimsError::TransactionEncodingFailed(e.to_string()))
}

fn decode_tx(bytes: &[u8]) -> Result<Tx, SimsError> {
    serde_json::from_slice(bytes).map_err(|e| SimsError::TransactionDecodingFailed(e.to_string()))
}
