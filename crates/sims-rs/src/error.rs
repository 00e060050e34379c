//! # Simulation Error Handling
//!
//! This module defines the error types used throughout the simulation helpers.
//! [`SimsError`] covers failures of the helpers themselves (building, encoding,
//! signing, configuration), while [`AbciError`] is the structured error an
//! application reports for a transaction that executed with a non-zero code.
use thiserror::Error;

/// Errors that can occur when using the simulation helpers.
///
/// This enum covers errors from transaction building, encoding, signing,
/// configuration loading and the block lifecycle of an application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimsError {
    /// Error when assembling a transaction fails.
    #[error("Transaction build failed: {0}")]
    TransactionBuildFailed(String),

    /// Error when a transaction cannot be encoded to bytes.
    #[error("Transaction encoding failed: {0}")]
    TransactionEncodingFailed(String),

    /// Error when transaction bytes cannot be decoded.
    #[error("Transaction decoding failed: {0}")]
    TransactionDecodingFailed(String),

    /// Error when a signing operation fails.
    #[error("Signing operation failed: {0}")]
    SigningFailed(String),

    /// Error when a sign mode cannot be resolved to a concrete mode.
    #[error("Invalid sign mode: {0}")]
    InvalidSignMode(String),

    /// Error when a sign mode is known but sign bytes cannot be produced for it.
    #[error("Unsupported sign mode: {0}")]
    UnsupportedSignMode(String),

    /// Error when an invalid argument is provided to a function.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error when an address cannot be encoded or decoded.
    #[error("Address conversion failed: {0}")]
    AddressConversionFailed(String),

    /// Error when a configuration value cannot be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error when a block is finalized at an unexpected height.
    #[error("Invalid height: {got}; expected: {expected}")]
    InvalidHeight { got: i64, expected: i64 },

    /// Error when commit is called without a finalized block.
    #[error("No finalized block to commit")]
    NothingToCommit,

    /// Error reported by an application for a transaction.
    #[error(transparent)]
    Abci(#[from] AbciError),
}

/// A registered error code: the codespace it belongs to, its numeric code and
/// a short description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    pub codespace: &'static str,
    pub code: u32,
    pub description: &'static str,
}

impl ErrorCode {
    pub const fn new(codespace: &'static str, code: u32, description: &'static str) -> Self {
        Self {
            codespace,
            code,
            description,
        }
    }
}

/// Root error codes of the `sdk` codespace.
pub mod sdk {
    use super::ErrorCode;

    pub const CODESPACE: &str = "sdk";

    pub const ERR_TX_DECODE: ErrorCode = ErrorCode::new(CODESPACE, 2, "tx parse error");
    pub const ERR_INVALID_SEQUENCE: ErrorCode = ErrorCode::new(CODESPACE, 3, "invalid sequence");
    pub const ERR_UNAUTHORIZED: ErrorCode = ErrorCode::new(CODESPACE, 4, "unauthorized");
    pub const ERR_INSUFFICIENT_FUNDS: ErrorCode =
        ErrorCode::new(CODESPACE, 5, "insufficient funds");
    pub const ERR_UNKNOWN_REQUEST: ErrorCode = ErrorCode::new(CODESPACE, 6, "unknown request");
    pub const ERR_INVALID_ADDRESS: ErrorCode = ErrorCode::new(CODESPACE, 7, "invalid address");
    pub const ERR_INVALID_PUB_KEY: ErrorCode = ErrorCode::new(CODESPACE, 8, "invalid pubkey");
    pub const ERR_UNKNOWN_ADDRESS: ErrorCode = ErrorCode::new(CODESPACE, 9, "unknown address");
    pub const ERR_INVALID_COINS: ErrorCode = ErrorCode::new(CODESPACE, 10, "invalid coins");
    pub const ERR_OUT_OF_GAS: ErrorCode = ErrorCode::new(CODESPACE, 11, "out of gas");
    pub const ERR_MEMO_TOO_LARGE: ErrorCode = ErrorCode::new(CODESPACE, 12, "memo too large");
    pub const ERR_NO_SIGNATURES: ErrorCode = ErrorCode::new(CODESPACE, 15, "no signatures supplied");
    pub const ERR_INVALID_REQUEST: ErrorCode = ErrorCode::new(CODESPACE, 18, "invalid request");
    pub const ERR_TX_TIMEOUT_HEIGHT: ErrorCode = ErrorCode::new(CODESPACE, 30, "tx timeout height");
    pub const ERR_WRONG_SEQUENCE: ErrorCode =
        ErrorCode::new(CODESPACE, 32, "incorrect account sequence");
}

/// Structured error built from the codespace, code and log of a failed
/// transaction result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{log} (codespace: {codespace}, code: {code})")]
pub struct AbciError {
    pub codespace: String,
    pub code: u32,
    pub log: String,
}

impl AbciError {
    /// Creates an error from raw result fields.
    pub fn new(codespace: impl Into<String>, code: u32, log: impl Into<String>) -> Self {
        Self {
            codespace: codespace.into(),
            code,
            log: log.into(),
        }
    }

    /// Wraps a registered error code with additional context.
    ///
    /// The resulting log reads `"<msg>: <description>"`.
    pub fn wrap(code: &ErrorCode, msg: impl AsRef<str>) -> Self {
        Self::new(
            code.codespace,
            code.code,
            format!("{}: {}", msg.as_ref(), code.description),
        )
    }

    /// Returns whether this error carries the given registered code.
    pub fn is(&self, code: &ErrorCode) -> bool {
        self.codespace == code.codespace && self.code == code.code
    }
}

impl From<&ErrorCode> for AbciError {
    fn from(code: &ErrorCode) -> Self {
        Self::new(code.codespace, code.code, code.description)
    }
}
