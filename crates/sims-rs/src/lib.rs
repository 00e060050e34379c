//! Helpers for building, signing and delivering mock transactions against an
//! in-process application in tests.
mod abci;
mod account;
mod app;
mod coin;
mod config;
mod crypto;
mod error;
pub mod helpers;
pub mod mock;
mod msg;
mod random;
mod sign_mode;
mod signer;
mod transaction;
mod tx_config;

pub use abci::{
    CommitResponse, Event, EventAttribute, ExecTxResult, FinalizeBlockRequest,
    FinalizeBlockResponse, GasInfo, Header, SimulateResponse, TxResult,
};
pub use account::AccountWithNumSeq;
pub use app::App;
pub use coin::{Coin, Coins};
pub use config::{
    SimConfig, BECH32_PREFIX, CHAIN_ID, DEFAULT_BOND_DENOM, DEFAULT_GEN_TX_GAS,
    MAX_MEMO_CHARACTERS,
};
pub use crypto::{address_bytes, decode_bech32, encode_bech32, sha256_hash, tx_hash};
pub use error::{sdk, AbciError, ErrorCode, SimsError};
pub use helpers::{
    gen_sequence_of_txs, gen_signed_mock_tx, sign_check_deliver, try_gen_sequence_of_txs,
    Delivery,
};
pub use msg::{Any, Msg, MsgSend, MsgSendResponse, TxMsgData};
pub use random::{rand_int_between, rand_string_of_length, time_seeded_rng};
pub use sign_mode::{SignMode, SignModeHandler, SignerData};
pub use signer::{PrivKey, PubKey, Signer};
pub use transaction::{
    AuthInfo, Fee, SignatureV2, SignerInfo, SingleSignatureData, Tx, TxBody, TxBuilder,
};
pub use tx_config::{TxConfig, TxDecoder, TxEncoder};
