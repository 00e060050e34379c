//! # Transaction Helpers
//!
//! Helpers that build signed mock transactions and push them through an
//! application's block lifecycle from test code.
//!
//! - [`gen_signed_mock_tx`] builds and signs one transaction.
//! - [`sign_check_deliver`] simulates it, delivers it in a block, commits, and
//!   asserts both outcomes against expectations.
//! - [`gen_sequence_of_txs`] encodes a run of transactions for one account
//!   with consecutive sequences.
use rand::Rng;

use crate::{
    abci::{Event, FinalizeBlockRequest, GasInfo, Header, TxResult},
    account::AccountWithNumSeq,
    app::App,
    coin::Coins,
    config::{BECH32_PREFIX, CHAIN_ID, DEFAULT_BOND_DENOM, DEFAULT_GEN_TX_GAS},
    crypto,
    error::{AbciError, SimsError},
    msg::Any,
    random::{rand_int_between, rand_string_of_length, time_seeded_rng},
    sign_mode::SignerData,
    signer::PrivKey,
    transaction::{SignatureV2, Tx},
    tx_config::{TxConfig, TxEncoder},
};

/// Upper bound (exclusive) of the random memo length.
const MAX_MOCK_MEMO_LENGTH: usize = 100;

/// Generates a signed mock transaction.
///
/// Signing happens in two rounds. The first attaches a placeholder signature
/// per signer so that every signer info (public key, sign mode, sequence) is
/// part of the transaction; the second computes each signer's sign bytes over
/// that complete transaction and fills in the signatures.
///
/// `acc_nums`, `acc_seqs` and `privs` are parallel: entry `i` of each belongs
/// to signer `i`.
///
/// # Errors
///
/// Returns an error when the parallel slices differ in length, the default
/// sign mode cannot be resolved, or the messages or placeholder signatures
/// are rejected by the builder.
///
/// # Panics
///
/// Panics when sign bytes cannot be computed or a signer fails to sign: both
/// mean the test fixture itself is broken.
#[allow(clippy::too_many_arguments)]
pub fn gen_signed_mock_tx<R: Rng + ?Sized>(
    rng: &mut R,
    tx_config: &TxConfig,
    msgs: &[Any],
    fee_amt: Coins,
    gas: u64,
    chain_id: &str,
    acc_nums: &[u64],
    acc_seqs: &[u64],
    privs: &[&dyn PrivKey],
) -> Result<Tx, SimsError> {
    if acc_nums.len() != privs.len() || acc_seqs.len() != privs.len() {
        return Err(SimsError::InvalidArgument(format!(
            "expected one account number and sequence per signer; got {} signers, {} account numbers, {} sequences",
            privs.len(),
            acc_nums.len(),
            acc_seqs.len()
        )));
    }

    let memo_len = rand_int_between(rng, 0, MAX_MOCK_MEMO_LENGTH);
    let memo = rand_string_of_length(rng, memo_len);

    let handler = tx_config.sign_mode_handler();
    let sign_mode = handler.resolve(handler.default_mode())?;

    // 1st round: placeholders fix the signer infos.
    let mut sigs: Vec<SignatureV2> = privs
        .iter()
        .zip(acc_seqs)
        .map(|(p, &seq)| SignatureV2::placeholder(p.pub_key(), sign_mode, seq))
        .collect();

    let mut builder = tx_config.new_tx_builder();
    builder.set_msgs(msgs)?;
    builder.set_signatures(&sigs)?;
    builder.set_memo(memo);
    builder.set_fee_amount(fee_amt);
    builder.set_gas_limit(gas);

    // 2nd round: every signer signs the complete transaction.
    let unsigned = builder.get_tx();
    for (i, p) in privs.iter().enumerate() {
        let pub_key = p.pub_key();
        let signer_data = SignerData {
            address: crypto::encode_bech32(BECH32_PREFIX, &pub_key.address_bytes())
                .unwrap_or_else(|e| panic!("signer {}: {}", i, e)),
            chain_id: chain_id.to_string(),
            account_number: acc_nums[i],
            sequence: acc_seqs[i],
            pub_key,
        };

        let sign_bytes = handler
            .get_sign_bytes(sign_mode, &signer_data, &unsigned)
            .unwrap_or_else(|e| panic!("failed to compute sign bytes for signer {}: {}", i, e));
        let sig = p
            .sign(&sign_bytes)
            .unwrap_or_else(|e| panic!("signer {} failed to sign: {}", i, e));
        sigs[i].data.signature = sig;
    }

    builder
        .set_signatures(&sigs)
        .unwrap_or_else(|e| panic!("failed to attach signatures: {}", e));

    Ok(builder.get_tx())
}

/// What [`sign_check_deliver`] observed for its transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub gas_info: GasInfo,
    pub result: TxResult,
    /// Block-level events of the finalized block.
    pub block_events: Vec<Event>,
    /// Set when the delivered transaction failed.
    pub error: Option<AbciError>,
}

impl Delivery {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<TxResult, AbciError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }
}

/// Signs a mock transaction, simulates it, delivers it in a block and commits.
///
/// The simulation outcome is asserted against `exp_sim_pass` and the delivery
/// outcome against `exp_pass`; a mismatch panics. The transaction always
/// carries [`DEFAULT_GEN_TX_GAS`] and a zero fee, regardless of the app's
/// configuration. The block is committed whatever the outcome, and a failing
/// commit is only logged. The returned [`Delivery`] carries the raw results for
/// further assertions.
#[allow(clippy::too_many_arguments)]
pub fn sign_check_deliver<A: App + ?Sized>(
    tx_config: &TxConfig,
    app: &mut A,
    header: &Header,
    msgs: &[Any],
    chain_id: &str,
    acc_nums: &[u64],
    acc_seqs: &[u64],
    exp_sim_pass: bool,
    exp_pass: bool,
    privs: &[&dyn PrivKey],
) -> Delivery {
    let tx = gen_signed_mock_tx(
        &mut time_seeded_rng(),
        tx_config,
        msgs,
        Coins::single(DEFAULT_BOND_DENOM, 0),
        DEFAULT_GEN_TX_GAS,
        chain_id,
        acc_nums,
        acc_seqs,
        privs,
    )
    .unwrap_or_else(|e| panic!("failed to generate signed mock tx: {}", e));
    let encode = tx_config.tx_encoder();
    let tx_bytes = encode(&tx).unwrap_or_else(|e| panic!("failed to encode tx: {}", e));

    let simulated = app.simulate(&tx_bytes);
    if exp_sim_pass {
        match &simulated {
            Ok(res) => {
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!(
                        "Simulated tx {}: gas_used={}",
                        crypto::tx_hash(&tx_bytes),
                        res.gas_info.gas_used
                    );
                }
            }
            Err(e) => panic!("expected simulation to pass, got: {}", e),
        }
    } else {
        assert!(
            simulated.is_err(),
            "expected simulation to fail, got: {:?}",
            simulated
        );
    }

    let bz = encode(&tx).unwrap_or_else(|e| panic!("failed to encode tx: {}", e));
    let res_block = app
        .finalize_block(&FinalizeBlockRequest {
            height: header.height,
            time: header.time,
            txs: vec![bz],
        })
        .unwrap_or_else(|e| panic!("failed to finalize block {}: {}", header.height, e));

    assert_eq!(
        res_block.tx_results.len(),
        1,
        "expected exactly one tx result"
    );
    let tx_result = &res_block.tx_results[0];
    let finalize_success = tx_result.is_ok();
    if exp_pass {
        assert!(
            finalize_success,
            "expected tx to pass, got code {} ({}): {}",
            tx_result.code, tx_result.codespace, tx_result.log
        );
    } else {
        assert!(!finalize_success, "expected tx to fail, but it passed");
    }

    if let Err(e) = app.commit() {
        log::warn!("Ignoring commit failure at height {}: {}", header.height, e);
    }

    log::debug!(
        "Delivered tx at height {}: code={} gas_wanted={} gas_used={}",
        header.height,
        tx_result.code,
        tx_result.gas_wanted,
        tx_result.gas_used
    );

    Delivery {
        gas_info: tx_result.gas_info(),
        result: tx_result.to_tx_result(),
        block_events: res_block.events.clone(),
        error: tx_result.error(),
    }
}

/// Generates `num_txs` encoded transactions signed by `account`, one per
/// sequence starting at its current sequence.
///
/// The account's sequence is incremented after every transaction. A
/// transaction that cannot be built or encoded leaves empty bytes in its
/// slot; use [`try_gen_sequence_of_txs`] to get the error instead.
pub fn gen_sequence_of_txs(
    tx_encoder: TxEncoder,
    tx_config: &TxConfig,
    msgs: &[Any],
    account: &mut AccountWithNumSeq,
    fee_amount: &Coins,
    gas: u64,
    num_txs: usize,
) -> Vec<Vec<u8>> {
    let mut txs = Vec::with_capacity(num_txs);

    for _ in 0..num_txs {
        let bytes = gen_account_tx(tx_encoder, tx_config, msgs, account, fee_amount, gas)
            .unwrap_or_else(|e| {
                log::warn!("Discarding tx at sequence {}: {}", account.seq, e);
                Vec::new()
            });
        txs.push(bytes);
        account.seq += 1;
    }

    txs
}

/// Like [`gen_sequence_of_txs`], but stops at the first failure.
///
/// On error the account's sequence has been advanced once for every
/// transaction generated before the failing one.
pub fn try_gen_sequence_of_txs(
    tx_encoder: TxEncoder,
    tx_config: &TxConfig,
    msgs: &[Any],
    account: &mut AccountWithNumSeq,
    fee_amount: &Coins,
    gas: u64,
    num_txs: usize,
) -> Result<Vec<Vec<u8>>, SimsError> {
    let mut txs = Vec::with_capacity(num_txs);

    for _ in 0..num_txs {
        txs.push(gen_account_tx(
            tx_encoder, tx_config, msgs, account, fee_amount, gas,
        )?);
        account.seq += 1;
    }

    Ok(txs)
}

fn gen_account_tx(
    tx_encoder: TxEncoder,
    tx_config: &TxConfig,
    msgs: &[Any],
    account: &AccountWithNumSeq,
    fee_amount: &Coins,
    gas: u64,
) -> Result<Vec<u8>, SimsError> {
    let tx = gen_signed_mock_tx(
        &mut time_seeded_rng(),
        tx_config,
        msgs,
        fee_amount.clone(),
        gas,
        CHAIN_ID,
        &[account.num],
        &[account.seq],
        &[&account.priv_key],
    )?;
    tx_encoder(&tx)
}
