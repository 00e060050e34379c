use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, fmt};

use super::{
    bank::BankHandler,
    context::{BaseAccount, Context, MsgHandler, State},
    gas::{GasMeter, SIG_VERIFY_COST_ED25519, TX_SIZE_COST_PER_BYTE},
};
use crate::{
    abci::{
        CommitResponse, Event, ExecTxResult, FinalizeBlockRequest, FinalizeBlockResponse,
        GasInfo, SimulateResponse, TxResult,
    },
    account::AccountWithNumSeq,
    app::App,
    coin::Coins,
    config::SimConfig,
    crypto,
    error::{sdk, AbciError, SimsError},
    msg::{Msg, MsgSend, TxMsgData},
    sign_mode::SignerData,
    signer::{PrivKey, Signer},
    transaction::Tx,
    tx_config::TxConfig,
};

/// Address receiving transaction fees.
pub const FEE_COLLECTOR: &str = "fee_collector";

#[derive(Debug, Clone)]
struct PendingBlock {
    height: i64,
    time: DateTime<Utc>,
    state: State,
}

/// Outcome of running one transaction, successful or not.
struct TxOutcome {
    gas_info: GasInfo,
    result: Result<TxResult, AbciError>,
}

/// An in-process application with accounts, balances and a key/value store.
///
/// State changes of a finalized block stay pending until [`App::commit`].
/// Queries and simulations see committed state only. Setup methods such as
/// [`MockApp::add_account`] write committed state directly.
pub struct MockApp {
    config: SimConfig,
    tx_config: TxConfig,
    handlers: BTreeMap<String, Box<dyn MsgHandler>>,
    committed: State,
    last_height: i64,
    last_time: DateTime<Utc>,
    pending: Option<PendingBlock>,
}

impl Default for MockApp {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl fmt::Debug for MockApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockApp")
            .field("config", &self.config)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("last_height", &self.last_height)
            .field("pending", &self.pending.as_ref().map(|p| p.height))
            .finish_non_exhaustive()
    }
}

impl MockApp {
    /// Creates an application at height 0 with the bank handler registered.
    pub fn new(config: SimConfig) -> Self {
        let mut app = Self {
            config,
            tx_config: TxConfig::default(),
            handlers: BTreeMap::new(),
            committed: State::default(),
            last_height: 0,
            last_time: DateTime::<Utc>::UNIX_EPOCH,
            pending: None,
        };
        app.register_handler(MsgSend::TYPE_URL, Box::new(BankHandler));
        app
    }

    pub fn with_tx_config(mut self, tx_config: TxConfig) -> Self {
        self.tx_config = tx_config;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tx_config(&self) -> &TxConfig {
        &self.tx_config
    }

    pub fn chain_id(&self) -> &str {
        &self.config.chain_id
    }

    pub fn last_block_height(&self) -> i64 {
        self.last_height
    }

    pub fn last_block_time(&self) -> DateTime<Utc> {
        self.last_time
    }

    /// Routes messages with `type_url` to `handler`, replacing any handler
    /// registered before.
    pub fn register_handler(&mut self, type_url: impl Into<String>, handler: Box<dyn MsgHandler>) {
        self.handlers.insert(type_url.into(), handler);
    }

    /// Registers an account for `signer` holding `coins`.
    ///
    /// # Panics
    ///
    /// Panics when the configured bech32 prefix is invalid or the resulting
    /// balance overflows.
    pub fn add_account(&mut self, signer: Signer, coins: Coins) -> AccountWithNumSeq {
        let pub_key = signer.pub_key();
        let address = pub_key
            .address(&self.config.bech32_prefix)
            .unwrap_or_else(|e| panic!("failed to derive account address: {}", e));

        let account = match self.committed.accounts.get(&address) {
            Some(existing) => existing.clone(),
            None => self.committed.new_account(&address, Some(pub_key)),
        };
        let balance = self
            .committed
            .balance(&address)
            .checked_add(&coins)
            .unwrap_or_else(|| panic!("balance of {} overflows when adding {}", address, coins));
        self.committed.set_balance(&address, balance);

        log::debug!(
            "Added account {} (number {}) with {}",
            address,
            account.account_number,
            coins
        );
        AccountWithNumSeq::new(signer, account.account_number, account.sequence)
    }

    /// Adds `coins` to the committed balance of `address`.
    pub fn fund_account(&mut self, address: &str, coins: &Coins) -> Result<(), SimsError> {
        let balance = self
            .committed
            .balance(address)
            .checked_add(coins)
            .ok_or_else(|| {
                SimsError::InvalidArgument(format!(
                    "balance of {} overflows when adding {}",
                    address, coins
                ))
            })?;
        self.committed.set_balance(address, balance);
        Ok(())
    }

    pub fn account(&self, address: &str) -> Option<BaseAccount> {
        self.committed.accounts.get(address).cloned()
    }

    pub fn balances(&self, address: &str) -> Coins {
        self.committed.balance(address)
    }

    pub fn balance(&self, address: &str, denom: &str) -> u128 {
        self.committed.balance(address).amount_of(denom)
    }

    pub fn store_get(&self, key: &str) -> Option<&[u8]> {
        self.committed.store.get(key).map(Vec::as_slice)
    }

    fn decode_tx(&self, tx_bytes: &[u8]) -> Result<Tx, AbciError> {
        let decode = self.tx_config.tx_decoder();
        decode(tx_bytes).map_err(|e| AbciError::wrap(&sdk::ERR_TX_DECODE, e.to_string()))
    }

    fn validate_basic(&self, tx: &Tx) -> Result<(), AbciError> {
        if tx.msgs().is_empty() {
            return Err(AbciError::wrap(
                &sdk::ERR_INVALID_REQUEST,
                "must contain at least one message",
            ));
        }
        if tx.signatures().is_empty() {
            return Err(AbciError::from(&sdk::ERR_NO_SIGNATURES));
        }
        if tx.signatures().len() != tx.signer_infos().len() {
            return Err(AbciError::wrap(
                &sdk::ERR_UNAUTHORIZED,
                format!(
                    "wrong number of signers; expected {}, got {}",
                    tx.signer_infos().len(),
                    tx.signatures().len()
                ),
            ));
        }
        let memo_len = tx.memo().chars().count();
        if memo_len > self.config.max_memo_characters {
            return Err(AbciError::wrap(
                &sdk::ERR_MEMO_TOO_LARGE,
                format!(
                    "maximum number of characters is {} but received {} characters",
                    self.config.max_memo_characters, memo_len
                ),
            ));
        }
        tx.fee()
            .validate()
            .map_err(|e| AbciError::wrap(&sdk::ERR_INVALID_COINS, e.to_string()))
    }

    fn tx_signers(&self, tx: &Tx) -> Result<Vec<String>, AbciError> {
        let mut signers: Vec<String> = Vec::new();
        for msg in tx.msgs() {
            let handler = self.handlers.get(&msg.type_url).ok_or_else(|| {
                AbciError::wrap(
                    &sdk::ERR_UNKNOWN_REQUEST,
                    format!("unrecognized message type: {}", msg.type_url),
                )
            })?;
            for signer in handler.signers(msg)? {
                if !signers.contains(&signer) {
                    signers.push(signer);
                }
            }
        }
        Ok(signers)
    }

    /// Checks signers, verifies signatures, increments sequences and deducts
    /// the fee.
    fn ante(&self, ctx: &mut Context<'_>, tx: &Tx, tx_len: usize) -> Result<(), AbciError> {
        ctx.consume_gas(TX_SIZE_COST_PER_BYTE * tx_len as u64, "txSize")?;

        let timeout = tx.timeout_height();
        if timeout > 0 && u64::try_from(ctx.block_height()).unwrap_or_default() > timeout {
            return Err(AbciError::wrap(
                &sdk::ERR_TX_TIMEOUT_HEIGHT,
                format!(
                    "block height: {}, timeout height: {}",
                    ctx.block_height(),
                    timeout
                ),
            ));
        }

        let signers = self.tx_signers(tx)?;
        if signers.len() != tx.signer_infos().len() {
            return Err(AbciError::wrap(
                &sdk::ERR_UNAUTHORIZED,
                format!(
                    "invalid number of signer;  expected: {}, got {}",
                    signers.len(),
                    tx.signer_infos().len()
                ),
            ));
        }

        let mut acc_seqs = Vec::with_capacity(signers.len());
        for (i, (address, sig)) in signers.iter().zip(tx.get_signatures_v2()).enumerate() {
            let mut account = ctx.account(address)?.ok_or_else(|| {
                AbciError::wrap(
                    &sdk::ERR_UNKNOWN_ADDRESS,
                    format!("account {} does not exist", address),
                )
            })?;

            let key_address = sig
                .pub_key
                .address(ctx.bech32_prefix())
                .map_err(|e| AbciError::wrap(&sdk::ERR_INVALID_PUB_KEY, e.to_string()))?;
            let key_matches = account
                .pub_key
                .as_ref()
                .map_or(true, |pk| *pk == sig.pub_key);
            if key_address != *address || !key_matches {
                return Err(AbciError::wrap(
                    &sdk::ERR_INVALID_PUB_KEY,
                    format!(
                        "pubKey does not match signer address {} with signer index: {}",
                        address, i
                    ),
                ));
            }

            if sig.sequence != account.sequence {
                return Err(AbciError::wrap(
                    &sdk::ERR_WRONG_SEQUENCE,
                    format!(
                        "account sequence mismatch, expected {}, got {}",
                        account.sequence, sig.sequence
                    ),
                ));
            }

            ctx.consume_gas(SIG_VERIFY_COST_ED25519, "ante verify: ed25519")?;

            if !ctx.is_simulate() {
                let signer_data = SignerData {
                    address: address.clone(),
                    chain_id: ctx.chain_id().to_string(),
                    account_number: account.account_number,
                    sequence: account.sequence,
                    pub_key: sig.pub_key.clone(),
                };
                let verified = self
                    .tx_config
                    .sign_mode_handler()
                    .get_sign_bytes(sig.data.sign_mode, &signer_data, tx)
                    .map(|bytes| sig.pub_key.verify_signature(&bytes, &sig.data.signature))
                    .unwrap_or(false);
                if !verified {
                    return Err(AbciError::wrap(
                        &sdk::ERR_UNAUTHORIZED,
                        format!(
                            "signature verification failed; please verify account number ({}), sequence ({}) and chain-id ({})",
                            account.account_number,
                            account.sequence,
                            ctx.chain_id()
                        ),
                    ));
                }
            }

            account.pub_key = Some(sig.pub_key.clone());
            account.sequence += 1;
            acc_seqs.push(format!("{}/{}", address, sig.sequence));
            ctx.set_account(account)?;
        }

        let fee = tx.fee();
        if !fee.is_zero() {
            let payer = &signers[0];
            ctx.send_coins(payer, FEE_COLLECTOR, fee).map_err(|e| {
                if e.is(&sdk::ERR_INSUFFICIENT_FUNDS) {
                    AbciError::wrap(
                        &sdk::ERR_INSUFFICIENT_FUNDS,
                        format!("{}: insufficient fees", fee),
                    )
                } else {
                    e
                }
            })?;
        }

        let mut tx_event = Event::new("tx").add_attribute("fee", fee);
        if let Some(payer) = signers.first() {
            tx_event = tx_event.add_attribute("fee_payer", payer);
        }
        ctx.emit_event(tx_event);
        for acc_seq in acc_seqs {
            ctx.emit_event(Event::new("tx").add_attribute("acc_seq", acc_seq));
        }

        Ok(())
    }

    fn run_msgs(&self, ctx: &mut Context<'_>, tx: &Tx) -> Result<Vec<u8>, AbciError> {
        let mut data = TxMsgData::default();
        for msg in tx.msgs() {
            let handler = self.handlers.get(&msg.type_url).ok_or_else(|| {
                AbciError::wrap(
                    &sdk::ERR_UNKNOWN_REQUEST,
                    format!("unrecognized message type: {}", msg.type_url),
                )
            })?;
            data.msg_responses.push(handler.handle(ctx, msg)?);
        }
        data.encode()
            .map_err(|e| AbciError::wrap(&sdk::ERR_TX_DECODE, e.to_string()))
    }

    /// Runs one transaction against `state`.
    ///
    /// Ante changes are kept even when a message fails; message changes only
    /// when all messages succeed.
    fn run_tx(
        &self,
        state: &mut State,
        height: i64,
        time: DateTime<Utc>,
        tx_bytes: &[u8],
        simulate: bool,
    ) -> TxOutcome {
        let tx = match self.decode_tx(tx_bytes).and_then(|tx| {
            self.validate_basic(&tx)?;
            Ok(tx)
        }) {
            Ok(tx) => tx,
            Err(err) => {
                return TxOutcome {
                    gas_info: GasInfo::default(),
                    result: Err(err),
                }
            }
        };

        let gas_wanted = tx.gas();
        let mut meter = if simulate {
            GasMeter::infinite()
        } else {
            GasMeter::new(gas_wanted)
        };
        let chain_id = self.config.chain_id.as_str();
        let prefix = self.config.bech32_prefix.as_str();

        let mut ante_state = state.clone();
        let mut ctx = Context::new(
            &mut ante_state,
            &mut meter,
            height,
            time,
            chain_id,
            prefix,
            simulate,
        );
        let ante = self.ante(&mut ctx, &tx, tx_bytes.len());
        let mut events = ctx.take_events();
        drop(ctx);

        let result = match ante {
            Err(err) => Err(err),
            Ok(()) => {
                *state = ante_state;
                let mut msg_state = state.clone();
                let mut ctx = Context::new(
                    &mut msg_state,
                    &mut meter,
                    height,
                    time,
                    chain_id,
                    prefix,
                    simulate,
                );
                let run = self.run_msgs(&mut ctx, &tx);
                events.extend(ctx.take_events());
                drop(ctx);

                run.map(|data| {
                    *state = msg_state;
                    TxResult {
                        data,
                        log: String::new(),
                        events,
                    }
                })
            }
        };

        TxOutcome {
            gas_info: GasInfo {
                gas_wanted,
                gas_used: meter.consumed(),
            },
            result,
        }
    }

    fn app_hash(state: &State) -> Result<Vec<u8>, SimsError> {
        let bytes = serde_json::to_vec(state)
            .map_err(|e| SimsError::TransactionEncodingFailed(format!("app state: {}", e)))?;
        Ok(crypto::sha256_hash(&bytes).to_vec())
    }
}

impl App for MockApp {
    fn simulate(&self, tx_bytes: &[u8]) -> Result<SimulateResponse, SimsError> {
        let mut state = self.committed.clone();
        let outcome = self.run_tx(
            &mut state,
            self.last_height + 1,
            self.last_time,
            tx_bytes,
            true,
        );

        match outcome.result {
            Ok(result) => Ok(SimulateResponse {
                gas_info: outcome.gas_info,
                result,
            }),
            Err(err) => {
                log::debug!("Simulation failed: {}", err);
                Err(err.into())
            }
        }
    }

    fn finalize_block(
        &mut self,
        req: &FinalizeBlockRequest,
    ) -> Result<FinalizeBlockResponse, SimsError> {
        let expected = self.last_height + 1;
        if req.height != expected {
            return Err(SimsError::InvalidHeight {
                got: req.height,
                expected,
            });
        }
        if let Some(pending) = self.pending.take() {
            log::warn!("Discarding uncommitted block at height {}", pending.height);
        }

        let mut state = self.committed.clone();
        let tx_results: Vec<ExecTxResult> = req
            .txs
            .iter()
            .map(|tx_bytes| {
                let outcome = self.run_tx(&mut state, req.height, req.time, tx_bytes, false);
                let gas_wanted = i64::try_from(outcome.gas_info.gas_wanted).unwrap_or(i64::MAX);
                let gas_used = i64::try_from(outcome.gas_info.gas_used).unwrap_or(i64::MAX);
                match outcome.result {
                    Ok(res) => ExecTxResult {
                        code: 0,
                        data: res.data,
                        log: res.log,
                        gas_wanted,
                        gas_used,
                        events: res.events,
                        codespace: String::new(),
                    },
                    Err(err) => {
                        log::debug!("Tx {} failed: {}", crypto::tx_hash(tx_bytes), err);
                        ExecTxResult {
                            code: err.code,
                            log: err.log,
                            gas_wanted,
                            gas_used,
                            codespace: err.codespace,
                            ..Default::default()
                        }
                    }
                }
            })
            .collect();

        let events = vec![Event::new("end_block")
            .add_attribute("height", req.height)
            .add_attribute("num_txs", req.txs.len())
            .add_attribute("mode", "EndBlock")];
        let app_hash = Self::app_hash(&state)?;

        log::info!(
            "Finalized block {} with {} txs ({} failed)",
            req.height,
            tx_results.len(),
            tx_results.iter().filter(|r| !r.is_ok()).count()
        );

        self.pending = Some(PendingBlock {
            height: req.height,
            time: req.time,
            state,
        });

        Ok(FinalizeBlockResponse {
            events,
            tx_results,
            app_hash,
        })
    }

    fn commit(&mut self) -> Result<CommitResponse, SimsError> {
        let pending = self.pending.take().ok_or(SimsError::NothingToCommit)?;

        self.committed = pending.state;
        self.last_height = pending.height;
        self.last_time = pending.time;
        log::debug!("Committed block {}", pending.height);

        Ok(CommitResponse { retain_height: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{mock_app, mock_signer1, DEFAULT_ACCOUNT_BALANCE};
    use crate::{
        helpers::gen_signed_mock_tx, Any, SignMode, SignatureV2, TxBuilder, CHAIN_ID,
    };
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn signed_send(
        app: &MockApp,
        from: &AccountWithNumSeq,
        to: &AccountWithNumSeq,
        amount: u128,
        fee: Coins,
        gas: u64,
    ) -> Vec<u8> {
        let msg = MsgSend::new(
            from.address("cosmos").unwrap(),
            to.address("cosmos").unwrap(),
            Coins::single("stake", amount),
        )
        .to_any()
        .unwrap();
        let tx = gen_signed_mock_tx(
            &mut StdRng::seed_from_u64(from.seq),
            app.tx_config(),
            &[msg],
            fee,
            gas,
            CHAIN_ID,
            &[from.num],
            &[from.seq],
            &[&from.priv_key],
        )
        .unwrap();
        (app.tx_config().tx_encoder())(&tx).unwrap()
    }

    fn finalize(app: &mut MockApp, txs: Vec<Vec<u8>>) -> FinalizeBlockResponse {
        let height = app.last_block_height() + 1;
        let res = app
            .finalize_block(&FinalizeBlockRequest { height, time: time(), txs })
            .unwrap();
        app.commit().unwrap();
        res
    }

    #[test]
    fn test_add_account_assigns_numbers() {
        let mut app = MockApp::default();
        let a = app.add_account(mock_signer1(), Coins::single("stake", 5));
        let again = app.add_account(mock_signer1(), Coins::single("stake", 5));

        assert_eq!(a.num, 0);
        assert_eq!(again.num, 0);
        assert_eq!(app.balance(&a.address("cosmos").unwrap(), "stake"), 10);
    }

    #[test]
    fn test_simulate_does_not_persist() {
        let (app, accounts) = mock_app(2);
        let tx = signed_send(&app, &accounts[0], &accounts[1], 5, Coins::default(), 200_000);

        let res = app.simulate(&tx).unwrap();
        assert!(res.gas_info.gas_used > 0);
        assert_eq!(res.gas_info.gas_wanted, 200_000);

        let from = accounts[0].address("cosmos").unwrap();
        assert_eq!(app.account(&from).unwrap().sequence, 0);
        assert_eq!(app.balance(&from, "stake"), DEFAULT_ACCOUNT_BALANCE);
    }

    #[test]
    fn test_finalize_requires_next_height() {
        let mut app = MockApp::default();
        let err = app
            .finalize_block(&FinalizeBlockRequest {
                height: 5,
                time: time(),
                txs: vec![],
            })
            .unwrap_err();
        assert_eq!(err, SimsError::InvalidHeight { got: 5, expected: 1 });
    }

    #[test]
    fn test_commit_without_block() {
        let mut app = MockApp::default();
        assert_eq!(app.commit().unwrap_err(), SimsError::NothingToCommit);
    }

    #[test]
    fn test_state_pending_until_commit() {
        let (mut app, accounts) = mock_app(2);
        let tx = signed_send(&app, &accounts[0], &accounts[1], 5, Coins::default(), 200_000);
        let to = accounts[1].address("cosmos").unwrap();

        let res = app
            .finalize_block(&FinalizeBlockRequest {
                height: 1,
                time: time(),
                txs: vec![tx],
            })
            .unwrap();
        assert!(res.tx_results[0].is_ok());
        assert_eq!(res.app_hash.len(), 32);
        assert_eq!(app.balance(&to, "stake"), DEFAULT_ACCOUNT_BALANCE);
        assert_eq!(app.last_block_height(), 0);

        app.commit().unwrap();
        assert_eq!(app.balance(&to, "stake"), DEFAULT_ACCOUNT_BALANCE + 5);
        assert_eq!(app.last_block_height(), 1);
        assert_eq!(app.last_block_time(), time());
    }

    #[test]
    fn test_fee_deducted() {
        let (mut app, accounts) = mock_app(2);
        let tx = signed_send(
            &app,
            &accounts[0],
            &accounts[1],
            5,
            Coins::single("stake", 7),
            200_000,
        );
        let res = finalize(&mut app, vec![tx]);

        assert!(res.tx_results[0].is_ok());
        let from = accounts[0].address("cosmos").unwrap();
        assert_eq!(app.balance(&from, "stake"), DEFAULT_ACCOUNT_BALANCE - 12);
        assert_eq!(app.balance(FEE_COLLECTOR, "stake"), 7);
    }

    #[test]
    fn test_recipient_balance_overflow_fails_tx() {
        let (mut app, accounts) = mock_app(2);
        let from = accounts[0].address("cosmos").unwrap();
        let to = accounts[1].address("cosmos").unwrap();
        app.fund_account(&to, &Coins::single("stake", u128::MAX - DEFAULT_ACCOUNT_BALANCE))
            .unwrap();
        assert!(app.fund_account(&to, &Coins::single("stake", 1)).is_err());

        let tx = signed_send(&app, &accounts[0], &accounts[1], 1, Coins::default(), 200_000);
        let res = finalize(&mut app, vec![tx]);

        let result = &res.tx_results[0];
        assert_eq!(result.codespace, "sdk");
        assert_eq!(result.code, sdk::ERR_INVALID_COINS.code);
        assert!(result.log.contains("overflows"));
        assert_eq!(app.balance(&from, "stake"), DEFAULT_ACCOUNT_BALANCE);
        assert_eq!(app.balance(&to, "stake"), u128::MAX);
        // The ante handler still consumed the sequence.
        assert_eq!(app.account(&from).unwrap().sequence, 1);
    }

    #[test]
    fn test_insufficient_fee() {
        let (mut app, accounts) = mock_app(2);
        let tx = signed_send(
            &app,
            &accounts[0],
            &accounts[1],
            1,
            Coins::single("stake", DEFAULT_ACCOUNT_BALANCE + 1),
            200_000,
        );
        let res = finalize(&mut app, vec![tx]);

        let err = res.tx_results[0].error().unwrap();
        assert!(err.is(&sdk::ERR_INSUFFICIENT_FUNDS));
        assert!(err.log.contains("insufficient fees"));
        let from = accounts[0].address("cosmos").unwrap();
        assert_eq!(app.account(&from).unwrap().sequence, 0);
    }

    #[test]
    fn test_out_of_gas() {
        let (mut app, accounts) = mock_app(2);
        let tx = signed_send(&app, &accounts[0], &accounts[1], 1, Coins::default(), 100);
        let res = finalize(&mut app, vec![tx]);

        let result = &res.tx_results[0];
        assert!(result.error().unwrap().is(&sdk::ERR_OUT_OF_GAS));
        assert_eq!(result.gas_wanted, 100);
    }

    #[test]
    fn test_undecodable_tx() {
        let mut app = MockApp::default();
        let res = finalize(&mut app, vec![b"garbage".to_vec()]);

        let err = res.tx_results[0].error().unwrap();
        assert!(err.is(&sdk::ERR_TX_DECODE));
        assert_eq!(
            res.events[0].attribute("num_txs"),
            Some("1")
        );
    }

    #[test]
    fn test_unknown_message_type() {
        let (app, accounts) = mock_app(1);
        let tx = gen_signed_mock_tx(
            &mut StdRng::seed_from_u64(0),
            app.tx_config(),
            &[Any::new("/cosmos.gov.v1.MsgVote", b"{}".to_vec())],
            Coins::default(),
            200_000,
            CHAIN_ID,
            &[accounts[0].num],
            &[0],
            &[&accounts[0].priv_key],
        )
        .unwrap();
        let bytes = (app.tx_config().tx_encoder())(&tx).unwrap();

        match app.simulate(&bytes).unwrap_err() {
            SimsError::Abci(err) => assert!(err.is(&sdk::ERR_UNKNOWN_REQUEST)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validate_basic() {
        let app = MockApp::default();
        let encode = app.tx_config().tx_encoder();
        let signer = mock_signer1();

        let no_msgs = TxBuilder::new().get_tx();
        let err = app.run_tx(&mut State::default(), 1, time(), &encode(&no_msgs).unwrap(), true);
        assert!(err.result.unwrap_err().is(&sdk::ERR_INVALID_REQUEST));

        let msg = MsgSend::new("a", "b", Coins::single("stake", 1)).to_any().unwrap();
        let mut builder = TxBuilder::new();
        builder.set_msgs(&[msg]).unwrap();
        let no_sigs = builder.get_tx();
        let err = app.run_tx(&mut State::default(), 1, time(), &encode(&no_sigs).unwrap(), true);
        assert!(err.result.unwrap_err().is(&sdk::ERR_NO_SIGNATURES));

        builder
            .set_signatures(&[SignatureV2::placeholder(signer.pub_key(), SignMode::Direct, 0)])
            .unwrap();
        builder.set_memo("x".repeat(257));
        let long_memo = builder.get_tx();
        let err = app.run_tx(&mut State::default(), 1, time(), &encode(&long_memo).unwrap(), true);
        assert!(err.result.unwrap_err().is(&sdk::ERR_MEMO_TOO_LARGE));
    }

    #[test]
    fn test_unknown_signer_account() {
        let app = MockApp::default();
        let signer = mock_signer1();
        let from = signer.pub_key().address("cosmos").unwrap();
        let msg = MsgSend::new(from, "cosmos1to", Coins::single("stake", 1)).to_any().unwrap();
        let tx = gen_signed_mock_tx(
            &mut StdRng::seed_from_u64(0),
            app.tx_config(),
            &[msg],
            Coins::default(),
            200_000,
            CHAIN_ID,
            &[0],
            &[0],
            &[&signer],
        )
        .unwrap();

        let err = app
            .simulate(&(app.tx_config().tx_encoder())(&tx).unwrap())
            .unwrap_err();
        assert!(matches!(err, SimsError::Abci(e) if e.is(&sdk::ERR_UNKNOWN_ADDRESS)));
    }

    #[test]
    fn test_wrong_signer_key() {
        let (app, accounts) = mock_app(2);
        let msg = MsgSend::new(
            accounts[0].address("cosmos").unwrap(),
            accounts[1].address("cosmos").unwrap(),
            Coins::single("stake", 1),
        )
        .to_any()
        .unwrap();
        let tx = gen_signed_mock_tx(
            &mut StdRng::seed_from_u64(0),
            app.tx_config(),
            &[msg],
            Coins::default(),
            200_000,
            CHAIN_ID,
            &[accounts[0].num],
            &[0],
            &[&accounts[1].priv_key],
        )
        .unwrap();

        let err = app
            .simulate(&(app.tx_config().tx_encoder())(&tx).unwrap())
            .unwrap_err();
        assert!(matches!(err, SimsError::Abci(e) if e.is(&sdk::ERR_INVALID_PUB_KEY)));
    }

    #[test]
    fn test_timeout_height() {
        let (mut app, accounts) = mock_app(2);
        finalize(&mut app, vec![]);
        finalize(&mut app, vec![]);

        let msg = MsgSend::new(
            accounts[0].address("cosmos").unwrap(),
            accounts[1].address("cosmos").unwrap(),
            Coins::single("stake", 1),
        )
        .to_any()
        .unwrap();
        let mut builder = TxBuilder::new();
        builder.set_msgs(&[msg]).unwrap();
        builder.set_timeout_height(2);
        builder.set_gas_limit(200_000);
        let mut sig = SignatureV2::placeholder(accounts[0].pub_key(), SignMode::Direct, 0);
        builder.set_signatures(&[sig.clone()]).unwrap();
        let signer_data = SignerData {
            address: accounts[0].address("cosmos").unwrap(),
            chain_id: CHAIN_ID.to_string(),
            account_number: accounts[0].num,
            sequence: 0,
            pub_key: accounts[0].pub_key(),
        };
        let bytes = app
            .tx_config()
            .sign_mode_handler()
            .get_sign_bytes(SignMode::Direct, &signer_data, &builder.get_tx())
            .unwrap();
        sig.data.signature = accounts[0].priv_key.sign(&bytes).unwrap();
        builder.set_signatures(&[sig]).unwrap();

        let tx = (app.tx_config().tx_encoder())(&builder.get_tx()).unwrap();
        let res = finalize(&mut app, vec![tx]);
        assert!(res.tx_results[0]
            .error()
            .unwrap()
            .is(&sdk::ERR_TX_TIMEOUT_HEIGHT));
    }

    #[test]
    fn test_app_hash_tracks_state() {
        let (mut app, accounts) = mock_app(2);
        let empty = finalize(&mut app, vec![]);
        let again = finalize(&mut app, vec![]);
        assert_eq!(empty.app_hash, again.app_hash);

        let tx = signed_send(&app, &accounts[0], &accounts[1], 1, Coins::default(), 200_000);
        let changed = finalize(&mut app, vec![tx]);
        assert_ne!(changed.app_hash, again.app_hash);
    }

    #[test]
    fn test_boxed_app() {
        let (app, accounts) = mock_app(2);
        let tx = signed_send(&app, &accounts[0], &accounts[1], 1, Coins::default(), 200_000);
        let mut boxed: Box<dyn App> = Box::new(app);

        assert!(boxed.simulate(&tx).is_ok());
        let res = boxed
            .finalize_block(&FinalizeBlockRequest {
                height: 1,
                time: time(),
                txs: vec![tx],
            })
            .unwrap();
        assert!(res.tx_results[0].is_ok());
        boxed.commit().unwrap();
    }
}
