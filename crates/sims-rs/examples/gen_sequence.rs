use dotenv::from_path;
use sims_rs::{
    mock::MockApp, try_gen_sequence_of_txs, tx_hash, App, Coins, FinalizeBlockRequest, Msg,
    MsgSend, SimConfig, Signer, TxConfig,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    from_path(Path::new("examples/.env")).ok();
    env_logger::init();

    let config = SimConfig::from_env()?;
    let denom = config.bond_denom.clone();
    let prefix = config.bech32_prefix.clone();
    let gas = config.default_gen_tx_gas;
    let mut app = MockApp::new(config);

    let mut alice = app.add_account(Signer::generate(), Coins::single(denom.clone(), 1_000));
    let bob = app.add_account(Signer::generate(), Coins::default());

    let msg = MsgSend::new(
        alice.address(&prefix)?,
        bob.address(&prefix)?,
        Coins::single(denom.clone(), 10),
    )
    .to_any()?;

    // The batch is signed for the default chain id.
    let tx_config = TxConfig::default();
    let txs = try_gen_sequence_of_txs(
        tx_config.tx_encoder(),
        &tx_config,
        &[msg],
        &mut alice,
        &Coins::single(denom.clone(), 1),
        gas,
        5,
    )?;
    for tx in &txs {
        println!("Generated tx {}", tx_hash(tx));
    }

    let res = app.finalize_block(&FinalizeBlockRequest {
        height: app.last_block_height() + 1,
        time: chrono::Utc::now(),
        txs,
    })?;
    app.commit()?;

    for (i, result) in res.tx_results.iter().enumerate() {
        match result.error() {
            None => println!("tx {}: ok, gas used {}", i, result.gas_used),
            Some(err) => println!("tx {}: {}", i, err),
        }
    }
    println!("Next sequence of alice: {}", alice.seq);
    println!("Balance of bob: {}", app.balances(&bob.address(&prefix)?));

    Ok(())
}
