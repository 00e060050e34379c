use dotenv::from_path;
use sims_rs::{
    mock::MockApp, sign_check_deliver, Coins, Header, Msg, MsgSend, SimConfig, Signer, TxConfig,
};
use std::{env, path::Path};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    from_path(Path::new("examples/.env")).ok();
    env_logger::init();

    let config = SimConfig::from_env()?;
    let denom = config.bond_denom.clone();
    let prefix = config.bech32_prefix.clone();
    let mut app = MockApp::new(config);

    // SIMS_SIGNER_SEED: optional 32 byte hex seed of the sending account
    let sender = match env::var("SIMS_SIGNER_SEED") {
        Ok(seed) => {
            let bytes: [u8; 32] = hex::decode(seed)?
                .try_into()
                .map_err(|_| "SIMS_SIGNER_SEED must be 32 bytes")?;
            Signer::from(&bytes)
        }
        Err(_) => Signer::generate(),
    };
    let alice = app.add_account(sender, Coins::single(denom.clone(), 1_000));
    let bob = app.add_account(Signer::generate(), Coins::default());

    let msg = MsgSend::new(
        alice.address(&prefix)?,
        bob.address(&prefix)?,
        Coins::single(denom.clone(), 250),
    );

    let header = Header::new(app.last_block_height() + 1, chrono::Utc::now());
    let chain_id = app.chain_id().to_string();
    let delivery = sign_check_deliver(
        &TxConfig::default(),
        &mut app,
        &header,
        &[msg.to_any()?],
        &chain_id,
        &[alice.num],
        &[alice.seq],
        true,
        true,
        &[&alice.priv_key],
    );

    println!("Delivered at height {}", app.last_block_height());
    println!(
        "Gas used: {} of {}",
        delivery.gas_info.gas_used, delivery.gas_info.gas_wanted
    );
    for event in &delivery.result.events {
        println!("Event {}: {:?}", event.kind, event.attributes);
    }
    println!(
        "Balances: alice={} bob={}",
        app.balances(&alice.address(&prefix)?),
        app.balances(&bob.address(&prefix)?)
    );

    // Replaying the same sequence is rejected by both simulation and delivery.
    let replay = sign_check_deliver(
        &TxConfig::default(),
        &mut app,
        &header.next(5),
        &[msg.to_any()?],
        &chain_id,
        &[alice.num],
        &[alice.seq],
        false,
        false,
        &[&alice.priv_key],
    );
    if let Some(err) = replay.error {
        println!("Replay rejected: {}", err);
    }

    Ok(())
}
