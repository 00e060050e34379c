use super::context::{Context, MsgHandler};
use crate::{
    abci::Event,
    crypto,
    error::{sdk, AbciError},
    msg::{Any, Msg, MsgSend, MsgSendResponse},
};

/// Executes [`MsgSend`] transfers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankHandler;

impl BankHandler {
    fn unpack(msg: &Any) -> Result<MsgSend, AbciError> {
        msg.unpack::<MsgSend>()
            .map_err(|e| AbciError::wrap(&sdk::ERR_TX_DECODE, e.to_string()))
    }

    fn validate_basic(ctx: &Context<'_>, msg: &MsgSend) -> Result<(), AbciError> {
        for address in [&msg.from_address, &msg.to_address] {
            crypto::decode_bech32(ctx.bech32_prefix(), address)
                .map_err(|e| AbciError::wrap(&sdk::ERR_INVALID_ADDRESS, e.to_string()))?;
        }
        msg.amount
            .validate()
            .map_err(|e| AbciError::wrap(&sdk::ERR_INVALID_COINS, e.to_string()))?;
        if msg.amount.is_empty() || msg.amount.is_zero() {
            return Err(AbciError::wrap(
                &sdk::ERR_INVALID_COINS,
                msg.amount.to_string(),
            ));
        }
        Ok(())
    }
}

impl MsgHandler for BankHandler {
    fn signers(&self, msg: &Any) -> Result<Vec<String>, AbciError> {
        Ok(vec![Self::unpack(msg)?.from_address])
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Any) -> Result<Any, AbciError> {
        let msg = Self::unpack(msg)?;
        Self::validate_basic(ctx, &msg)?;

        ctx.send_coins(&msg.from_address, &msg.to_address, &msg.amount)?;

        ctx.emit_event(
            Event::new("coin_spent")
                .add_attribute("spender", &msg.from_address)
                .add_attribute("amount", &msg.amount),
        );
        ctx.emit_event(
            Event::new("coin_received")
                .add_attribute("receiver", &msg.to_address)
                .add_attribute("amount", &msg.amount),
        );
        ctx.emit_event(
            Event::new("transfer")
                .add_attribute("recipient", &msg.to_address)
                .add_attribute("sender", &msg.from_address)
                .add_attribute("amount", &msg.amount),
        );
        ctx.emit_event(
            Event::new("message")
                .add_attribute("sender", &msg.from_address)
                .add_attribute("module", "bank"),
        );

        MsgSendResponse {}
            .to_any()
            .map_err(|e| AbciError::wrap(&sdk::ERR_TX_DECODE, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::context::State;
    use crate::mock::gas::GasMeter;
    use crate::Coins;
    use chrono::Utc;

    fn address(byte: u8) -> String {
        crypto::encode_bech32("cosmos", &[byte; 20]).unwrap()
    }

    fn run(state: &mut State, msg: &MsgSend) -> (Result<Any, AbciError>, Vec<Event>) {
        let mut meter = GasMeter::infinite();
        let mut ctx = Context::new(state, &mut meter, 1, Utc::now(), "chain", "cosmos", false);
        let res = BankHandler.handle(&mut ctx, &msg.to_any().unwrap());
        (res, ctx.take_events())
    }

    #[test]
    fn test_signers() {
        let msg = MsgSend::new(address(1), address(2), Coins::single("stake", 1));
        assert_eq!(
            BankHandler.signers(&msg.to_any().unwrap()).unwrap(),
            vec![address(1)]
        );
    }

    #[test]
    fn test_send() {
        let mut state = State::default();
        state.new_account(&address(1), None);
        state.set_balance(&address(1), Coins::single("stake", 50));

        let msg = MsgSend::new(address(1), address(2), Coins::single("stake", 20));
        let (res, events) = run(&mut state, &msg);

        assert!(res.unwrap().is::<MsgSendResponse>());
        assert_eq!(state.balance(&address(1)).amount_of("stake"), 30);
        assert_eq!(state.balance(&address(2)).amount_of("stake"), 20);

        let transfer = events.iter().find(|e| e.kind == "transfer").unwrap();
        assert_eq!(transfer.attribute("amount"), Some("20stake"));
        assert_eq!(transfer.attribute("sender"), Some(address(1).as_str()));
    }

    #[test]
    fn test_send_rejects_invalid_messages() {
        let mut state = State::default();

        let bad_address = MsgSend::new("nope", address(2), Coins::single("stake", 1));
        assert!(run(&mut state, &bad_address)
            .0
            .unwrap_err()
            .is(&sdk::ERR_INVALID_ADDRESS));

        let zero = MsgSend::new(address(1), address(2), Coins::single("stake", 0));
        assert!(run(&mut state, &zero).0.unwrap_err().is(&sdk::ERR_INVALID_COINS));

        let bad_denom = MsgSend::new(address(1), address(2), Coins::single("$", 1));
        assert!(run(&mut state, &bad_denom)
            .0
            .unwrap_err()
            .is(&sdk::ERR_INVALID_COINS));
    }

    #[test]
    fn test_wrong_message_type() {
        let any = Any::new("/cosmos.gov.v1.MsgVote", b"{}".to_vec());
        assert!(BankHandler.signers(&any).unwrap_err().is(&sdk::ERR_TX_DECODE));
    }
}
