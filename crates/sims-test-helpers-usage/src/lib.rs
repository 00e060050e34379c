//! A per-account counter module, registered on a [`MockApp`] to show how a
//! custom message type is driven through the helpers.
use serde::{Deserialize, Serialize};
use sims_rs::{
    mock::{Context, MockApp, MsgHandler},
    sdk, AbciError, Any, ErrorCode, Event, Msg,
};

pub const CODESPACE: &str = "counter";

pub const ERR_ZERO_INCREMENT: ErrorCode = ErrorCode::new(CODESPACE, 2, "increment must be positive");
pub const ERR_OVERFLOW: ErrorCode = ErrorCode::new(CODESPACE, 3, "counter overflow");

/// Adds `by` to the sender's counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgIncrement {
    pub sender: String,
    pub by: u64,
}

impl Msg for MsgIncrement {
    const TYPE_URL: &'static str = "/counter.v1.MsgIncrement";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgIncrementResponse {
    pub value: u64,
}

impl Msg for MsgIncrementResponse {
    const TYPE_URL: &'static str = "/counter.v1.MsgIncrementResponse";
}

fn counter_key(address: &str) -> String {
    format!("counter/{}", address)
}

fn decode_count(bytes: &[u8]) -> u64 {
    <[u8; 8]>::try_from(bytes)
        .map(u64::from_be_bytes)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CounterHandler;

impl CounterHandler {
    fn unpack(msg: &Any) -> Result<MsgIncrement, AbciError> {
        msg.unpack::<MsgIncrement>()
            .map_err(|e| AbciError::wrap(&sdk::ERR_TX_DECODE, e.to_string()))
    }
}

impl MsgHandler for CounterHandler {
    fn signers(&self, msg: &Any) -> Result<Vec<String>, AbciError> {
        Ok(vec![Self::unpack(msg)?.sender])
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Any) -> Result<Any, AbciError> {
        let msg = Self::unpack(msg)?;
        if msg.by == 0 {
            return Err(AbciError::from(&ERR_ZERO_INCREMENT));
        }

        let key = counter_key(&msg.sender);
        let current = ctx.get(&key)?.as_deref().map(decode_count).unwrap_or(0);
        let value = current
            .checked_add(msg.by)
            .ok_or_else(|| AbciError::wrap(&ERR_OVERFLOW, format!("{} + {}", current, msg.by)))?;
        ctx.set(&key, value.to_be_bytes().to_vec())?;

        ctx.emit_event(
            Event::new("increment")
                .add_attribute("sender", &msg.sender)
                .add_attribute("value", value)
                .add_attribute("height", ctx.block_height()),
        );

        MsgIncrementResponse { value }
            .to_any()
            .map_err(|e| AbciError::wrap(&sdk::ERR_TX_DECODE, e.to_string()))
    }
}

/// Registers the counter module on `app`.
pub fn register(app: &mut MockApp) {
    app.register_handler(MsgIncrement::TYPE_URL, Box::new(CounterHandler));
}

/// Committed counter value of `address`.
pub fn count(app: &MockApp, address: &str) -> u64 {
    app.store_get(&counter_key(address))
        .map(decode_count)
        .unwrap_or(0)
}
