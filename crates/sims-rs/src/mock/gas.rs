use crate::error::{sdk, AbciError};

/// Gas charged per byte of an encoded transaction.
pub const TX_SIZE_COST_PER_BYTE: u64 = 10;
/// Gas charged per ed25519 signature.
pub const SIG_VERIFY_COST_ED25519: u64 = 590;

pub const READ_COST_FLAT: u64 = 1_000;
pub const READ_COST_PER_BYTE: u64 = 3;
pub const WRITE_COST_FLAT: u64 = 2_000;
pub const WRITE_COST_PER_BYTE: u64 = 30;
pub const DELETE_COST: u64 = 1_000;

/// Tracks gas consumed by one transaction against an optional limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: Option<u64>,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            consumed: 0,
        }
    }

    /// A meter that never runs out, used for simulation.
    pub fn infinite() -> Self {
        Self {
            limit: None,
            consumed: 0,
        }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Consumes `amount` gas. Once the limit is exceeded the meter stays
    /// exhausted and every call fails.
    pub fn consume(&mut self, amount: u64, descriptor: &str) -> Result<(), AbciError> {
        self.consumed = self.consumed.saturating_add(amount);

        match self.limit {
            Some(limit) if self.consumed > limit => Err(AbciError::wrap(
                &sdk::ERR_OUT_OF_GAS,
                format!(
                    "out of gas in location: {}; gasWanted: {}, gasUsed: {}",
                    descriptor, limit, self.consumed
                ),
            )),
            _ => Ok(()),
        }
    }
}
