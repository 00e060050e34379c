//! # Mock Application
//!
//! An in-process application for driving the helpers in tests, together with
//! fixed signers whose keys never change between runs.
//!
//! ## Example
//!
//! ```rust
//! use sims_rs::mock::mock_app;
//!
//! let (app, accounts) = mock_app(2);
//! let address = accounts[0].address("cosmos").unwrap();
//!
//! assert_eq!(app.account(&address).unwrap().sequence, 0);
//! ```
mod app;
mod bank;
mod context;
mod gas;

pub use app::{MockApp, FEE_COLLECTOR};
pub use bank::BankHandler;
pub use context::{BaseAccount, Context, MsgHandler};
pub use gas::GasMeter;

use crate::{account::AccountWithNumSeq, signer::Signer};

/// Balance of the bond denom given to generated accounts.
pub const DEFAULT_ACCOUNT_BALANCE: u128 = 100_000_000;

const SEED_1: [u8; 32] = *b"sims-rs mock signer seed number1";
const SEED_2: [u8; 32] = *b"sims-rs mock signer seed number2";
const SEED_3: [u8; 32] = *b"sims-rs mock signer seed number3";

/// Returns a collection of mock signers for testing
pub fn all_signers() -> Vec<Signer> {
    vec![mock_signer1(), mock_signer2(), mock_signer3()]
}

pub fn mock_signer1() -> Signer {
    Signer::from_seed(&SEED_1)
}

pub fn mock_signer2() -> Signer {
    Signer::from_seed(&SEED_2)
}

pub fn mock_signer3() -> Signer {
    Signer::from_seed(&SEED_3)
}

/// Creates a default [`MockApp`] with `num_accounts` freshly generated,
/// funded accounts.
pub fn mock_app(num_accounts: usize) -> (MockApp, Vec<AccountWithNumSeq>) {
    let mut app = MockApp::default();
    let accounts = (0..num_accounts)
        .map(|_| AccountWithNumSeq::generate(&mut app))
        .collect();
    (app, accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrivKey;

    #[test]
    fn test_mock_signers_are_stable_and_distinct() {
        assert_eq!(mock_signer1().pub_key(), mock_signer1().pub_key());

        let keys: Vec<_> = all_signers().iter().map(|s| s.pub_key()).collect();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn test_mock_app_accounts() {
        let (app, accounts) = mock_app(3);
        let numbers: Vec<u64> = accounts.iter().map(|a| a.num).collect();

        assert_eq!(numbers, vec![0, 1, 2]);
        for account in &accounts {
            let address = account.address("cosmos").unwrap();
            assert_eq!(app.balance(&address, "stake"), DEFAULT_ACCOUNT_BALANCE);
        }
    }
}
