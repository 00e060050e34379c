//! # Test Accounts
//!
//! A test account bundles a signer with the account number the application
//! assigned to it and the sequence (nonce) of its next transaction.
//!
//! ## Example
//!
//! ```rust
//! use sims_rs::{AccountWithNumSeq, Signer};
//!
//! let signer = Signer::from_seed(&[1u8; 32]);
//! let mut account = AccountWithNumSeq::new(signer, 4, 0);
//!
//! account.seq += 1;
//! assert_eq!(account.seq, 1);
//! ```
use std::fmt;

use crate::{
    error::SimsError,
    mock::{MockApp, DEFAULT_ACCOUNT_BALANCE},
    signer::{PrivKey, PubKey, Signer},
};

/// A signer with its account number and current sequence.
///
/// The sequence is advanced by whoever submits transactions for the account,
/// never by the transaction builder.
#[derive(Debug, Clone)]
pub struct AccountWithNumSeq {
    pub priv_key: Signer,
    pub num: u64,
    pub seq: u64,
}

impl AccountWithNumSeq {
    pub fn new(priv_key: Signer, num: u64, seq: u64) -> Self {
        Self { priv_key, num, seq }
    }

    /// Creates a fresh funded account registered in `app`.
    ///
    /// The account holds [`DEFAULT_ACCOUNT_BALANCE`] of the app's bond denom.
    pub fn generate(app: &mut MockApp) -> Self {
        let signer = Signer::generate();
        let coins = crate::Coins::single(app.config().bond_denom.clone(), DEFAULT_ACCOUNT_BALANCE);
        app.add_account(signer, coins)
    }

    pub fn pub_key(&self) -> PubKey {
        self.priv_key.pub_key()
    }

    pub fn address(&self, prefix: &str) -> Result<String, SimsError> {
        self.pub_key().address(prefix)
    }
}

impl fmt::Display for AccountWithNumSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account({}, num: {}, seq: {})",
            hex::encode(self.pub_key().address_bytes()),
            self.num,
            self.seq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::mock_signer1;

    #[test]
    fn test_generate_registers_account() {
        let mut app = MockApp::default();
        let first = AccountWithNumSeq::generate(&mut app);
        let second = AccountWithNumSeq::generate(&mut app);

        assert_eq!(first.seq, 0);
        assert_ne!(first.num, second.num);

        let address = first.address("cosmos").unwrap();
        let stored = app.account(&address).unwrap();
        assert_eq!(stored.account_number, first.num);
        assert_eq!(app.balance(&address, "stake"), DEFAULT_ACCOUNT_BALANCE);
    }

    #[sims_test_helpers::test]
    fn test_injected_accounts(app: MockApp, alice: AccountWithNumSeq, bob: AccountWithNumSeq) {
        assert_eq!((alice.num, bob.num), (0, 1));
        for account in [&alice, &bob] {
            let address = account.address("cosmos").unwrap();
            assert_eq!(app.account(&address).unwrap().sequence, account.seq);
        }
    }

    #[test]
    fn test_display() {
        let account = AccountWithNumSeq::new(mock_signer1(), 3, 9);
        let shown = account.to_string();

        assert!(shown.starts_with("Account("));
        assert!(shown.ends_with("num: 3, seq: 9)"));
    }
}
