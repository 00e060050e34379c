use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{crypto, error::SimsError};

/// Signing capability of a transaction signer.
///
/// Anything that can expose a public key and sign arbitrary bytes can take
/// part in building a mock transaction.
pub trait PrivKey {
    /// Returns the public key matching this private key.
    fn pub_key(&self) -> PubKey;

    /// Signs the given bytes.
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, SimsError>;
}

/// An ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(with = "hex::serde")]
    key: Vec<u8>,
}

impl PubKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { key: bytes.to_vec() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Raw 20-byte address of this key.
    pub fn address_bytes(&self) -> [u8; 20] {
        crypto::address_bytes(&self.key)
    }

    /// Bech32 account address of this key under the given prefix.
    pub fn address(&self, prefix: &str) -> Result<String, SimsError> {
        crypto::encode_bech32(prefix, &self.address_bytes())
    }

    /// Verifies an ed25519 signature over `msg`.
    ///
    /// Malformed keys and signatures never verify.
    pub fn verify_signature(&self, msg: &[u8], sig: &[u8]) -> bool {
        let Ok(key_bytes) = <[u8; 32]>::try_from(self.key.as_slice()) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(sig) else {
            return false;
        };
        verifying_key.verify(msg, &signature).is_ok()
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKeyEd25519{{{}}}", hex::encode_upper(&self.key))
    }
}

/// An ed25519 key pair able to sign transactions.
#[derive(Clone)]
pub struct Signer {
    signing_key: SigningKey,
    public_key: PubKey,
}

impl Signer {
    pub fn new(signing_key: SigningKey) -> Self {
        let public_key = PubKey::from_bytes(signing_key.verifying_key().as_bytes());

        Self {
            signing_key,
            public_key,
        }
    }

    /// Creates a signer from a 32 byte secret seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::new(SigningKey::from_bytes(seed))
    }

    /// Creates a signer from a fresh random seed.
    pub fn generate() -> Self {
        Self::from_seed(&crypto::generate_seed())
    }

    pub fn public_key(&self) -> PubKey {
        self.public_key.clone()
    }
}

impl PrivKey for Signer {
    fn pub_key(&self) -> PubKey {
        self.public_key()
    }

    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, SimsError> {
        Ok(self.signing_key.sign(msg).to_bytes().to_vec())
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl From<&[u8; 32]> for Signer {
    fn from(seed: &[u8; 32]) -> Self {
        Self::from_seed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{mock_signer1, mock_signer2};

    #[test]
    fn test_sign_and_verify() {
        let signer = mock_signer1();
        let msg = b"sign bytes";

        let sig = signer.sign(msg).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(signer.pub_key().verify_signature(msg, &sig));
        assert!(!signer.pub_key().verify_signature(b"other bytes", &sig));
        assert!(!mock_signer2().pub_key().verify_signature(msg, &sig));
    }

    #[test]
    fn test_signatures_are_deterministic() {
        let first = mock_signer1().sign(b"payload").unwrap();
        let second = mock_signer1().sign(b"payload").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_rejects_malformed_input() {
        let signer = mock_signer1();
        let sig = signer.sign(b"payload").unwrap();

        assert!(!signer.pub_key().verify_signature(b"payload", &sig[..63]));
        assert!(!PubKey::from_bytes(&[1, 2, 3]).verify_signature(b"payload", &sig));
    }

    #[test]
    fn test_address_is_stable() {
        let pub_key = mock_signer1().pub_key();
        let address = pub_key.address("cosmos").unwrap();

        assert!(address.starts_with("cosmos1"));
        assert_eq!(address, mock_signer1().pub_key().address("cosmos").unwrap());
        assert_ne!(address, mock_signer2().pub_key().address("cosmos").unwrap());
    }

    #[test]
    fn test_pub_key_serde_is_hex() {
        let pub_key = PubKey::from_bytes(&[0xab, 0xcd]);
        let json = serde_json::to_string(&pub_key).unwrap();
        assert_eq!(json, r#"{"key":"abcd"}"#);

        let decoded: PubKey = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, pub_key);
    }

    #[test]
    fn test_display() {
        let pub_key = PubKey::from_bytes(&[0xab, 0xcd]);
        assert_eq!(pub_key.to_string(), "PubKeyEd25519{ABCD}");
    }
}
