use sha2::{Digest, Sha256};

use crate::error::SimsError;

pub fn sha256_hash(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn generate_seed() -> [u8; 32] {
    rand::random()
}

/// Account address bytes of an ed25519 public key: the first 20 bytes of its
/// sha256 digest.
pub fn address_bytes(pub_key: &[u8]) -> [u8; 20] {
    let digest = sha256_hash(pub_key);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[..20]);
    address
}

pub fn encode_bech32(hrp: &str, payload: &[u8]) -> Result<String, SimsError> {
    let hrp = bech32::Hrp::parse(hrp)
        .map_err(|e| SimsError::AddressConversionFailed(format!("invalid prefix {hrp}: {e}")))?;
    bech32::encode::<bech32::Bech32>(hrp, payload)
        .map_err(|e| SimsError::AddressConversionFailed(e.to_string()))
}

/// Decodes a bech32 address, checking its prefix.
pub fn decode_bech32(expected_hrp: &str, address: &str) -> Result<Vec<u8>, SimsError> {
    let (hrp, payload) = bech32::decode(address)
        .map_err(|e| SimsError::AddressConversionFailed(format!("{address}: {e}")))?;
    if hrp.as_str() != expected_hrp {
        return Err(SimsError::AddressConversionFailed(format!(
            "invalid Bech32 prefix; expected {}, got {}",
            expected_hrp,
            hrp.as_str()
        )));
    }
    Ok(payload)
}

/// Upper-case hex sha256 of encoded transaction bytes, as block explorers show it.
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(sha256_hash(tx_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bech32_round_trip() {
        let payload = address_bytes(&[7u8; 32]);
        let address = encode_bech32("cosmos", &payload).unwrap();

        assert!(address.starts_with("cosmos1"));
        assert_eq!(decode_bech32("cosmos", &address).unwrap(), payload.to_vec());
    }

    #[test]
    fn test_decode_rejects_other_prefix() {
        let address = encode_bech32("osmo", &[1u8; 20]).unwrap();
        let err = decode_bech32("cosmos", &address).unwrap_err();

        assert!(matches!(err, SimsError::AddressConversionFailed(_)));
        assert!(err.to_string().contains("expected cosmos, got osmo"));
    }

    #[test]
    fn test_encode_rejects_invalid_prefix() {
        assert!(encode_bech32("", &[1u8; 20]).is_err());
    }

    #[test]
    fn test_tx_hash() {
        let hash = tx_hash(b"");
        assert_eq!(
            hash,
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }

    #[test]
    fn test_generate_seed_is_random() {
        assert_ne!(generate_seed(), generate_seed());
    }
}
