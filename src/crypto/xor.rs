//! Tiled-XOR obfuscation.
//!
//! Boomstream obfuscates key-exchange values by XORing each byte against a
//! shared secret, repeated as often as needed to cover the input, and
//! transporting the result as lowercase hex.

use crate::error::{Error, Result};

/// Decode a hex string and XOR it against the tiled secret.
pub fn deobfuscate_hex(encoded: &str, secret: &[u8]) -> Result<Vec<u8>> {
    let raw = hex::decode(encoded)
        .map_err(|e| Error::Protocol(format!("invalid hex in obfuscated value: {}", e)))?;
    Ok(tiled_xor(&raw, secret))
}

/// XOR the input against the tiled secret and hex-encode the result.
pub fn obfuscate_hex(plain: &[u8], secret: &[u8]) -> String {
    hex::encode(tiled_xor(plain, secret))
}

fn tiled_xor(data: &[u8], secret: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(secret.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"bla_bla_bla";

    #[test]
    fn test_round_trip() {
        let plain = b"the quick brown fox jumps over the lazy dog";
        let encoded = obfuscate_hex(plain, SECRET);
        assert_eq!(deobfuscate_hex(&encoded, SECRET).unwrap(), plain);
    }

    #[test]
    fn test_secret_tiles_past_its_own_length() {
        // 26 bytes against an 11-byte secret wraps the secret twice.
        let plain: Vec<u8> = (b'a'..=b'z').collect();
        let encoded = obfuscate_hex(&plain, SECRET);

        let raw = hex::decode(&encoded).unwrap();
        assert_eq!(raw.len(), plain.len());
        for (i, byte) in raw.iter().enumerate() {
            assert_eq!(byte ^ SECRET[i % SECRET.len()], plain[i]);
        }
    }

    #[test]
    fn test_invalid_hex_is_a_protocol_error() {
        let err = deobfuscate_hex("zz", SECRET).unwrap_err();
        assert!(matches!(err, crate::error::Error::Protocol(_)));

        // Odd-length input cannot be split into byte pairs.
        assert!(deobfuscate_hex("abc", SECRET).is_err());
    }
}
