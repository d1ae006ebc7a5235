//! AES-128-CBC segment decryption.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, KeyIvInit};

use crate::error::{Error, Result};

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Decrypt an encrypted segment and strip its PKCS#7 padding.
///
/// Padding is validated explicitly: the last plaintext byte is the pad
/// length, which must be non-zero and must not exceed the buffer length.
pub fn decrypt_segment(data: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Result<Vec<u8>> {
    let mut buffer = data.to_vec();

    Aes128CbcDec::new(key.into(), iv.into())
        .decrypt_padded_mut::<NoPadding>(&mut buffer)
        .map_err(|e| Error::Crypto(format!("AES-128-CBC decryption failed: {}", e)))?;

    let padding = *buffer
        .last()
        .ok_or_else(|| Error::Crypto("decrypted segment is empty".to_string()))?;

    if padding == 0 || padding as usize > buffer.len() {
        return Err(Error::Crypto(format!(
            "invalid PKCS#7 padding byte: {}",
            padding
        )));
    }

    buffer.truncate(buffer.len() - padding as usize);
    Ok(buffer)
}
