//! Segment decryption and the Boomstream key-exchange protocol.
//!
//! This module provides:
//! - Tiled-XOR obfuscation used by the key exchange
//! - AES-128-CBC segment decryption with PKCS#7 validation
//! - Key material derivation and retrieval

pub mod cbc;
pub mod keys;
pub mod xor;

pub use cbc::decrypt_segment;
pub use keys::{exchange_keys, KeyMaterial};
