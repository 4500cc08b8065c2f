//! The encrypted payload envelope.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::{self, NONCE_LEN, SALT_LEN};
use crate::error::{VaultError, VaultResult};

/// Current envelope format version.
pub const PAYLOAD_VERSION: u32 = 1;

/// Envelope format v1: `{ version, salt, iv, data }`, binary fields base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub version: u32,
    pub salt: String,
    pub iv: String,
    pub data: String,
}

impl EncryptedPayload {
    /// Encrypt `plaintext` under a key derived from `passphrase`.
    ///
    /// Salt and IV are drawn fresh for every call.
    pub fn seal(plaintext: &[u8], passphrase: &str, iterations: u32) -> VaultResult<Self> {
        let salt = crypto::random_bytes::<SALT_LEN>()?;
        let iv = crypto::random_bytes::<NONCE_LEN>()?;
        let key = crypto::derive_key(passphrase.as_bytes(), &salt, iterations);
        let data = crypto::encrypt(plaintext, &key, &iv)?;

        Ok(Self {
            version: PAYLOAD_VERSION,
            salt: STANDARD.encode(salt),
            iv: STANDARD.encode(iv),
            data: STANDARD.encode(data),
        })
    }

    /// Decrypt the envelope. `key` names the stored entry in errors.
    pub fn open(&self, key: &str, passphrase: &str, iterations: u32) -> VaultResult<Zeroizing<Vec<u8>>> {
        if self.version != PAYLOAD_VERSION {
            return Err(VaultError::UnsupportedVersion {
                key: key.to_string(),
                version: self.version,
            });
        }

        let salt: [u8; SALT_LEN] = decode_fixed(key, "salt", &self.salt)?;
        let iv: [u8; NONCE_LEN] = decode_fixed(key, "iv", &self.iv)?;
        let data = STANDARD
            .decode(&self.data)
            .map_err(|e| malformed(key, format!("data: {e}")))?;

        let derived = crypto::derive_key(passphrase.as_bytes(), &salt, iterations);
        crypto::decrypt(&data, &derived, &iv)
    }

    /// Parse an envelope from its stored JSON text.
    pub fn from_json(key: &str, text: &str) -> VaultResult<Self> {
        serde_json::from_str(text).map_err(|e| malformed(key, e))
    }

    /// Serialize the envelope to JSON text.
    pub fn to_json(&self) -> VaultResult<String> {
        serde_json::to_string(self).map_err(|source| VaultError::Serialization { source })
    }
}

fn malformed(key: &str, message: impl ToString) -> VaultError {
    VaultError::MalformedPayload {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn decode_fixed<const N: usize>(key: &str, field: &str, value: &str) -> VaultResult<[u8; N]> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| malformed(key, format!("{field}: {e}")))?;
    <[u8; N]>::try_from(bytes.as_slice())
        .map_err(|_| malformed(key, format!("{field}: expected {N} bytes, got {}", bytes.len())))
}
