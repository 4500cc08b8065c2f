//! Cryptographic primitives for the vault.
//!
//! # Algorithms
//!
//! - **Key derivation**: PBKDF2-HMAC-SHA256
//! - **Encryption**: AES-256-GCM (authenticated encryption)

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 250_000;

/// Salt length for key derivation (16 bytes).
pub const SALT_LEN: usize = 16;

/// Nonce length for AES-GCM (12 bytes).
pub const NONCE_LEN: usize = 12;

/// Derived key length (256 bits).
pub const KEY_LEN: usize = 32;

/// Fill a fresh array from the OS random number generator.
///
/// Fails with [`VaultError::CryptoUnavailable`] when the OS source is unusable.
pub fn random_bytes<const N: usize>() -> VaultResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| VaultError::crypto(format!("OS random source failed: {e}")))?;
    Ok(bytes)
}

/// Derive a 256-bit key from a passphrase and salt.
pub fn derive_key(passphrase: &[u8], salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, key.as_mut_slice());
    key
}

/// Encrypt with AES-256-GCM. The result carries the 16-byte tag.
pub fn encrypt(plaintext: &[u8], key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> VaultResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| VaultError::crypto(format!("Encryption failed: {e}")))
}

/// Decrypt with AES-256-GCM.
///
/// Any authentication failure (wrong key or modified ciphertext) is
/// [`VaultError::DecryptionAuthFailure`]; no plaintext is returned.
pub fn decrypt(
    ciphertext: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> VaultResult<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::DecryptionAuthFailure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = derive_key(b"pw", &[7u8; SALT_LEN], 1_000);
        let nonce = random_bytes::<NONCE_LEN>().unwrap();

        let ciphertext = encrypt(b"hello", &key, &nonce).unwrap();
        assert_eq!(ciphertext.len(), 5 + 16);

        let plaintext = decrypt(&ciphertext, &key, &nonce).unwrap();
        assert_eq!(plaintext.as_slice(), b"hello");
    }

    #[test]
    fn test_wrong_key_fails() {
        let salt = [1u8; SALT_LEN];
        let nonce = [2u8; NONCE_LEN];
        let key = derive_key(b"right", &salt, 1_000);
        let wrong = derive_key(b"wrong", &salt, 1_000);

        let ciphertext = encrypt(b"secret", &key, &nonce).unwrap();
        let err = decrypt(&ciphertext, &wrong, &nonce).unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let salt = [3u8; SALT_LEN];
        assert_eq!(*derive_key(b"pw", &salt, 10), *derive_key(b"pw", &salt, 10));
        assert_ne!(*derive_key(b"pw", &salt, 10), *derive_key(b"pw", &salt, 11));
    }

    #[test]
    fn test_random_bytes_differ() {
        let a = random_bytes::<SALT_LEN>().unwrap();
        let b = random_bytes::<SALT_LEN>().unwrap();
        assert_ne!(a, b);
    }
}
