//! Authenticated encryption for passport numbers at rest. AES-256-GCM with a
//! random nonce prepended to each ciphertext; the key comes from config and
//! must be 32 bytes.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

const NONCE_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("encryption key must be exactly 32 bytes, got {0}")]
    BadKeyLength(usize),
    #[error("ciphertext is too short to contain a nonce")]
    Truncated,
    #[error("decryption failed")]
    Decrypt,
    #[error("encryption failed")]
    Encrypt,
    #[error("decrypted payload is not valid UTF-8")]
    Utf8,
}

pub struct SecretVault {
    cipher: Aes256Gcm,
}

impl SecretVault {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != 32 {
            return Err(CryptoError::BadKeyLength(key.len()));
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::BadKeyLength(key.len()))?;
        Ok(Self { cipher })
    }

    /// Returns `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &str) -> Result<Vec<u8>, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;
        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    pub fn open(&self, blob: &[u8]) -> Result<String, CryptoError> {
        if blob.len() < NONCE_LEN {
            return Err(CryptoError::Truncated);
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Utf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> SecretVault {
        SecretVault::new(&[7u8; 32]).unwrap()
    }

    #[test]
    fn rejects_short_key() {
        assert!(matches!(
            SecretVault::new(&[0u8; 16]),
            Err(CryptoError::BadKeyLength(16))
        ));
    }

    #[test]
    fn seal_open_round_trip() {
        let v = vault();
        let blob = v.seal("P1234567").unwrap();
        assert_ne!(blob, b"P1234567");
        assert_eq!(v.open(&blob).unwrap(), "P1234567");
    }

    #[test]
    fn nonces_differ_between_calls() {
        let v = vault();
        let a = v.seal("P1234567").unwrap();
        let b = v.seal("P1234567").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let v = vault();
        let mut blob = v.seal("P1234567").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(matches!(v.open(&blob), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn wrong_key_fails() {
        let blob = vault().seal("P1234567").unwrap();
        let other = SecretVault::new(&[9u8; 32]).unwrap();
        assert!(other.open(&blob).is_err());
    }

    #[test]
    fn truncated_blob_fails() {
        assert!(matches!(vault().open(&[1, 2, 3]), Err(CryptoError::Truncated)));
    }
}
