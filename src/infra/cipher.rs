//! Field-level encryption for sensitive string attributes.
//!
//! AES-256-GCM-SIV (RFC 8452) is used with a fixed nonce taken from the
//! configured IV, so the same plaintext always yields the same ciphertext for
//! a given key/IV pair. The full IV is bound as associated data: ciphertext
//! produced under a different key or IV fails authentication on decrypt.
//!
//! Ciphertext is lowercase hex, safe for a plain text column.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, Payload},
    Aes256GcmSiv, Key, Nonce,
};
use thiserror::Error;

use crate::config::{CIPHER_IV_LEN, CIPHER_KEY_LEN};

/// Byte length of the AES-GCM-SIV nonce derived from the IV.
const NONCE_LEN: usize = 12;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("ciphertext is not valid hex")]
    InvalidEncoding,

    #[error("aead operation failed")]
    AeadFailure,

    #[error("decrypted value is not valid UTF-8")]
    InvalidPlaintext,
}

/// Process-wide key and IV, parsed once at startup.
#[derive(Clone)]
pub struct KeyMaterial {
    key: [u8; CIPHER_KEY_LEN],
    iv: [u8; CIPHER_IV_LEN],
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

impl KeyMaterial {
    pub fn new(key: [u8; CIPHER_KEY_LEN], iv: [u8; CIPHER_IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Parse a 64-char hex key and a 32-char hex IV.
    pub fn from_hex(key_hex: &str, iv_hex: &str) -> Result<Self, CipherError> {
        Ok(Self {
            key: decode_fixed(key_hex.trim(), "key")?,
            iv: decode_fixed(iv_hex.trim(), "iv")?,
        })
    }
}

fn decode_fixed<const N: usize>(value: &str, what: &str) -> Result<[u8; N], CipherError> {
    let bytes = hex::decode(value)
        .map_err(|e| CipherError::InvalidKeyMaterial(format!("{} is not hex: {}", what, e)))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        CipherError::InvalidKeyMaterial(format!(
            "{} must be {} bytes, got {}",
            what,
            N,
            bytes.len()
        ))
    })
}

/// Deterministic symmetric cipher for individual fields.
pub struct FieldCipher {
    cipher: Aes256GcmSiv,
    nonce: [u8; NONCE_LEN],
    aad: [u8; CIPHER_IV_LEN],
}

impl FieldCipher {
    pub fn new(material: &KeyMaterial) -> Self {
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&material.iv[..NONCE_LEN]);

        Self {
            cipher: Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(&material.key)),
            nonce,
            aad: material.iv,
        }
    }

    /// Encrypt a plaintext string into hex ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let payload = Payload {
            msg: plaintext.as_bytes(),
            aad: &self.aad,
        };
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&self.nonce), payload)
            .map_err(|_| CipherError::AeadFailure)?;

        Ok(hex::encode(ciphertext))
    }

    /// Decrypt hex ciphertext produced by [`FieldCipher::encrypt`].
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        let bytes = hex::decode(ciphertext).map_err(|_| CipherError::InvalidEncoding)?;
        let payload = Payload {
            msg: &bytes,
            aad: &self.aad,
        };
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&self.nonce), payload)
            .map_err(|_| CipherError::AeadFailure)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidPlaintext)
    }

    /// Encrypt only when a value is present; absent stays absent.
    pub fn encrypt_if_present(&self, value: Option<&str>) -> Result<Option<String>, CipherError> {
        value.map(|v| self.encrypt(v)).transpose()
    }

    /// Decrypt only when a value is present; absent stays absent.
    pub fn decrypt_if_present(&self, value: Option<&str>) -> Result<Option<String>, CipherError> {
        value.map(|v| self.decrypt(v)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const IV_HEX: &str = "a0a1a2a3a4a5a6a7a8a9aaabacadaeaf";

    fn cipher() -> FieldCipher {
        FieldCipher::new(&KeyMaterial::from_hex(KEY_HEX, IV_HEX).unwrap())
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = cipher();
        let encrypted = cipher.encrypt("12345678").unwrap();
        assert_ne!(encrypted, "12345678");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "12345678");
    }

    #[test]
    fn round_trip_preserves_unicode_and_empty_strings() {
        let cipher = cipher();
        for plaintext in ["", "Banco Unión", "ñandú 🦜", "line\nbreak"] {
            let encrypted = cipher.encrypt(plaintext).unwrap();
            assert_eq!(cipher.decrypt(&encrypted).unwrap(), plaintext);
        }
    }

    #[test]
    fn encryption_is_deterministic() {
        let cipher = cipher();
        assert_eq!(
            cipher.encrypt("987654321").unwrap(),
            cipher.encrypt("987654321").unwrap()
        );
        assert_ne!(
            cipher.encrypt("987654321").unwrap(),
            cipher.encrypt("987654322").unwrap()
        );
    }

    #[test]
    fn ciphertext_is_lowercase_hex() {
        let encrypted = cipher().encrypt("Bank XYZ").unwrap();
        assert!(encrypted
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let other = FieldCipher::new(&KeyMaterial::new([7u8; CIPHER_KEY_LEN], [1u8; CIPHER_IV_LEN]));
        let encrypted = cipher().encrypt("secret").unwrap();
        assert!(matches!(other.decrypt(&encrypted), Err(CipherError::AeadFailure)));
    }

    #[test]
    fn different_iv_tail_fails_decryption() {
        // Same nonce bytes, different trailing IV bytes.
        let other = FieldCipher::new(
            &KeyMaterial::from_hex(KEY_HEX, "a0a1a2a3a4a5a6a7a8a9aaab00000000").unwrap(),
        );
        let encrypted = cipher().encrypt("secret").unwrap();
        assert!(other.decrypt(&encrypted).is_err());
    }

    #[test]
    fn malformed_ciphertext_is_rejected() {
        let cipher = cipher();
        assert!(matches!(cipher.decrypt("zz-not-hex"), Err(CipherError::InvalidEncoding)));
        assert!(matches!(cipher.decrypt("abcd"), Err(CipherError::AeadFailure)));

        let mut tampered = cipher.encrypt("tamper me").unwrap().into_bytes();
        tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(cipher.decrypt(&tampered).is_err());
    }

    #[test]
    fn if_present_helpers_leave_absent_values_alone() {
        let cipher = cipher();
        assert_eq!(cipher.encrypt_if_present(None).unwrap(), None);
        assert_eq!(cipher.decrypt_if_present(None).unwrap(), None);

        let encrypted = cipher.encrypt_if_present(Some("Bank XYZ")).unwrap();
        assert_eq!(
            cipher.decrypt_if_present(encrypted.as_deref()).unwrap().as_deref(),
            Some("Bank XYZ")
        );
    }

    #[test]
    fn key_material_rejects_wrong_lengths() {
        assert!(KeyMaterial::from_hex("00", IV_HEX).is_err());
        assert!(KeyMaterial::from_hex(KEY_HEX, "00").is_err());
        assert!(KeyMaterial::from_hex(KEY_HEX, "xyz").is_err());
    }

    #[test]
    fn key_material_debug_is_redacted() {
        let rendered = format!("{:?}", KeyMaterial::from_hex(KEY_HEX, IV_HEX).unwrap());
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("0001"));
    }
}
