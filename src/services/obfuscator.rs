// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Symmetric obfuscation of polyline and location fields.
//!
//! Two schemes coexist in published datasets:
//!
//! - `BlockCipher`: AES-256-GCM with a per-message key derived from the
//!   passphrase via HKDF-SHA256 and a random salt. Output is base64 of
//!   `salt || nonce || ciphertext || tag`, so equal inputs encrypt differently.
//! - `XorBase64`: bytes XORed with the repeating key, then base64. Kept for
//!   older datasets; it only keeps casual readers out.
//!
//! Revealing never fails outwardly. Wrong keys, corrupted data and values
//! that were never encrypted all come back unchanged, so a dataset where only
//! some fields were migrated still renders.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hkdf::Hkdf;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;
const HKDF_INFO: &[u8] = b"workouts-privacy/aes-256-gcm/v1";

/// Which cipher produced (or should produce) a protected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherScheme {
    #[default]
    BlockCipher,
    XorBase64,
}

impl CipherScheme {
    /// The scheme to try when this one fails on legacy data.
    pub fn other(self) -> Self {
        match self {
            CipherScheme::BlockCipher => CipherScheme::XorBase64,
            CipherScheme::XorBase64 => CipherScheme::BlockCipher,
        }
    }
}

impl fmt::Display for CipherScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherScheme::BlockCipher => f.write_str("aes"),
            CipherScheme::XorBase64 => f.write_str("xor"),
        }
    }
}

impl FromStr for CipherScheme {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes" | "aes-gcm" | "block" => Ok(CipherScheme::BlockCipher),
            "xor" | "xor-base64" => Ok(CipherScheme::XorBase64),
            other => Err(CryptoError::UnknownScheme(other.to_string())),
        }
    }
}

/// Protects and reveals strings with a process-wide key.
#[derive(Clone)]
pub struct CoordinateObfuscator {
    key: String,
    scheme: CipherScheme,
    rng: SystemRandom,
}

impl fmt::Debug for CoordinateObfuscator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinateObfuscator")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl CoordinateObfuscator {
    pub fn new(key: impl Into<String>, scheme: CipherScheme) -> Self {
        Self {
            key: key.into(),
            scheme,
            rng: SystemRandom::new(),
        }
    }

    pub fn scheme(&self) -> CipherScheme {
        self.scheme
    }

    /// Encrypt with the configured scheme.
    pub fn protect(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.protect_with(self.scheme, plaintext)
    }

    /// Encrypt with an explicit scheme.
    pub fn protect_with(
        &self,
        scheme: CipherScheme,
        plaintext: &str,
    ) -> Result<String, CryptoError> {
        if self.key.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        match scheme {
            CipherScheme::BlockCipher => self.seal(plaintext),
            CipherScheme::XorBase64 => Ok(BASE64.encode(xor_with_key(
                plaintext.as_bytes(),
                self.key.as_bytes(),
            ))),
        }
    }

    /// Decrypt with the configured scheme, reporting why it failed.
    pub fn try_reveal(&self, ciphertext: &str) -> Result<String, CryptoError> {
        self.try_reveal_with(self.scheme, ciphertext)
    }

    /// Decrypt with an explicit scheme, reporting why it failed.
    pub fn try_reveal_with(
        &self,
        scheme: CipherScheme,
        ciphertext: &str,
    ) -> Result<String, CryptoError> {
        if self.key.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        let bytes = BASE64
            .decode(ciphertext.trim())
            .map_err(|e| CryptoError::Base64(e.to_string()))?;

        let plaintext = match scheme {
            CipherScheme::BlockCipher => self.open(bytes)?,
            CipherScheme::XorBase64 => xor_with_key(&bytes, self.key.as_bytes()),
        };
        String::from_utf8(plaintext).map_err(|e| CryptoError::Utf8(e.to_string()))
    }

    /// Decrypt with the configured scheme; on any failure return the input.
    pub fn reveal(&self, ciphertext: &str) -> String {
        match self.try_reveal(ciphertext) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                tracing::debug!(error = %e, scheme = %self.scheme, "Reveal failed, keeping input");
                ciphertext.to_string()
            }
        }
    }

    /// Decrypt trying the configured scheme, then the other one, then
    /// assuming plaintext.
    pub fn reveal_any(&self, ciphertext: &str) -> String {
        match self.try_reveal(ciphertext) {
            Ok(plaintext) => return plaintext,
            Err(e) => {
                tracing::debug!(error = %e, scheme = %self.scheme, "Primary scheme failed")
            }
        }

        let fallback = self.scheme.other();
        match self.try_reveal_with(fallback, ciphertext) {
            Ok(plaintext) => {
                tracing::debug!(scheme = %fallback, "Recovered field with legacy scheme");
                plaintext
            }
            Err(_) => ciphertext.to_string(),
        }
    }

    fn derive_key(&self, salt: &[u8]) -> Result<LessSafeKey, CryptoError> {
        let hk = Hkdf::<Sha256>::new(Some(salt), self.key.as_bytes());
        let mut okm = [0u8; KEY_LEN];
        hk.expand(HKDF_INFO, &mut okm)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        let unbound = UnboundKey::new(&AES_256_GCM, &okm)
            .map_err(|_| CryptoError::KeyDerivation("invalid AES-256 key length".to_string()))?;
        Ok(LessSafeKey::new(unbound))
    }

    fn seal(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut salt)
            .and_then(|_| self.rng.fill(&mut nonce_bytes))
            .map_err(|_| CryptoError::Random)?;

        let key = self.derive_key(&salt)?;
        let mut in_out = plaintext.as_bytes().to_vec();
        key.seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| CryptoError::Seal)?;

        let mut envelope = Vec::with_capacity(SALT_LEN + NONCE_LEN + in_out.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&in_out);
        Ok(BASE64.encode(envelope))
    }

    fn open(&self, envelope: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
        if envelope.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(CryptoError::Truncated(envelope.len()));
        }
        let (salt, rest) = envelope.split_at(SALT_LEN);
        let (nonce_bytes, sealed) = rest.split_at(NONCE_LEN);

        let key = self.derive_key(salt)?;
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| CryptoError::Open)?;
        let mut in_out = sealed.to_vec();
        let plaintext_len = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Open)?
            .len();
        in_out.truncate(plaintext_len);
        Ok(in_out)
    }
}

/// XOR `data` with `key` repeated to its length.
fn xor_with_key(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(d, k)| d ^ k)
        .collect()
}

/// Errors from protect/reveal.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Encryption key is empty")]
    EmptyKey,

    #[error("Unknown cipher scheme: {0}")]
    UnknownScheme(String),

    #[error("Invalid base64: {0}")]
    Base64(String),

    #[error("Ciphertext too short ({0} bytes)")]
    Truncated(usize),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Random number generation failed")]
    Random,

    #[error("Encryption failed")]
    Seal,

    #[error("Decryption failed (wrong key or corrupted data)")]
    Open,

    #[error("Decrypted data is not UTF-8: {0}")]
    Utf8(String),
}
