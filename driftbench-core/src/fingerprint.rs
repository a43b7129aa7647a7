//! Benchmark Identity
//!
//! A benchmark is identified by a SHA-256 digest of its setup, code, and
//! cleanup source text, in that order. Metadata (name, description, loop
//! counts) never participates, so renaming a benchmark keeps its history.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable content hash identifying a benchmark across runs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Digest the identity inputs in their canonical order.
    pub fn compute(setup: &str, code: &str, cleanup: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(setup.as_bytes());
        hasher.update(code.as_bytes());
        hasher.update(cleanup.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering of the digest.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }

    /// First eight hex digits, for labels and log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

/// Error parsing a fingerprint from hex text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFingerprintError {
    /// Input was not exactly 64 characters.
    #[error("expected 64 hex digits, got {0} characters")]
    Length(usize),
    /// Input contained a non-hex character.
    #[error("invalid hex digit in fingerprint")]
    Digit,
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || s.len() != 64 {
            return Err(ParseFingerprintError::Length(s.chars().count()));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16)
                .map_err(|_| ParseFingerprintError::Digit)?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}
