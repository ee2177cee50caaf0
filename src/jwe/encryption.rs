use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::error::InvalidAlgorithmError;

/// JWE content-encryption (`"enc"`) algorithms.
///
/// [RFC 7518 §5.1](https://www.rfc-editor.org/rfc/rfc7518#section-5.1)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display, EnumIter,
)]
#[serde(try_from = "String", into = "&str")]
pub enum Encryption {
    /// AES-128-CBC with HMAC-SHA-256, composed per RFC 7518 §5.2
    #[strum(serialize = "A128CBC-HS256")]
    A128CbcHs256,
    /// AES-192-CBC with HMAC-SHA-384
    #[strum(serialize = "A192CBC-HS384")]
    A192CbcHs384,
    /// AES-256-CBC with HMAC-SHA-512
    #[strum(serialize = "A256CBC-HS512")]
    A256CbcHs512,
    /// AES-128 in Galois/Counter Mode
    #[strum(serialize = "A128GCM")]
    A128Gcm,
    /// AES-192 in Galois/Counter Mode
    #[strum(serialize = "A192GCM")]
    A192Gcm,
    /// AES-256 in Galois/Counter Mode
    #[strum(serialize = "A256GCM")]
    A256Gcm,
}

impl Encryption {
    /// Content-encryption key size in bytes. CBC-HMAC keys are the MAC key
    /// and the encryption key concatenated.
    pub fn key_len(&self) -> usize {
        match self {
            Encryption::A128CbcHs256 => 32,
            Encryption::A192CbcHs384 => 48,
            Encryption::A256CbcHs512 => 64,
            Encryption::A128Gcm => 16,
            Encryption::A192Gcm => 24,
            Encryption::A256Gcm => 32,
        }
    }

    /// Initialization-vector size in bytes.
    pub fn iv_len(&self) -> usize {
        match self {
            Encryption::A128CbcHs256 | Encryption::A192CbcHs384 | Encryption::A256CbcHs512 => 16,
            Encryption::A128Gcm | Encryption::A192Gcm | Encryption::A256Gcm => 12,
        }
    }

    /// Authentication-tag size in bytes. GCM tags are 16 bytes; CBC-HMAC
    /// tags are the left half of the HMAC output.
    pub fn tag_len(&self) -> usize {
        match self {
            Encryption::A128CbcHs256 => 16,
            Encryption::A192CbcHs384 => 24,
            Encryption::A256CbcHs512 => 32,
            Encryption::A128Gcm | Encryption::A192Gcm | Encryption::A256Gcm => 16,
        }
    }

    pub fn is_gcm(&self) -> bool {
        matches!(
            self,
            Encryption::A128Gcm | Encryption::A192Gcm | Encryption::A256Gcm
        )
    }

    pub fn is_cbc_hmac(&self) -> bool {
        !self.is_gcm()
    }
}

impl FromStr for Encryption {
    type Err = InvalidAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A128CBC-HS256" => Ok(Encryption::A128CbcHs256),
            "A192CBC-HS384" => Ok(Encryption::A192CbcHs384),
            "A256CBC-HS512" => Ok(Encryption::A256CbcHs512),
            "A128GCM" => Ok(Encryption::A128Gcm),
            "A192GCM" => Ok(Encryption::A192Gcm),
            "A256GCM" => Ok(Encryption::A256Gcm),
            _ => Err(InvalidAlgorithmError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Encryption {
    type Error = InvalidAlgorithmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Encryption::from_str(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(Encryption::A128CbcHs256.key_len(), 32);
        assert_eq!(Encryption::A192CbcHs384.key_len(), 48);
        assert_eq!(Encryption::A256CbcHs512.key_len(), 64);
        assert_eq!(Encryption::A256Gcm.key_len(), 32);
        assert_eq!(Encryption::A128Gcm.iv_len(), 12);
        assert_eq!(Encryption::A128CbcHs256.iv_len(), 16);
        assert_eq!(Encryption::A128CbcHs256.tag_len(), 16);
        assert_eq!(Encryption::A256CbcHs512.tag_len(), 32);
    }

    #[test]
    fn test_wire_names() {
        let enc: &'static str = Encryption::A128CbcHs256.into();
        assert_eq!(enc, "A128CBC-HS256");
        assert_eq!(
            Encryption::from_str("A256GCM").unwrap(),
            Encryption::A256Gcm
        );
        assert!(Encryption::from_str("A256-GCM").is_err());
    }
}
