use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvalidKeyTypeError;

/// The `"kty"` (key type) parameter. Identifies the cryptographic algorithm
/// family used with the key. This member MUST be present in a JWK.
///
/// <https://www.rfc-editor.org/rfc/rfc7517#section-4.1>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyType {
    /// RSA
    Rsa,
    /// Elliptic Curve
    Ec,
    /// Octet Sequence (used to represent symmetric keys)
    Oct,
    /// Octet Key Pair
    Okp,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "RSA",
            KeyType::Ec => "EC",
            KeyType::Oct => "oct",
            KeyType::Okp => "OKP",
        }
    }
    pub fn into_json_value(self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

impl core::fmt::Display for KeyType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::str::FromStr for KeyType {
    type Err = InvalidKeyTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // kty values are case-sensitive per RFC 7517 §4.1
        match s {
            "RSA" => Ok(KeyType::Rsa),
            "EC" => Ok(KeyType::Ec),
            "oct" => Ok(KeyType::Oct),
            "OKP" => Ok(KeyType::Okp),
            _ => Err(InvalidKeyTypeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for KeyType {
    type Error = InvalidKeyTypeError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyType> for String {
    fn from(kty: KeyType) -> Self {
        kty.as_str().to_string()
    }
}

impl From<KeyType> for Value {
    fn from(key_type: KeyType) -> Self {
        key_type.into_json_value()
    }
}
