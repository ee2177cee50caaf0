use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{error::InvalidCurveError, strings::to_upper_remove_seperators};

use super::KeyType;

/// The `"crv"` (curve) parameter.
///
/// [RFC 7518 §6.2.1.1](https://tools.ietf.org/html/rfc7518#section-6.2.1.1),
/// [RFC 8037 §2](https://www.rfc-editor.org/rfc/rfc8037#section-2),
/// [RFC 8812 §3.1](https://www.rfc-editor.org/rfc/rfc8812#section-3.1)
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Curve {
    /// P-256 Elliptic Curve Digital Signature Algorithm (ECDSA)
    P256,

    /// P-384 Elliptic Curve Digital Signature Algorithm (ECDSA)
    P384,

    /// P-521 Elliptic Curve Digital Signature Algorithm (ECDSA)
    P521,

    /// secp256k1, the Koblitz curve used by ES256K
    Secp256k1,

    /// Ed25519 Edwards-curve Digital Signature Algorithm (EdDSA)
    Ed25519,

    /// Ed448 Edwards-curve Digital Signature Algorithm (EdDSA)
    ///
    /// **Not supported**: parsed, but every operation fails.
    Ed448,

    /// X-25519 Elliptic Curve Diffie-Hellman (ECDH)
    X25519,

    /// X-448 Elliptic Curve Diffie-Hellman (ECDH)
    ///
    /// **Not supported**: parsed, but every operation fails.
    X448,
}

impl Curve {
    pub fn as_str(&self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
            Curve::Secp256k1 => "secp256k1",
            Curve::Ed25519 => "Ed25519",
            Curve::Ed448 => "Ed448",
            Curve::X25519 => "X25519",
            Curve::X448 => "X448",
        }
    }

    /// Bit size reported for keys on this curve.
    pub fn bits(&self) -> usize {
        match self {
            Curve::P256 | Curve::Secp256k1 => 256,
            Curve::P384 => 384,
            Curve::P521 => 521,
            Curve::Ed25519 | Curve::X25519 => 256,
            Curve::Ed448 => 456,
            Curve::X448 => 448,
        }
    }

    /// Byte length of one coordinate (or of the raw OKP key).
    pub fn coordinate_len(&self) -> usize {
        match self {
            Curve::P256 | Curve::Secp256k1 => 32,
            Curve::P384 => 48,
            Curve::P521 => 66,
            Curve::Ed25519 | Curve::X25519 => 32,
            Curve::Ed448 => 57,
            Curve::X448 => 56,
        }
    }

    /// The `"kty"` that carries this curve.
    pub fn key_type(&self) -> KeyType {
        match self {
            Curve::P256 | Curve::P384 | Curve::P521 | Curve::Secp256k1 => KeyType::Ec,
            Curve::Ed25519 | Curve::Ed448 | Curve::X25519 | Curve::X448 => KeyType::Okp,
        }
    }

    /// Whether this build carries primitives for the curve.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Curve::Ed448 | Curve::X448)
    }

    /// Whether the curve is a signing curve (as opposed to key agreement).
    pub fn is_signing(&self) -> bool {
        !matches!(self, Curve::X25519 | Curve::X448)
    }
}

impl TryFrom<String> for Curve {
    type Error = InvalidCurveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Curve::from_str(value.as_str())
    }
}
impl TryFrom<&String> for Curve {
    type Error = InvalidCurveError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Curve::from_str(value)
    }
}
impl TryFrom<&str> for Curve {
    type Error = InvalidCurveError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Curve::from_str(value)
    }
}
impl From<Curve> for String {
    fn from(value: Curve) -> Self {
        value.as_str().to_string()
    }
}
impl From<Curve> for &str {
    fn from(value: Curve) -> Self {
        value.as_str()
    }
}

impl FromStr for Curve {
    type Err = InvalidCurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match to_upper_remove_seperators(s).as_str() {
            "P256" => Ok(Curve::P256),
            "P384" => Ok(Curve::P384),
            "P521" => Ok(Curve::P521),
            "SECP256K1" => Ok(Curve::Secp256k1),
            "ED25519" => Ok(Curve::Ed25519),
            "ED448" => Ok(Curve::Ed448),
            "X25519" => Ok(Curve::X25519),
            "X448" => Ok(Curve::X448),
            _ => Err(InvalidCurveError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for crv in [
            Curve::P256,
            Curve::P384,
            Curve::P521,
            Curve::Secp256k1,
            Curve::Ed25519,
            Curve::X25519,
        ] {
            assert_eq!(Curve::from_str(crv.as_str()).unwrap(), crv);
        }
    }

    #[test]
    fn test_unsupported_curves_still_parse() {
        assert_eq!(Curve::from_str("Ed448").unwrap(), Curve::Ed448);
        assert!(!Curve::Ed448.is_supported());
        assert!(!Curve::X448.is_supported());
        assert!(Curve::P521.is_supported());
    }
}
