use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::{
    error::InvalidAlgorithmError,
    jwk::{Curve, KeyType},
    strings::to_upper_remove_seperators,
};

/// JWS signature and MAC algorithms.
///
/// [RFC 7518 §3.1](https://www.rfc-editor.org/rfc/rfc7518#section-3.1),
/// [RFC 8037 §3.1](https://www.rfc-editor.org/rfc/rfc8037#section-3.1),
/// [RFC 8812 §3](https://www.rfc-editor.org/rfc/rfc8812#section-3)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display, EnumIter,
)]
#[serde(try_from = "String", into = "&str")]
pub enum Algorithm {
    /// No digital signature or MAC. Refused unless the caller explicitly
    /// opted into unsecured tokens.
    #[strum(serialize = "none")]
    None,
    /// HMAC + SHA-256
    #[strum(serialize = "HS256")]
    Hs256,
    /// HMAC + SHA-384
    #[strum(serialize = "HS384")]
    Hs384,
    /// HMAC + SHA-512
    #[strum(serialize = "HS512")]
    Hs512,
    /// RSASSA-PKCS#1 v1.5 + SHA-256
    #[strum(serialize = "RS256")]
    Rs256,
    /// RSASSA-PKCS#1 v1.5 + SHA-384
    #[strum(serialize = "RS384")]
    Rs384,
    /// RSASSA-PKCS#1 v1.5 + SHA-512
    #[strum(serialize = "RS512")]
    Rs512,
    /// ECDSA using P-256 and SHA-256
    #[strum(serialize = "ES256")]
    Es256,
    /// ECDSA using P-384 and SHA-384
    #[strum(serialize = "ES384")]
    Es384,
    /// ECDSA using P-521 and SHA-512
    #[strum(serialize = "ES512")]
    Es512,
    /// ECDSA using secp256k1 and SHA-256
    #[strum(serialize = "ES256K")]
    Es256k,
    /// RSASSA-PSS + SHA-256, MGF1 with SHA-256
    #[strum(serialize = "PS256")]
    Ps256,
    /// RSASSA-PSS + SHA-384, MGF1 with SHA-384
    #[strum(serialize = "PS384")]
    Ps384,
    /// RSASSA-PSS + SHA-512, MGF1 with SHA-512
    #[strum(serialize = "PS512")]
    Ps512,
    /// Edwards-curve Digital Signature Algorithm (EdDSA)
    #[strum(serialize = "EdDSA")]
    EdDsa,
}

impl Algorithm {
    pub fn is_none(&self) -> bool {
        matches!(self, Algorithm::None)
    }

    pub fn is_hmac(&self) -> bool {
        matches!(self, Algorithm::Hs256 | Algorithm::Hs384 | Algorithm::Hs512)
    }

    pub fn is_rsa(&self) -> bool {
        matches!(
            self,
            Algorithm::Rs256
                | Algorithm::Rs384
                | Algorithm::Rs512
                | Algorithm::Ps256
                | Algorithm::Ps384
                | Algorithm::Ps512
        )
    }

    pub fn is_ecdsa(&self) -> bool {
        matches!(
            self,
            Algorithm::Es256 | Algorithm::Es384 | Algorithm::Es512 | Algorithm::Es256k
        )
    }

    pub fn is_eddsa(&self) -> bool {
        matches!(self, Algorithm::EdDsa)
    }

    /// The `"kty"` this algorithm operates on. `None` for `alg: none`.
    pub fn key_type(&self) -> Option<KeyType> {
        match self {
            Algorithm::None => None,
            Algorithm::Hs256 | Algorithm::Hs384 | Algorithm::Hs512 => Some(KeyType::Oct),
            Algorithm::Rs256
            | Algorithm::Rs384
            | Algorithm::Rs512
            | Algorithm::Ps256
            | Algorithm::Ps384
            | Algorithm::Ps512 => Some(KeyType::Rsa),
            Algorithm::Es256 | Algorithm::Es384 | Algorithm::Es512 | Algorithm::Es256k => {
                Some(KeyType::Ec)
            }
            Algorithm::EdDsa => Some(KeyType::Okp),
        }
    }

    /// The curve an ECDSA algorithm is bound to.
    pub fn curve(&self) -> Option<Curve> {
        match self {
            Algorithm::Es256 => Some(Curve::P256),
            Algorithm::Es384 => Some(Curve::P384),
            Algorithm::Es512 => Some(Curve::P521),
            Algorithm::Es256k => Some(Curve::Secp256k1),
            _ => None,
        }
    }

    /// The exact signature length in bytes, where the algorithm fixes one.
    /// RSA signatures span the key's modulus size and return `None`.
    pub fn signature_len(&self) -> Option<usize> {
        match self {
            Algorithm::None => Some(0),
            Algorithm::Hs256 => Some(32),
            Algorithm::Hs384 => Some(48),
            Algorithm::Hs512 => Some(64),
            // fixed-size R || S, big-endian, never DER
            Algorithm::Es256 | Algorithm::Es256k => Some(64),
            Algorithm::Es384 => Some(96),
            Algorithm::Es512 => Some(132),
            Algorithm::EdDsa => Some(64),
            _ => None,
        }
    }
}

impl FromStr for Algorithm {
    type Err = InvalidAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match to_upper_remove_seperators(s).as_str() {
            "NONE" => Ok(Algorithm::None),
            "HS256" => Ok(Algorithm::Hs256),
            "HS384" => Ok(Algorithm::Hs384),
            "HS512" => Ok(Algorithm::Hs512),
            "RS256" => Ok(Algorithm::Rs256),
            "RS384" => Ok(Algorithm::Rs384),
            "RS512" => Ok(Algorithm::Rs512),
            "ES256" => Ok(Algorithm::Es256),
            "ES384" => Ok(Algorithm::Es384),
            "ES512" => Ok(Algorithm::Es512),
            "ES256K" => Ok(Algorithm::Es256k),
            "PS256" => Ok(Algorithm::Ps256),
            "PS384" => Ok(Algorithm::Ps384),
            "PS512" => Ok(Algorithm::Ps512),
            "EDDSA" => Ok(Algorithm::EdDsa),
            _ => Err(InvalidAlgorithmError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = InvalidAlgorithmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Algorithm::from_str(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let alg: &'static str = Algorithm::EdDsa.into();
        assert_eq!(alg, "EdDSA");
        let alg: &'static str = Algorithm::None.into();
        assert_eq!(alg, "none");
        let alg: &'static str = Algorithm::Es256k.into();
        assert_eq!(alg, "ES256K");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Algorithm::from_str("ES256").unwrap(), Algorithm::Es256);
        assert_eq!(Algorithm::from_str("EdDSA").unwrap(), Algorithm::EdDsa);
        assert!(Algorithm::from_str("XX666").is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let alg: Algorithm = serde_json::from_str("\"PS384\"").unwrap();
        assert_eq!(alg, Algorithm::Ps384);
        assert_eq!(serde_json::to_string(&alg).unwrap(), "\"PS384\"");
    }
}
