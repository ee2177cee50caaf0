use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::{
    error::InvalidAlgorithmError,
    jwk::{Curve, KeyType},
};

/// JWE key-management algorithms.
///
/// [RFC 7518 §4.1](https://www.rfc-editor.org/rfc/rfc7518#section-4.1)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display, EnumIter,
)]
#[serde(try_from = "String", into = "&str")]
pub enum Algorithm {
    /// RSAES-PKCS1-v1_5. Deprecated; kept for interop with legacy peers
    /// and never chosen by default.
    #[strum(serialize = "RSA1_5")]
    Rsa1_5,
    /// RSAES-OAEP with SHA-1 and MGF1-SHA-1
    #[strum(serialize = "RSA-OAEP")]
    RsaOaep,
    /// RSAES-OAEP with SHA-256 and MGF1-SHA-256
    #[strum(serialize = "RSA-OAEP-256")]
    RsaOaep256,
    /// AES-128 Key Wrap (RFC 3394)
    #[strum(serialize = "A128KW")]
    A128Kw,
    /// AES-192 Key Wrap (RFC 3394)
    #[strum(serialize = "A192KW")]
    A192Kw,
    /// AES-256 Key Wrap (RFC 3394)
    #[strum(serialize = "A256KW")]
    A256Kw,
    /// Direct use of a shared symmetric key as the CEK
    #[strum(serialize = "dir")]
    Dir,
    /// ECDH-ES with Concat KDF, CEK derived directly
    #[strum(serialize = "ECDH-ES")]
    EcdhEs,
    /// ECDH-ES, derived key wraps the CEK with A128KW
    #[strum(serialize = "ECDH-ES+A128KW")]
    EcdhEsA128Kw,
    /// ECDH-ES, derived key wraps the CEK with A192KW
    #[strum(serialize = "ECDH-ES+A192KW")]
    EcdhEsA192Kw,
    /// ECDH-ES, derived key wraps the CEK with A256KW
    #[strum(serialize = "ECDH-ES+A256KW")]
    EcdhEsA256Kw,
    /// Key wrapping with AES-128 GCM; `iv` and `tag` travel in the header
    #[strum(serialize = "A128GCMKW")]
    A128GcmKw,
    /// Key wrapping with AES-192 GCM
    #[strum(serialize = "A192GCMKW")]
    A192GcmKw,
    /// Key wrapping with AES-256 GCM
    #[strum(serialize = "A256GCMKW")]
    A256GcmKw,
    /// PBES2 with HMAC-SHA-256 and A128KW
    #[strum(serialize = "PBES2-HS256+A128KW")]
    Pbes2Hs256A128Kw,
    /// PBES2 with HMAC-SHA-384 and A192KW
    #[strum(serialize = "PBES2-HS384+A192KW")]
    Pbes2Hs384A192Kw,
    /// PBES2 with HMAC-SHA-512 and A256KW
    #[strum(serialize = "PBES2-HS512+A256KW")]
    Pbes2Hs512A256Kw,
}

impl Algorithm {
    pub fn is_direct(&self) -> bool {
        matches!(self, Algorithm::Dir)
    }

    pub fn is_rsa(&self) -> bool {
        matches!(
            self,
            Algorithm::Rsa1_5 | Algorithm::RsaOaep | Algorithm::RsaOaep256
        )
    }

    pub fn is_aes_kw(&self) -> bool {
        matches!(self, Algorithm::A128Kw | Algorithm::A192Kw | Algorithm::A256Kw)
    }

    pub fn is_aes_gcm_kw(&self) -> bool {
        matches!(
            self,
            Algorithm::A128GcmKw | Algorithm::A192GcmKw | Algorithm::A256GcmKw
        )
    }

    pub fn is_ecdh(&self) -> bool {
        matches!(
            self,
            Algorithm::EcdhEs
                | Algorithm::EcdhEsA128Kw
                | Algorithm::EcdhEsA192Kw
                | Algorithm::EcdhEsA256Kw
        )
    }

    /// ECDH-ES without a wrapping step: the KDF output *is* the CEK.
    pub fn is_direct_key_agreement(&self) -> bool {
        matches!(self, Algorithm::EcdhEs)
    }

    pub fn is_pbes2(&self) -> bool {
        matches!(
            self,
            Algorithm::Pbes2Hs256A128Kw | Algorithm::Pbes2Hs384A192Kw | Algorithm::Pbes2Hs512A256Kw
        )
    }

    /// The symmetric key size in bytes required by the wrapping step, when
    /// the algorithm has one.
    pub fn wrap_key_len(&self) -> Option<usize> {
        match self {
            Algorithm::A128Kw
            | Algorithm::EcdhEsA128Kw
            | Algorithm::A128GcmKw
            | Algorithm::Pbes2Hs256A128Kw => Some(16),
            Algorithm::A192Kw
            | Algorithm::EcdhEsA192Kw
            | Algorithm::A192GcmKw
            | Algorithm::Pbes2Hs384A192Kw => Some(24),
            Algorithm::A256Kw
            | Algorithm::EcdhEsA256Kw
            | Algorithm::A256GcmKw
            | Algorithm::Pbes2Hs512A256Kw => Some(32),
            _ => None,
        }
    }

    /// The `"kty"` of keys usable with this algorithm. `None` where any
    /// curve-bearing key type applies (ECDH accepts both EC and OKP keys).
    pub fn key_type(&self) -> Option<KeyType> {
        match self {
            Algorithm::Rsa1_5 | Algorithm::RsaOaep | Algorithm::RsaOaep256 => Some(KeyType::Rsa),
            Algorithm::A128Kw
            | Algorithm::A192Kw
            | Algorithm::A256Kw
            | Algorithm::Dir
            | Algorithm::A128GcmKw
            | Algorithm::A192GcmKw
            | Algorithm::A256GcmKw
            | Algorithm::Pbes2Hs256A128Kw
            | Algorithm::Pbes2Hs384A192Kw
            | Algorithm::Pbes2Hs512A256Kw => Some(KeyType::Oct),
            Algorithm::EcdhEs
            | Algorithm::EcdhEsA128Kw
            | Algorithm::EcdhEsA192Kw
            | Algorithm::EcdhEsA256Kw => None,
        }
    }

    /// Whether `key` (by type and curve) can serve this algorithm.
    pub fn accepts(&self, kty: KeyType, crv: Option<Curve>) -> bool {
        if self.is_ecdh() {
            return match crv {
                Some(c) => matches!(
                    c,
                    Curve::P256 | Curve::P384 | Curve::P521 | Curve::Secp256k1 | Curve::X25519 | Curve::X448
                ),
                None => false,
            } && matches!(kty, KeyType::Ec | KeyType::Okp);
        }
        self.key_type() == Some(kty)
    }
}

impl FromStr for Algorithm {
    type Err = InvalidAlgorithmError;

    // key-management names are case-sensitive and carry '-' / '+'
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RSA1_5" => Ok(Algorithm::Rsa1_5),
            "RSA-OAEP" => Ok(Algorithm::RsaOaep),
            "RSA-OAEP-256" => Ok(Algorithm::RsaOaep256),
            "A128KW" => Ok(Algorithm::A128Kw),
            "A192KW" => Ok(Algorithm::A192Kw),
            "A256KW" => Ok(Algorithm::A256Kw),
            "dir" => Ok(Algorithm::Dir),
            "ECDH-ES" => Ok(Algorithm::EcdhEs),
            "ECDH-ES+A128KW" => Ok(Algorithm::EcdhEsA128Kw),
            "ECDH-ES+A192KW" => Ok(Algorithm::EcdhEsA192Kw),
            "ECDH-ES+A256KW" => Ok(Algorithm::EcdhEsA256Kw),
            "A128GCMKW" => Ok(Algorithm::A128GcmKw),
            "A192GCMKW" => Ok(Algorithm::A192GcmKw),
            "A256GCMKW" => Ok(Algorithm::A256GcmKw),
            "PBES2-HS256+A128KW" => Ok(Algorithm::Pbes2Hs256A128Kw),
            "PBES2-HS384+A192KW" => Ok(Algorithm::Pbes2Hs384A192Kw),
            "PBES2-HS512+A256KW" => Ok(Algorithm::Pbes2Hs512A256Kw),
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
        let alg: &'static str = Algorithm::EcdhEsA128Kw.into();
        assert_eq!(alg, "ECDH-ES+A128KW");
        let alg: &'static str = Algorithm::Dir.into();
        assert_eq!(alg, "dir");
        let alg: &'static str = Algorithm::Pbes2Hs512A256Kw.into();
        assert_eq!(alg, "PBES2-HS512+A256KW");
    }

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!(Algorithm::from_str("dir").unwrap(), Algorithm::Dir);
        assert!(Algorithm::from_str("DIR").is_err());
        assert!(Algorithm::from_str("ECDH-ES+A512KW").is_err());
    }

    #[test]
    fn test_wrap_key_len() {
        assert_eq!(Algorithm::A128Kw.wrap_key_len(), Some(16));
        assert_eq!(Algorithm::Pbes2Hs384A192Kw.wrap_key_len(), Some(24));
        assert_eq!(Algorithm::Dir.wrap_key_len(), None);
    }
}
