use core::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{jwe, jws};

use super::{Curve, KeyType};

/// The `"alg"` (algorithm) parameter of a JWK. A key may be bound to a
/// signature algorithm or to a key-management algorithm; unregistered
/// values are carried verbatim.
///
/// <https://www.rfc-editor.org/rfc/rfc7517#section-4.4>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    Signature(jws::Algorithm),
    KeyManagement(jwe::Algorithm),
    Other(String),
}

impl Algorithm {
    pub fn as_str(&self) -> &str {
        match self {
            Algorithm::Signature(alg) => alg.into(),
            Algorithm::KeyManagement(alg) => alg.into(),
            Algorithm::Other(s) => s,
        }
    }

    pub fn signature(&self) -> Option<jws::Algorithm> {
        match self {
            Algorithm::Signature(alg) => Some(*alg),
            _ => None,
        }
    }

    pub fn key_management(&self) -> Option<jwe::Algorithm> {
        match self {
            Algorithm::KeyManagement(alg) => Some(*alg),
            _ => None,
        }
    }

    /// Whether the algorithm is usable with a key of the given type and
    /// curve. Unregistered algorithms are not second-guessed.
    pub fn is_compatible(&self, kty: KeyType, crv: Option<Curve>) -> bool {
        match self {
            Algorithm::Signature(alg) => match alg.key_type() {
                None => true,
                Some(expected) => {
                    expected == kty
                        && match alg.curve() {
                            Some(expected_crv) => crv == Some(expected_crv),
                            None => {
                                // EdDSA runs on the Edwards curves only
                                !alg.is_eddsa()
                                    || matches!(crv, Some(Curve::Ed25519) | Some(Curve::Ed448))
                            }
                        }
                }
            },
            Algorithm::KeyManagement(alg) => alg.accepts(kty, crv),
            Algorithm::Other(_) => true,
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<jws::Algorithm> for Algorithm {
    fn from(alg: jws::Algorithm) -> Self {
        Algorithm::Signature(alg)
    }
}

impl From<jwe::Algorithm> for Algorithm {
    fn from(alg: jwe::Algorithm) -> Self {
        Algorithm::KeyManagement(alg)
    }
}

impl From<&str> for Algorithm {
    fn from(s: &str) -> Self {
        if let Ok(alg) = jws::Algorithm::from_str(s) {
            return Algorithm::Signature(alg);
        }
        if let Ok(alg) = jwe::Algorithm::from_str(s) {
            return Algorithm::KeyManagement(alg);
        }
        Algorithm::Other(s.to_string())
    }
}

impl From<String> for Algorithm {
    fn from(s: String) -> Self {
        Algorithm::from(s.as_str())
    }
}

impl From<Algorithm> for String {
    fn from(alg: Algorithm) -> Self {
        alg.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_registered_names() {
        assert_eq!(
            Algorithm::from("RS256"),
            Algorithm::Signature(jws::Algorithm::Rs256)
        );
        assert_eq!(
            Algorithm::from("ECDH-ES+A128KW"),
            Algorithm::KeyManagement(jwe::Algorithm::EcdhEsA128Kw)
        );
        assert_eq!(
            Algorithm::from("X-CUSTOM"),
            Algorithm::Other("X-CUSTOM".to_string())
        );
    }

    #[test]
    fn test_compatibility() {
        let alg = Algorithm::from("ES256");
        assert!(alg.is_compatible(KeyType::Ec, Some(Curve::P256)));
        assert!(!alg.is_compatible(KeyType::Ec, Some(Curve::P384)));
        assert!(!alg.is_compatible(KeyType::Rsa, None));

        let alg = Algorithm::from("RSA-OAEP");
        assert!(alg.is_compatible(KeyType::Rsa, None));
        assert!(!alg.is_compatible(KeyType::Oct, None));
    }
}
