use digest::Digest;
use sha2::{Sha256, Sha384, Sha512};

use crate::{b64, error::KeyError};

use super::{Jwk, KeyType};

/// Hash functions usable for RFC 7638 thumbprints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbprintHash {
    Sha256,
    Sha384,
    Sha512,
}

/// RFC 7638 thumbprint: the canonical JSON over exactly the required
/// members for the key type — lexicographic member order, no whitespace —
/// hashed and base64url-encoded.
///
/// <https://www.rfc-editor.org/rfc/rfc7638#section-3>
pub(super) fn thumbprint(jwk: &Jwk, hash: ThumbprintHash) -> Result<String, KeyError> {
    let canonical = canonical_members(jwk)?;
    let digest = match hash {
        ThumbprintHash::Sha256 => Sha256::digest(canonical.as_bytes()).to_vec(),
        ThumbprintHash::Sha384 => Sha384::digest(canonical.as_bytes()).to_vec(),
        ThumbprintHash::Sha512 => Sha512::digest(canonical.as_bytes()).to_vec(),
    };
    Ok(b64::encode(digest))
}

fn canonical_members(jwk: &Jwk) -> Result<String, KeyError> {
    let kty = jwk.require_key_type()?;
    match kty {
        KeyType::Ec => {
            let crv = jwk.require_curve()?;
            let x = jwk
                .x
                .as_ref()
                .ok_or_else(|| KeyError::from("EC key is missing \"x\""))?;
            let y = jwk
                .y
                .as_ref()
                .ok_or_else(|| KeyError::from("EC key is missing \"y\""))?;
            Ok(format!(
                "{{\"crv\":\"{}\",\"kty\":\"EC\",\"x\":\"{}\",\"y\":\"{}\"}}",
                crv.as_str(),
                b64::encode(x),
                b64::encode(y),
            ))
        }
        KeyType::Okp => {
            let crv = jwk.require_curve()?;
            let x = jwk
                .x
                .as_ref()
                .ok_or_else(|| KeyError::from("OKP key is missing \"x\""))?;
            Ok(format!(
                "{{\"crv\":\"{}\",\"kty\":\"OKP\",\"x\":\"{}\"}}",
                crv.as_str(),
                b64::encode(x),
            ))
        }
        KeyType::Rsa => {
            let n = jwk
                .n
                .as_ref()
                .ok_or_else(|| KeyError::from("RSA key is missing \"n\""))?;
            let e = jwk
                .e
                .as_ref()
                .ok_or_else(|| KeyError::from("RSA key is missing \"e\""))?;
            Ok(format!(
                "{{\"e\":\"{}\",\"kty\":\"RSA\",\"n\":\"{}\"}}",
                b64::encode(e),
                b64::encode(n),
            ))
        }
        KeyType::Oct => {
            let k = jwk
                .k
                .as_ref()
                .ok_or_else(|| KeyError::from("oct key is missing \"k\""))?;
            Ok(format!("{{\"k\":\"{}\",\"kty\":\"oct\"}}", b64::encode(k)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // RFC 7638 §3.1
    #[test]
    fn test_rfc7638_rsa_vector() {
        let jwk = Jwk::from_value(&json!({
            "kty": "RSA",
            "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
            "e": "AQAB",
            "alg": "RS256",
            "kid": "2011-04-29"
        }))
        .unwrap();
        assert_eq!(
            jwk.thumbprint(ThumbprintHash::Sha256).unwrap(),
            "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs"
        );
    }

    #[test]
    fn test_member_order_is_irrelevant() {
        // the "kid", "use", and insertion order of members play no part
        let a = Jwk::from_value(&json!({
            "crv": "P-256",
            "kty": "EC",
            "x": "MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
            "y": "4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM"
        }))
        .unwrap();
        let b = Jwk::from_value(&json!({
            "y": "4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
            "x": "MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
            "kty": "EC",
            "kid": "something else",
            "crv": "P-256"
        }))
        .unwrap();
        assert_eq!(
            a.thumbprint(ThumbprintHash::Sha256).unwrap(),
            b.thumbprint(ThumbprintHash::Sha256).unwrap()
        );
    }

    #[test]
    fn test_canonical_form_has_no_whitespace() {
        let jwk = Jwk::from_symmetric(b"secret");
        let canonical = canonical_members(&jwk).unwrap();
        assert!(!canonical.contains(' '));
        assert!(canonical.starts_with("{\"k\":\""));
        assert!(canonical.ends_with("\",\"kty\":\"oct\"}"));
    }
}
