mod algorithm;
mod class;
mod curve;
mod generate;
mod jwks;
mod key_operation;
mod key_type;
mod key_use;
pub(crate) mod native;
mod pem;
mod thumbprint;
mod x5c;

pub use algorithm::Algorithm;
pub use class::KeyClass;
pub use curve::Curve;
pub use jwks::Jwks;
pub use key_operation::KeyOperation;
pub use key_type::KeyType;
pub use key_use::KeyUse;
pub use pem::DerKind;
pub use thumbprint::ThumbprintHash;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    b64,
    error::{KeyError, UnsupportedError},
    fetch::{fetch_remote, FetchFlags, NoFetch, RemoteFetch},
    jws,
    sensitive::Bytes,
};

/// A JSON Web Key.
///
/// Every registered member of RFC 7517, RFC 7518 §6, RFC 8037 and the
/// `x5*` family is a typed field; unrecognized members are preserved in
/// [`additional_fields`](Jwk::additional_fields) so a parsed key
/// re-serializes to the same JSON value.
///
/// Secret members (`d`, `p`, `q`, `dp`, `dq`, `qi`, `k`) are held in
/// zeroizing buffers and redacted from `Debug` output.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jwk {
    /// The `"kty"` (key type) parameter identifies the cryptographic
    /// algorithm family used with the key, such as "RSA" or "EC". This
    /// member MUST be present in a JWK.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7517#section-4.1>
    #[serde(rename = "kty", skip_serializing_if = "Option::is_none", default)]
    pub key_type: Option<KeyType>,

    #[serde(rename = "kid", skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    #[serde(rename = "alg", skip_serializing_if = "Option::is_none", default)]
    pub algorithm: Option<Algorithm>,

    /// The `"use"` (public key use) parameter identifies the intended use
    /// of the public key: `"sig"` for signature verification, `"enc"` for
    /// encryption or key agreement (key wrapping is a kind of encryption).
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7517#section-4.2>
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<KeyUse>,

    /// The `"key_ops"` (key operations) parameter identifies the
    /// operation(s) for which the key is intended to be used. The `"use"`
    /// and `"key_ops"` members SHOULD NOT be used together.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7517#section-4.3>
    #[serde(rename = "key_ops", skip_serializing_if = "Vec::is_empty", default)]
    pub key_operations: Vec<KeyOperation>,

    #[serde(rename = "crv", skip_serializing_if = "Option::is_none", default)]
    pub curve: Option<Curve>,

    /// X coordinate for an EC key, or the public key of an OKP key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub x: Option<Vec<u8>>,

    /// Y coordinate for an EC key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub y: Option<Vec<u8>>,

    /// Private exponent of an RSA key, private scalar of an EC key, or
    /// private key of an OKP key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub d: Option<Bytes>,

    /// Modulus of an RSA key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub n: Option<Vec<u8>>,

    /// Public exponent of an RSA key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub e: Option<Vec<u8>>,

    /// First prime factor of an RSA key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub p: Option<Bytes>,

    /// Second prime factor of an RSA key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub q: Option<Bytes>,

    /// First CRT exponent of an RSA key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub dp: Option<Bytes>,

    /// Second CRT exponent of an RSA key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub dq: Option<Bytes>,

    /// First CRT coefficient of an RSA key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub qi: Option<Bytes>,

    /// Key value of a symmetric (`"oct"`) key.
    #[serde(
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub k: Option<Bytes>,

    /// The `"x5u"` (X.509 URL) parameter is a URI that refers to a
    /// resource for an X.509 public key certificate or certificate chain.
    /// The key in the first certificate MUST match the public key
    /// represented by other members of the JWK.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7517#section-4.6>
    #[serde(rename = "x5u", skip_serializing_if = "Option::is_none")]
    pub x509_url: Option<url::Url>,

    /// The `"x5c"` (X.509 certificate chain) parameter contains a chain of
    /// one or more PKIX certificates. Each string in the array is a
    /// base64-encoded (not base64url-encoded) DER certificate value. The
    /// certificate containing the key value MUST be the first certificate,
    /// each subsequent certificate being the one used to certify the
    /// previous one.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7517#section-4.7>
    #[serde(
        rename = "x5c",
        with = "b64::optional_seq_standard",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub x509_cert_chain: Option<Vec<Vec<u8>>>,

    /// The `"x5t"` (X.509 certificate SHA-1 thumbprint) parameter is a
    /// base64url-encoded SHA-1 digest of the DER encoding of an X.509
    /// certificate.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7517#section-4.8>
    #[serde(
        rename = "x5t",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub x509_cert_sha1_thumbprint: Option<Vec<u8>>,

    /// The `"x5t#S256"` (X.509 certificate SHA-256 thumbprint) parameter
    /// is a base64url-encoded SHA-256 digest of the DER encoding of an
    /// X.509 certificate.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7517#section-4.9>
    #[serde(
        rename = "x5t#S256",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub x509_cert_sha256_thumbprint: Option<Vec<u8>>,

    /// Unknown, additional fields found in the JWK.
    #[serde(flatten, default)]
    pub additional_fields: serde_json::Map<String, Value>,
}

/// The source of a key import, matched on by [`Jwk::import`].
pub enum Source<'a> {
    /// Stringified JSON.
    Json(&'a str),
    /// A parsed JSON value.
    Value(&'a Value),
    /// PEM, any of: SPKI public key, PKCS#8 / PKCS#1 / SEC1 private key,
    /// X.509 certificate.
    Pem(&'a str),
    /// DER of the given kind.
    Der(DerKind, &'a [u8]),
    /// A URL pointing to an X.509 certificate or chain.
    X5u(&'a url::Url, FetchFlags),
    /// One `"x5c"` entry: a standard-base64 DER certificate.
    X5c(&'a str),
    /// A raw symmetric key.
    Symmetric(&'a [u8]),
    /// A password, stored as an `"oct"` key.
    Password(&'a str),
}

impl Jwk {
    pub fn from_json(json: &str) -> Result<Self, KeyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: &Value) -> Result<Self, KeyError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn from_symmetric(key: &[u8]) -> Self {
        Self {
            key_type: Some(KeyType::Oct),
            k: Some(Bytes::new(key)),
            ..Default::default()
        }
    }

    /// Stores a password as an `"oct"` key with `k = base64url(password)`.
    pub fn from_password(password: &str) -> Self {
        Self::from_symmetric(password.as_bytes())
    }

    /// One entry for every import source; dispatches on [`Source`].
    /// `fetcher` is consulted only for [`Source::X5u`].
    pub fn import(source: Source<'_>, fetcher: &dyn RemoteFetch) -> Result<Self, KeyError> {
        match source {
            Source::Json(json) => Self::from_json(json),
            Source::Value(value) => Self::from_value(value),
            Source::Pem(pem) => Self::from_pem(pem),
            Source::Der(kind, der) => Self::from_der(kind, der),
            Source::X5u(url, flags) => Self::from_x5u(fetcher, flags, url),
            Source::X5c(b64der) => Self::from_x5c(b64der),
            Source::Symmetric(key) => Ok(Self::from_symmetric(key)),
            Source::Password(password) => Ok(Self::from_password(password)),
        }
    }

    /// Imports the key of the certificate (or chain head) behind `url`.
    pub fn from_x5u(
        fetcher: &dyn RemoteFetch,
        flags: FetchFlags,
        url: &url::Url,
    ) -> Result<Self, KeyError> {
        let doc = fetch_remote(fetcher, url, flags).map_err(|e| KeyError(e.to_string()))?;
        let mut jwk = x5c::jwk_from_certificate_pem_or_der(&doc.bytes)?;
        jwk.x509_url = Some(url.clone());
        Ok(jwk)
    }

    /// Imports a single `"x5c"` entry: standard base64 over a DER
    /// certificate.
    pub fn from_x5c(b64der: &str) -> Result<Self, KeyError> {
        let der = b64::decode_standard(b64der.trim())
            .map_err(|e| KeyError(format!("malformed x5c entry: {e}")))?;
        x5c::jwk_from_certificate_der(&der)
    }

    /// Imports the subject public key of a DER certificate, recording the
    /// certificate itself as `x5c[0]`.
    pub fn from_certificate_der(der: &[u8]) -> Result<Self, KeyError> {
        x5c::jwk_from_certificate_der(der)
    }

    pub fn to_value(&self) -> Result<Value, KeyError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The effective algorithm of the key: the `"alg"` member when
    /// present, otherwise inferred from `"kty"` and `"crv"`.
    pub fn algorithm(&self) -> Option<Algorithm> {
        if let Some(alg) = &self.algorithm {
            return Some(alg.clone());
        }
        let curve = self.curve?;
        match self.key_type? {
            KeyType::Ec => match curve {
                Curve::P256 => Some(jws::Algorithm::Es256.into()),
                Curve::P384 => Some(jws::Algorithm::Es384.into()),
                Curve::P521 => Some(jws::Algorithm::Es512.into()),
                Curve::Secp256k1 => Some(jws::Algorithm::Es256k.into()),
                _ => None,
            },
            KeyType::Okp => match curve {
                Curve::Ed25519 | Curve::Ed448 => Some(jws::Algorithm::EdDsa.into()),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn signature_algorithm(&self) -> Option<jws::Algorithm> {
        self.algorithm()?.signature()
    }

    /// The raw bytes of a symmetric key.
    pub fn symmetric_key(&self) -> Option<&[u8]> {
        self.k.as_ref().map(|k| k.as_slice())
    }

    /// Derives the key's classification word and bit size from its local
    /// members, as if `IGNORE_REMOTE` were set.
    pub fn classify(&self) -> (KeyClass, usize) {
        self.classify_with(&NoFetch, FetchFlags::IGNORE_REMOTE)
    }

    /// Derives the key's classification word and bit size. When the JWK
    /// carries only an `"x5u"` reference and `flags` permits fetching, the
    /// remote certificate's key is classified instead.
    pub fn classify_with(&self, fetcher: &dyn RemoteFetch, flags: FetchFlags) -> (KeyClass, usize) {
        if self.key_type.is_none() && self.x509_url.is_some() && !flags.ignore_remote() {
            if let Some(url) = &self.x509_url {
                if let Ok(jwk) = Self::from_x5u(fetcher, flags, url) {
                    return jwk.classify();
                }
            }
            return (KeyClass::NONE, 0);
        }
        self.classify_local()
    }

    fn classify_local(&self) -> (KeyClass, usize) {
        let Some(kty) = self.key_type else {
            return (KeyClass::NONE, 0);
        };
        match kty {
            KeyType::Rsa => {
                let (Some(n), Some(_)) = (&self.n, &self.e) else {
                    return (KeyClass::NONE, 0);
                };
                let bits = rsa_modulus_bits(n);
                let mut class = KeyClass::PUBLIC | KeyClass::RSA;
                if self.d.is_some() {
                    class |= KeyClass::PRIVATE;
                }
                (class, bits)
            }
            KeyType::Ec => {
                let Some(crv) = self.curve else {
                    return (KeyClass::NONE, 0);
                };
                if crv.key_type() != KeyType::Ec || self.x.is_none() || self.y.is_none() {
                    return (KeyClass::NONE, 0);
                }
                let mut class = KeyClass::PUBLIC | KeyClass::EC;
                if self.d.is_some() {
                    class |= KeyClass::PRIVATE;
                }
                (class, crv.bits())
            }
            KeyType::Okp => {
                let Some(crv) = self.curve else {
                    return (KeyClass::NONE, 0);
                };
                if crv.key_type() != KeyType::Okp || self.x.is_none() {
                    return (KeyClass::NONE, 0);
                }
                let family = if crv.is_signing() {
                    KeyClass::EDDSA
                } else {
                    KeyClass::ECDH
                };
                let mut class = KeyClass::PUBLIC | family;
                if self.d.is_some() {
                    class |= KeyClass::PRIVATE;
                }
                (class, crv.bits())
            }
            KeyType::Oct => match &self.k {
                Some(k) => (KeyClass::SYMMETRIC | KeyClass::HMAC, k.len() * 8),
                None => (KeyClass::NONE, 0),
            },
        }
    }

    /// Full validation: member completeness per `"kty"`, mathematical
    /// consistency of public and private halves, EC point on the declared
    /// curve, `"x5c"` agreement with the key material, and `"alg"` /
    /// `"kty"` compatibility.
    pub fn validate(&self) -> Result<(), KeyError> {
        let kty = self
            .key_type
            .ok_or_else(|| KeyError::from("missing required member \"kty\""))?;
        match kty {
            KeyType::Rsa => self.validate_rsa()?,
            KeyType::Ec | KeyType::Okp => self.validate_curve_key(kty)?,
            KeyType::Oct => {
                if self.k.is_none() {
                    return Err(KeyError::from("oct key is missing \"k\""));
                }
            }
        }
        if let Some(alg) = &self.algorithm {
            if !alg.is_compatible(kty, self.curve) {
                return Err(KeyError(format!(
                    "algorithm {alg} is not usable with a {kty} key"
                )));
            }
        }
        if let Some(chain) = &self.x509_cert_chain {
            let head = chain
                .first()
                .ok_or_else(|| KeyError::from("\"x5c\" must not be empty"))?;
            if kty != KeyType::Oct && !x5c::certificate_matches_key(self, head)? {
                return Err(KeyError::from(
                    "x5c[0] does not carry the key described by the JWK",
                ));
            }
        }
        Ok(())
    }

    fn validate_rsa(&self) -> Result<(), KeyError> {
        let (Some(_), Some(_)) = (&self.n, &self.e) else {
            return Err(KeyError::from("RSA key is missing \"n\" or \"e\""));
        };
        // from_components re-derives and cross-checks the CRT parameters
        if self.d.is_some() {
            let key = native::rsa_private_key(self)?;
            key.validate().map_err(|e| KeyError(e.to_string()))?;
            if let (Some(p), Some(q)) = (&self.p, &self.q) {
                let n = rsa::BigUint::from_bytes_be(self.n.as_deref().unwrap_or_default());
                let p = rsa::BigUint::from_bytes_be(p.as_slice());
                let q = rsa::BigUint::from_bytes_be(q.as_slice());
                if p.clone() * q != n {
                    return Err(KeyError::from("RSA primes do not multiply to the modulus"));
                }
            }
        } else {
            native::rsa_public_key(self)?;
        }
        Ok(())
    }

    fn validate_curve_key(&self, kty: KeyType) -> Result<(), KeyError> {
        let crv = self
            .curve
            .ok_or_else(|| KeyError::from("missing required member \"crv\""))?;
        if crv.key_type() != kty {
            return Err(KeyError(format!(
                "curve {} does not belong to kty {kty}",
                crv.as_str()
            )));
        }
        if !crv.is_supported() {
            // members are still checked for presence
            if self.x.is_none() {
                return Err(KeyError::from("missing required member \"x\""));
            }
            return Ok(());
        }
        // constructing the native keys proves the point is on the curve and
        // that the private scalar corresponds to the public coordinates
        native::validate_curve_material(self, crv)
    }

    /// Strips the private members, preserving `kid`, `alg`, `use`,
    /// `key_ops`, and the `x5*` family.
    ///
    /// Symmetric keys have no public half and are refused.
    pub fn public_key(&self) -> Result<Jwk, KeyError> {
        match self.key_type {
            Some(KeyType::Oct) => Err(KeyError::from("symmetric keys have no public half")),
            None => Err(KeyError::from("missing required member \"kty\"")),
            Some(_) => {
                let mut public = self.clone();
                public.d = None;
                public.p = None;
                public.q = None;
                public.dp = None;
                public.dq = None;
                public.qi = None;
                public.k = None;
                Ok(public)
            }
        }
    }

    /// RFC 7638 thumbprint over the canonical members for the key type.
    pub fn thumbprint(&self, hash: ThumbprintHash) -> Result<String, KeyError> {
        thumbprint::thumbprint(self, hash)
    }

    /// Returns `true` iff every member of `template` equals the
    /// corresponding member of the key: strings byte-wise, numbers as
    /// numbers, objects and arrays structurally.
    pub fn matches(&self, template: &Value) -> bool {
        let Ok(own) = self.to_value() else {
            return false;
        };
        let (Some(own), Some(template)) = (own.as_object(), template.as_object()) else {
            return false;
        };
        template
            .iter()
            .all(|(member, expected)| own.get(member) == Some(expected))
    }

    /// Walks the `"x5c"` chain: every certificate must be signed by its
    /// successor, and the terminal certificate must be self-signed or
    /// anchored in `trust` (DER certificates). With an `"x5u"` present and
    /// fetching permitted, the remote chain replaces a missing `"x5c"`.
    pub fn validate_x5c_chain(
        &self,
        trust: &[Vec<u8>],
        fetcher: &dyn RemoteFetch,
        flags: FetchFlags,
    ) -> Result<(), crate::error::CertificateError> {
        x5c::validate_chain(self, trust, fetcher, flags)
    }

    pub(crate) fn require_key_type(&self) -> Result<KeyType, KeyError> {
        self.key_type
            .ok_or_else(|| KeyError::from("missing required member \"kty\""))
    }

    pub(crate) fn require_curve(&self) -> Result<Curve, KeyError> {
        self.curve
            .ok_or_else(|| KeyError::from("missing required member \"crv\""))
    }

    pub(crate) fn supported_curve(&self) -> Result<Curve, UnsupportedError> {
        let crv = self
            .curve
            .ok_or_else(|| UnsupportedError::from("key carries no curve"))?;
        if !crv.is_supported() {
            return Err(UnsupportedError(
                format!("curve {} is not supported by this build", crv.as_str()).into(),
            ));
        }
        Ok(crv)
    }
}

/// Bit length of an RSA modulus given its big-endian bytes.
fn rsa_modulus_bits(n: &[u8]) -> usize {
    let mut iter = n.iter();
    let mut skipped = 0usize;
    let mut first = None;
    for byte in iter.by_ref() {
        if *byte == 0 {
            skipped += 1;
        } else {
            first = Some(*byte);
            break;
        }
    }
    match first {
        Some(first) => (n.len() - skipped - 1) * 8 + (8 - first.leading_zeros() as usize),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // RFC 7517 appendix A.1, first key
    const EC_PUBLIC: &str = r#"{
        "kty":"EC",
        "crv":"P-256",
        "x":"MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
        "y":"4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
        "use":"enc",
        "kid":"1"
    }"#;

    // RFC 7515 appendix A.1 HMAC key
    const OCT_KEY: &str = r#"{
        "kty":"oct",
        "k":"AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow"
    }"#;

    #[test]
    fn test_json_round_trip_preserves_unknown_members() {
        let value = json!({
            "kty": "oct",
            "k": "GawgguFyGrWKav7AX4VKUg",
            "ext": true,
            "custom": {"a": 1}
        });
        let jwk = Jwk::from_value(&value).unwrap();
        assert_eq!(jwk.additional_fields.get("ext"), Some(&json!(true)));
        assert_eq!(jwk.to_value().unwrap(), value);
    }

    #[test]
    fn test_classify_ec_public() {
        let jwk = Jwk::from_json(EC_PUBLIC).unwrap();
        let (class, bits) = jwk.classify();
        assert!(class.is_public());
        assert!(!class.is_private());
        assert!(class.contains(KeyClass::EC));
        assert_eq!(bits, 256);
    }

    #[test]
    fn test_classify_oct() {
        let jwk = Jwk::from_json(OCT_KEY).unwrap();
        let (class, bits) = jwk.classify();
        assert!(class.is_symmetric());
        assert!(class.contains(KeyClass::HMAC));
        assert_eq!(bits, 512);
    }

    #[test]
    fn test_classify_rejects_incomplete_key() {
        let jwk = Jwk::from_value(&json!({"kty": "EC", "crv": "P-256"})).unwrap();
        assert_eq!(jwk.classify(), (KeyClass::NONE, 0));
    }

    #[test]
    fn test_validate_ec_public() {
        let jwk = Jwk::from_json(EC_PUBLIC).unwrap();
        jwk.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_point_off_curve() {
        let mut jwk = Jwk::from_json(EC_PUBLIC).unwrap();
        jwk.y.as_mut().unwrap()[0] ^= 0x01;
        assert!(jwk.validate().is_err());
    }

    #[test]
    fn test_public_key_strips_private_members() {
        let (private, public) = Jwk::generate(KeyType::Ec, 256, Some("key-1")).unwrap();
        let extracted = private.public_key().unwrap();
        assert_eq!(extracted, public);
        assert!(extracted.d.is_none());
        assert_eq!(extracted.key_id.as_deref(), Some("key-1"));
    }

    #[test]
    fn test_public_key_refuses_oct() {
        let jwk = Jwk::from_json(OCT_KEY).unwrap();
        assert!(jwk.public_key().is_err());
    }

    #[test]
    fn test_matches_subset() {
        let jwk = Jwk::from_json(EC_PUBLIC).unwrap();
        assert!(jwk.matches(&json!({"kty": "EC", "kid": "1"})));
        assert!(jwk.matches(&json!({"use": "enc"})));
        assert!(!jwk.matches(&json!({"kid": "2"})));
        assert!(!jwk.matches(&json!({"missing": true})));
    }

    #[test]
    fn test_password_key() {
        let jwk = Jwk::from_password("correct horse");
        assert_eq!(jwk.key_type, Some(KeyType::Oct));
        assert_eq!(jwk.symmetric_key(), Some(&b"correct horse"[..]));
    }

    #[test]
    fn test_rsa_modulus_bits() {
        assert_eq!(rsa_modulus_bits(&[0x80, 0, 0, 0]), 32);
        assert_eq!(rsa_modulus_bits(&[0x01, 0, 0]), 17);
        assert_eq!(rsa_modulus_bits(&[0, 0x01]), 1);
        assert_eq!(rsa_modulus_bits(&[]), 0);
    }
}
