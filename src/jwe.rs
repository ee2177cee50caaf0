mod algorithm;
mod content;
mod ecdh;
mod encryption;
mod header;
mod key_management;
mod zip;

pub use algorithm::Algorithm;
pub use encryption::Encryption;
pub use header::Header;
pub use zip::Zip;

use serde::{Deserialize, Serialize};

use crate::{
    b64,
    error::{DecodeError, DecryptError, EncryptError, KeyError, UnsupportedError},
    fetch::{FetchFlags, NoFetch, RemoteFetch},
    jwk::{Jwk, Jwks},
    rand::Random,
    sensitive::Bytes,
    serialization::{ParseFlags, Serialization},
};

/// One recipient of the shared ciphertext: its per-recipient header and
/// encrypted key.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub header: Option<Header>,
    pub encrypted_key: Vec<u8>,
}

/// A JSON Web Encryption object, in any of the three serializations.
///
/// <https://www.rfc-editor.org/rfc/rfc7516>
#[derive(Debug, Clone, PartialEq)]
pub struct Jwe {
    protected: Header,
    protected_b64: String,
    unprotected: Option<Header>,
    recipients: Vec<Recipient>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Vec<u8>,
    /// External AAD, usable only in the JSON serializations.
    aad: Option<Vec<u8>>,
    serialization: Serialization,
    flags: ParseFlags,
}

#[derive(Serialize, Deserialize)]
struct FlattenedJson {
    protected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unprotected: Option<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encrypted_key: Option<String>,
    iv: String,
    ciphertext: String,
    tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aad: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct GeneralJson {
    protected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unprotected: Option<Header>,
    recipients: Vec<GeneralRecipientJson>,
    iv: String,
    ciphertext: String,
    tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aad: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct GeneralRecipientJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encrypted_key: Option<String>,
}

impl Jwe {
    /// Encrypts `plaintext` to a single recipient.
    ///
    /// The header must carry `"alg"` and `"enc"`; `"zip": "DEF"` deflates
    /// the plaintext first. Algorithm byproducts (`epk`, `iv`/`tag`,
    /// `p2s`/`p2c`) land in the protected header.
    pub fn encrypt(plaintext: &[u8], header: &Header, key: &Jwk) -> Result<Self, EncryptError> {
        Self::encrypt_with_aad(plaintext, header, key, None)
    }

    /// Encrypts with external additional authenticated data. A token
    /// carrying external AAD serializes only in the JSON forms.
    pub fn encrypt_with_aad(
        plaintext: &[u8],
        header: &Header,
        key: &Jwk,
        aad: Option<&[u8]>,
    ) -> Result<Self, EncryptError> {
        let mut protected = header.clone();
        if protected.key_id.is_none() {
            protected.key_id = key.key_id.clone();
        }
        let wrapped = key_management::wrap_cek(&mut protected, key)?;
        Self::seal(plaintext, protected, wrapped, aad)
    }

    fn seal(
        plaintext: &[u8],
        protected: Header,
        wrapped: key_management::WrapResult,
        aad: Option<&[u8]>,
    ) -> Result<Self, EncryptError> {
        let enc = protected
            .encryption
            .ok_or_else(|| UnsupportedError::from("header is missing \"enc\""))?;
        let compressed;
        let content: &[u8] = match &protected.compression {
            Some(Zip::Deflate) => {
                compressed = zip::deflate(plaintext);
                &compressed
            }
            Some(Zip::Other(name)) => {
                return Err(UnsupportedError(
                    format!("unrecognized compression {name:?}").into(),
                )
                .into())
            }
            None => plaintext,
        };
        let protected_b64 = b64::encode(serde_json::to_vec(&protected)?);
        let aad_bytes = build_aad(&protected_b64, aad);
        let iv = Random::vec(enc.iv_len());
        let cek = Bytes::from(wrapped.cek);
        let sealed = content::encrypt(enc, cek.as_slice(), &iv, &aad_bytes, content)?;
        Ok(Self {
            protected,
            protected_b64,
            unprotected: None,
            recipients: vec![Recipient {
                header: None,
                encrypted_key: wrapped.encrypted_key,
            }],
            iv,
            ciphertext: sealed.ciphertext,
            tag: sealed.tag,
            aad: aad.map(|a| a.to_vec()),
            serialization: Serialization::Compact,
            flags: ParseFlags::NONE,
        })
    }

    /// Encrypts to several recipients sharing one CEK, one entry per
    /// `(header, key)` pair. Direct modes (`dir`, `ECDH-ES`) fix the CEK
    /// per-recipient and cannot share it.
    pub fn encrypt_multi(
        plaintext: &[u8],
        protected: &Header,
        recipients: &[(Header, &Jwk)],
    ) -> Result<Self, EncryptError> {
        let (first, rest) = match recipients.split_first() {
            Some(split) => split,
            None => {
                return Err(EncryptError::Key(KeyError::from(
                    "no recipient keys supplied",
                )))
            }
        };
        let enc = protected
            .encryption
            .ok_or_else(|| UnsupportedError::from("header is missing \"enc\""))?;
        let cek = Bytes::from(Random::vec(enc.key_len()));

        let mut out_recipients = Vec::with_capacity(recipients.len());
        for (recipient_header, key) in core::iter::once(first).chain(rest) {
            let merged = recipient_header.merged(Some(protected));
            let alg = merged
                .algorithm
                .ok_or_else(|| UnsupportedError::from("recipient header is missing \"alg\""))?;
            if alg.is_direct() || alg.is_direct_key_agreement() {
                return Err(UnsupportedError(
                    format!("{alg} cannot share a CEK across recipients").into(),
                )
                .into());
            }
            let mut wrap_header = merged.clone();
            wrap_header.encryption = Some(enc);
            // rewrap the shared CEK rather than the random one the helper
            // would mint: unwrap-side sees identical bytes
            let wrapped = key_management::rewrap_with_cek(&mut wrap_header, key, cek.as_slice())?;
            let mut recipient_header = recipient_header.clone();
            recipient_header.ephemeral_key = wrap_header.ephemeral_key;
            recipient_header.initialization_vector = wrap_header.initialization_vector;
            recipient_header.authentication_tag = wrap_header.authentication_tag;
            recipient_header.pbes2_salt = wrap_header.pbes2_salt;
            recipient_header.pbes2_count = wrap_header.pbes2_count;
            if recipient_header.key_id.is_none() {
                recipient_header.key_id = key.key_id.clone();
            }
            out_recipients.push(Recipient {
                header: Some(recipient_header),
                encrypted_key: wrapped,
            });
        }

        let protected_b64 = b64::encode(serde_json::to_vec(protected)?);
        let aad_bytes = build_aad(&protected_b64, None);
        let iv = Random::vec(enc.iv_len());
        let sealed = content::encrypt(enc, cek.as_slice(), &iv, &aad_bytes, plaintext)?;
        Ok(Self {
            protected: protected.clone(),
            protected_b64,
            unprotected: None,
            recipients: out_recipients,
            iv,
            ciphertext: sealed.ciphertext,
            tag: sealed.tag,
            aad: None,
            serialization: Serialization::General,
            flags: ParseFlags::NONE,
        })
    }

    pub fn protected_header(&self) -> &Header {
        &self.protected
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn serialization(&self) -> Serialization {
        self.serialization
    }

    /// The effective header of the first recipient.
    pub fn header(&self) -> Header {
        let merged = self.protected.merged(self.unprotected.as_ref());
        match self.recipients.first().and_then(|r| r.header.as_ref()) {
            Some(recipient) => merged.merged(Some(recipient)),
            None => merged,
        }
    }

    /// Emits the token in the requested serialization. Compact form
    /// carries one recipient, no unprotected headers, and no external AAD.
    pub fn serialize(&self, serialization: Serialization) -> Result<String, UnsupportedError> {
        match serialization {
            Serialization::Compact => {
                let recipient = self.single_recipient()?;
                if recipient.header.is_some() || self.unprotected.is_some() {
                    return Err(UnsupportedError::from(
                        "compact serialization cannot carry unprotected headers",
                    ));
                }
                if self.aad.is_some() {
                    return Err(UnsupportedError::from(
                        "compact serialization cannot carry external AAD",
                    ));
                }
                Ok(format!(
                    "{}.{}.{}.{}.{}",
                    self.protected_b64,
                    b64::encode(&recipient.encrypted_key),
                    b64::encode(&self.iv),
                    b64::encode(&self.ciphertext),
                    b64::encode(&self.tag)
                ))
            }
            Serialization::Flattened => {
                let recipient = self.single_recipient()?;
                let json = FlattenedJson {
                    protected: self.protected_b64.clone(),
                    unprotected: self.unprotected.clone(),
                    header: recipient.header.clone(),
                    encrypted_key: encode_optional(&recipient.encrypted_key),
                    iv: b64::encode(&self.iv),
                    ciphertext: b64::encode(&self.ciphertext),
                    tag: b64::encode(&self.tag),
                    aad: self.aad.as_ref().map(b64::encode),
                };
                serde_json::to_string(&json).map_err(|e| UnsupportedError::from(e.to_string()))
            }
            Serialization::General => {
                let json = GeneralJson {
                    protected: self.protected_b64.clone(),
                    unprotected: self.unprotected.clone(),
                    recipients: self
                        .recipients
                        .iter()
                        .map(|recipient| GeneralRecipientJson {
                            header: recipient.header.clone(),
                            encrypted_key: encode_optional(&recipient.encrypted_key),
                        })
                        .collect(),
                    iv: b64::encode(&self.iv),
                    ciphertext: b64::encode(&self.ciphertext),
                    tag: b64::encode(&self.tag),
                    aad: self.aad.as_ref().map(b64::encode),
                };
                serde_json::to_string(&json).map_err(|e| UnsupportedError::from(e.to_string()))
            }
        }
    }

    fn single_recipient(&self) -> Result<&Recipient, UnsupportedError> {
        match self.recipients.len() {
            1 => Ok(&self.recipients[0]),
            n => Err(UnsupportedError(
                format!("this serialization carries exactly one recipient, token has {n}").into(),
            )),
        }
    }

    /// Parses any of the three serializations; the discriminator is
    /// whether the first non-whitespace byte is `{`.
    pub fn parse(input: &str, flags: ParseFlags) -> Result<Self, DecodeError> {
        let trimmed = input.trim_start();
        if trimmed.starts_with('{') {
            Self::parse_json(trimmed.trim_end(), flags)
        } else {
            Self::parse_compact(input.trim(), flags)
        }
    }

    fn parse_compact(input: &str, flags: ParseFlags) -> Result<Self, DecodeError> {
        let segments: Vec<&str> = input.split('.').collect();
        if segments.len() != 5 {
            return Err(DecodeError::from(
                "compact JWE must be five dot-separated segments",
            ));
        }
        let protected = parse_protected(segments[0])?;
        Ok(Self {
            protected,
            protected_b64: segments[0].to_string(),
            unprotected: None,
            recipients: vec![Recipient {
                header: None,
                encrypted_key: b64::decode(segments[1])?,
            }],
            iv: b64::decode(segments[2])?,
            ciphertext: b64::decode(segments[3])?,
            tag: b64::decode(segments[4])?,
            aad: None,
            serialization: Serialization::Compact,
            flags,
        })
    }

    fn parse_json(input: &str, flags: ParseFlags) -> Result<Self, DecodeError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        if value.get("recipients").is_some() {
            let json: GeneralJson = serde_json::from_value(value)?;
            if json.recipients.is_empty() {
                return Err(DecodeError::from("\"recipients\" must not be empty"));
            }
            let protected = parse_protected(&json.protected)?;
            let recipients = json
                .recipients
                .into_iter()
                .map(|recipient| {
                    Ok(Recipient {
                        header: recipient.header,
                        encrypted_key: decode_optional(recipient.encrypted_key.as_deref())?,
                    })
                })
                .collect::<Result<Vec<_>, DecodeError>>()?;
            Ok(Self {
                protected,
                protected_b64: json.protected,
                unprotected: json.unprotected,
                recipients,
                iv: b64::decode(&json.iv)?,
                ciphertext: b64::decode(&json.ciphertext)?,
                tag: b64::decode(&json.tag)?,
                aad: json.aad.map(|aad| b64::decode(aad)).transpose()?,
                serialization: Serialization::General,
                flags,
            })
        } else {
            let json: FlattenedJson = serde_json::from_value(value)?;
            let protected = parse_protected(&json.protected)?;
            Ok(Self {
                protected,
                protected_b64: json.protected,
                unprotected: json.unprotected,
                recipients: vec![Recipient {
                    header: json.header,
                    encrypted_key: decode_optional(json.encrypted_key.as_deref())?,
                }],
                iv: b64::decode(&json.iv)?,
                ciphertext: b64::decode(&json.ciphertext)?,
                tag: b64::decode(&json.tag)?,
                aad: json.aad.map(|aad| b64::decode(aad)).transpose()?,
                serialization: Serialization::Flattened,
                flags,
            })
        }
    }

    /// Decrypts the token against `keys` without remote fetching.
    pub fn decrypt(&self, keys: &Jwks) -> Result<Vec<u8>, DecryptError> {
        self.decrypt_with(keys, &NoFetch, FetchFlags::IGNORE_REMOTE)
    }

    /// Tries every recipient against the candidate keys (`"kid"` matches
    /// first, then insertion order). A failed authentication yields
    /// [`DecryptError::Verification`] and no plaintext.
    pub fn decrypt_with(
        &self,
        keys: &Jwks,
        _fetcher: &dyn RemoteFetch,
        _fetch_flags: FetchFlags,
    ) -> Result<Vec<u8>, DecryptError> {
        let shared = self.protected.merged(self.unprotected.as_ref());
        let mut last = DecryptError::Verification;
        for recipient in &self.recipients {
            let header = match &recipient.header {
                Some(recipient_header) => shared.merged(Some(recipient_header)),
                None => shared.clone(),
            };
            header.check_critical()?;
            let candidates = keys.candidates(header.key_id.as_deref(), None);
            for key in candidates {
                match self.open(&header, key, &recipient.encrypted_key) {
                    Ok(plaintext) => return Ok(plaintext),
                    Err(e) => last = e,
                }
            }
        }
        Err(last)
    }

    fn open(
        &self,
        header: &Header,
        key: &Jwk,
        encrypted_key: &[u8],
    ) -> Result<Vec<u8>, DecryptError> {
        let enc = header
            .encryption
            .ok_or_else(|| UnsupportedError::from("header is missing \"enc\""))?;
        let cek = Bytes::from(key_management::unwrap_cek(header, key, encrypted_key)?);
        let aad = build_aad(&self.protected_b64, self.aad.as_deref());
        let content =
            content::decrypt(enc, cek.as_slice(), &self.iv, &aad, &self.ciphertext, &self.tag)?;
        match &header.compression {
            Some(Zip::Deflate) => Ok(zip::inflate(&content)?),
            Some(Zip::Other(name)) => Err(UnsupportedError(
                format!("unrecognized compression {name:?}").into(),
            )
            .into()),
            None => Ok(content),
        }
    }
}

/// `AAD = ASCII(b64u(protected))`, with `'.' || b64u(external)` appended
/// when external AAD is present.
fn build_aad(protected_b64: &str, external: Option<&[u8]>) -> Vec<u8> {
    match external {
        Some(external) => format!("{protected_b64}.{}", b64::encode(external)).into_bytes(),
        None => protected_b64.as_bytes().to_vec(),
    }
}

fn parse_protected(protected_b64: &str) -> Result<Header, DecodeError> {
    let header: Header = serde_json::from_slice(&b64::decode(protected_b64)?)?;
    header.check_critical()?;
    Ok(header)
}

fn encode_optional(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        None
    } else {
        Some(b64::encode(bytes))
    }
}

fn decode_optional(input: Option<&str>) -> Result<Vec<u8>, DecodeError> {
    match input {
        Some(input) => Ok(b64::decode(input)?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::{Curve, KeyType};

    fn round_trip(alg: Algorithm, enc: Encryption, encrypt_key: &Jwk, decrypt_key: &Jwk) {
        let plaintext = b"Live long and prosper.";
        let jwe = Jwe::encrypt(plaintext, &Header::new(alg, enc), encrypt_key).unwrap();
        let compact = jwe.serialize(Serialization::Compact).unwrap();
        assert_eq!(compact.matches('.').count(), 4);
        let parsed = Jwe::parse(&compact, ParseFlags::NONE).unwrap();
        let opened = parsed.decrypt(&Jwks::from(decrypt_key.clone())).unwrap();
        assert_eq!(opened, plaintext);
    }

    // RFC 7516 appendix A.3: A128KW + A128CBC-HS256
    #[test]
    fn test_rfc7516_a3_decrypt() {
        let token = "eyJhbGciOiJBMTI4S1ciLCJlbmMiOiJBMTI4Q0JDLUhTMjU2In0.\
                     6KB707dM9YTIgHtLvtgWQ8mKwboJW3of9locizkDTHzBC2IlrT1oOQ.\
                     AxY8DCtDaGlsbGljb3RoZQ.\
                     KDlTtXchhZTGufMYmOYGS4HffxPSUrfmqCHXaI9wOGY.\
                     U0m_YmjN04DJvceFICbCVQ";
        let key = Jwk::from_json(r#"{"kty":"oct","k":"GawgguFyGrWKav7AX4VKUg"}"#).unwrap();
        let jwe = Jwe::parse(token, ParseFlags::NONE).unwrap();
        assert_eq!(jwe.header().algorithm, Some(Algorithm::A128Kw));
        assert_eq!(jwe.header().encryption, Some(Encryption::A128CbcHs256));
        let plaintext = jwe.decrypt(&Jwks::from(key)).unwrap();
        assert_eq!(plaintext, b"Live long and prosper.");
    }

    #[test]
    fn test_dir_a128cbc_hs256() {
        // dir: the CEK is the 32-byte shared key itself, IV is 16 bytes
        let key = Jwk::generate_oct(32, Some("shared"));
        let jwe = Jwe::encrypt(
            b"plaintext",
            &Header::new(Algorithm::Dir, Encryption::A128CbcHs256),
            &key,
        )
        .unwrap();
        assert!(jwe.recipients()[0].encrypted_key.is_empty());
        assert_eq!(jwe.iv.len(), 16);
        assert_eq!(jwe.tag.len(), 16);
        round_trip(Algorithm::Dir, Encryption::A128CbcHs256, &key, &key);
    }

    #[test]
    fn test_aes_kw_all_encs() {
        let kek = Jwk::generate_oct(16, None);
        for enc in [
            Encryption::A128CbcHs256,
            Encryption::A192CbcHs384,
            Encryption::A256CbcHs512,
            Encryption::A128Gcm,
            Encryption::A192Gcm,
            Encryption::A256Gcm,
        ] {
            round_trip(Algorithm::A128Kw, enc, &kek, &kek);
        }
    }

    #[test]
    fn test_rsa_oaep_round_trip() {
        let (private, public) = Jwk::generate(KeyType::Rsa, 2048, None).unwrap();
        round_trip(Algorithm::RsaOaep, Encryption::A256Gcm, &public, &private);
    }

    #[test]
    fn test_ecdh_es_a128kw_round_trip() {
        let (private, public) = Jwk::generate_ec(Curve::P256, None).unwrap();
        round_trip(
            Algorithm::EcdhEsA128Kw,
            Encryption::A128CbcHs256,
            &public,
            &private,
        );
    }

    #[test]
    fn test_ecdh_es_direct_round_trip() {
        let (private, public) = Jwk::generate_ec(Curve::P384, None).unwrap();
        round_trip(Algorithm::EcdhEs, Encryption::A128Gcm, &public, &private);
    }

    #[test]
    fn test_pbes2_round_trip() {
        let password = Jwk::from_password("entrap, o stalwart password");
        round_trip(
            Algorithm::Pbes2Hs256A128Kw,
            Encryption::A128CbcHs256,
            &password,
            &password,
        );
    }

    #[test]
    fn test_tamper_detection_yields_no_plaintext() {
        let key = Jwk::generate_oct(32, None);
        let jwe = Jwe::encrypt(
            b"attack at dawn",
            &Header::new(Algorithm::Dir, Encryption::A128CbcHs256),
            &key,
        )
        .unwrap();
        let compact = jwe.serialize(Serialization::Compact).unwrap();
        let keys = Jwks::from(key);

        // flip one ciphertext byte, then one tag byte
        let segments: Vec<&str> = compact.split('.').collect();
        for target in [3usize, 4] {
            let mut seg = b64::decode(segments[target]).unwrap();
            seg[0] ^= 1;
            let mut forged = segments.clone();
            let reencoded = b64::encode(&seg);
            forged[target] = &reencoded;
            let forged = forged.join(".");
            let parsed = Jwe::parse(&forged, ParseFlags::NONE).unwrap();
            assert!(matches!(
                parsed.decrypt(&keys),
                Err(DecryptError::Verification)
            ));
        }
    }

    #[test]
    fn test_zip_deflate() {
        let key = Jwk::generate_oct(32, None);
        let mut header = Header::new(Algorithm::Dir, Encryption::A256Gcm);
        header.compression = Some(Zip::Deflate);
        let plaintext = b"repetition repetition repetition repetition".repeat(40);
        let jwe = Jwe::encrypt(&plaintext, &header, &key).unwrap();
        assert!(jwe.ciphertext.len() < plaintext.len());
        let compact = jwe.serialize(Serialization::Compact).unwrap();
        let opened = Jwe::parse(&compact, ParseFlags::NONE)
            .unwrap()
            .decrypt(&Jwks::from(key))
            .unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_serialization_round_trip_is_bit_exact() {
        let key = Jwk::generate_oct(16, None);
        let jwe = Jwe::encrypt(
            b"payload",
            &Header::new(Algorithm::A128Kw, Encryption::A128Gcm),
            &key,
        )
        .unwrap();
        let compact = jwe.serialize(Serialization::Compact).unwrap();
        let general = Jwe::parse(&compact, ParseFlags::NONE)
            .unwrap()
            .serialize(Serialization::General)
            .unwrap();
        let flattened = Jwe::parse(&general, ParseFlags::NONE)
            .unwrap()
            .serialize(Serialization::Flattened)
            .unwrap();
        let back = Jwe::parse(&flattened, ParseFlags::NONE)
            .unwrap()
            .serialize(Serialization::Compact)
            .unwrap();
        assert_eq!(back, compact);
    }

    #[test]
    fn test_external_aad_is_json_only() {
        let key = Jwk::generate_oct(32, None);
        let jwe = Jwe::encrypt_with_aad(
            b"payload",
            &Header::new(Algorithm::Dir, Encryption::A256Gcm),
            &key,
            Some(b"external context"),
        )
        .unwrap();
        assert!(jwe.serialize(Serialization::Compact).is_err());
        let flattened = jwe.serialize(Serialization::Flattened).unwrap();
        let parsed = Jwe::parse(&flattened, ParseFlags::NONE).unwrap();
        assert_eq!(parsed.decrypt(&Jwks::from(key)).unwrap(), b"payload");
    }

    #[test]
    fn test_multi_recipient_shared_cek() {
        let kek_a = Jwk::generate_oct(16, Some("a"));
        let kek_b = Jwk::generate_oct(32, Some("b"));
        let protected = {
            let mut header = Header::default();
            header.encryption = Some(Encryption::A128Gcm);
            header
        };
        let mut header_a = Header::default();
        header_a.algorithm = Some(Algorithm::A128Kw);
        let mut header_b = Header::default();
        header_b.algorithm = Some(Algorithm::A256Kw);

        let jwe = Jwe::encrypt_multi(
            b"to whom it may concern",
            &protected,
            &[(header_a, &kek_a), (header_b, &kek_b)],
        )
        .unwrap();
        let general = jwe.serialize(Serialization::General).unwrap();
        let parsed = Jwe::parse(&general, ParseFlags::NONE).unwrap();
        assert_eq!(parsed.recipients().len(), 2);
        assert_eq!(
            parsed.decrypt(&Jwks::from(kek_a)).unwrap(),
            b"to whom it may concern"
        );
        assert_eq!(
            parsed.decrypt(&Jwks::from(kek_b)).unwrap(),
            b"to whom it may concern"
        );
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        assert!(Jwe::parse("a.b.c.d", ParseFlags::NONE).is_err());
        assert!(Jwe::parse("a.b.c.d.e.f", ParseFlags::NONE).is_err());
    }

    #[test]
    fn test_wrong_key_yields_verification_error() {
        let key = Jwk::generate_oct(16, None);
        let other = Jwk::generate_oct(16, None);
        let jwe = Jwe::encrypt(
            b"payload",
            &Header::new(Algorithm::A128Kw, Encryption::A128Gcm),
            &key,
        )
        .unwrap();
        let compact = jwe.serialize(Serialization::Compact).unwrap();
        let parsed = Jwe::parse(&compact, ParseFlags::NONE).unwrap();
        assert!(matches!(
            parsed.decrypt(&Jwks::from(other)),
            Err(DecryptError::Verification)
        ));
    }
}
