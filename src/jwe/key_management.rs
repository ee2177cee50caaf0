//! Key management: producing the content-encryption key on encrypt and
//! recovering it on decrypt, per the header's `"alg"`.

use aes_gcm::{AeadInPlace, Aes128Gcm, Aes256Gcm, AesGcm, KeyInit, Nonce};
use rsa::{Oaep, Pkcs1v15Encrypt};
use sha1::Sha1;
use sha2::Sha256;

use crate::{
    error::{DecryptError, EncryptError, KeyError, UnsupportedError},
    jwk::Jwk,
    rand::Random,
};

use super::{ecdh, Algorithm, Encryption, Header};

type Aes192Gcm = AesGcm<aes::Aes192, aes_gcm::aead::consts::U12>;

/// Iteration counts above this are refused on decrypt, so a hostile
/// `"p2c"` cannot pin the CPU.
const PBES2_MAX_ITERATIONS: u32 = 1_000_000;

/// Default iteration count when the caller supplies none, matching the
/// RFC 7517 appendix C example parameters.
const PBES2_DEFAULT_ITERATIONS: u32 = 4096;

const PBES2_SALT_LEN: usize = 16;

pub(crate) struct WrapResult {
    /// The plaintext CEK the content encryption will use.
    pub cek: Vec<u8>,
    /// The wire `encrypted_key` segment (empty for direct modes).
    pub encrypted_key: Vec<u8>,
}

/// Produces the CEK for `enc` and its encrypted form under `key`,
/// recording algorithm byproducts (`epk`, `iv`/`tag`, `p2s`/`p2c`) in the
/// header. The header must be the *protected* header, since those members
/// must be authenticated.
pub(crate) fn wrap_cek(header: &mut Header, key: &Jwk) -> Result<WrapResult, EncryptError> {
    let alg = header
        .algorithm
        .ok_or_else(|| UnsupportedError::from("header is missing \"alg\""))?;
    let enc = header
        .encryption
        .ok_or_else(|| UnsupportedError::from("header is missing \"enc\""))?;

    match alg {
        Algorithm::Dir => {
            let cek = symmetric_key(key).map_err(EncryptError::Key)?;
            if cek.len() != enc.key_len() {
                return Err(EncryptError::Key(KeyError(format!(
                    "dir with {enc} requires a {}-byte key, got {}",
                    enc.key_len(),
                    cek.len()
                ))));
            }
            Ok(WrapResult {
                cek,
                encrypted_key: Vec::new(),
            })
        }
        Algorithm::A128Kw | Algorithm::A192Kw | Algorithm::A256Kw => {
            let kek = wrapping_key(alg, key).map_err(EncryptError::Key)?;
            let cek = Random::vec(enc.key_len());
            let encrypted_key = aes_kw_wrap(&kek, &cek)?;
            Ok(WrapResult { cek, encrypted_key })
        }
        Algorithm::A128GcmKw | Algorithm::A192GcmKw | Algorithm::A256GcmKw => {
            let kek = wrapping_key(alg, key).map_err(EncryptError::Key)?;
            let cek = Random::vec(enc.key_len());
            let iv = Random::vec(12);
            let (encrypted_key, tag) = gcm_wrap(&kek, &iv, &cek)?;
            header.initialization_vector = Some(iv);
            header.authentication_tag = Some(tag);
            Ok(WrapResult { cek, encrypted_key })
        }
        Algorithm::Rsa1_5 | Algorithm::RsaOaep | Algorithm::RsaOaep256 => {
            let public = key.to_rsa_public_key().map_err(EncryptError::Key)?;
            let cek = Random::vec(enc.key_len());
            let encrypted_key = match alg {
                Algorithm::Rsa1_5 => public.encrypt(&mut Random, Pkcs1v15Encrypt, &cek)?,
                Algorithm::RsaOaep => public.encrypt(&mut Random, Oaep::new::<Sha1>(), &cek)?,
                _ => public.encrypt(&mut Random, Oaep::new::<Sha256>(), &cek)?,
            };
            Ok(WrapResult { cek, encrypted_key })
        }
        Algorithm::EcdhEs => {
            let (epk_private, epk_public) = ecdh::ephemeral_pair(key)?;
            let z = ecdh::derive_z(&epk_private, key).map_err(EncryptError::Key)?;
            let enc_name: &'static str = enc.into();
            let cek = ecdh::concat_kdf(&z, enc_name, apu(header), apv(header), enc.key_len());
            header.ephemeral_key = Some(epk_public);
            Ok(WrapResult {
                cek,
                encrypted_key: Vec::new(),
            })
        }
        Algorithm::EcdhEsA128Kw | Algorithm::EcdhEsA192Kw | Algorithm::EcdhEsA256Kw => {
            let (epk_private, epk_public) = ecdh::ephemeral_pair(key)?;
            let z = ecdh::derive_z(&epk_private, key).map_err(EncryptError::Key)?;
            let alg_name: &'static str = alg.into();
            let kek = ecdh::concat_kdf(
                &z,
                alg_name,
                apu(header),
                apv(header),
                alg.wrap_key_len().expect("ECDH-ES+KW wraps"),
            );
            let cek = Random::vec(enc.key_len());
            let encrypted_key = aes_kw_wrap(&kek, &cek)?;
            header.ephemeral_key = Some(epk_public);
            Ok(WrapResult { cek, encrypted_key })
        }
        Algorithm::Pbes2Hs256A128Kw | Algorithm::Pbes2Hs384A192Kw | Algorithm::Pbes2Hs512A256Kw => {
            let password = symmetric_key(key).map_err(EncryptError::Key)?;
            let salt = match &header.pbes2_salt {
                Some(salt) => salt.clone(),
                None => Random::vec(PBES2_SALT_LEN),
            };
            let count = header.pbes2_count.unwrap_or(PBES2_DEFAULT_ITERATIONS);
            let kek = pbes2_derive(alg, &password, &salt, count);
            let cek = Random::vec(enc.key_len());
            let encrypted_key = aes_kw_wrap(&kek, &cek)?;
            header.pbes2_salt = Some(salt);
            header.pbes2_count = Some(count);
            Ok(WrapResult { cek, encrypted_key })
        }
    }
}

/// Wraps a caller-supplied CEK, for multi-recipient tokens that share one
/// content-encryption key. Direct modes fix the CEK themselves and are
/// refused.
pub(crate) fn rewrap_with_cek(
    header: &mut Header,
    key: &Jwk,
    cek: &[u8],
) -> Result<Vec<u8>, EncryptError> {
    let alg = header
        .algorithm
        .ok_or_else(|| UnsupportedError::from("header is missing \"alg\""))?;
    match alg {
        Algorithm::Dir | Algorithm::EcdhEs => Err(UnsupportedError(
            format!("{alg} cannot wrap an externally chosen CEK").into(),
        )
        .into()),
        Algorithm::A128Kw | Algorithm::A192Kw | Algorithm::A256Kw => {
            let kek = wrapping_key(alg, key).map_err(EncryptError::Key)?;
            aes_kw_wrap(&kek, cek)
        }
        Algorithm::A128GcmKw | Algorithm::A192GcmKw | Algorithm::A256GcmKw => {
            let kek = wrapping_key(alg, key).map_err(EncryptError::Key)?;
            let iv = Random::vec(12);
            let (encrypted_key, tag) = gcm_wrap(&kek, &iv, cek)?;
            header.initialization_vector = Some(iv);
            header.authentication_tag = Some(tag);
            Ok(encrypted_key)
        }
        Algorithm::Rsa1_5 | Algorithm::RsaOaep | Algorithm::RsaOaep256 => {
            let public = key.to_rsa_public_key().map_err(EncryptError::Key)?;
            Ok(match alg {
                Algorithm::Rsa1_5 => public.encrypt(&mut Random, Pkcs1v15Encrypt, cek)?,
                Algorithm::RsaOaep => public.encrypt(&mut Random, Oaep::new::<Sha1>(), cek)?,
                _ => public.encrypt(&mut Random, Oaep::new::<Sha256>(), cek)?,
            })
        }
        Algorithm::EcdhEsA128Kw | Algorithm::EcdhEsA192Kw | Algorithm::EcdhEsA256Kw => {
            let (epk_private, epk_public) = ecdh::ephemeral_pair(key)?;
            let z = ecdh::derive_z(&epk_private, key).map_err(EncryptError::Key)?;
            let alg_name: &'static str = alg.into();
            let kek = ecdh::concat_kdf(
                &z,
                alg_name,
                apu(header),
                apv(header),
                alg.wrap_key_len().expect("ECDH-ES+KW wraps"),
            );
            let encrypted_key = aes_kw_wrap(&kek, cek)?;
            header.ephemeral_key = Some(epk_public);
            Ok(encrypted_key)
        }
        Algorithm::Pbes2Hs256A128Kw | Algorithm::Pbes2Hs384A192Kw | Algorithm::Pbes2Hs512A256Kw => {
            let password = symmetric_key(key).map_err(EncryptError::Key)?;
            let salt = match &header.pbes2_salt {
                Some(salt) => salt.clone(),
                None => Random::vec(PBES2_SALT_LEN),
            };
            let count = header.pbes2_count.unwrap_or(PBES2_DEFAULT_ITERATIONS);
            let kek = pbes2_derive(alg, &password, &salt, count);
            let encrypted_key = aes_kw_wrap(&kek, cek)?;
            header.pbes2_salt = Some(salt);
            header.pbes2_count = Some(count);
            Ok(encrypted_key)
        }
    }
}

/// Recovers the CEK from `encrypted_key` with the recipient's `key`.
pub(crate) fn unwrap_cek(
    header: &Header,
    key: &Jwk,
    encrypted_key: &[u8],
) -> Result<Vec<u8>, DecryptError> {
    let alg = header
        .algorithm
        .ok_or_else(|| UnsupportedError::from("header is missing \"alg\""))?;
    let enc = header
        .encryption
        .ok_or_else(|| UnsupportedError::from("header is missing \"enc\""))?;

    let cek = match alg {
        Algorithm::Dir => {
            if !encrypted_key.is_empty() {
                return Err(DecryptError::Verification);
            }
            symmetric_key(key)?
        }
        Algorithm::A128Kw | Algorithm::A192Kw | Algorithm::A256Kw => {
            let kek = wrapping_key(alg, key)?;
            aes_kw_unwrap(&kek, encrypted_key)?
        }
        Algorithm::A128GcmKw | Algorithm::A192GcmKw | Algorithm::A256GcmKw => {
            let kek = wrapping_key(alg, key)?;
            let iv = header
                .initialization_vector
                .as_ref()
                .ok_or_else(|| DecryptError::Decode("header is missing \"iv\"".into()))?;
            let tag = header
                .authentication_tag
                .as_ref()
                .ok_or_else(|| DecryptError::Decode("header is missing \"tag\"".into()))?;
            gcm_unwrap(&kek, iv, encrypted_key, tag)?
        }
        Algorithm::Rsa1_5 | Algorithm::RsaOaep | Algorithm::RsaOaep256 => {
            let private = key.to_rsa_private_key()?;
            match alg {
                Algorithm::Rsa1_5 => private.decrypt(Pkcs1v15Encrypt, encrypted_key)?,
                Algorithm::RsaOaep => private.decrypt(Oaep::new::<Sha1>(), encrypted_key)?,
                _ => private.decrypt(Oaep::new::<Sha256>(), encrypted_key)?,
            }
        }
        Algorithm::EcdhEs => {
            if !encrypted_key.is_empty() {
                return Err(DecryptError::Verification);
            }
            let epk = header
                .ephemeral_key
                .as_ref()
                .ok_or_else(|| DecryptError::Decode("header is missing \"epk\"".into()))?;
            let z = ecdh::derive_z(key, epk)?;
            let enc_name: &'static str = enc.into();
            ecdh::concat_kdf(&z, enc_name, apu(header), apv(header), enc.key_len())
        }
        Algorithm::EcdhEsA128Kw | Algorithm::EcdhEsA192Kw | Algorithm::EcdhEsA256Kw => {
            let epk = header
                .ephemeral_key
                .as_ref()
                .ok_or_else(|| DecryptError::Decode("header is missing \"epk\"".into()))?;
            let z = ecdh::derive_z(key, epk)?;
            let alg_name: &'static str = alg.into();
            let kek = ecdh::concat_kdf(
                &z,
                alg_name,
                apu(header),
                apv(header),
                alg.wrap_key_len().expect("ECDH-ES+KW wraps"),
            );
            aes_kw_unwrap(&kek, encrypted_key)?
        }
        Algorithm::Pbes2Hs256A128Kw | Algorithm::Pbes2Hs384A192Kw | Algorithm::Pbes2Hs512A256Kw => {
            let password = symmetric_key(key)?;
            let salt = header
                .pbes2_salt
                .as_ref()
                .ok_or_else(|| DecryptError::Decode("header is missing \"p2s\"".into()))?;
            let count = header
                .pbes2_count
                .ok_or_else(|| DecryptError::Decode("header is missing \"p2c\"".into()))?;
            if count == 0 || count > PBES2_MAX_ITERATIONS {
                return Err(DecryptError::Decode(
                    format!("\"p2c\" of {count} is out of range").into(),
                ));
            }
            let kek = pbes2_derive(alg, &password, salt, count);
            aes_kw_unwrap(&kek, encrypted_key)?
        }
    };
    if cek.len() != enc.key_len() {
        return Err(DecryptError::Verification);
    }
    Ok(cek)
}

fn symmetric_key(key: &Jwk) -> Result<Vec<u8>, KeyError> {
    key.symmetric_key()
        .map(|k| k.to_vec())
        .ok_or_else(|| KeyError::from("oct key is missing \"k\""))
}

fn wrapping_key(alg: Algorithm, key: &Jwk) -> Result<Vec<u8>, KeyError> {
    let kek = symmetric_key(key)?;
    let expected = alg.wrap_key_len().expect("wrapping algorithm");
    if kek.len() != expected {
        return Err(KeyError(format!(
            "{alg} requires a {expected}-byte key, got {}",
            kek.len()
        )));
    }
    Ok(kek)
}

fn aes_kw_wrap(kek: &[u8], cek: &[u8]) -> Result<Vec<u8>, EncryptError> {
    let wrapped = match kek.len() {
        16 => aes_kw::Kek::<aes::Aes128>::try_from(kek)
            .map_err(|e| KeyError(e.to_string()))?
            .wrap_vec(cek),
        24 => aes_kw::Kek::<aes::Aes192>::try_from(kek)
            .map_err(|e| KeyError(e.to_string()))?
            .wrap_vec(cek),
        32 => aes_kw::Kek::<aes::Aes256>::try_from(kek)
            .map_err(|e| KeyError(e.to_string()))?
            .wrap_vec(cek),
        n => return Err(EncryptError::Key(KeyError(format!("bad KEK size {n}")))),
    };
    wrapped.map_err(|_| EncryptError::Unspecified)
}

fn aes_kw_unwrap(kek: &[u8], wrapped: &[u8]) -> Result<Vec<u8>, DecryptError> {
    let cek = match kek.len() {
        16 => aes_kw::Kek::<aes::Aes128>::try_from(kek)
            .map_err(|e| KeyError(e.to_string()))?
            .unwrap_vec(wrapped),
        24 => aes_kw::Kek::<aes::Aes192>::try_from(kek)
            .map_err(|e| KeyError(e.to_string()))?
            .unwrap_vec(wrapped),
        32 => aes_kw::Kek::<aes::Aes256>::try_from(kek)
            .map_err(|e| KeyError(e.to_string()))?
            .unwrap_vec(wrapped),
        n => return Err(DecryptError::Key(KeyError(format!("bad KEK size {n}")))),
    };
    Ok(cek?)
}

fn gcm_wrap(kek: &[u8], iv: &[u8], cek: &[u8]) -> Result<(Vec<u8>, Vec<u8>), EncryptError> {
    let mut buffer = cek.to_vec();
    let nonce = Nonce::from_slice(iv);
    let tag = match kek.len() {
        16 => Aes128Gcm::new_from_slice(kek)?.encrypt_in_place_detached(nonce, b"", &mut buffer)?,
        24 => Aes192Gcm::new_from_slice(kek)?.encrypt_in_place_detached(nonce, b"", &mut buffer)?,
        32 => Aes256Gcm::new_from_slice(kek)?.encrypt_in_place_detached(nonce, b"", &mut buffer)?,
        n => return Err(EncryptError::Key(KeyError(format!("bad KEK size {n}")))),
    };
    Ok((buffer, tag.to_vec()))
}

fn gcm_unwrap(kek: &[u8], iv: &[u8], wrapped: &[u8], tag: &[u8]) -> Result<Vec<u8>, DecryptError> {
    if iv.len() != 12 || tag.len() != 16 {
        return Err(DecryptError::Verification);
    }
    let mut buffer = wrapped.to_vec();
    let nonce = Nonce::from_slice(iv);
    let tag = aes_gcm::Tag::from_slice(tag);
    match kek.len() {
        16 => Aes128Gcm::new_from_slice(kek)?
            .decrypt_in_place_detached(nonce, b"", &mut buffer, tag)?,
        24 => Aes192Gcm::new_from_slice(kek)?
            .decrypt_in_place_detached(nonce, b"", &mut buffer, tag)?,
        32 => Aes256Gcm::new_from_slice(kek)?
            .decrypt_in_place_detached(nonce, b"", &mut buffer, tag)?,
        n => return Err(DecryptError::Key(KeyError(format!("bad KEK size {n}")))),
    }
    Ok(buffer)
}

/// PBKDF2 with the PRF named by the algorithm suffix, over the RFC 7518
/// §4.8.1.1 salt input `alg || 0x00 || p2s`.
fn pbes2_derive(alg: Algorithm, password: &[u8], p2s: &[u8], count: u32) -> Vec<u8> {
    let alg_name: &'static str = alg.into();
    let mut salt = Vec::with_capacity(alg_name.len() + 1 + p2s.len());
    salt.extend_from_slice(alg_name.as_bytes());
    salt.push(0);
    salt.extend_from_slice(p2s);

    let mut derived = vec![0u8; alg.wrap_key_len().expect("PBES2 wraps")];
    match alg {
        Algorithm::Pbes2Hs256A128Kw => {
            pbkdf2::pbkdf2_hmac::<Sha256>(password, &salt, count, &mut derived)
        }
        Algorithm::Pbes2Hs384A192Kw => {
            pbkdf2::pbkdf2_hmac::<sha2::Sha384>(password, &salt, count, &mut derived)
        }
        Algorithm::Pbes2Hs512A256Kw => {
            pbkdf2::pbkdf2_hmac::<sha2::Sha512>(password, &salt, count, &mut derived)
        }
        _ => unreachable!("not a PBES2 algorithm: {alg}"),
    }
    derived
}

fn apu(header: &Header) -> &[u8] {
    header
        .agreement_party_u_info
        .as_deref()
        .unwrap_or_default()
}

fn apv(header: &Header) -> &[u8] {
    header
        .agreement_party_v_info
        .as_deref()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::{Curve, KeyType};

    fn round_trip(alg: Algorithm, enc: Encryption, wrap_key: &Jwk, unwrap_key: &Jwk) {
        let mut header = Header::new(alg, enc);
        let wrapped = wrap_cek(&mut header, wrap_key).unwrap();
        assert_eq!(wrapped.cek.len(), enc.key_len());
        let cek = unwrap_cek(&header, unwrap_key, &wrapped.encrypted_key).unwrap();
        assert_eq!(cek, wrapped.cek);
    }

    #[test]
    fn test_aes_kw_round_trip() {
        let kek = Jwk::generate_oct(16, None);
        round_trip(Algorithm::A128Kw, Encryption::A128CbcHs256, &kek, &kek);
        let kek = Jwk::generate_oct(32, None);
        round_trip(Algorithm::A256Kw, Encryption::A256Gcm, &kek, &kek);
    }

    // RFC 3394 §4.1 test vector, via the A128KW path
    #[test]
    fn test_rfc3394_wrap_vector() {
        let kek = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let cek = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let wrapped = aes_kw_wrap(&kek, &cek).unwrap();
        assert_eq!(
            hex::encode(&wrapped),
            "1fa68b0a8112b447aef34bd8fb5a7b829d3e862371d2cfe5"
        );
        assert_eq!(aes_kw_unwrap(&kek, &wrapped).unwrap(), cek);
    }

    #[test]
    fn test_gcm_kw_round_trip() {
        let kek = Jwk::generate_oct(32, None);
        let mut header = Header::new(Algorithm::A256GcmKw, Encryption::A128Gcm);
        let wrapped = wrap_cek(&mut header, &kek).unwrap();
        assert!(header.initialization_vector.is_some());
        assert!(header.authentication_tag.is_some());
        let cek = unwrap_cek(&header, &kek, &wrapped.encrypted_key).unwrap();
        assert_eq!(cek, wrapped.cek);

        // a flipped header tag must break the unwrap
        header.authentication_tag.as_mut().unwrap()[0] ^= 1;
        assert!(unwrap_cek(&header, &kek, &wrapped.encrypted_key).is_err());
    }

    #[test]
    fn test_rsa_oaep_round_trip() {
        let (private, public) = Jwk::generate(KeyType::Rsa, 2048, None).unwrap();
        round_trip(Algorithm::RsaOaep, Encryption::A256Gcm, &public, &private);
        round_trip(Algorithm::RsaOaep256, Encryption::A128CbcHs256, &public, &private);
        round_trip(Algorithm::Rsa1_5, Encryption::A128Gcm, &public, &private);
    }

    #[test]
    fn test_ecdh_es_direct_round_trip() {
        let (private, public) = Jwk::generate_ec(Curve::P256, None).unwrap();
        let mut header = Header::new(Algorithm::EcdhEs, Encryption::A128Gcm);
        header.agreement_party_u_info = Some(b"Alice".to_vec());
        header.agreement_party_v_info = Some(b"Bob".to_vec());
        let wrapped = wrap_cek(&mut header, &public).unwrap();
        assert!(wrapped.encrypted_key.is_empty());
        assert!(header.ephemeral_key.is_some());
        let cek = unwrap_cek(&header, &private, &[]).unwrap();
        assert_eq!(cek, wrapped.cek);
    }

    #[test]
    fn test_ecdh_es_kw_round_trip_x25519() {
        let (private, public) = Jwk::generate_okp(Curve::X25519, None).unwrap();
        let mut header = Header::new(Algorithm::EcdhEsA128Kw, Encryption::A128CbcHs256);
        let wrapped = wrap_cek(&mut header, &public).unwrap();
        assert!(!wrapped.encrypted_key.is_empty());
        let cek = unwrap_cek(&header, &private, &wrapped.encrypted_key).unwrap();
        assert_eq!(cek, wrapped.cek);
    }

    #[test]
    fn test_pbes2_round_trip_and_header_params() {
        let password = Jwk::from_password("Thus from my lips, by yours, my sin is purged.");
        let mut header = Header::new(Algorithm::Pbes2Hs256A128Kw, Encryption::A128CbcHs256);
        let wrapped = wrap_cek(&mut header, &password).unwrap();
        assert!(header.pbes2_salt.is_some());
        assert_eq!(header.pbes2_count, Some(PBES2_DEFAULT_ITERATIONS));
        let cek = unwrap_cek(&header, &password, &wrapped.encrypted_key).unwrap();
        assert_eq!(cek, wrapped.cek);
    }

    #[test]
    fn test_pbes2_iteration_cap() {
        let password = Jwk::from_password("pw");
        let mut header = Header::new(Algorithm::Pbes2Hs256A128Kw, Encryption::A128Gcm);
        header.pbes2_salt = Some(vec![1; 16]);
        header.pbes2_count = Some(PBES2_MAX_ITERATIONS + 1);
        assert!(unwrap_cek(&header, &password, &[0; 24]).is_err());
    }

    #[test]
    fn test_dir_uses_key_verbatim() {
        let key = Jwk::generate_oct(32, None);
        let mut header = Header::new(Algorithm::Dir, Encryption::A128CbcHs256);
        let wrapped = wrap_cek(&mut header, &key).unwrap();
        assert!(wrapped.encrypted_key.is_empty());
        assert_eq!(wrapped.cek, key.symmetric_key().unwrap());

        // dir must refuse a non-empty encrypted key segment
        assert!(unwrap_cek(&header, &key, b"bogus").is_err());
    }

    #[test]
    fn test_wrong_kek_size_is_a_key_error() {
        let kek = Jwk::generate_oct(17, None);
        let mut header = Header::new(Algorithm::A128Kw, Encryption::A128Gcm);
        assert!(matches!(
            wrap_cek(&mut header, &kek),
            Err(EncryptError::Key(_))
        ));
    }
}
