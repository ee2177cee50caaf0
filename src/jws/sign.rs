//! Raw signature computation and verification over the JWS signing input.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use subtle::ConstantTimeEq;

use crate::{
    error::{KeyError, SignError, UnsupportedError, VerifyError},
    jwk::{native, Curve, Jwk},
    rand::Random,
};

use super::Algorithm;

/// Computes the signature (or MAC) of `message` with `key`.
///
/// `alg: none` yields an empty signature; the caller gates whether an
/// unsecured token may be produced at all.
pub(crate) fn sign(alg: Algorithm, key: &Jwk, message: &[u8]) -> Result<Vec<u8>, SignError> {
    check_key_type(alg, key)?;
    match alg {
        Algorithm::None => Ok(Vec::new()),
        Algorithm::Hs256 | Algorithm::Hs384 | Algorithm::Hs512 => hmac_sign(alg, key, message),
        Algorithm::Rs256 => {
            let key = native::rsa_private_key(key)?;
            let sig = rsa::pkcs1v15::SigningKey::<Sha256>::new(key).try_sign(message)?;
            Ok(sig.to_vec())
        }
        Algorithm::Rs384 => {
            let key = native::rsa_private_key(key)?;
            let sig = rsa::pkcs1v15::SigningKey::<Sha384>::new(key).try_sign(message)?;
            Ok(sig.to_vec())
        }
        Algorithm::Rs512 => {
            let key = native::rsa_private_key(key)?;
            let sig = rsa::pkcs1v15::SigningKey::<Sha512>::new(key).try_sign(message)?;
            Ok(sig.to_vec())
        }
        // PSS salt length equals the digest length, MGF1 over the same hash
        Algorithm::Ps256 => {
            let key = native::rsa_private_key(key)?;
            let sig = rsa::pss::BlindedSigningKey::<Sha256>::new(key)
                .try_sign_with_rng(&mut Random, message)?;
            Ok(sig.to_vec())
        }
        Algorithm::Ps384 => {
            let key = native::rsa_private_key(key)?;
            let sig = rsa::pss::BlindedSigningKey::<Sha384>::new(key)
                .try_sign_with_rng(&mut Random, message)?;
            Ok(sig.to_vec())
        }
        Algorithm::Ps512 => {
            let key = native::rsa_private_key(key)?;
            let sig = rsa::pss::BlindedSigningKey::<Sha512>::new(key)
                .try_sign_with_rng(&mut Random, message)?;
            Ok(sig.to_vec())
        }
        // ECDSA signatures are the fixed-size R || S concatenation
        Algorithm::Es256 => {
            let key = p256::ecdsa::SigningKey::from_slice(&native::ec_private_scalar(
                key,
                Curve::P256,
            )?)
            .map_err(to_key_error)?;
            let sig: p256::ecdsa::Signature = key.try_sign(message)?;
            Ok(sig.to_bytes().to_vec())
        }
        Algorithm::Es384 => {
            let key = p384::ecdsa::SigningKey::from_slice(&native::ec_private_scalar(
                key,
                Curve::P384,
            )?)
            .map_err(to_key_error)?;
            let sig: p384::ecdsa::Signature = key.try_sign(message)?;
            Ok(sig.to_bytes().to_vec())
        }
        Algorithm::Es512 => {
            let key = p521::ecdsa::SigningKey::from_slice(&native::ec_private_scalar(
                key,
                Curve::P521,
            )?)
            .map_err(to_key_error)?;
            let sig: p521::ecdsa::Signature = key.try_sign(message)?;
            Ok(sig.to_bytes().to_vec())
        }
        Algorithm::Es256k => {
            let key = k256::ecdsa::SigningKey::from_slice(&native::ec_private_scalar(
                key,
                Curve::Secp256k1,
            )?)
            .map_err(to_key_error)?;
            let sig: k256::ecdsa::Signature = key.try_sign(message)?;
            Ok(sig.to_bytes().to_vec())
        }
        Algorithm::EdDsa => match key.supported_curve()? {
            Curve::Ed25519 => {
                let key = native::ed25519_signing_key(key)?;
                let sig: ed25519_dalek::Signature = key.try_sign(message)?;
                Ok(sig.to_bytes().to_vec())
            }
            crv => Err(UnsupportedError(
                format!("EdDSA over {} is not supported", crv.as_str()).into(),
            )
            .into()),
        },
    }
}

/// Verifies `signature` over `message`. MAC comparison is constant-time;
/// an `alg: none` token never verifies.
pub(crate) fn verify(
    alg: Algorithm,
    key: &Jwk,
    message: &[u8],
    signature: &[u8],
) -> Result<(), VerifyError> {
    check_key_type(alg, key).map_err(|e| match e {
        SignError::Key(e) => VerifyError::Key(e),
        SignError::Unsupported(e) => VerifyError::Unsupported(e),
        _ => VerifyError::Invalid,
    })?;
    match alg {
        Algorithm::None => Err(VerifyError::Invalid),
        Algorithm::Hs256 | Algorithm::Hs384 | Algorithm::Hs512 => {
            hmac_verify(alg, key, message, signature)
        }
        Algorithm::Rs256 => {
            let key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(native::rsa_public_key(key)?);
            let sig = rsa::pkcs1v15::Signature::try_from(signature)
                .map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Rs384 => {
            let key = rsa::pkcs1v15::VerifyingKey::<Sha384>::new(native::rsa_public_key(key)?);
            let sig = rsa::pkcs1v15::Signature::try_from(signature)
                .map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Rs512 => {
            let key = rsa::pkcs1v15::VerifyingKey::<Sha512>::new(native::rsa_public_key(key)?);
            let sig = rsa::pkcs1v15::Signature::try_from(signature)
                .map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Ps256 => {
            let key = rsa::pss::VerifyingKey::<Sha256>::new(native::rsa_public_key(key)?);
            let sig =
                rsa::pss::Signature::try_from(signature).map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Ps384 => {
            let key = rsa::pss::VerifyingKey::<Sha384>::new(native::rsa_public_key(key)?);
            let sig =
                rsa::pss::Signature::try_from(signature).map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Ps512 => {
            let key = rsa::pss::VerifyingKey::<Sha512>::new(native::rsa_public_key(key)?);
            let sig =
                rsa::pss::Signature::try_from(signature).map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Es256 => {
            let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(&native::ec_public_sec1(
                key,
                Curve::P256,
            )?)
            .map_err(to_key_error)?;
            let sig = p256::ecdsa::Signature::from_slice(signature)
                .map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Es384 => {
            let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(&native::ec_public_sec1(
                key,
                Curve::P384,
            )?)
            .map_err(to_key_error)?;
            let sig = p384::ecdsa::Signature::from_slice(signature)
                .map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Es512 => {
            let key = p521::ecdsa::VerifyingKey::from_sec1_bytes(&native::ec_public_sec1(
                key,
                Curve::P521,
            )?)
            .map_err(to_key_error)?;
            let sig = p521::ecdsa::Signature::from_slice(signature)
                .map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::Es256k => {
            let key = k256::ecdsa::VerifyingKey::from_sec1_bytes(&native::ec_public_sec1(
                key,
                Curve::Secp256k1,
            )?)
            .map_err(to_key_error)?;
            let sig = k256::ecdsa::Signature::from_slice(signature)
                .map_err(|_| VerifyError::Invalid)?;
            key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
        }
        Algorithm::EdDsa => match key.supported_curve()? {
            Curve::Ed25519 => {
                let key = native::ed25519_verifying_key(key)?;
                let sig = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|_| VerifyError::Invalid)?;
                key.verify(message, &sig).map_err(|_| VerifyError::Invalid)
            }
            crv => Err(UnsupportedError(
                format!("EdDSA over {} is not supported", crv.as_str()).into(),
            )
            .into()),
        },
    }
}

fn check_key_type(alg: Algorithm, key: &Jwk) -> Result<(), SignError> {
    let Some(expected) = alg.key_type() else {
        return Ok(());
    };
    match key.key_type {
        Some(kty) if kty == expected => Ok(()),
        Some(kty) => Err(KeyError(format!(
            "algorithm {alg} requires a {expected} key, got {kty}"
        ))
        .into()),
        None => Err(KeyError::from("missing required member \"kty\"").into()),
    }
}

fn to_key_error(e: signature::Error) -> KeyError {
    KeyError(e.to_string())
}

fn hmac_sign(alg: Algorithm, key: &Jwk, message: &[u8]) -> Result<Vec<u8>, SignError> {
    let k = key
        .symmetric_key()
        .ok_or_else(|| KeyError::from("oct key is missing \"k\""))?;
    let tag = match alg {
        Algorithm::Hs256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(k).map_err(KeyError::from)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Hs384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(k).map_err(KeyError::from)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Hs512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(k).map_err(KeyError::from)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        _ => unreachable!("not an HMAC algorithm: {alg}"),
    };
    Ok(tag)
}

fn hmac_verify(
    alg: Algorithm,
    key: &Jwk,
    message: &[u8],
    signature: &[u8],
) -> Result<(), VerifyError> {
    let expected = hmac_sign(alg, key, message).map_err(|e| match e {
        SignError::Key(e) => VerifyError::Key(e),
        _ => VerifyError::Invalid,
    })?;
    // the comparison must not leak how long a matching prefix the
    // presented MAC has; mismatched lengths compare unequal
    if expected.ct_eq(signature).unwrap_u8() == 1 {
        Ok(())
    } else {
        Err(VerifyError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::KeyType;

    #[test]
    fn test_hmac_round_trip() {
        let key = Jwk::from_symmetric(&[0x0b; 32]);
        let sig = sign(Algorithm::Hs256, &key, b"input").unwrap();
        assert_eq!(sig.len(), 32);
        verify(Algorithm::Hs256, &key, b"input", &sig).unwrap();
        assert!(verify(Algorithm::Hs256, &key, b"other", &sig).is_err());
    }

    #[test]
    fn test_ecdsa_round_trip_and_fixed_size() {
        let (private, public) = Jwk::generate(KeyType::Ec, 256, None).unwrap();
        let sig = sign(Algorithm::Es256, &private, b"input").unwrap();
        assert_eq!(sig.len(), 64);
        verify(Algorithm::Es256, &public, b"input", &sig).unwrap();
    }

    #[test]
    fn test_eddsa_round_trip() {
        let (private, public) = Jwk::generate_okp(Curve::Ed25519, None).unwrap();
        let sig = sign(Algorithm::EdDsa, &private, b"input").unwrap();
        assert_eq!(sig.len(), 64);
        verify(Algorithm::EdDsa, &public, b"input", &sig).unwrap();
        let mut tampered = sig.clone();
        tampered[0] ^= 1;
        assert!(verify(Algorithm::EdDsa, &public, b"input", &tampered).is_err());
    }

    #[test]
    fn test_wrong_key_family_is_a_key_error() {
        let key = Jwk::from_symmetric(&[1; 32]);
        assert!(matches!(
            sign(Algorithm::Es256, &key, b"input"),
            Err(SignError::Key(_))
        ));
    }

    #[test]
    fn test_none_never_verifies() {
        let key = Jwk::from_symmetric(&[1; 32]);
        assert_eq!(sign(Algorithm::None, &key, b"input").unwrap(), Vec::<u8>::new());
        assert!(verify(Algorithm::None, &key, b"input", &[]).is_err());
    }
}
