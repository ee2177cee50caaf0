//! Conversions between JWK members and the native key types of the
//! underlying cryptography crates.

use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint, RsaPrivateKey, RsaPublicKey,
};

use crate::{error::KeyError, sensitive::Bytes};

use super::{Curve, Jwk, KeyType};

/// Left-pads (or validates) a big-endian integer to exactly `len` bytes.
/// Oversized values are accepted only when the excess is leading zeros.
pub(crate) fn fixed_len(bytes: &[u8], len: usize) -> Result<Vec<u8>, KeyError> {
    if bytes.len() == len {
        return Ok(bytes.to_vec());
    }
    if bytes.len() < len {
        let mut padded = vec![0u8; len - bytes.len()];
        padded.extend_from_slice(bytes);
        return Ok(padded);
    }
    let excess = bytes.len() - len;
    if bytes[..excess].iter().all(|b| *b == 0) {
        Ok(bytes[excess..].to_vec())
    } else {
        Err(KeyError(format!(
            "integer is {} bytes; expected at most {len}",
            bytes.len()
        )))
    }
}

pub(crate) fn rsa_public_key(jwk: &Jwk) -> Result<RsaPublicKey, KeyError> {
    let n = jwk
        .n
        .as_ref()
        .ok_or_else(|| KeyError::from("RSA key is missing \"n\""))?;
    let e = jwk
        .e
        .as_ref()
        .ok_or_else(|| KeyError::from("RSA key is missing \"e\""))?;
    Ok(RsaPublicKey::new(
        BigUint::from_bytes_be(n),
        BigUint::from_bytes_be(e),
    )?)
}

pub(crate) fn rsa_private_key(jwk: &Jwk) -> Result<RsaPrivateKey, KeyError> {
    let n = jwk
        .n
        .as_ref()
        .ok_or_else(|| KeyError::from("RSA key is missing \"n\""))?;
    let e = jwk
        .e
        .as_ref()
        .ok_or_else(|| KeyError::from("RSA key is missing \"e\""))?;
    let d = jwk
        .d
        .as_ref()
        .ok_or_else(|| KeyError::from("RSA key is missing \"d\""))?;
    let primes = match (&jwk.p, &jwk.q) {
        (Some(p), Some(q)) => vec![
            BigUint::from_bytes_be(p.as_slice()),
            BigUint::from_bytes_be(q.as_slice()),
        ],
        // the rsa crate recovers the factorization from (n, e, d)
        _ => Vec::new(),
    };
    let mut key = RsaPrivateKey::from_components(
        BigUint::from_bytes_be(n),
        BigUint::from_bytes_be(e),
        BigUint::from_bytes_be(d.as_slice()),
        primes,
    )?;
    key.precompute()?;
    Ok(key)
}

pub(crate) fn jwk_from_rsa_private(key: &RsaPrivateKey) -> Jwk {
    let primes = key.primes();
    let (p, q) = (&primes[0], &primes[1]);
    let one = BigUint::from(1u8);
    let two = BigUint::from(2u8);
    let dp = key.d() % (p - &one);
    let dq = key.d() % (q - &one);
    // p is prime, so the inverse of q mod p is q^(p-2) mod p
    let qi = q.modpow(&(p - &two), p);
    Jwk {
        key_type: Some(KeyType::Rsa),
        n: Some(key.n().to_bytes_be()),
        e: Some(key.e().to_bytes_be()),
        d: Some(Bytes::from(key.d().to_bytes_be())),
        p: Some(Bytes::from(p.to_bytes_be())),
        q: Some(Bytes::from(q.to_bytes_be())),
        dp: Some(Bytes::from(dp.to_bytes_be())),
        dq: Some(Bytes::from(dq.to_bytes_be())),
        qi: Some(Bytes::from(qi.to_bytes_be())),
        ..Default::default()
    }
}

pub(crate) fn jwk_from_rsa_public(key: &RsaPublicKey) -> Jwk {
    Jwk {
        key_type: Some(KeyType::Rsa),
        n: Some(key.n().to_bytes_be()),
        e: Some(key.e().to_bytes_be()),
        ..Default::default()
    }
}

/// The uncompressed SEC1 point (`0x04 || X || Y`) of an EC key.
pub(crate) fn ec_public_sec1(jwk: &Jwk, crv: Curve) -> Result<Vec<u8>, KeyError> {
    let x = jwk
        .x
        .as_ref()
        .ok_or_else(|| KeyError::from("EC key is missing \"x\""))?;
    let y = jwk
        .y
        .as_ref()
        .ok_or_else(|| KeyError::from("EC key is missing \"y\""))?;
    let len = crv.coordinate_len();
    let mut point = Vec::with_capacity(1 + 2 * len);
    point.push(0x04);
    point.extend_from_slice(&fixed_len(x, len)?);
    point.extend_from_slice(&fixed_len(y, len)?);
    Ok(point)
}

/// The private scalar of an EC key, padded to the curve's field size.
pub(crate) fn ec_private_scalar(jwk: &Jwk, crv: Curve) -> Result<Vec<u8>, KeyError> {
    let d = jwk
        .d
        .as_ref()
        .ok_or_else(|| KeyError::from("EC key is missing \"d\""))?;
    fixed_len(d.as_slice(), crv.coordinate_len())
}

/// The raw public key of an OKP key.
pub(crate) fn okp_public(jwk: &Jwk, crv: Curve) -> Result<Vec<u8>, KeyError> {
    let x = jwk
        .x
        .as_ref()
        .ok_or_else(|| KeyError::from("OKP key is missing \"x\""))?;
    if x.len() != crv.coordinate_len() {
        return Err(KeyError(format!(
            "{} public key must be {} bytes, got {}",
            crv.as_str(),
            crv.coordinate_len(),
            x.len()
        )));
    }
    Ok(x.clone())
}

/// The raw private key of an OKP key.
pub(crate) fn okp_private(jwk: &Jwk, crv: Curve) -> Result<Vec<u8>, KeyError> {
    let d = jwk
        .d
        .as_ref()
        .ok_or_else(|| KeyError::from("OKP key is missing \"d\""))?;
    if d.len() != crv.coordinate_len() {
        return Err(KeyError(format!(
            "{} private key must be {} bytes, got {}",
            crv.as_str(),
            crv.coordinate_len(),
            d.len()
        )));
    }
    Ok(d.as_vec())
}

pub(crate) fn ed25519_signing_key(jwk: &Jwk) -> Result<ed25519_dalek::SigningKey, KeyError> {
    let d = okp_private(jwk, Curve::Ed25519)?;
    let d: [u8; 32] = d.as_slice().try_into()?;
    Ok(ed25519_dalek::SigningKey::from_bytes(&d))
}

pub(crate) fn ed25519_verifying_key(jwk: &Jwk) -> Result<ed25519_dalek::VerifyingKey, KeyError> {
    let x = okp_public(jwk, Curve::Ed25519)?;
    let x: [u8; 32] = x.as_slice().try_into()?;
    Ok(ed25519_dalek::VerifyingKey::from_bytes(&x)?)
}

pub(crate) fn x25519_secret(jwk: &Jwk) -> Result<x25519_dalek::StaticSecret, KeyError> {
    let d = okp_private(jwk, Curve::X25519)?;
    let d: [u8; 32] = d.as_slice().try_into()?;
    Ok(x25519_dalek::StaticSecret::from(d))
}

pub(crate) fn x25519_public(jwk: &Jwk) -> Result<x25519_dalek::PublicKey, KeyError> {
    let x = okp_public(jwk, Curve::X25519)?;
    let x: [u8; 32] = x.as_slice().try_into()?;
    Ok(x25519_dalek::PublicKey::from(x))
}

/// Proves the public point lies on the declared curve and, when a private
/// half is present, that it corresponds to the public members.
pub(crate) fn validate_curve_material(jwk: &Jwk, crv: Curve) -> Result<(), KeyError> {
    match crv {
        Curve::P256 => {
            let point = ec_public_sec1(jwk, crv)?;
            let public = p256::PublicKey::from_sec1_bytes(&point)?;
            if jwk.d.is_some() {
                let secret = p256::SecretKey::from_slice(&ec_private_scalar(jwk, crv)?)?;
                if secret.public_key() != public {
                    return Err(KeyError::from("private scalar does not match public point"));
                }
            }
        }
        Curve::P384 => {
            let point = ec_public_sec1(jwk, crv)?;
            let public = p384::PublicKey::from_sec1_bytes(&point)?;
            if jwk.d.is_some() {
                let secret = p384::SecretKey::from_slice(&ec_private_scalar(jwk, crv)?)?;
                if secret.public_key() != public {
                    return Err(KeyError::from("private scalar does not match public point"));
                }
            }
        }
        Curve::P521 => {
            let point = ec_public_sec1(jwk, crv)?;
            let public = p521::PublicKey::from_sec1_bytes(&point)?;
            if jwk.d.is_some() {
                let secret = p521::SecretKey::from_slice(&ec_private_scalar(jwk, crv)?)?;
                if secret.public_key() != public {
                    return Err(KeyError::from("private scalar does not match public point"));
                }
            }
        }
        Curve::Secp256k1 => {
            let point = ec_public_sec1(jwk, crv)?;
            let public = k256::PublicKey::from_sec1_bytes(&point)?;
            if jwk.d.is_some() {
                let secret = k256::SecretKey::from_slice(&ec_private_scalar(jwk, crv)?)?;
                if secret.public_key() != public {
                    return Err(KeyError::from("private scalar does not match public point"));
                }
            }
        }
        Curve::Ed25519 => {
            let public = ed25519_verifying_key(jwk)?;
            if jwk.d.is_some() {
                let signing = ed25519_signing_key(jwk)?;
                if signing.verifying_key() != public {
                    return Err(KeyError::from("private key does not match public key"));
                }
            }
        }
        Curve::X25519 => {
            let public = x25519_public(jwk)?;
            if jwk.d.is_some() {
                let secret = x25519_secret(jwk)?;
                if x25519_dalek::PublicKey::from(&secret) != public {
                    return Err(KeyError::from("private key does not match public key"));
                }
            }
        }
        Curve::Ed448 | Curve::X448 => {
            return Err(KeyError(format!(
                "curve {} is not supported by this build",
                crv.as_str()
            )))
        }
    }
    Ok(())
}

impl Jwk {
    /// The native RSA public key.
    pub fn to_rsa_public_key(&self) -> Result<RsaPublicKey, KeyError> {
        rsa_public_key(self)
    }

    /// The native RSA private key, with CRT parameters precomputed.
    pub fn to_rsa_private_key(&self) -> Result<RsaPrivateKey, KeyError> {
        rsa_private_key(self)
    }

    pub fn from_rsa_private_key(key: &RsaPrivateKey) -> Self {
        jwk_from_rsa_private(key)
    }

    pub fn from_rsa_public_key(key: &RsaPublicKey) -> Self {
        jwk_from_rsa_public(key)
    }

    pub fn to_ed25519_signing_key(&self) -> Result<ed25519_dalek::SigningKey, KeyError> {
        ed25519_signing_key(self)
    }

    pub fn to_ed25519_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, KeyError> {
        ed25519_verifying_key(self)
    }

    /// The uncompressed SEC1 encoding of an EC public key.
    pub fn to_sec1_public_key(&self) -> Result<Vec<u8>, KeyError> {
        ec_public_sec1(self, self.require_curve()?)
    }
}

pub(crate) fn jwk_from_p256_secret(key: &p256::SecretKey) -> Jwk {
    let mut jwk = jwk_from_p256_public(&key.public_key());
    jwk.d = Some(Bytes::from(key.to_bytes().to_vec()));
    jwk
}

pub(crate) fn jwk_from_p256_public(key: &p256::PublicKey) -> Jwk {
    use p256::elliptic_curve::sec1::ToEncodedPoint;
    let point = key.to_encoded_point(false);
    Jwk {
        key_type: Some(KeyType::Ec),
        curve: Some(Curve::P256),
        x: point.x().map(|x| x.to_vec()),
        y: point.y().map(|y| y.to_vec()),
        ..Default::default()
    }
}

pub(crate) fn jwk_from_p384_secret(key: &p384::SecretKey) -> Jwk {
    let mut jwk = jwk_from_p384_public(&key.public_key());
    jwk.d = Some(Bytes::from(key.to_bytes().to_vec()));
    jwk
}

pub(crate) fn jwk_from_p384_public(key: &p384::PublicKey) -> Jwk {
    use p384::elliptic_curve::sec1::ToEncodedPoint;
    let point = key.to_encoded_point(false);
    Jwk {
        key_type: Some(KeyType::Ec),
        curve: Some(Curve::P384),
        x: point.x().map(|x| x.to_vec()),
        y: point.y().map(|y| y.to_vec()),
        ..Default::default()
    }
}

pub(crate) fn jwk_from_p521_secret(key: &p521::SecretKey) -> Jwk {
    let mut jwk = jwk_from_p521_public(&key.public_key());
    jwk.d = Some(Bytes::from(key.to_bytes().to_vec()));
    jwk
}

pub(crate) fn jwk_from_p521_public(key: &p521::PublicKey) -> Jwk {
    use p521::elliptic_curve::sec1::ToEncodedPoint;
    let point = key.to_encoded_point(false);
    Jwk {
        key_type: Some(KeyType::Ec),
        curve: Some(Curve::P521),
        x: point.x().map(|x| x.to_vec()),
        y: point.y().map(|y| y.to_vec()),
        ..Default::default()
    }
}

pub(crate) fn jwk_from_k256_secret(key: &k256::SecretKey) -> Jwk {
    let mut jwk = jwk_from_k256_public(&key.public_key());
    jwk.d = Some(Bytes::from(key.to_bytes().to_vec()));
    jwk
}

pub(crate) fn jwk_from_k256_public(key: &k256::PublicKey) -> Jwk {
    use k256::elliptic_curve::sec1::ToEncodedPoint;
    let point = key.to_encoded_point(false);
    Jwk {
        key_type: Some(KeyType::Ec),
        curve: Some(Curve::Secp256k1),
        x: point.x().map(|x| x.to_vec()),
        y: point.y().map(|y| y.to_vec()),
        ..Default::default()
    }
}

pub(crate) fn jwk_from_ed25519_signing(key: &ed25519_dalek::SigningKey) -> Jwk {
    let mut jwk = jwk_from_ed25519_verifying(&key.verifying_key());
    jwk.d = Some(Bytes::from(key.to_bytes().to_vec()));
    jwk
}

pub(crate) fn jwk_from_ed25519_verifying(key: &ed25519_dalek::VerifyingKey) -> Jwk {
    Jwk {
        key_type: Some(KeyType::Okp),
        curve: Some(Curve::Ed25519),
        x: Some(key.to_bytes().to_vec()),
        ..Default::default()
    }
}

pub(crate) fn jwk_from_x25519_secret(key: &x25519_dalek::StaticSecret) -> Jwk {
    let public = x25519_dalek::PublicKey::from(key);
    Jwk {
        key_type: Some(KeyType::Okp),
        curve: Some(Curve::X25519),
        x: Some(public.as_bytes().to_vec()),
        d: Some(Bytes::from(key.to_bytes().to_vec())),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_len() {
        assert_eq!(fixed_len(&[1, 2], 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(fixed_len(&[0, 0, 1, 2], 2).unwrap(), vec![1, 2]);
        assert_eq!(fixed_len(&[1, 2], 2).unwrap(), vec![1, 2]);
        assert!(fixed_len(&[1, 2, 3], 2).is_err());
    }

    #[test]
    fn test_ed25519_round_trip() {
        let signing = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
        let jwk = jwk_from_ed25519_signing(&signing);
        let restored = ed25519_signing_key(&jwk).unwrap();
        assert_eq!(restored.to_bytes(), signing.to_bytes());
        validate_curve_material(&jwk, Curve::Ed25519).unwrap();
    }

    #[test]
    fn test_p256_round_trip() {
        let secret = p256::SecretKey::from_slice(&[3u8; 32]).unwrap();
        let jwk = jwk_from_p256_secret(&secret);
        validate_curve_material(&jwk, Curve::P256).unwrap();
        let point = ec_public_sec1(&jwk, Curve::P256).unwrap();
        assert_eq!(point.len(), 65);
        assert_eq!(point[0], 0x04);
    }
}
