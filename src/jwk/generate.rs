use rsa::RsaPrivateKey;

use crate::{b64, error::KeyError, rand::Random, sensitive::Bytes};

use super::{native, Curve, Jwk, KeyType};

/// Smallest RSA modulus accepted for generation.
const RSA_MIN_BITS: usize = 2048;

impl Jwk {
    /// Generates a fresh key pair of the given family, returning
    /// `(private, public)`.
    ///
    /// For EC keys `bits` names the curve size (256, 384, or 521;
    /// secp256k1 is reached through [`Jwk::generate_ec`]). For OKP keys
    /// `bits = 256` selects Ed25519; X25519 is reached through
    /// [`Jwk::generate_okp`]. For `oct` the two halves are the same key.
    ///
    /// When `kid` is empty or absent, a random 128-bit identifier is
    /// assigned, base64url-encoded.
    pub fn generate(
        kty: KeyType,
        bits: usize,
        kid: Option<&str>,
    ) -> Result<(Jwk, Jwk), KeyError> {
        match kty {
            KeyType::Rsa => Self::generate_rsa(bits, kid),
            KeyType::Ec => {
                let curve = match bits {
                    256 => Curve::P256,
                    384 => Curve::P384,
                    521 => Curve::P521,
                    _ => {
                        return Err(KeyError(format!(
                            "no EC curve with a {bits}-bit field is available"
                        )))
                    }
                };
                Self::generate_ec(curve, kid)
            }
            KeyType::Okp => match bits {
                0 | 255 | 256 => Self::generate_okp(Curve::Ed25519, kid),
                _ => Err(KeyError(format!(
                    "no OKP curve with a {bits}-bit key is available"
                ))),
            },
            KeyType::Oct => {
                if bits == 0 || bits % 8 != 0 {
                    return Err(KeyError(format!(
                        "symmetric key size must be a positive multiple of 8 bits, got {bits}"
                    )));
                }
                let mut jwk = Jwk::from_symmetric(&Random::vec(bits / 8));
                jwk.key_id = Some(key_id(kid));
                Ok((jwk.clone(), jwk))
            }
        }
    }

    pub fn generate_rsa(bits: usize, kid: Option<&str>) -> Result<(Jwk, Jwk), KeyError> {
        if bits < RSA_MIN_BITS {
            return Err(KeyError(format!(
                "RSA modulus must be at least {RSA_MIN_BITS} bits, got {bits}"
            )));
        }
        let key = RsaPrivateKey::new(&mut Random, bits)?;
        let mut private = native::jwk_from_rsa_private(&key);
        private.key_id = Some(key_id(kid));
        let public = private.public_key()?;
        Ok((private, public))
    }

    pub fn generate_ec(curve: Curve, kid: Option<&str>) -> Result<(Jwk, Jwk), KeyError> {
        let mut private = match curve {
            Curve::P256 => native::jwk_from_p256_secret(&p256::SecretKey::random(&mut Random)),
            Curve::P384 => native::jwk_from_p384_secret(&p384::SecretKey::random(&mut Random)),
            Curve::P521 => native::jwk_from_p521_secret(&p521::SecretKey::random(&mut Random)),
            Curve::Secp256k1 => native::jwk_from_k256_secret(&k256::SecretKey::random(&mut Random)),
            _ => {
                return Err(KeyError(format!(
                    "{} is not an EC curve",
                    curve.as_str()
                )))
            }
        };
        private.key_id = Some(key_id(kid));
        let public = private.public_key()?;
        Ok((private, public))
    }

    pub fn generate_okp(curve: Curve, kid: Option<&str>) -> Result<(Jwk, Jwk), KeyError> {
        let mut private = match curve {
            Curve::Ed25519 => {
                native::jwk_from_ed25519_signing(&ed25519_dalek::SigningKey::generate(&mut Random))
            }
            Curve::X25519 => native::jwk_from_x25519_secret(
                &x25519_dalek::StaticSecret::random_from_rng(Random),
            ),
            Curve::Ed448 | Curve::X448 => {
                return Err(KeyError(format!(
                    "curve {} is not supported by this build",
                    curve.as_str()
                )))
            }
            _ => {
                return Err(KeyError(format!(
                    "{} is not an OKP curve",
                    curve.as_str()
                )))
            }
        };
        private.key_id = Some(key_id(kid));
        let public = private.public_key()?;
        Ok((private, public))
    }

    /// Generates a fresh symmetric key of `len` bytes.
    pub fn generate_oct(len: usize, kid: Option<&str>) -> Jwk {
        let mut jwk = Jwk {
            key_type: Some(KeyType::Oct),
            k: Some(Bytes::from(Random::vec(len))),
            ..Default::default()
        };
        jwk.key_id = Some(key_id(kid));
        jwk
    }
}

fn key_id(kid: Option<&str>) -> String {
    match kid {
        Some(kid) if !kid.is_empty() => kid.to_string(),
        _ => b64::encode(Random::vec(16)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::KeyClass;

    #[test]
    fn test_generate_ec_pair() {
        let (private, public) = Jwk::generate(KeyType::Ec, 256, None).unwrap();
        let (class, bits) = private.classify();
        assert!(class.is_private());
        assert_eq!(bits, 256);
        assert!(!public.classify().0.is_private());
        private.validate().unwrap();
        public.validate().unwrap();
        // a random kid was assigned and is shared by both halves
        let kid = private.key_id.as_deref().unwrap();
        assert!(!kid.is_empty());
        assert_eq!(public.key_id.as_deref(), Some(kid));
    }

    #[test]
    fn test_generate_okp_pair() {
        let (private, _) = Jwk::generate_okp(Curve::Ed25519, Some("ed")).unwrap();
        assert_eq!(private.curve, Some(Curve::Ed25519));
        private.validate().unwrap();

        let (private, public) = Jwk::generate_okp(Curve::X25519, None).unwrap();
        let (class, _) = private.classify();
        assert!(class.contains(KeyClass::ECDH));
        public.validate().unwrap();
    }

    #[test]
    fn test_generate_rsa_rejects_small_moduli() {
        assert!(Jwk::generate(KeyType::Rsa, 1024, None).is_err());
    }

    #[test]
    fn test_generate_oct() {
        let jwk = Jwk::generate_oct(32, Some("secret-1"));
        assert_eq!(jwk.symmetric_key().unwrap().len(), 32);
        assert_eq!(jwk.key_id.as_deref(), Some("secret-1"));
    }

    #[test]
    fn test_generate_unsupported_okp_curve() {
        assert!(Jwk::generate_okp(Curve::Ed448, None).is_err());
    }
}
