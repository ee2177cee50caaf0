//! ECDH-ES key agreement: ephemeral-static Diffie-Hellman followed by the
//! Concat KDF of NIST SP 800-56A with SHA-256, per RFC 7518 §4.6.

use sha2::{Digest, Sha256};

use crate::{
    error::{KeyError, UnsupportedError},
    jwk::{native, Curve, Jwk, KeyType},
};

/// Derives the shared secret Z between `private` (an ephemeral or static
/// private key) and `public` (the other party's public key). Both must
/// live on the same curve.
pub(crate) fn derive_z(private: &Jwk, public: &Jwk) -> Result<Vec<u8>, KeyError> {
    let crv = private.require_curve()?;
    if public.curve != Some(crv) {
        return Err(KeyError::from("key agreement requires both keys on one curve"));
    }
    match crv {
        Curve::P256 => {
            let secret = p256::SecretKey::from_slice(&native::ec_private_scalar(private, crv)?)?;
            let peer = p256::PublicKey::from_sec1_bytes(&native::ec_public_sec1(public, crv)?)?;
            let shared =
                p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
            Ok(shared.raw_secret_bytes().to_vec())
        }
        Curve::P384 => {
            let secret = p384::SecretKey::from_slice(&native::ec_private_scalar(private, crv)?)?;
            let peer = p384::PublicKey::from_sec1_bytes(&native::ec_public_sec1(public, crv)?)?;
            let shared =
                p384::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
            Ok(shared.raw_secret_bytes().to_vec())
        }
        Curve::P521 => {
            let secret = p521::SecretKey::from_slice(&native::ec_private_scalar(private, crv)?)?;
            let peer = p521::PublicKey::from_sec1_bytes(&native::ec_public_sec1(public, crv)?)?;
            let shared =
                p521::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
            Ok(shared.raw_secret_bytes().to_vec())
        }
        Curve::Secp256k1 => {
            let secret = k256::SecretKey::from_slice(&native::ec_private_scalar(private, crv)?)?;
            let peer = k256::PublicKey::from_sec1_bytes(&native::ec_public_sec1(public, crv)?)?;
            let shared =
                k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
            Ok(shared.raw_secret_bytes().to_vec())
        }
        Curve::X25519 => {
            let secret = native::x25519_secret(private)?;
            let peer = native::x25519_public(public)?;
            Ok(secret.diffie_hellman(&peer).as_bytes().to_vec())
        }
        crv => Err(KeyError(format!(
            "curve {} is not usable for key agreement",
            crv.as_str()
        ))),
    }
}

/// Generates an ephemeral key pair on the curve of `recipient`, returning
/// `(private, public)`.
pub(crate) fn ephemeral_pair(recipient: &Jwk) -> Result<(Jwk, Jwk), UnsupportedError> {
    let crv = recipient.supported_curve()?;
    let result = match recipient.key_type {
        Some(KeyType::Ec) => Jwk::generate_ec(crv, Some("")),
        Some(KeyType::Okp) => Jwk::generate_okp(crv, Some("")),
        _ => {
            return Err(UnsupportedError::from(
                "ECDH-ES requires an EC or OKP recipient key",
            ))
        }
    };
    let (mut private, mut public) =
        result.map_err(|e| UnsupportedError::from(e.to_string()))?;
    // an epk carries bare key material
    private.key_id = None;
    public.key_id = None;
    Ok((private, public))
}

/// The Concat KDF with SHA-256. `algorithm_id` is the `"enc"` name for
/// direct key agreement and the `"alg"` name when the derived key wraps
/// the CEK; `apu`/`apv` are the raw PartyUInfo/PartyVInfo values.
pub(crate) fn concat_kdf(
    z: &[u8],
    algorithm_id: &str,
    apu: &[u8],
    apv: &[u8],
    key_len: usize,
) -> Vec<u8> {
    let mut other_info = Vec::new();
    push_length_prefixed(&mut other_info, algorithm_id.as_bytes());
    push_length_prefixed(&mut other_info, apu);
    push_length_prefixed(&mut other_info, apv);
    other_info.extend_from_slice(&((key_len as u32) * 8).to_be_bytes());

    let mut derived = Vec::with_capacity(key_len);
    let mut round: u32 = 1;
    while derived.len() < key_len {
        let mut hasher = Sha256::new();
        hasher.update(round.to_be_bytes());
        hasher.update(z);
        hasher.update(&other_info);
        derived.extend_from_slice(&hasher.finalize());
        round += 1;
    }
    derived.truncate(key_len);
    derived
}

fn push_length_prefixed(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // RFC 7518 appendix C: ECDH-ES direct key agreement producing the
    // A128GCM content-encryption key
    #[test]
    fn test_rfc7518_appendix_c() {
        let alice = Jwk::from_value(&json!({
            "kty": "EC",
            "crv": "P-256",
            "x": "gI0GAILBdu7T53akrFmMyGcsF3n5dO7MmwNBHKW5SV0",
            "y": "SLW_xSffzlPWrHEVI30DHM_4egVwt3NQqeUD7nMFpps",
            "d": "0_NxaRPUMQoAJt50Gz8YiTr8gRTwyEaCumd-MToTmIo"
        }))
        .unwrap();
        let bob = Jwk::from_value(&json!({
            "kty": "EC",
            "crv": "P-256",
            "x": "weNJy2HscCSM6AEDTDg04biOvhFhyyWvOHQfeF_PxMQ",
            "y": "e8lnCO-AlStT-NJVX-crhB7QRYhiix03illJOVAOyck",
            "d": "VEmDZpDXXK8p8N0Cndsxs924q6nS1RXFASRl6BfUqdw"
        }))
        .unwrap();

        let z = derive_z(&alice, &bob.public_key().unwrap()).unwrap();
        assert_eq!(
            z,
            vec![
                158, 86, 217, 29, 129, 113, 53, 211, 114, 131, 66, 131, 191, 132, 38, 156, 251,
                49, 110, 163, 218, 128, 106, 72, 246, 218, 167, 121, 140, 254, 144, 196
            ]
        );

        let derived = concat_kdf(&z, "A128GCM", b"Alice", b"Bob", 16);
        assert_eq!(
            derived,
            vec![86, 170, 141, 234, 248, 35, 109, 32, 92, 34, 40, 205, 113, 167, 16, 26]
        );
    }

    #[test]
    fn test_x25519_agreement_is_symmetric() {
        let (a_priv, a_pub) = Jwk::generate_okp(Curve::X25519, None).unwrap();
        let (b_priv, b_pub) = Jwk::generate_okp(Curve::X25519, None).unwrap();
        let ab = derive_z(&a_priv, &b_pub).unwrap();
        let ba = derive_z(&b_priv, &a_pub).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 32);
    }

    #[test]
    fn test_curve_mismatch_is_refused() {
        let (a, _) = Jwk::generate_ec(Curve::P256, None).unwrap();
        let (_, b) = Jwk::generate_ec(Curve::P384, None).unwrap();
        assert!(derive_z(&a, &b).is_err());
    }
}
