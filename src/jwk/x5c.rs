//! X.509 certificate handling for the `x5c` / `x5u` / `x5t` members.

use const_oid::db::{rfc5912, rfc8410};
use der::{Decode, Encode};
use digest::Digest;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use signature::Verifier;
use x509_cert::Certificate;

use crate::{
    error::{CertificateError, KeyError, UnsupportedError, VerificationError},
    fetch::{fetch_remote, FetchFlags, RemoteFetch},
};

use super::{pem, Curve, Jwk};

/// Builds a JWK from a DER certificate: the SPKI becomes the key material,
/// the certificate becomes `x5c[0]`, and both thumbprints are computed.
pub(super) fn jwk_from_certificate_der(der: &[u8]) -> Result<Jwk, KeyError> {
    let cert = Certificate::from_der(der)?;
    let spki = cert.tbs_certificate.subject_public_key_info.to_der()?;
    let mut jwk = pem::from_spki_der(&spki)?;
    jwk.x509_cert_chain = Some(vec![der.to_vec()]);
    jwk.x509_cert_sha1_thumbprint = Some(Sha1::digest(der).to_vec());
    jwk.x509_cert_sha256_thumbprint = Some(Sha256::digest(der).to_vec());
    Ok(jwk)
}

/// Accepts either a PEM chain or a single DER certificate, as fetched from
/// an `x5u` URL.
pub(super) fn jwk_from_certificate_pem_or_der(bytes: &[u8]) -> Result<Jwk, KeyError> {
    if bytes.starts_with(b"-----BEGIN") {
        let chain = Certificate::load_pem_chain(bytes).map_err(|e| KeyError(e.to_string()))?;
        let ders = chain
            .iter()
            .map(|cert| cert.to_der())
            .collect::<Result<Vec<_>, _>>()?;
        let head = ders
            .first()
            .ok_or_else(|| KeyError::from("fetched document contains no certificate"))?;
        let mut jwk = jwk_from_certificate_der(head)?;
        jwk.x509_cert_chain = Some(ders);
        Ok(jwk)
    } else {
        jwk_from_certificate_der(bytes)
    }
}

/// Whether `der`'s subject public key equals the JWK's key material.
pub(super) fn certificate_matches_key(jwk: &Jwk, der: &[u8]) -> Result<bool, KeyError> {
    let cert = Certificate::from_der(der)?;
    let cert_spki = cert.tbs_certificate.subject_public_key_info.to_der()?;
    let own_spki = jwk.to_der(false)?;
    Ok(cert_spki == own_spki)
}

/// Walks the chain per RFC 7515 §4.1.6: every certificate signed by its
/// successor; the terminal certificate self-signed or anchored in `trust`.
/// With an `x5u` present and fetching permitted, the fetched chain stands
/// in for a missing `x5c`.
pub(super) fn validate_chain(
    jwk: &Jwk,
    trust: &[Vec<u8>],
    fetcher: &dyn RemoteFetch,
    flags: FetchFlags,
) -> Result<(), CertificateError> {
    let ders: Vec<Vec<u8>> = match &jwk.x509_cert_chain {
        Some(chain) if !chain.is_empty() => chain.clone(),
        _ => match &jwk.x509_url {
            Some(url) => {
                let doc = fetch_remote(fetcher, url, flags)?;
                let remote = jwk_from_certificate_pem_or_der(&doc.bytes)?;
                remote.x509_cert_chain.unwrap_or_default()
            }
            None => {
                return Err(UnsupportedError::from("key carries no certificate chain").into())
            }
        },
    };
    let certs = ders
        .iter()
        .map(|der| Certificate::from_der(der))
        .collect::<Result<Vec<_>, _>>()?;
    for pair in certs.windows(2) {
        verify_signed_by(&pair[0], &pair[1])?;
    }
    let last = certs.last().ok_or(CertificateError::Untrusted)?;
    if last.tbs_certificate.issuer == last.tbs_certificate.subject {
        verify_signed_by(last, last)?;
        return Ok(());
    }
    let last_der = ders.last().expect("chain is non-empty");
    for anchor_der in trust {
        if anchor_der == last_der {
            return Ok(());
        }
        let anchor = Certificate::from_der(anchor_der)?;
        if anchor.tbs_certificate.subject == last.tbs_certificate.issuer
            && verify_signed_by(last, &anchor).is_ok()
        {
            return Ok(());
        }
    }
    Err(CertificateError::Untrusted)
}

/// Verifies that `cert` is signed by `signer`'s subject public key.
fn verify_signed_by(cert: &Certificate, signer: &Certificate) -> Result<(), CertificateError> {
    let message = cert.tbs_certificate.to_der()?;
    let sig = cert
        .signature
        .as_bytes()
        .ok_or(CertificateError::Verification)?;
    let spki = signer.tbs_certificate.subject_public_key_info.to_der()?;
    let oid = cert.signature_algorithm.oid;

    if oid == rfc5912::SHA_256_WITH_RSA_ENCRYPTION {
        return verify_rsa::<Sha256>(&spki, &message, sig);
    }
    if oid == rfc5912::SHA_384_WITH_RSA_ENCRYPTION {
        return verify_rsa::<Sha384>(&spki, &message, sig);
    }
    if oid == rfc5912::SHA_512_WITH_RSA_ENCRYPTION {
        return verify_rsa::<Sha512>(&spki, &message, sig);
    }
    if oid == rfc5912::ECDSA_WITH_SHA_256
        || oid == rfc5912::ECDSA_WITH_SHA_384
        || oid == rfc5912::ECDSA_WITH_SHA_512
    {
        return verify_ecdsa(&spki, &message, sig);
    }
    if oid == rfc8410::ID_ED_25519 {
        let signer_key = pem::from_spki_der(&spki)?;
        let key = signer_key.to_ed25519_verifying_key()?;
        let sig = ed25519_dalek::Signature::from_slice(sig).map_err(|_| VerificationError)?;
        return key
            .verify(&message, &sig)
            .map_err(|_| CertificateError::Verification);
    }
    Err(UnsupportedError(format!("unrecognized certificate signature algorithm {oid}").into())
        .into())
}

fn verify_rsa<D>(spki: &[u8], message: &[u8], sig: &[u8]) -> Result<(), CertificateError>
where
    D: Digest + const_oid::AssociatedOid,
{
    use rsa::pkcs8::DecodePublicKey;
    let key = rsa::RsaPublicKey::from_public_key_der(spki).map_err(KeyError::from)?;
    let key = rsa::pkcs1v15::VerifyingKey::<D>::new(key);
    let sig = rsa::pkcs1v15::Signature::try_from(sig).map_err(|_| VerificationError)?;
    key.verify(message, &sig)
        .map_err(|_| CertificateError::Verification)
}

fn verify_ecdsa(spki: &[u8], message: &[u8], sig: &[u8]) -> Result<(), CertificateError> {
    use rsa::pkcs8::DecodePublicKey;
    let signer_key = pem::from_spki_der(spki)?;
    let crv = signer_key
        .curve
        .ok_or_else(|| UnsupportedError::from("certificate key carries no curve"))?;
    match crv {
        Curve::P256 => {
            let key =
                p256::ecdsa::VerifyingKey::from_public_key_der(spki).map_err(KeyError::from)?;
            let sig = p256::ecdsa::Signature::from_der(sig).map_err(|_| VerificationError)?;
            key.verify(message, &sig)
                .map_err(|_| CertificateError::Verification)
        }
        Curve::P384 => {
            let key =
                p384::ecdsa::VerifyingKey::from_public_key_der(spki).map_err(KeyError::from)?;
            let sig = p384::ecdsa::Signature::from_der(sig).map_err(|_| VerificationError)?;
            key.verify(message, &sig)
                .map_err(|_| CertificateError::Verification)
        }
        Curve::Secp256k1 => {
            let key =
                k256::ecdsa::VerifyingKey::from_public_key_der(spki).map_err(KeyError::from)?;
            let sig = k256::ecdsa::Signature::from_der(sig).map_err(|_| VerificationError)?;
            key.verify(message, &sig)
                .map_err(|_| CertificateError::Verification)
        }
        crv => Err(UnsupportedError(
            format!("ECDSA certificates on {} are not supported", crv.as_str()).into(),
        )
        .into()),
    }
}

impl Jwk {
    /// The SHA-1 thumbprint of `x5c[0]`, computing it when the `x5t`
    /// member is absent.
    pub fn x5t(&self) -> Option<Vec<u8>> {
        if let Some(x5t) = &self.x509_cert_sha1_thumbprint {
            return Some(x5t.clone());
        }
        let head = self.x509_cert_chain.as_ref()?.first()?;
        Some(Sha1::digest(head).to_vec())
    }

    /// The SHA-256 thumbprint of `x5c[0]`, computing it when the
    /// `x5t#S256` member is absent.
    pub fn x5t_s256(&self) -> Option<Vec<u8>> {
        if let Some(x5t) = &self.x509_cert_sha256_thumbprint {
            return Some(x5t.clone());
        }
        let head = self.x509_cert_chain.as_ref()?.first()?;
        Some(Sha256::digest(head).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::NoFetch;

    #[test]
    fn test_chain_requires_material() {
        let jwk = Jwk::from_symmetric(b"secret");
        let err = validate_chain(&jwk, &[], &NoFetch, FetchFlags::NONE).unwrap_err();
        assert!(matches!(err, CertificateError::Unsupported(_)));
    }

    #[test]
    fn test_x5t_computed_from_chain() {
        let der = vec![0x30, 0x03, 0x02, 0x01, 0x01];
        let jwk = Jwk {
            x509_cert_chain: Some(vec![der.clone()]),
            ..Default::default()
        };
        assert_eq!(jwk.x5t().unwrap(), Sha1::digest(&der).to_vec());
        assert_eq!(jwk.x5t_s256().unwrap(), Sha256::digest(&der).to_vec());
    }
}
