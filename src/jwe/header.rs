use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    b64,
    error::{DecodeError, UnsupportedError},
    jwk::Jwk,
    jwt::TokenType,
};

use super::{Algorithm, Encryption, Zip};

/// A JWE JOSE header: protected, shared unprotected, or per-recipient.
///
/// <https://www.rfc-editor.org/rfc/rfc7516#section-4>
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// The key-management algorithm used on the content-encryption key.
    #[serde(rename = "alg", skip_serializing_if = "Option::is_none", default)]
    pub algorithm: Option<Algorithm>,

    /// The content-encryption algorithm applied to the plaintext.
    #[serde(rename = "enc", skip_serializing_if = "Option::is_none", default)]
    pub encryption: Option<Encryption>,

    /// `"zip": "DEF"` applies DEFLATE to the plaintext before encryption.
    #[serde(rename = "zip", skip_serializing_if = "Option::is_none", default)]
    pub compression: Option<Zip>,

    #[serde(rename = "kid", skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    #[serde(rename = "typ", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,

    /// Media type of the plaintext. A nested JWT sets this to `"JWT"`.
    #[serde(rename = "cty", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Ephemeral public key of an ECDH-ES exchange.
    #[serde(rename = "epk", skip_serializing_if = "Option::is_none")]
    pub ephemeral_key: Option<Jwk>,

    /// PartyUInfo for the Concat KDF.
    #[serde(
        rename = "apu",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub agreement_party_u_info: Option<Vec<u8>>,

    /// PartyVInfo for the Concat KDF.
    #[serde(
        rename = "apv",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub agreement_party_v_info: Option<Vec<u8>>,

    /// PBES2 salt input. Mandatory for the PBES2 algorithms.
    #[serde(
        rename = "p2s",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub pbes2_salt: Option<Vec<u8>>,

    /// PBES2 iteration count. Mandatory for the PBES2 algorithms.
    #[serde(rename = "p2c", skip_serializing_if = "Option::is_none")]
    pub pbes2_count: Option<u32>,

    /// Initialization vector of an AES-GCM key-wrap.
    #[serde(
        rename = "iv",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub initialization_vector: Option<Vec<u8>>,

    /// Authentication tag of an AES-GCM key-wrap.
    #[serde(
        rename = "tag",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub authentication_tag: Option<Vec<u8>>,

    #[serde(rename = "jku", skip_serializing_if = "Option::is_none")]
    pub jwk_set_url: Option<url::Url>,

    #[serde(rename = "jwk", skip_serializing_if = "Option::is_none")]
    pub jwk: Option<Jwk>,

    #[serde(rename = "x5u", skip_serializing_if = "Option::is_none")]
    pub x509_url: Option<url::Url>,

    #[serde(
        rename = "x5c",
        with = "b64::optional_seq_standard",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub x509_cert_chain: Option<Vec<Vec<u8>>>,

    #[serde(
        rename = "x5t",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub x509_cert_sha1_thumbprint: Option<Vec<u8>>,

    #[serde(
        rename = "x5t#S256",
        with = "b64::optional_url_safe",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub x509_cert_sha256_thumbprint: Option<Vec<u8>>,

    #[serde(rename = "crit", skip_serializing_if = "Option::is_none")]
    pub critical: Option<Vec<String>>,

    #[serde(flatten, default)]
    pub additional_fields: serde_json::Map<String, Value>,
}

impl Header {
    pub fn new(algorithm: Algorithm, encryption: Encryption) -> Self {
        Self {
            algorithm: Some(algorithm),
            encryption: Some(encryption),
            ..Default::default()
        }
    }

    pub(crate) fn check_critical(&self) -> Result<(), DecodeError> {
        match &self.critical {
            None => Ok(()),
            Some(crit) if crit.is_empty() => {
                Err(DecodeError::from("\"crit\" must not be empty"))
            }
            Some(crit) => Err(UnsupportedError(
                format!("unrecognized critical header member {:?}", crit[0]).into(),
            )
            .into()),
        }
    }

    /// Union of this header with a less-protected one; members of `self`
    /// win.
    pub(crate) fn merged(&self, other: Option<&Header>) -> Header {
        let Some(other) = other else {
            return self.clone();
        };
        let mut merged = self.clone();
        merged.algorithm = merged.algorithm.or(other.algorithm);
        merged.encryption = merged.encryption.or(other.encryption);
        merged.compression = merged.compression.or_else(|| other.compression.clone());
        merged.key_id = merged.key_id.or_else(|| other.key_id.clone());
        merged.token_type = merged.token_type.or_else(|| other.token_type.clone());
        merged.content_type = merged.content_type.or_else(|| other.content_type.clone());
        merged.ephemeral_key = merged.ephemeral_key.or_else(|| other.ephemeral_key.clone());
        merged.agreement_party_u_info = merged
            .agreement_party_u_info
            .or_else(|| other.agreement_party_u_info.clone());
        merged.agreement_party_v_info = merged
            .agreement_party_v_info
            .or_else(|| other.agreement_party_v_info.clone());
        merged.pbes2_salt = merged.pbes2_salt.or_else(|| other.pbes2_salt.clone());
        merged.pbes2_count = merged.pbes2_count.or(other.pbes2_count);
        merged.initialization_vector = merged
            .initialization_vector
            .or_else(|| other.initialization_vector.clone());
        merged.authentication_tag = merged
            .authentication_tag
            .or_else(|| other.authentication_tag.clone());
        merged.jwk_set_url = merged.jwk_set_url.or_else(|| other.jwk_set_url.clone());
        merged.jwk = merged.jwk.or_else(|| other.jwk.clone());
        merged.x509_url = merged.x509_url.or_else(|| other.x509_url.clone());
        merged.x509_cert_chain = merged
            .x509_cert_chain
            .or_else(|| other.x509_cert_chain.clone());
        merged.x509_cert_sha1_thumbprint = merged
            .x509_cert_sha1_thumbprint
            .or_else(|| other.x509_cert_sha1_thumbprint.clone());
        merged.x509_cert_sha256_thumbprint = merged
            .x509_cert_sha256_thumbprint
            .or_else(|| other.x509_cert_sha256_thumbprint.clone());
        merged.critical = merged.critical.or_else(|| other.critical.clone());
        for (member, value) in &other.additional_fields {
            merged
                .additional_fields
                .entry(member.clone())
                .or_insert_with(|| value.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_wire_names() {
        let header = Header::new(Algorithm::Dir, Encryption::A128CbcHs256);
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["alg"], "dir");
        assert_eq!(json["enc"], "A128CBC-HS256");
    }

    #[test]
    fn test_merge_precedence() {
        let mut protected = Header::new(Algorithm::A128Kw, Encryption::A128Gcm);
        protected.key_id = Some("p".to_string());
        let mut recipient = Header::default();
        recipient.key_id = Some("r".to_string());
        recipient.pbes2_count = Some(1000);
        let merged = protected.merged(Some(&recipient));
        assert_eq!(merged.key_id.as_deref(), Some("p"));
        assert_eq!(merged.pbes2_count, Some(1000));
    }
}
