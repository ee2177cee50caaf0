use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    b64,
    error::{DecodeError, UnsupportedError},
    jwk::Jwk,
    jwt::TokenType,
};

use super::Algorithm;

/// A JWS JOSE header: the protected header of a signature, or the
/// unprotected header of a flattened/general serialization.
///
/// <https://www.rfc-editor.org/rfc/rfc7515#section-4>
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Identifies the cryptographic algorithm used to secure the JWS.
    #[serde(rename = "alg", skip_serializing_if = "Option::is_none", default)]
    pub algorithm: Option<Algorithm>,

    #[serde(rename = "kid", skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// Declares the media type of the complete JWS, typically `"JWT"`.
    #[serde(rename = "typ", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,

    /// Declares the media type of the secured content. A nested JWT sets
    /// this to `"JWT"`.
    #[serde(rename = "cty", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// URL of a JWK Set holding the key that signed this token. Only
    /// honored when parsing was given the matching flag.
    #[serde(rename = "jku", skip_serializing_if = "Option::is_none")]
    pub jwk_set_url: Option<url::Url>,

    /// The public key that signed this token. Only honored when parsing
    /// was given the matching flag.
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

    /// Extension members that the recipient MUST understand. This
    /// implementation defines no extensions, so any listed member is
    /// unsupported.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7515#section-4.1.11>
    #[serde(rename = "crit", skip_serializing_if = "Option::is_none")]
    pub critical: Option<Vec<String>>,

    #[serde(flatten, default)]
    pub additional_fields: serde_json::Map<String, Value>,
}

impl Header {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm: Some(algorithm),
            ..Default::default()
        }
    }

    /// Enforces `"crit"` semantics: an absent member is fine, an empty
    /// list is malformed, and any listed extension is unsupported here.
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

    /// The protected/unprotected union, protected members winning.
    pub(crate) fn merged(&self, unprotected: Option<&Header>) -> Header {
        let Some(unprotected) = unprotected else {
            return self.clone();
        };
        let mut merged = self.clone();
        merged.algorithm = merged.algorithm.or(unprotected.algorithm);
        merged.key_id = merged.key_id.or_else(|| unprotected.key_id.clone());
        merged.token_type = merged
            .token_type
            .or_else(|| unprotected.token_type.clone());
        merged.content_type = merged
            .content_type
            .or_else(|| unprotected.content_type.clone());
        merged.jwk_set_url = merged
            .jwk_set_url
            .or_else(|| unprotected.jwk_set_url.clone());
        merged.jwk = merged.jwk.or_else(|| unprotected.jwk.clone());
        merged.x509_url = merged.x509_url.or_else(|| unprotected.x509_url.clone());
        merged.x509_cert_chain = merged
            .x509_cert_chain
            .or_else(|| unprotected.x509_cert_chain.clone());
        merged.x509_cert_sha1_thumbprint = merged
            .x509_cert_sha1_thumbprint
            .or_else(|| unprotected.x509_cert_sha1_thumbprint.clone());
        merged.x509_cert_sha256_thumbprint = merged
            .x509_cert_sha256_thumbprint
            .or_else(|| unprotected.x509_cert_sha256_thumbprint.clone());
        merged.critical = merged.critical.or_else(|| unprotected.critical.clone());
        for (member, value) in &unprotected.additional_fields {
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
    fn test_crit_rules() {
        let mut header = Header::new(Algorithm::Hs256);
        header.check_critical().unwrap();

        header.critical = Some(vec![]);
        assert!(matches!(
            header.check_critical(),
            Err(DecodeError::Malformed(_))
        ));

        header.critical = Some(vec!["exp".to_string()]);
        assert!(matches!(
            header.check_critical(),
            Err(DecodeError::Unsupported(_))
        ));
    }

    #[test]
    fn test_merge_prefers_protected() {
        let mut protected = Header::new(Algorithm::Es256);
        protected.key_id = Some("p".to_string());
        let mut unprotected = Header::default();
        unprotected.key_id = Some("u".to_string());
        unprotected.content_type = Some("JWT".to_string());

        let merged = protected.merged(Some(&unprotected));
        assert_eq!(merged.key_id.as_deref(), Some("p"));
        assert_eq!(merged.content_type.as_deref(), Some("JWT"));
        assert_eq!(merged.algorithm, Some(Algorithm::Es256));
    }
}
