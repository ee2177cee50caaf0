use core::array::TryFromSliceError;

use std::borrow::Cow;
use std::fmt::{self, Display};

use crate::jwt::{NumericDate, StringOrStrings};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidAlgorithmError(pub String);
impl std::error::Error for InvalidAlgorithmError {}

impl fmt::Display for InvalidAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yucca: invalid algorithm \"{}\"", self.0)
    }
}

impl From<&str> for InvalidAlgorithmError {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidCurveError(pub String);
impl std::error::Error for InvalidCurveError {}

impl fmt::Display for InvalidCurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yucca: invalid curve \"{}\"", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidKeyTypeError(pub String);
impl std::error::Error for InvalidKeyTypeError {}

impl fmt::Display for InvalidKeyTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yucca: invalid key type \"{}\"", self.0)
    }
}

/// An algorithm, curve, or header member that is recognized by the JOSE
/// specifications but not implemented here, or an operation that requires
/// remote material while remote fetching is disabled.
#[derive(Clone, Debug)]
pub struct UnsupportedError(pub Cow<'static, str>);
impl std::error::Error for UnsupportedError {}

impl fmt::Display for UnsupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yucca: unsupported: {}", self.0)
    }
}

impl From<&'static str> for UnsupportedError {
    fn from(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

impl From<String> for UnsupportedError {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

/// Malformed wire input: bad base64url, bad JSON, bad UTF-8, or a token
/// whose segments do not line up with its serialization.
#[derive(Debug)]
pub enum DecodeError {
    Base64(base64::DecodeError),
    Json(serde_json::Error),
    Utf8(core::str::Utf8Error),
    Malformed(Cow<'static, str>),
    Unsupported(UnsupportedError),
}
impl std::error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(e) => write!(f, "yucca: malformed base64url: {e}"),
            Self::Json(e) => write!(f, "yucca: malformed json: {e}"),
            Self::Utf8(e) => write!(f, "yucca: malformed utf-8: {e}"),
            Self::Malformed(s) => write!(f, "yucca: malformed input: {s}"),
            Self::Unsupported(e) => Display::fmt(e, f),
        }
    }
}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Base64(e)
    }
}
impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
impl From<core::str::Utf8Error> for DecodeError {
    fn from(e: core::str::Utf8Error) -> Self {
        Self::Utf8(e)
    }
}
impl From<&'static str> for DecodeError {
    fn from(s: &'static str) -> Self {
        Self::Malformed(Cow::Borrowed(s))
    }
}
impl From<String> for DecodeError {
    fn from(s: String) -> Self {
        Self::Malformed(Cow::Owned(s))
    }
}
impl From<UnsupportedError> for DecodeError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}

pub struct KeyError(pub String);
impl std::error::Error for KeyError {}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed key: {}", self.0)
    }
}
impl fmt::Debug for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yucca: malformed key: {}", self.0)
    }
}

impl From<String> for KeyError {
    fn from(e: String) -> Self {
        Self(e)
    }
}
impl From<&str> for KeyError {
    fn from(e: &str) -> Self {
        Self(e.to_string())
    }
}
impl From<pkcs8::Error> for KeyError {
    fn from(e: pkcs8::Error) -> Self {
        Self(e.to_string())
    }
}
impl From<pkcs8::spki::Error> for KeyError {
    fn from(e: pkcs8::spki::Error) -> Self {
        Self(e.to_string())
    }
}
impl From<der::Error> for KeyError {
    fn from(e: der::Error) -> Self {
        Self(e.to_string())
    }
}
impl From<sec1::Error> for KeyError {
    fn from(e: sec1::Error) -> Self {
        Self(e.to_string())
    }
}
impl From<rsa::Error> for KeyError {
    fn from(e: rsa::Error) -> Self {
        Self(e.to_string())
    }
}
impl From<elliptic_curve::Error> for KeyError {
    fn from(e: elliptic_curve::Error) -> Self {
        Self(e.to_string())
    }
}
impl From<ed25519_dalek::SignatureError> for KeyError {
    fn from(e: ed25519_dalek::SignatureError) -> Self {
        Self(e.to_string())
    }
}
impl From<TryFromSliceError> for KeyError {
    fn from(e: TryFromSliceError) -> Self {
        Self(format!("invalid key length: {e}"))
    }
}
impl From<digest::InvalidLength> for KeyError {
    fn from(e: digest::InvalidLength) -> Self {
        Self(format!("invalid key length: {e}"))
    }
}
impl From<base64::DecodeError> for KeyError {
    fn from(e: base64::DecodeError) -> Self {
        Self(format!("malformed base64url member: {e}"))
    }
}
impl From<serde_json::Error> for KeyError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

/// Remote document retrieval failed. Produced by [`RemoteFetch`](crate::fetch::RemoteFetch)
/// implementations.
#[derive(Debug)]
pub struct FetchError(pub String);
impl std::error::Error for FetchError {}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yucca: remote fetch failed: {}", self.0)
    }
}

impl From<String> for FetchError {
    fn from(e: String) -> Self {
        Self(e)
    }
}
impl From<&str> for FetchError {
    fn from(e: &str) -> Self {
        Self(e.to_string())
    }
}

#[derive(Debug)]
pub enum SignError {
    Key(KeyError),
    Unsupported(UnsupportedError),
    Json(serde_json::Error),
    Unspecified,
}
impl std::error::Error for SignError {}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(e) => Display::fmt(e, f),
            Self::Unsupported(e) => Display::fmt(e, f),
            Self::Json(e) => write!(f, "yucca: failed to serialize header: {e}"),
            Self::Unspecified => write!(f, "yucca: unspecified signing failure"),
        }
    }
}

impl From<KeyError> for SignError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}
impl From<UnsupportedError> for SignError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}
impl From<serde_json::Error> for SignError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
impl From<signature::Error> for SignError {
    fn from(_: signature::Error) -> Self {
        Self::Unspecified
    }
}

/// A signature, MAC, or certificate chain that failed cryptographic
/// verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationError;
impl std::error::Error for VerificationError {}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signature verification failed")
    }
}

impl From<signature::Error> for VerificationError {
    fn from(_: signature::Error) -> Self {
        Self
    }
}

#[derive(Debug)]
pub enum VerifyError {
    /// No signature on the token verified against any candidate key.
    Invalid,
    Key(KeyError),
    Unsupported(UnsupportedError),
    Decode(DecodeError),
}
impl std::error::Error for VerifyError {}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => Display::fmt(&VerificationError, f),
            Self::Key(e) => Display::fmt(e, f),
            Self::Unsupported(e) => Display::fmt(e, f),
            Self::Decode(e) => Display::fmt(e, f),
        }
    }
}

impl From<VerificationError> for VerifyError {
    fn from(_: VerificationError) -> Self {
        Self::Invalid
    }
}
impl From<KeyError> for VerifyError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}
impl From<UnsupportedError> for VerifyError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}
impl From<DecodeError> for VerifyError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

#[derive(Debug)]
pub enum EncryptError {
    Key(KeyError),
    Unsupported(UnsupportedError),
    Json(serde_json::Error),
    Unspecified,
}
impl std::error::Error for EncryptError {}

impl fmt::Display for EncryptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(e) => Display::fmt(e, f),
            Self::Unsupported(e) => Display::fmt(e, f),
            Self::Json(e) => write!(f, "yucca: failed to serialize header: {e}"),
            Self::Unspecified => write!(f, "yucca: unspecified encryption failure"),
        }
    }
}

impl From<KeyError> for EncryptError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}
impl From<UnsupportedError> for EncryptError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}
impl From<serde_json::Error> for EncryptError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
impl From<rust_crypto_aead::Error> for EncryptError {
    fn from(_: rust_crypto_aead::Error) -> Self {
        Self::Unspecified
    }
}
impl From<crypto_common::InvalidLength> for EncryptError {
    fn from(e: crypto_common::InvalidLength) -> Self {
        Self::Key(KeyError(e.to_string()))
    }
}
impl From<rsa::Error> for EncryptError {
    fn from(_: rsa::Error) -> Self {
        Self::Unspecified
    }
}

#[derive(Debug)]
pub enum DecryptError {
    /// Authentication tag or MAC mismatch, or a key-unwrap integrity
    /// failure. No plaintext is surfaced alongside this error.
    Verification,
    Key(KeyError),
    Unsupported(UnsupportedError),
    Decode(DecodeError),
}
impl std::error::Error for DecryptError {}

impl fmt::Display for DecryptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verification => write!(f, "yucca: decryption verification failed"),
            Self::Key(e) => Display::fmt(e, f),
            Self::Unsupported(e) => Display::fmt(e, f),
            Self::Decode(e) => Display::fmt(e, f),
        }
    }
}

impl From<KeyError> for DecryptError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}
impl From<UnsupportedError> for DecryptError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}
impl From<DecodeError> for DecryptError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}
impl From<rust_crypto_aead::Error> for DecryptError {
    fn from(_: rust_crypto_aead::Error) -> Self {
        Self::Verification
    }
}
impl From<VerificationError> for DecryptError {
    fn from(_: VerificationError) -> Self {
        Self::Verification
    }
}
impl From<rsa::Error> for DecryptError {
    fn from(_: rsa::Error) -> Self {
        Self::Verification
    }
}
impl From<aes_kw::Error> for DecryptError {
    fn from(_: aes_kw::Error) -> Self {
        Self::Verification
    }
}
impl From<crypto_common::InvalidLength> for DecryptError {
    fn from(e: crypto_common::InvalidLength) -> Self {
        Self::Key(KeyError(e.to_string()))
    }
}

#[derive(Debug)]
pub enum CertificateError {
    Parse(der::Error),
    /// A certificate in the chain is not signed by its successor, or the
    /// terminal certificate's self-signature does not verify.
    Verification,
    /// The terminal certificate is neither self-signed nor anchored in the
    /// supplied trust set.
    Untrusted,
    Key(KeyError),
    Unsupported(UnsupportedError),
}
impl std::error::Error for CertificateError {}

impl fmt::Display for CertificateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "yucca: malformed certificate: {e}"),
            Self::Verification => write!(f, "yucca: certificate chain does not verify"),
            Self::Untrusted => write!(f, "yucca: certificate chain is not anchored"),
            Self::Key(e) => Display::fmt(e, f),
            Self::Unsupported(e) => Display::fmt(e, f),
        }
    }
}

impl From<der::Error> for CertificateError {
    fn from(e: der::Error) -> Self {
        Self::Parse(e)
    }
}
impl From<KeyError> for CertificateError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}
impl From<UnsupportedError> for CertificateError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}
impl From<VerificationError> for CertificateError {
    fn from(_: VerificationError) -> Self {
        Self::Verification
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssuerError {
    pub expected: Option<String>,
    pub actual: Option<String>,
}
impl std::error::Error for TokenIssuerError {}

impl fmt::Display for TokenIssuerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yucca: \"iss\" mismatch; expected: {:?}, actual: {:?}",
            self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubjectError {
    pub expected: Option<String>,
    pub actual: Option<String>,
}
impl std::error::Error for TokenSubjectError {}

impl fmt::Display for TokenSubjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yucca: \"sub\" mismatch; expected: {:?}, actual: {:?}",
            self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenJwtIdError {
    pub expected: Option<String>,
    pub actual: Option<String>,
}
impl std::error::Error for TokenJwtIdError {}

impl fmt::Display for TokenJwtIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yucca: \"jti\" mismatch; expected: {:?}, actual: {:?}",
            self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAudienceError {
    pub expected: Option<String>,
    pub actual: Option<StringOrStrings>,
}
impl std::error::Error for TokenAudienceError {}

impl fmt::Display for TokenAudienceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yucca: \"aud\" mismatch; expected: {:?}, actual: {:?}",
            self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenExpiredError {
    pub expiration_time: Option<NumericDate>,
    pub now: NumericDate,
}
impl std::error::Error for TokenExpiredError {}

impl fmt::Display for TokenExpiredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expiration_time {
            Some(exp) => write!(f, "yucca: token expired at {}; now is {}", exp.0, self.now.0),
            None => write!(f, "yucca: token carries no usable \"exp\" claim"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNotYetValidError {
    pub not_before: Option<NumericDate>,
    pub now: NumericDate,
}
impl std::error::Error for TokenNotYetValidError {}

impl fmt::Display for TokenNotYetValidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.not_before {
            Some(nbf) => write!(
                f,
                "yucca: token not valid before {}; now is {}",
                nbf.0, self.now.0
            ),
            None => write!(f, "yucca: token carries no usable \"nbf\" claim"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssuedAtError {
    pub issued_at: Option<NumericDate>,
    pub now: NumericDate,
}
impl std::error::Error for TokenIssuedAtError {}

impl fmt::Display for TokenIssuedAtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issued_at {
            Some(iat) => write!(
                f,
                "yucca: token \"iat\" {} is not acceptable; now is {}",
                iat.0, self.now.0
            ),
            None => write!(f, "yucca: token carries no usable \"iat\" claim"),
        }
    }
}

/// A named claim failed its typed comparison or presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaimError {
    pub claim: String,
    pub expected: Option<serde_json::Value>,
    pub actual: Option<serde_json::Value>,
}
impl std::error::Error for TokenClaimError {}

impl fmt::Display for TokenClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yucca: claim {:?} mismatch; expected: {:?}, actual: {:?}",
            self.claim, self.expected, self.actual
        )
    }
}

/// A header member (`typ` or `cty`) failed its comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeaderError {
    pub member: String,
    pub expected: String,
    pub actual: Option<String>,
}
impl std::error::Error for TokenHeaderError {}

impl fmt::Display for TokenHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yucca: header member {:?} mismatch; expected: {:?}, actual: {:?}",
            self.member, self.expected, self.actual
        )
    }
}

/// First claim-validation failure. [`claim`](TokenValidationError::claim)
/// names the offending claim or header member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    Issuer(TokenIssuerError),
    Subject(TokenSubjectError),
    Audience(TokenAudienceError),
    JwtId(TokenJwtIdError),
    Expired(TokenExpiredError),
    NotYetValid(TokenNotYetValidError),
    IssuedAt(TokenIssuedAtError),
    Claim(TokenClaimError),
    Header(TokenHeaderError),
}
impl std::error::Error for TokenValidationError {}

impl TokenValidationError {
    /// The name of the claim (or header member) that failed.
    pub fn claim(&self) -> &str {
        match self {
            Self::Issuer(_) => "iss",
            Self::Subject(_) => "sub",
            Self::Audience(_) => "aud",
            Self::JwtId(_) => "jti",
            Self::Expired(_) => "exp",
            Self::NotYetValid(_) => "nbf",
            Self::IssuedAt(_) => "iat",
            Self::Claim(e) => &e.claim,
            Self::Header(e) => &e.member,
        }
    }
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issuer(e) => Display::fmt(e, f),
            Self::Subject(e) => Display::fmt(e, f),
            Self::Audience(e) => Display::fmt(e, f),
            Self::JwtId(e) => Display::fmt(e, f),
            Self::Expired(e) => Display::fmt(e, f),
            Self::NotYetValid(e) => Display::fmt(e, f),
            Self::IssuedAt(e) => Display::fmt(e, f),
            Self::Claim(e) => Display::fmt(e, f),
            Self::Header(e) => Display::fmt(e, f),
        }
    }
}

impl From<TokenIssuerError> for TokenValidationError {
    fn from(e: TokenIssuerError) -> Self {
        Self::Issuer(e)
    }
}
impl From<TokenSubjectError> for TokenValidationError {
    fn from(e: TokenSubjectError) -> Self {
        Self::Subject(e)
    }
}
impl From<TokenAudienceError> for TokenValidationError {
    fn from(e: TokenAudienceError) -> Self {
        Self::Audience(e)
    }
}
impl From<TokenJwtIdError> for TokenValidationError {
    fn from(e: TokenJwtIdError) -> Self {
        Self::JwtId(e)
    }
}
impl From<TokenExpiredError> for TokenValidationError {
    fn from(e: TokenExpiredError) -> Self {
        Self::Expired(e)
    }
}
impl From<TokenNotYetValidError> for TokenValidationError {
    fn from(e: TokenNotYetValidError) -> Self {
        Self::NotYetValid(e)
    }
}
impl From<TokenIssuedAtError> for TokenValidationError {
    fn from(e: TokenIssuedAtError) -> Self {
        Self::IssuedAt(e)
    }
}
impl From<TokenClaimError> for TokenValidationError {
    fn from(e: TokenClaimError) -> Self {
        Self::Claim(e)
    }
}
impl From<TokenHeaderError> for TokenValidationError {
    fn from(e: TokenHeaderError) -> Self {
        Self::Header(e)
    }
}

/// Composite error for the token orchestrator, wrapping whichever stage
/// failed: signing, verification, encryption, decryption, parsing, or
/// claim validation.
#[derive(Debug)]
pub enum TokenError {
    Sign(SignError),
    Verify(VerifyError),
    Encrypt(EncryptError),
    Decrypt(DecryptError),
    Decode(DecodeError),
    Key(KeyError),
    Unsupported(UnsupportedError),
    Validation(TokenValidationError),
}
impl std::error::Error for TokenError {}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sign(e) => Display::fmt(e, f),
            Self::Verify(e) => Display::fmt(e, f),
            Self::Encrypt(e) => Display::fmt(e, f),
            Self::Decrypt(e) => Display::fmt(e, f),
            Self::Decode(e) => Display::fmt(e, f),
            Self::Key(e) => Display::fmt(e, f),
            Self::Unsupported(e) => Display::fmt(e, f),
            Self::Validation(e) => Display::fmt(e, f),
        }
    }
}

impl From<SignError> for TokenError {
    fn from(e: SignError) -> Self {
        Self::Sign(e)
    }
}
impl From<VerifyError> for TokenError {
    fn from(e: VerifyError) -> Self {
        Self::Verify(e)
    }
}
impl From<EncryptError> for TokenError {
    fn from(e: EncryptError) -> Self {
        Self::Encrypt(e)
    }
}
impl From<DecryptError> for TokenError {
    fn from(e: DecryptError) -> Self {
        Self::Decrypt(e)
    }
}
impl From<DecodeError> for TokenError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}
impl From<KeyError> for TokenError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}
impl From<UnsupportedError> for TokenError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}
impl From<TokenValidationError> for TokenError {
    fn from(e: TokenValidationError) -> Self {
        Self::Validation(e)
    }
}
impl From<serde_json::Error> for TokenError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(DecodeError::Json(e))
    }
}
