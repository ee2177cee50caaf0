use serde_json::Value;

use crate::error::{
    TokenAudienceError, TokenClaimError, TokenExpiredError, TokenHeaderError, TokenIssuedAtError,
    TokenIssuerError, TokenJwtIdError, TokenNotYetValidError, TokenSubjectError,
    TokenValidationError,
};

use super::{Claims, NumericDate, TokenType};

/// How a time-valued claim is checked: against the clock, or for exact
/// equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeCheck {
    /// `"exp"` must lie strictly after now; `"nbf"`/`"iat"` at or before
    /// now. The claim must be present and positive.
    Now,
    /// The claim must equal this value exactly.
    At(NumericDate),
}

/// One expectation against a token's claims or header. String-valued
/// checks with `None` assert presence only.
#[derive(Clone, Debug, PartialEq)]
pub enum ClaimCheck<'a> {
    Issuer(Option<&'a str>),
    Subject(Option<&'a str>),
    /// Matches a string `"aud"` by equality; for an array, membership of
    /// the expected element suffices.
    Audience(Option<&'a str>),
    JwtId(Option<&'a str>),
    ExpiresAt(TimeCheck),
    NotBefore(TimeCheck),
    IssuedAt(TimeCheck),
    /// A named claim that must be a string (or merely present).
    StringClaim(&'a str, Option<&'a str>),
    /// A named claim that must be an integer (or merely present).
    IntClaim(&'a str, Option<i64>),
    /// A named claim compared structurally as JSON (or merely present).
    JsonClaim(&'a str, Option<&'a Value>),
    /// The `"typ"` header member.
    TokenType(&'a str),
    /// The `"cty"` header member.
    ContentType(&'a str),
}

/// Checks a claim set against a list of [`ClaimCheck`] descriptors. Every
/// check must pass; the first failure is reported and names the claim.
#[derive(Clone, Copy, Debug)]
pub struct Validator {
    /// The clock used by [`TimeCheck::Now`].
    pub now: NumericDate,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            now: NumericDate::now(),
        }
    }

    pub fn with_now(now: NumericDate) -> Self {
        Self { now }
    }

    pub fn validate(
        &self,
        claims: &Claims,
        token_type: Option<&TokenType>,
        content_type: Option<&str>,
        checks: &[ClaimCheck<'_>],
    ) -> Result<(), TokenValidationError> {
        for check in checks {
            self.apply(claims, token_type, content_type, check)?;
        }
        Ok(())
    }

    fn apply(
        &self,
        claims: &Claims,
        token_type: Option<&TokenType>,
        content_type: Option<&str>,
        check: &ClaimCheck<'_>,
    ) -> Result<(), TokenValidationError> {
        match check {
            ClaimCheck::Issuer(expected) => {
                if !string_matches(claims.issuer.as_deref(), *expected) {
                    return Err(TokenIssuerError {
                        expected: expected.map(str::to_string),
                        actual: claims.issuer.clone(),
                    }
                    .into());
                }
            }
            ClaimCheck::Subject(expected) => {
                if !string_matches(claims.subject.as_deref(), *expected) {
                    return Err(TokenSubjectError {
                        expected: expected.map(str::to_string),
                        actual: claims.subject.clone(),
                    }
                    .into());
                }
            }
            ClaimCheck::JwtId(expected) => {
                if !string_matches(claims.jwt_id.as_deref(), *expected) {
                    return Err(TokenJwtIdError {
                        expected: expected.map(str::to_string),
                        actual: claims.jwt_id.clone(),
                    }
                    .into());
                }
            }
            ClaimCheck::Audience(expected) => {
                let ok = match (&claims.audience, expected) {
                    (Some(aud), Some(expected)) => aud.contains(expected),
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if !ok {
                    return Err(TokenAudienceError {
                        expected: expected.map(str::to_string),
                        actual: claims.audience.clone(),
                    }
                    .into());
                }
            }
            ClaimCheck::ExpiresAt(check) => {
                let exp = claims.expiration_time;
                let ok = match check {
                    TimeCheck::Now => matches!(exp, Some(exp) if exp.0 > 0 && exp > self.now),
                    TimeCheck::At(at) => exp == Some(*at),
                };
                if !ok {
                    return Err(TokenExpiredError {
                        expiration_time: exp,
                        now: self.now,
                    }
                    .into());
                }
            }
            ClaimCheck::NotBefore(check) => {
                let nbf = claims.not_before;
                let ok = match check {
                    TimeCheck::Now => matches!(nbf, Some(nbf) if nbf.0 > 0 && nbf <= self.now),
                    TimeCheck::At(at) => nbf == Some(*at),
                };
                if !ok {
                    return Err(TokenNotYetValidError {
                        not_before: nbf,
                        now: self.now,
                    }
                    .into());
                }
            }
            ClaimCheck::IssuedAt(check) => {
                let iat = claims.issued_at;
                let ok = match check {
                    TimeCheck::Now => matches!(iat, Some(iat) if iat.0 > 0 && iat <= self.now),
                    TimeCheck::At(at) => iat == Some(*at),
                };
                if !ok {
                    return Err(TokenIssuedAtError {
                        issued_at: iat,
                        now: self.now,
                    }
                    .into());
                }
            }
            ClaimCheck::StringClaim(name, expected) => {
                let actual = claims.get(name);
                let ok = match (&actual, expected) {
                    (Some(Value::String(actual)), Some(expected)) => actual == expected,
                    (Some(Value::String(_)), None) => true,
                    _ => false,
                };
                if !ok {
                    return Err(claim_error(name, expected.map(Value::from), actual));
                }
            }
            ClaimCheck::IntClaim(name, expected) => {
                let actual = claims.get(name);
                let ok = match (actual.as_ref().and_then(Value::as_i64), expected) {
                    (Some(actual), Some(expected)) => actual == *expected,
                    (Some(_), None) => true,
                    _ => false,
                };
                if !ok {
                    return Err(claim_error(name, expected.map(Value::from), actual));
                }
            }
            ClaimCheck::JsonClaim(name, expected) => {
                let actual = claims.get(name);
                let ok = match (&actual, expected) {
                    (Some(actual), Some(expected)) => actual == *expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if !ok {
                    return Err(claim_error(name, expected.map(|v| (*v).clone()), actual));
                }
            }
            ClaimCheck::TokenType(expected) => {
                let actual = token_type.map(|t| t.as_str());
                if actual != Some(*expected) {
                    return Err(TokenHeaderError {
                        member: "typ".to_string(),
                        expected: expected.to_string(),
                        actual: actual.map(str::to_string),
                    }
                    .into());
                }
            }
            ClaimCheck::ContentType(expected) => {
                if content_type != Some(*expected) {
                    return Err(TokenHeaderError {
                        member: "cty".to_string(),
                        expected: expected.to_string(),
                        actual: content_type.map(str::to_string),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

fn string_matches(actual: Option<&str>, expected: Option<&str>) -> bool {
    match (actual, expected) {
        (Some(actual), Some(expected)) => actual == expected,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn claim_error(
    name: &str,
    expected: Option<Value>,
    actual: Option<Value>,
) -> TokenValidationError {
    TokenClaimError {
        claim: name.to_string(),
        expected,
        actual,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: NumericDate = NumericDate(1680495923);

    fn claims() -> Claims {
        Claims::builder()
            .issuer("iss-1")
            .subject("sub-1")
            .audience(vec!["aud-1", "aud-2"])
            .expiration_time(NOW + 600)
            .not_before(NOW - 600)
            .issued_at(NOW - 600)
            .jwt_id("jti-1")
            .additional_claim("scope", "read")
            .additional_claim("level", 3)
            .additional_claim("ctx", json!({"a": 1}))
            .build()
            .unwrap()
    }

    #[test]
    fn test_all_checks_pass() {
        let v = Validator::with_now(NOW);
        let ctx = json!({"a": 1});
        v.validate(
            &claims(),
            Some(&TokenType::Jwt),
            Some("JWT"),
            &[
                ClaimCheck::Issuer(Some("iss-1")),
                ClaimCheck::Subject(None),
                ClaimCheck::Audience(Some("aud-2")),
                ClaimCheck::JwtId(Some("jti-1")),
                ClaimCheck::ExpiresAt(TimeCheck::Now),
                ClaimCheck::NotBefore(TimeCheck::Now),
                ClaimCheck::IssuedAt(TimeCheck::At(NOW - 600)),
                ClaimCheck::StringClaim("scope", Some("read")),
                ClaimCheck::IntClaim("level", Some(3)),
                ClaimCheck::JsonClaim("ctx", Some(&ctx)),
                ClaimCheck::TokenType("JWT"),
                ClaimCheck::ContentType("JWT"),
            ],
        )
        .unwrap();
    }

    #[test]
    fn test_first_failure_names_the_claim() {
        let v = Validator::with_now(NOW);
        let err = v
            .validate(
                &claims(),
                None,
                None,
                &[
                    ClaimCheck::Issuer(Some("iss-1")),
                    ClaimCheck::Audience(Some("nobody")),
                    ClaimCheck::Subject(Some("mismatch too")),
                ],
            )
            .unwrap_err();
        assert_eq!(err.claim(), "aud");
    }

    #[test]
    fn test_expired_token() {
        let v = Validator::with_now(NOW + 700);
        let err = v
            .validate(&claims(), None, None, &[ClaimCheck::ExpiresAt(TimeCheck::Now)])
            .unwrap_err();
        assert_eq!(
            err,
            TokenExpiredError {
                expiration_time: Some(NOW + 600),
                now: NOW + 700,
            }
            .into()
        );
    }

    #[test]
    fn test_nbf_in_future() {
        let v = Validator::with_now(NOW - 3600);
        let err = v
            .validate(&claims(), None, None, &[ClaimCheck::NotBefore(TimeCheck::Now)])
            .unwrap_err();
        assert_eq!(err.claim(), "nbf");
    }

    #[test]
    fn test_presence_only_checks() {
        let v = Validator::with_now(NOW);
        v.validate(
            &claims(),
            None,
            None,
            &[
                ClaimCheck::Issuer(None),
                ClaimCheck::StringClaim("scope", None),
                ClaimCheck::IntClaim("level", None),
            ],
        )
        .unwrap();

        let err = v
            .validate(&Claims::default(), None, None, &[ClaimCheck::Issuer(None)])
            .unwrap_err();
        assert_eq!(err.claim(), "iss");
    }

    #[test]
    fn test_typed_mismatch() {
        let v = Validator::with_now(NOW);
        // "scope" exists but is a string, not an integer
        let err = v
            .validate(&claims(), None, None, &[ClaimCheck::IntClaim("scope", None)])
            .unwrap_err();
        assert_eq!(err.claim(), "scope");
    }

    #[test]
    fn test_header_checks() {
        let v = Validator::with_now(NOW);
        let err = v
            .validate(&claims(), None, None, &[ClaimCheck::TokenType("JWT")])
            .unwrap_err();
        assert_eq!(err.claim(), "typ");
    }
}
