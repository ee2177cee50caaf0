mod claims;
mod numeric_date;
mod string_or_strings;
mod token_type;
mod validator;

pub use claims::{Claims, ClaimsBuilder};
pub use numeric_date::NumericDate;
pub use string_or_strings::StringOrStrings;
pub use token_type::TokenType;
pub use validator::{ClaimCheck, TimeCheck, Validator};

use crate::{
    b64,
    error::{DecodeError, TokenError, UnsupportedError, VerifyError},
    jwe::{self, Jwe},
    jwk::{Jwk, Jwks},
    jws::{self, Jws},
    serialization::{ParseFlags, Serialization},
};

/// What kind of token this is: unsecured, signed, encrypted, or one of
/// the two nestings. Nesting is signaled on the wire by `cty: "JWT"` and
/// is known as soon as the outer header is readable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JwtType {
    /// `alg: none` — parseable only with the UNSIGNED flag, never
    /// verifiable.
    None,
    #[default]
    Sign,
    Encrypt,
    NestedSignThenEncrypt,
    NestedEncryptThenSign,
}

/// A JSON Web Token: the orchestrator composing [`Jws`] and [`Jwe`] into
/// signed, encrypted, and nested tokens, with claim validation.
///
/// <https://www.rfc-editor.org/rfc/rfc7519>
#[derive(Debug, Clone)]
pub struct Jwt {
    jwt_type: JwtType,
    flags: ParseFlags,
    claims: Option<Claims>,
    jws: Option<Jws>,
    jwe: Option<Jwe>,
}

impl Jwt {
    /// A signed JWT: a compact JWS whose payload is the claims JSON and
    /// whose header carries `typ: "JWT"` unless the caller set one.
    pub fn sign(claims: &Claims, header: &jws::Header, key: &Jwk) -> Result<String, TokenError> {
        let mut header = header.clone();
        if header.token_type.is_none() {
            header.token_type = Some(TokenType::Jwt);
        }
        let payload = claims.to_json()?;
        let jws = Jws::sign(payload.as_bytes(), &header, key)?;
        Ok(jws.serialize(Serialization::Compact)?)
    }

    /// An unsecured JWT (`alg: none`). Producing one is the caller's
    /// explicit opt-in.
    pub fn unsigned(claims: &Claims) -> Result<String, TokenError> {
        let mut header = jws::Header::default();
        header.token_type = Some(TokenType::Jwt);
        let payload = claims.to_json()?;
        let jws = Jws::unsigned(payload.as_bytes(), &header)?;
        Ok(jws.serialize(Serialization::Compact)?)
    }

    /// An encrypted JWT: a compact JWE whose plaintext is the claims JSON.
    pub fn encrypt(claims: &Claims, header: &jwe::Header, key: &Jwk) -> Result<String, TokenError> {
        let mut header = header.clone();
        if header.token_type.is_none() {
            header.token_type = Some(TokenType::Jwt);
        }
        let payload = claims.to_json()?;
        let jwe = Jwe::encrypt(payload.as_bytes(), &header, key)?;
        Ok(jwe.serialize(Serialization::Compact)?)
    }

    /// Sign-then-encrypt nesting: the compact JWS becomes the plaintext
    /// of a JWE carrying `cty: "JWT"`.
    pub fn nested_sign_then_encrypt(
        claims: &Claims,
        sign_header: &jws::Header,
        sign_key: &Jwk,
        enc_header: &jwe::Header,
        enc_key: &Jwk,
    ) -> Result<String, TokenError> {
        let inner = Self::sign(claims, sign_header, sign_key)?;
        let mut outer = enc_header.clone();
        outer.content_type = Some("JWT".to_string());
        let jwe = Jwe::encrypt(inner.as_bytes(), &outer, enc_key)?;
        Ok(jwe.serialize(Serialization::Compact)?)
    }

    /// Encrypt-then-sign nesting: the compact JWE becomes the payload of
    /// a JWS carrying `cty: "JWT"`.
    pub fn nested_encrypt_then_sign(
        claims: &Claims,
        enc_header: &jwe::Header,
        enc_key: &Jwk,
        sign_header: &jws::Header,
        sign_key: &Jwk,
    ) -> Result<String, TokenError> {
        let inner = Self::encrypt(claims, enc_header, enc_key)?;
        let mut outer = sign_header.clone();
        outer.content_type = Some("JWT".to_string());
        let jws = Jws::sign(inner.as_bytes(), &outer, sign_key)?;
        Ok(jws.serialize(Serialization::Compact)?)
    }

    /// Parses a token of any serialization, detecting its type from the
    /// header: an `"enc"` member means encryption, `cty: "JWT"` means
    /// nesting, `alg: "none"` means unsecured.
    pub fn parse(token: &str, flags: ParseFlags) -> Result<Self, TokenError> {
        if Self::is_encrypted(token)? {
            let jwe = Jwe::parse(token, flags)?;
            let jwt_type = match jwe.header().content_type.as_deref() {
                Some(cty) if TokenType::from(cty).is_jwt() => JwtType::NestedSignThenEncrypt,
                _ => JwtType::Encrypt,
            };
            Ok(Self {
                jwt_type,
                flags,
                claims: None,
                jws: None,
                jwe: Some(jwe),
            })
        } else {
            let jws = Jws::parse(token, flags)?;
            let header = jws.header().unwrap_or_default();
            let jwt_type = match header.content_type.as_deref() {
                Some(cty) if TokenType::from(cty).is_jwt() => JwtType::NestedEncryptThenSign,
                _ if header.algorithm == Some(jws::Algorithm::None) => JwtType::None,
                _ => JwtType::Sign,
            };
            // signed payloads are readable before verification
            let claims = match jwt_type {
                JwtType::Sign | JwtType::None => Some(Claims::from_slice(jws.payload())?),
                _ => None,
            };
            Ok(Self {
                jwt_type,
                flags,
                claims,
                jws: Some(jws),
                jwe: None,
            })
        }
    }

    fn is_encrypted(token: &str) -> Result<bool, DecodeError> {
        let trimmed = token.trim_start();
        if trimmed.starts_with('{') {
            let value: serde_json::Value = serde_json::from_str(trimmed.trim_end())?;
            return Ok(value.get("ciphertext").is_some());
        }
        let first = trimmed
            .split('.')
            .next()
            .ok_or_else(|| DecodeError::from("empty token"))?;
        let header: serde_json::Value = serde_json::from_slice(&b64::decode(first)?)?;
        Ok(header.get("enc").is_some())
    }

    pub fn jwt_type(&self) -> JwtType {
        self.jwt_type
    }

    /// The claims, once readable: immediately for signed and unsecured
    /// tokens, after [`unseal`](Self::unseal) for anything encrypted.
    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    pub fn jws(&self) -> Option<&Jws> {
        self.jws.as_ref()
    }

    pub fn jwe(&self) -> Option<&Jwe> {
        self.jwe.as_ref()
    }

    /// The outer header's `"typ"`.
    pub fn token_type(&self) -> Option<TokenType> {
        if let Some(jwe) = &self.jwe {
            return jwe.header().token_type;
        }
        self.jws.as_ref()?.header()?.token_type
    }

    /// The outer header's `"cty"`.
    pub fn content_type(&self) -> Option<String> {
        if let Some(jwe) = &self.jwe {
            return jwe.header().content_type;
        }
        self.jws.as_ref()?.header()?.content_type
    }

    /// Verifies a signed token. For anything involving encryption use
    /// [`unseal`](Self::unseal).
    pub fn verify(&mut self, keys: &Jwks) -> Result<&Claims, TokenError> {
        match self.jwt_type {
            JwtType::Sign => self.unseal(keys, &Jwks::new()),
            JwtType::None => Err(VerifyError::Invalid.into()),
            _ => Err(UnsupportedError::from(
                "token is encrypted; unseal it with decryption keys",
            )
            .into()),
        }
    }

    /// Decrypts an encrypted (non-nested) token.
    pub fn decrypt(&mut self, keys: &Jwks) -> Result<&Claims, TokenError> {
        match self.jwt_type {
            JwtType::Encrypt => self.unseal(&Jwks::new(), keys),
            _ => Err(UnsupportedError::from("token is not an encrypted JWT").into()),
        }
    }

    /// Runs the full pipeline for the token's type — verification,
    /// decryption, or both in nesting order — and yields the claims.
    pub fn unseal(
        &mut self,
        sign_keys: &Jwks,
        decrypt_keys: &Jwks,
    ) -> Result<&Claims, TokenError> {
        match self.jwt_type {
            JwtType::None => Err(VerifyError::Invalid.into()),
            JwtType::Sign => {
                let jws = self.jws.as_ref().expect("signed token holds a JWS");
                let payload = jws.verify(sign_keys)?;
                self.claims = Some(Claims::from_slice(payload)?);
                Ok(self.claims.as_ref().expect("claims just parsed"))
            }
            JwtType::Encrypt => {
                let jwe = self.jwe.as_ref().expect("encrypted token holds a JWE");
                let plaintext = jwe.decrypt(decrypt_keys)?;
                self.claims = Some(Claims::from_slice(&plaintext)?);
                Ok(self.claims.as_ref().expect("claims just parsed"))
            }
            JwtType::NestedSignThenEncrypt => {
                let jwe = self.jwe.as_ref().expect("nested token holds a JWE");
                let plaintext = jwe.decrypt(decrypt_keys)?;
                let inner_token = core::str::from_utf8(&plaintext)
                    .map_err(|e| TokenError::Decode(e.into()))?;
                let inner = Jws::parse(inner_token, self.flags)?;
                let payload = inner.verify(sign_keys)?;
                self.claims = Some(Claims::from_slice(payload)?);
                self.jws = Some(inner.clone());
                Ok(self.claims.as_ref().expect("claims just parsed"))
            }
            JwtType::NestedEncryptThenSign => {
                let jws = self.jws.as_ref().expect("nested token holds a JWS");
                let payload = jws.verify(sign_keys)?.to_vec();
                let inner_token = core::str::from_utf8(&payload)
                    .map_err(|e| TokenError::Decode(e.into()))?;
                let inner = Jwe::parse(inner_token, self.flags)?;
                let plaintext = inner.decrypt(decrypt_keys)?;
                self.claims = Some(Claims::from_slice(&plaintext)?);
                self.jwe = Some(inner);
                Ok(self.claims.as_ref().expect("claims just parsed"))
            }
        }
    }

    /// Validates the claims (and `typ`/`cty` header members) against the
    /// checks, using the system clock for [`TimeCheck::Now`]. The token
    /// must have been unsealed first.
    pub fn validate_claims(&self, checks: &[ClaimCheck<'_>]) -> Result<(), TokenError> {
        self.validate_claims_with(&Validator::new(), checks)
    }

    pub fn validate_claims_with(
        &self,
        validator: &Validator,
        checks: &[ClaimCheck<'_>],
    ) -> Result<(), TokenError> {
        let claims = self
            .claims
            .as_ref()
            .ok_or_else(|| UnsupportedError::from("claims are not available before unsealing"))?;
        let token_type = self.token_type();
        let content_type = self.content_type();
        validator
            .validate(claims, token_type.as_ref(), content_type.as_deref(), checks)
            .map_err(TokenError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::{Curve, KeyType};

    fn claims() -> Claims {
        Claims::builder()
            .issuer("https://issuer.example")
            .subject("user-7")
            .add_audience("api")
            .expiration_time(NumericDate::now() + 600)
            .additional_claim("scope", "read")
            .build()
            .unwrap()
    }

    #[test]
    fn test_signed_round_trip() {
        let key = Jwk::generate_oct(32, Some("hmac-1"));
        let token = Jwt::sign(&claims(), &jws::Header::new(jws::Algorithm::Hs256), &key).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let mut jwt = Jwt::parse(&token, ParseFlags::NONE).unwrap();
        assert_eq!(jwt.jwt_type(), JwtType::Sign);
        assert_eq!(jwt.token_type(), Some(TokenType::Jwt));
        // claims are readable pre-verification, but unverified
        assert_eq!(
            jwt.claims().unwrap().issuer.as_deref(),
            Some("https://issuer.example")
        );
        let verified = jwt.verify(&Jwks::from(key)).unwrap();
        assert_eq!(verified.subject.as_deref(), Some("user-7"));
    }

    #[test]
    fn test_signed_wrong_key_fails() {
        let key = Jwk::generate_oct(32, None);
        let other = Jwk::generate_oct(32, None);
        let token = Jwt::sign(&claims(), &jws::Header::new(jws::Algorithm::Hs256), &key).unwrap();
        let mut jwt = Jwt::parse(&token, ParseFlags::NONE).unwrap();
        assert!(matches!(
            jwt.verify(&Jwks::from(other)),
            Err(TokenError::Verify(VerifyError::Invalid))
        ));
    }

    #[test]
    fn test_encrypted_round_trip() {
        let (private, public) = Jwk::generate(KeyType::Rsa, 2048, Some("rsa-1")).unwrap();
        let token = Jwt::encrypt(
            &claims(),
            &jwe::Header::new(jwe::Algorithm::RsaOaep, jwe::Encryption::A128CbcHs256),
            &public,
        )
        .unwrap();
        assert_eq!(token.matches('.').count(), 4);

        let mut jwt = Jwt::parse(&token, ParseFlags::NONE).unwrap();
        assert_eq!(jwt.jwt_type(), JwtType::Encrypt);
        assert!(jwt.claims().is_none());
        let opened = jwt.decrypt(&Jwks::from(private)).unwrap();
        assert_eq!(opened.issuer.as_deref(), Some("https://issuer.example"));
    }

    #[test]
    fn test_nested_sign_then_encrypt() {
        let (sign_private, sign_public) = Jwk::generate_okp(Curve::Ed25519, Some("sig")).unwrap();
        let enc_key = Jwk::generate_oct(32, Some("enc"));
        let token = Jwt::nested_sign_then_encrypt(
            &claims(),
            &jws::Header::new(jws::Algorithm::EdDsa),
            &sign_private,
            &jwe::Header::new(jwe::Algorithm::Dir, jwe::Encryption::A256Gcm),
            &enc_key,
        )
        .unwrap();

        let mut jwt = Jwt::parse(&token, ParseFlags::NONE).unwrap();
        assert_eq!(jwt.jwt_type(), JwtType::NestedSignThenEncrypt);
        assert_eq!(jwt.content_type().as_deref(), Some("JWT"));
        let opened = jwt
            .unseal(&Jwks::from(sign_public), &Jwks::from(enc_key))
            .unwrap();
        assert_eq!(opened.subject.as_deref(), Some("user-7"));
    }

    #[test]
    fn test_nested_inner_tamper_is_a_signature_failure() {
        let (sign_private, sign_public) = Jwk::generate_okp(Curve::Ed25519, None).unwrap();
        let enc_key = Jwk::generate_oct(32, None);

        // build the inner JWS, corrupt its signature, then encrypt the
        // corrupted token; the outer decryption succeeds and the inner
        // signature step must report the failure
        let inner =
            Jwt::sign(&claims(), &jws::Header::new(jws::Algorithm::EdDsa), &sign_private).unwrap();
        let mut corrupted = inner.into_bytes();
        let first_sig_byte = corrupted.iter().rposition(|b| *b == b'.').unwrap() + 1;
        corrupted[first_sig_byte] = if corrupted[first_sig_byte] == b'A' {
            b'B'
        } else {
            b'A'
        };
        let mut outer = jwe::Header::new(jwe::Algorithm::Dir, jwe::Encryption::A256Gcm);
        outer.content_type = Some("JWT".to_string());
        let token = Jwe::encrypt(&corrupted, &outer, &enc_key)
            .unwrap()
            .serialize(Serialization::Compact)
            .unwrap();

        let mut jwt = Jwt::parse(&token, ParseFlags::NONE).unwrap();
        assert_eq!(jwt.jwt_type(), JwtType::NestedSignThenEncrypt);
        let err = jwt
            .unseal(&Jwks::from(sign_public), &Jwks::from(enc_key))
            .unwrap_err();
        assert!(matches!(err, TokenError::Verify(VerifyError::Invalid)));
    }

    #[test]
    fn test_nested_encrypt_then_sign() {
        let (sign_private, sign_public) = Jwk::generate_ec(Curve::P256, None).unwrap();
        let enc_key = Jwk::generate_oct(16, None);
        let token = Jwt::nested_encrypt_then_sign(
            &claims(),
            &jwe::Header::new(jwe::Algorithm::A128Kw, jwe::Encryption::A128Gcm),
            &enc_key,
            &jws::Header::new(jws::Algorithm::Es256),
            &sign_private,
        )
        .unwrap();

        let mut jwt = Jwt::parse(&token, ParseFlags::NONE).unwrap();
        assert_eq!(jwt.jwt_type(), JwtType::NestedEncryptThenSign);
        let opened = jwt
            .unseal(&Jwks::from(sign_public), &Jwks::from(enc_key))
            .unwrap();
        assert_eq!(opened.issuer.as_deref(), Some("https://issuer.example"));
    }

    #[test]
    fn test_unsigned_token() {
        let token = Jwt::unsigned(&claims()).unwrap();
        assert!(Jwt::parse(&token, ParseFlags::NONE).is_err());
        let mut jwt = Jwt::parse(&token, ParseFlags::UNSIGNED).unwrap();
        assert_eq!(jwt.jwt_type(), JwtType::None);
        assert_eq!(jwt.claims().unwrap().subject.as_deref(), Some("user-7"));
        // unsecured tokens never verify
        assert!(jwt.verify(&Jwks::new()).is_err());
    }

    #[test]
    fn test_validate_claims_round_trip() {
        let key = Jwk::generate_oct(32, None);
        let token = Jwt::sign(&claims(), &jws::Header::new(jws::Algorithm::Hs256), &key).unwrap();
        let mut jwt = Jwt::parse(&token, ParseFlags::NONE).unwrap();
        jwt.verify(&Jwks::from(key)).unwrap();

        jwt.validate_claims(&[
            ClaimCheck::Issuer(Some("https://issuer.example")),
            ClaimCheck::Subject(Some("user-7")),
            ClaimCheck::Audience(Some("api")),
            ClaimCheck::ExpiresAt(TimeCheck::Now),
            ClaimCheck::StringClaim("scope", Some("read")),
            ClaimCheck::TokenType("JWT"),
        ])
        .unwrap();

        let err = jwt
            .validate_claims(&[ClaimCheck::Issuer(Some("someone else"))])
            .unwrap_err();
        match err {
            TokenError::Validation(e) => assert_eq!(e.claim(), "iss"),
            other => panic!("expected a validation error, got {other}"),
        }
    }
}
