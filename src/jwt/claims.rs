use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

use super::{NumericDate, StringOrStrings};

/// The registered JWT claims plus a flattened map of everything else.
///
/// <https://www.rfc-editor.org/rfc/rfc7519#section-4>
#[derive(Debug, PartialEq, Serialize, Clone, Deserialize, Builder, Default)]
pub struct Claims {
    /// The `"iss"` (issuer) claim identifies the principal that issued the
    /// JWT. The `"iss"` value is a case-sensitive string containing a
    /// StringOrURI value.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.1>
    #[serde(rename = "iss", skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub issuer: Option<String>,

    /// The `"sub"` (subject) claim identifies the principal that is the
    /// subject of the JWT. The claims in a JWT are normally statements
    /// about the subject.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.2>
    #[serde(rename = "sub", skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub subject: Option<String>,

    /// The `"aud"` (audience) claim identifies the recipients that the JWT
    /// is intended for. In the general case the value is an array of
    /// case-sensitive strings; when the JWT has one audience it MAY be a
    /// single string.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.3>
    #[serde(rename = "aud", skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub audience: Option<StringOrStrings>,

    /// The `"exp"` (expiration time) claim identifies the time on or after
    /// which the JWT MUST NOT be accepted for processing.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.4>
    #[serde(rename = "exp", skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub expiration_time: Option<NumericDate>,

    /// The `"nbf"` (not before) claim identifies the time before which the
    /// JWT MUST NOT be accepted for processing.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.5>
    #[serde(rename = "nbf", skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub not_before: Option<NumericDate>,

    /// The `"iat"` (issued at) claim identifies the time at which the JWT
    /// was issued.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.6>
    #[serde(rename = "iat", skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub issued_at: Option<NumericDate>,

    /// The `"jti"` (JWT ID) claim provides a unique identifier for the
    /// JWT, assigned so that replay can be detected.
    ///
    /// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.7>
    #[serde(rename = "jti", skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub jwt_id: Option<String>,

    #[serde(flatten)]
    #[builder(default)]
    pub additional_claims: serde_json::Map<String, Value>,
}

impl Claims {
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// The compact (no whitespace) JSON encoding, the payload of a signed
    /// or encrypted token.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Any claim, registered or not, as a JSON value.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "iss" => self.issuer.as_ref().map(|v| Value::from(v.as_str())),
            "sub" => self.subject.as_ref().map(|v| Value::from(v.as_str())),
            "aud" => self
                .audience
                .as_ref()
                .map(|v| serde_json::to_value(v).expect("audience serializes")),
            "exp" => self.expiration_time.map(|v| Value::from(v.0)),
            "nbf" => self.not_before.map(|v| Value::from(v.0)),
            "iat" => self.issued_at.map(|v| Value::from(v.0)),
            "jti" => self.jwt_id.as_ref().map(|v| Value::from(v.as_str())),
            _ => self.additional_claims.get(name).cloned(),
        }
    }

    /// Sets any claim by name. Registered claims are type-checked; a
    /// `null` value removes the claim.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), DecodeError> {
        match name {
            "iss" => self.issuer = optional_string(name, value)?,
            "sub" => self.subject = optional_string(name, value)?,
            "aud" => {
                self.audience = match value {
                    Value::Null => None,
                    other => Some(
                        serde_json::from_value(other)
                            .map_err(|_| DecodeError::from("\"aud\" must be a string or array"))?,
                    ),
                }
            }
            "exp" => self.expiration_time = optional_date(name, value)?,
            "nbf" => self.not_before = optional_date(name, value)?,
            "iat" => self.issued_at = optional_date(name, value)?,
            "jti" => self.jwt_id = optional_string(name, value)?,
            _ => {
                match value {
                    Value::Null => {
                        self.additional_claims.remove(name);
                    }
                    other => {
                        self.additional_claims.insert(name.to_string(), other);
                    }
                };
            }
        }
        Ok(())
    }
}

fn optional_string(name: &str, value: Value) -> Result<Option<String>, DecodeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(DecodeError::Malformed(
            format!("claim {name:?} must be a string").into(),
        )),
    }
}

fn optional_date(name: &str, value: Value) -> Result<Option<NumericDate>, DecodeError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(|n| Some(NumericDate(n)))
            .ok_or_else(|| {
                DecodeError::Malformed(format!("claim {name:?} must be an integer").into())
            }),
        _ => Err(DecodeError::Malformed(
            format!("claim {name:?} must be an integer").into(),
        )),
    }
}

impl ClaimsBuilder {
    pub fn additional_claim<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut additional_claims = self.additional_claims.take().unwrap_or_default();
        additional_claims.insert(key.into(), value.into());
        self.additional_claims = Some(additional_claims);
        self
    }

    pub fn try_additional_claim<K, V>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<&mut Self, serde_json::Error>
    where
        K: Into<String>,
        V: Serialize,
    {
        let value = serde_json::to_value(value)?;
        Ok(self.additional_claim(key, value))
    }

    pub fn add_audience<T: Into<String>>(&mut self, audience: T) -> &mut Self {
        let mut audiences = self.audience.take().flatten();
        match audiences.as_mut() {
            Some(audiences) => audiences.push(audience.into()),
            None => audiences = Some(StringOrStrings::String(audience.into())),
        }
        self.audience = Some(audiences);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let claims = Claims::builder()
            .issuer("https://issuer.example")
            .subject("user-1")
            .add_audience("api")
            .add_audience("web")
            .expiration_time(NumericDate(2_000_000_000))
            .additional_claim("scope", "read write")
            .build()
            .unwrap();
        assert_eq!(claims.issuer.as_deref(), Some("https://issuer.example"));
        assert!(claims.audience.as_ref().unwrap().contains("web"));
        assert_eq!(claims.get("scope"), Some(json!("read write")));
    }

    #[test]
    fn test_json_round_trip_preserves_unknown_claims() {
        let json = r#"{"iss":"a","exp":123,"custom":{"deep":[1,2]}}"#;
        let claims = Claims::from_json(json).unwrap();
        assert_eq!(claims.expiration_time, Some(NumericDate(123)));
        assert_eq!(claims.get("custom"), Some(json!({"deep": [1, 2]})));
        let back: Value = serde_json::from_str(&claims.to_json().unwrap()).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }

    #[test]
    fn test_set_and_remove() {
        let mut claims = Claims::default();
        claims.set("iss", json!("me")).unwrap();
        claims.set("exp", json!(99)).unwrap();
        claims.set("role", json!("admin")).unwrap();
        assert_eq!(claims.issuer.as_deref(), Some("me"));
        assert_eq!(claims.expiration_time, Some(NumericDate(99)));
        claims.set("role", Value::Null).unwrap();
        assert_eq!(claims.get("role"), None);
        assert!(claims.set("exp", json!("soon")).is_err());
    }
}
