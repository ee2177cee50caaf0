use core::fmt::Display;

use serde::{Deserialize, Serialize};

/// The `"typ"` header parameter. `"JWT"` for tokens produced here; other
/// media types are carried verbatim.
///
/// <https://www.rfc-editor.org/rfc/rfc7519#section-5.1>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenType {
    Jwt,
    Other(String),
}

impl TokenType {
    pub fn new(s: &str) -> Self {
        Self::from(s)
    }

    pub fn is_jwt(&self) -> bool {
        matches!(self, TokenType::Jwt)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Jwt => "JWT",
            TokenType::Other(s) => s.as_str(),
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for TokenType {
    fn from(s: &str) -> Self {
        // "application/jwt" and bare "JWT" are equivalent per RFC 7515 §4.1.9
        match s.to_uppercase().as_str() {
            "JWT" | "APPLICATION/JWT" => TokenType::Jwt,
            _ => TokenType::Other(s.to_string()),
        }
    }
}

impl From<String> for TokenType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<TokenType> for String {
    fn from(t: TokenType) -> Self {
        t.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_detection() {
        assert!(TokenType::from("JWT").is_jwt());
        assert!(TokenType::from("jwt").is_jwt());
        assert!(TokenType::from("application/jwt").is_jwt());
        assert!(!TokenType::from("JOSE+JSON").is_jwt());
    }
}
