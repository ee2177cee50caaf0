use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{error::DecodeError, strings::to_upper_remove_seperators};

/// The `"zip"` (compression) header parameter.
///
/// <https://www.rfc-editor.org/rfc/rfc7516#section-4.1.3>
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Zip {
    /// DEFLATE, RFC 1951.
    Deflate,
    Other(String),
}

impl Zip {
    pub fn as_str(&self) -> &str {
        match self {
            Zip::Deflate => "DEF",
            Zip::Other(s) => s,
        }
    }
}

impl From<&str> for Zip {
    fn from(s: &str) -> Self {
        match to_upper_remove_seperators(s).as_str() {
            "DEF" => Self::Deflate,
            _ => Self::Other(s.to_string()),
        }
    }
}
impl From<String> for Zip {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
impl From<&String> for Zip {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}
impl From<Zip> for String {
    fn from(zip: Zip) -> Self {
        zip.as_str().to_string()
    }
}
impl FromStr for Zip {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Decompressed plaintext is capped so a hostile token cannot balloon.
const INFLATE_LIMIT: usize = 32 * 1024 * 1024;

pub(crate) fn deflate(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec(data, 6)
}

pub(crate) fn inflate(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    miniz_oxide::inflate::decompress_to_vec_with_limit(data, INFLATE_LIMIT)
        .map_err(|e| DecodeError::from(format!("DEFLATE stream did not decompress: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let data = b"The true sign of intelligence is not knowledge but imagination.".repeat(20);
        let compressed = deflate(&data);
        assert!(compressed.len() < data.len());
        assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn test_inflate_rejects_garbage() {
        assert!(inflate(&[0xff, 0x00, 0xab]).is_err());
    }

    #[test]
    fn test_wire_name() {
        let zip: Zip = serde_json::from_str("\"DEF\"").unwrap();
        assert_eq!(zip, Zip::Deflate);
        assert_eq!(serde_json::to_string(&Zip::Deflate).unwrap(), "\"DEF\"");
    }
}
