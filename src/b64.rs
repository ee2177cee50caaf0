use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

/// URL-safe base64 without padding, per [RFC 4648 §5].
///
/// Encoding never emits `=`. Decoding accepts input with or without padding
/// and rejects any character outside `[A-Za-z0-9_-]`.
///
/// [RFC 4648 §5]: https://www.rfc-editor.org/rfc/rfc4648#section-5
pub(crate) const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Standard base64, used only for the `"x5c"` member which carries DER
/// certificates in non-url-safe base64.
pub(crate) const STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub(crate) fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(input)
}

pub(crate) fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE.decode(input)
}

pub(crate) fn decode_standard(input: impl AsRef<[u8]>) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(input)
}

pub(crate) mod url_safe {
    use base64::Engine as _;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(input: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&super::URL_SAFE.encode(input))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<Vec<u8>>,
    {
        let s = String::deserialize(deserializer)?;
        super::URL_SAFE
            .decode(s.as_bytes())
            .map(Into::into)
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) mod optional_url_safe {
    use base64::Engine as _;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(input: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        match input {
            Some(input) => serializer.serialize_str(&super::URL_SAFE.encode(input)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<Vec<u8>>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            Some(s) => super::URL_SAFE
                .decode(s.as_bytes())
                .map(|v| Some(v.into()))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

pub(crate) mod optional_seq_standard {
    use base64::Engine as _;
    use serde::{self, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(input: &Option<Vec<Vec<u8>>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match input {
            Some(input) => {
                let mut seq = serializer.serialize_seq(Some(input.len()))?;
                for der in input {
                    seq.serialize_element(&super::STANDARD.encode(der))?;
                }
                seq.end()
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<u8>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings: Option<Vec<String>> = Option::deserialize(deserializer)?;
        match strings {
            Some(strings) => strings
                .iter()
                .map(|s| super::STANDARD.decode(s.as_bytes()))
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_emits_no_padding() {
        assert_eq!(encode(b"f"), "Zg");
        assert_eq!(encode(b"fo"), "Zm8");
        assert_eq!(encode(b"foo"), "Zm9v");
    }

    #[test]
    fn test_decode_accepts_either_padding() {
        assert_eq!(decode("Zg").unwrap(), b"f");
        assert_eq!(decode("Zg==").unwrap(), b"f");
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        assert!(decode("a+b/").is_err());
        assert!(decode("a b").is_err());
    }

    #[test]
    fn test_url_safe_alphabet() {
        let bytes = vec![0xfb, 0xef, 0xbe];
        let encoded = encode(&bytes);
        assert_eq!(encoded, "----");
        assert_eq!(decode(&encoded).unwrap(), bytes);
    }
}
