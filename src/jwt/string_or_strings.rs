use core::fmt::Display;

use serde::{de::Visitor, Deserialize, Serialize};

/// A claim value that is either a single string or an array of strings,
/// as the `"aud"` claim allows.
///
/// <https://www.rfc-editor.org/rfc/rfc7519#section-4.1.3>
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringOrStrings {
    String(String),
    Strings(Vec<String>),
}

impl StringOrStrings {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::String(s) => s == value,
            Self::Strings(v) => v.iter().any(|s| s == value),
        }
    }

    pub fn push(&mut self, value: String) {
        match self {
            Self::String(s) => {
                *self = Self::Strings(vec![core::mem::take(s), value]);
            }
            Self::Strings(v) => v.push(value),
        }
    }

    pub fn as_vec(&self) -> Vec<&str> {
        match self {
            Self::String(s) => vec![s],
            Self::Strings(v) => v.iter().map(|s| s.as_str()).collect(),
        }
    }
}

impl Display for StringOrStrings {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Strings(v) => write!(f, "{}", v.join(", ")),
        }
    }
}

impl Serialize for StringOrStrings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Strings(v) => serializer.collect_seq(v),
        }
    }
}

impl<'de> Deserialize<'de> for StringOrStrings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct StringOrStringsVisitor;

        impl<'de> Visitor<'de> for StringOrStringsVisitor {
            type Value = StringOrStrings;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a string or an array of strings")
            }
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(StringOrStrings::String(v.to_string()))
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut strings = Vec::new();
                while let Some(s) = seq.next_element()? {
                    strings.push(s);
                }
                Ok(StringOrStrings::Strings(strings))
            }
        }

        deserializer.deserialize_any(StringOrStringsVisitor)
    }
}

impl From<String> for StringOrStrings {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
impl From<&str> for StringOrStrings {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}
impl From<Vec<String>> for StringOrStrings {
    fn from(v: Vec<String>) -> Self {
        Self::Strings(v)
    }
}
impl From<Vec<&str>> for StringOrStrings {
    fn from(v: Vec<&str>) -> Self {
        Self::Strings(v.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_both_shapes() {
        let single: StringOrStrings = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(single, StringOrStrings::String("api".to_string()));
        let many: StringOrStrings = serde_json::from_str(r#"["api","web"]"#).unwrap();
        assert!(many.contains("web"));
        assert_eq!(serde_json::to_string(&single).unwrap(), "\"api\"");
        assert_eq!(serde_json::to_string(&many).unwrap(), r#"["api","web"]"#);
    }

    #[test]
    fn test_push_promotes_to_array() {
        let mut aud = StringOrStrings::from("one");
        aud.push("two".to_string());
        assert_eq!(aud.as_vec(), vec!["one", "two"]);
    }
}
