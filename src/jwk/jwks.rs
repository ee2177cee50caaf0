use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::KeyError,
    fetch::{fetch_remote, FetchFlags, RemoteFetch},
    jws,
};

use super::Jwk;

/// A JSON Web Key Set: an ordered sequence of JWKs wrapped in
/// `{"keys":[…]}`. Order is insertion order and is preserved across
/// serialization; equality is element-by-element in order.
///
/// <https://www.rfc-editor.org/rfc/rfc7517#section-5>
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

impl Jwks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, KeyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fetches and parses a remote key set behind a `jku` URL.
    pub fn from_jku(
        fetcher: &dyn RemoteFetch,
        flags: FetchFlags,
        url: &url::Url,
    ) -> Result<Self, KeyError> {
        let doc = fetch_remote(fetcher, url, flags).map_err(|e| KeyError(e.to_string()))?;
        let json = core::str::from_utf8(&doc.bytes)
            .map_err(|e| KeyError(format!("jku document is not UTF-8: {e}")))?;
        Self::from_json(json)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Jwk> {
        self.keys.get(index)
    }

    /// The first key carrying the given `"kid"`.
    pub fn get_by_kid(&self, kid: &str) -> Option<&Jwk> {
        self.keys
            .iter()
            .find(|jwk| jwk.key_id.as_deref() == Some(kid))
    }

    pub fn push(&mut self, jwk: Jwk) {
        self.keys.push(jwk);
    }

    /// Replaces the key at `index`. Out-of-range indexes are refused.
    pub fn set(&mut self, index: usize, jwk: Jwk) -> Result<(), KeyError> {
        match self.keys.get_mut(index) {
            Some(slot) => {
                *slot = jwk;
                Ok(())
            }
            None => Err(KeyError(format!("index {index} is out of range"))),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<Jwk, KeyError> {
        if index >= self.keys.len() {
            return Err(KeyError(format!("index {index} is out of range")));
        }
        Ok(self.keys.remove(index))
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Jwk> {
        self.keys.iter()
    }

    /// A new set holding every key that matches the template, in order.
    pub fn search(&self, template: &Value) -> Jwks {
        Jwks {
            keys: self
                .keys
                .iter()
                .filter(|jwk| jwk.matches(template))
                .cloned()
                .collect(),
        }
    }

    /// Selects a verification or decryption candidate: keys with a
    /// matching `"kid"` first, then keys whose declared or inferred
    /// algorithm matches, then the remaining keys in insertion order.
    pub(crate) fn candidates<'a>(
        &'a self,
        kid: Option<&'a str>,
        alg: Option<jws::Algorithm>,
    ) -> Vec<&'a Jwk> {
        let mut out: Vec<&Jwk> = Vec::with_capacity(self.keys.len());
        if let Some(kid) = kid {
            out.extend(
                self.keys
                    .iter()
                    .filter(|jwk| jwk.key_id.as_deref() == Some(kid)),
            );
        }
        if let Some(alg) = alg {
            for jwk in &self.keys {
                if jwk.signature_algorithm() == Some(alg)
                    && !out.iter().any(|candidate| core::ptr::eq(*candidate, jwk))
                {
                    out.push(jwk);
                }
            }
        }
        for jwk in &self.keys {
            if !out.iter().any(|candidate| core::ptr::eq(*candidate, jwk)) {
                out.push(jwk);
            }
        }
        out
    }
}

impl From<Vec<Jwk>> for Jwks {
    fn from(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }
}

impl From<Jwk> for Jwks {
    fn from(jwk: Jwk) -> Self {
        Self { keys: vec![jwk] }
    }
}

impl FromIterator<Jwk> for Jwks {
    fn from_iter<T: IntoIterator<Item = Jwk>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Jwks {
    type Item = &'a Jwk;
    type IntoIter = core::slice::Iter<'a, Jwk>;
    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Jwks {
        Jwks::from_json(
            r#"{"keys":[
                {"kty":"oct","kid":"a","k":"AQID"},
                {"kty":"oct","kid":"b","use":"sig","k":"BAUG"},
                {"kty":"oct","kid":"a","k":"BwgJ"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_wrapper_shape() {
        let jwks = sample();
        assert_eq!(jwks.len(), 3);
        let json: Value = serde_json::from_str(&jwks.to_json().unwrap()).unwrap();
        assert!(json.get("keys").unwrap().is_array());
    }

    #[test]
    fn test_get_by_kid_returns_first_match() {
        let jwks = sample();
        let jwk = jwks.get_by_kid("a").unwrap();
        assert_eq!(jwk.symmetric_key(), Some(&[1u8, 2, 3][..]));
        assert!(jwks.get_by_kid("missing").is_none());
    }

    #[test]
    fn test_search_returns_matching_subset() {
        let jwks = sample();
        let hits = jwks.search(&json!({"kid": "a"}));
        assert_eq!(hits.len(), 2);
        let hits = jwks.search(&json!({"use": "sig"}));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.get(0).unwrap().key_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_mutation() {
        let mut jwks = sample();
        jwks.remove(0).unwrap();
        assert_eq!(jwks.len(), 2);
        assert!(jwks.remove(10).is_err());
        jwks.set(0, Jwk::from_symmetric(b"zz")).unwrap();
        assert_eq!(jwks.get(0).unwrap().symmetric_key(), Some(&b"zz"[..]));
        jwks.clear();
        assert!(jwks.is_empty());
    }

    #[test]
    fn test_structural_equality_is_ordered() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a, b);
        let first = b.remove(0).unwrap();
        b.push(first);
        assert_ne!(a, b);
    }

    #[test]
    fn test_candidates_prefer_kid() {
        let jwks = sample();
        let candidates = jwks.candidates(Some("b"), None);
        assert_eq!(candidates[0].key_id.as_deref(), Some("b"));
        assert_eq!(candidates.len(), 3);
    }
}
