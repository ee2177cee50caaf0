use core::ops::Deref;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Secret key material: the private JWK members (`d`, `p`, `q`, `dp`,
/// `dq`, `qi`, `k`) and content-encryption keys.
///
/// The buffer is zeroized on drop, `Debug` and `Display` redact, and
/// equality is constant-time — two JWKs differing only in secret
/// members compare without revealing how much of the secret matched.
#[derive(Clone, Default)]
pub struct Bytes(Zeroizing<Vec<u8>>);

impl Bytes {
    pub(crate) fn new(bytes: &[u8]) -> Self {
        Self(Zeroizing::new(bytes.to_vec()))
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn as_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl core::fmt::Debug for Bytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Sensitive").field(&"***").finish()
    }
}

impl core::fmt::Display for Bytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "***")
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl Deref for Bytes {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).unwrap_u8() == 1
    }
}
impl Eq for Bytes {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts() {
        let bytes = Bytes::new(b"super secret");
        assert_eq!(format!("{bytes:?}"), "Sensitive(\"***\")");
        assert_eq!(format!("{bytes}"), "***");
    }

    #[test]
    fn test_equality() {
        let a = Bytes::new(b"the same");
        let b = Bytes::from(b"the same".to_vec());
        assert_eq!(a, b);
        assert_ne!(a, Bytes::new(b"different"));
        assert_ne!(a, Bytes::new(b"the sam"));
    }
}
