use core::ops::BitOr;

/// The three JOSE serialization shapes.
///
/// [RFC 7515 §3](https://www.rfc-editor.org/rfc/rfc7515#section-3),
/// [RFC 7516 §3](https://www.rfc-editor.org/rfc/rfc7516#section-3)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Serialization {
    /// Dot-separated base64url segments.
    #[default]
    Compact,
    /// A JSON object with a single inlined signature or recipient.
    Flattened,
    /// A JSON object with an array of signatures or recipients.
    General,
}

/// Flags governing what a parser may take from the token itself.
///
/// By default any verification material supplied inside the header
/// (`jwk`, `jku`, `x5c`, `x5u`) is ignored, so an attacker cannot ship a
/// token vouched for only by itself. Callers opt in per source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseFlags(u32);

impl ParseFlags {
    pub const NONE: Self = Self(0);
    /// Allow a header-embedded `"jwk"` to join the verification keys.
    pub const HEADER_JWK: Self = Self(0x01);
    /// Allow a header `"jku"` URL to be fetched for verification keys.
    pub const HEADER_JKU: Self = Self(0x02);
    /// Allow a header `"x5c"` chain to supply the verification key.
    pub const HEADER_X5C: Self = Self(0x04);
    /// Allow a header `"x5u"` URL to be fetched for the verification key.
    pub const HEADER_X5U: Self = Self(0x08);
    pub const HEADER_ALL: Self = Self(0x0f);
    /// Permit `"alg": "none"` tokens. They parse but never verify.
    pub const UNSIGNED: Self = Self(0x10);
    pub const ALL: Self = Self(0x1f);

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ParseFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let flags = ParseFlags::HEADER_JWK | ParseFlags::UNSIGNED;
        assert!(flags.contains(ParseFlags::HEADER_JWK));
        assert!(!flags.contains(ParseFlags::HEADER_X5U));
        assert!(ParseFlags::ALL.contains(ParseFlags::HEADER_ALL));
        assert!(ParseFlags::ALL.contains(ParseFlags::UNSIGNED));
        assert!(!ParseFlags::HEADER_ALL.contains(ParseFlags::UNSIGNED));
    }
}
