use core::ops::BitOr;

use crate::error::{FetchError, UnsupportedError};

/// Flags governing remote retrieval of `x5u`, `jku`, and certificate-chain
/// URLs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchFlags(u32);

impl FetchFlags {
    pub const NONE: Self = Self(0);
    /// Do not validate the server certificate of the remote host.
    pub const IGNORE_SERVER_CERTIFICATE: Self = Self(0x01);
    /// Follow HTTP redirections.
    pub const FOLLOW_REDIRECT: Self = Self(0x02);
    /// Do not fetch at all. The engine behaves as if no URL were present,
    /// or fails with [`UnsupportedError`] when the remote material is
    /// required to proceed.
    pub const IGNORE_REMOTE: Self = Self(0x04);

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn ignore_remote(&self) -> bool {
        self.contains(Self::IGNORE_REMOTE)
    }
}

impl BitOr for FetchFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// A document retrieved from a remote URL.
#[derive(Clone, Debug)]
pub struct FetchedDocument {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Retrieves the bytes behind `x5u` and `jku` references.
///
/// The crate ships no HTTP client; production callers supply one honoring
/// [`FetchFlags`], and tests inject deterministic fetchers. Fetching is
/// synchronous and blocks the calling task.
pub trait RemoteFetch {
    fn fetch(&self, url: &url::Url, flags: FetchFlags) -> Result<FetchedDocument, FetchError>;
}

/// The default fetcher: refuses every retrieval.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFetch;

impl RemoteFetch for NoFetch {
    fn fetch(&self, url: &url::Url, _flags: FetchFlags) -> Result<FetchedDocument, FetchError> {
        Err(FetchError(format!("no fetcher configured for {url}")))
    }
}

pub(crate) fn fetch_remote(
    fetcher: &dyn RemoteFetch,
    url: &url::Url,
    flags: FetchFlags,
) -> Result<FetchedDocument, UnsupportedError> {
    if flags.ignore_remote() {
        return Err(UnsupportedError::from("remote fetching is disabled"));
    }
    fetcher
        .fetch(url, flags)
        .map_err(|e| UnsupportedError::from(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let flags = FetchFlags::FOLLOW_REDIRECT | FetchFlags::IGNORE_REMOTE;
        assert!(flags.contains(FetchFlags::FOLLOW_REDIRECT));
        assert!(flags.ignore_remote());
        assert!(!flags.contains(FetchFlags::IGNORE_SERVER_CERTIFICATE));
    }

    #[test]
    fn test_ignore_remote_short_circuits() {
        let url = url::Url::parse("https://example.com/keys").unwrap();
        let err = fetch_remote(&NoFetch, &url, FetchFlags::IGNORE_REMOTE).unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }
}
