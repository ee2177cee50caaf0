use rand_core::{CryptoRng, OsRng, RngCore};

/// A random number generator backed by the operating system's CSPRNG,
/// reached through [rand_core's `OsRng`](https://docs.rs/rand_core/0.6/rand_core/struct.OsRng.html).
///
/// Every random value the crate produces — content-encryption keys,
/// initialization vectors, PBES2 salts, ephemeral key-agreement keys,
/// generated key ids — comes from this source.
#[derive(Clone, Copy, Debug, Default)]
pub struct Random;

impl CryptoRng for Random {}

impl Random {
    pub fn new() -> Self {
        Self
    }

    pub fn fill(dst: &mut [u8]) {
        OsRng.fill_bytes(dst)
    }

    pub fn vec(len: usize) -> Vec<u8> {
        let mut v = vec![0u8; len];
        Self::fill(&mut v);
        v
    }
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        OsRng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        OsRng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        OsRng.try_fill_bytes(dest)
    }
}
