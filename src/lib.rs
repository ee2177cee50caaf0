//! JOSE cryptographic APIs: JSON Web Keys, Signatures, Encryption, and
//! Tokens, per RFCs 7515–7519, 7638, 8037, and 8812.
//!
//! The crate is organized around the four wire objects:
//!
//! - [`jwk::Jwk`] / [`jwk::Jwks`] — typed keys and key sets, with JSON,
//!   PEM/DER, certificate, and raw imports; generation; thumbprints.
//! - [`jws::Jws`] — signing and verification in compact, flattened, and
//!   general serializations.
//! - [`jwe::Jwe`] — content encryption with the full key-management
//!   algorithm table (RSA, AES-KW, AES-GCM-KW, direct, ECDH-ES, PBES2).
//! - [`jwt::Jwt`] — the orchestrator composing signatures and encryption
//!   into signed, encrypted, and nested tokens, with claim validation.
//!
//! Secret material is zeroized on drop, MAC and tag comparisons are
//! constant-time, and verification material embedded in a token's own
//! header is ignored unless the matching [`ParseFlags`] bit was given.

mod b64;
mod sensitive;
mod serialization;
mod strings;

pub mod error;
pub mod fetch;
pub mod jwe;
pub mod jwk;
pub mod jws;
pub mod jwt;

mod rand;
pub use rand::Random;

pub use sensitive::Bytes;
pub use serialization::{ParseFlags, Serialization};
