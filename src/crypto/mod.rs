//! Cryptographic collaborators of the hasher.
//!
//! Provides the HMAC algorithm table, PBKDF2 key derivation and salt generation.

pub mod algorithm;
pub mod kdf;
pub mod random;

pub use algorithm::Algorithm;
pub use kdf::{Pbkdf2Params, derive_key};
pub use random::generate_salt;

/// Smallest salt the hasher accepts (8 bytes).
pub const MIN_SALT_LEN: usize = 8;
/// Default salt length (16 bytes).
pub const DEFAULT_SALT_LEN: usize = 16;
/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 10_000;
