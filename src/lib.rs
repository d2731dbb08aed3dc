//! PBKDF2 password hashes in modular crypt format.
//!
//! ```text
//! $pbkdf2-sha256$10000$<ab64 salt>$<ab64 derived key>
//! ```
//!
//! Hash a password with [`Pbkdf2Hasher`], store the `Display` output, and
//! check candidates later with [`verify`].

pub mod config;
pub mod crypto;
pub mod error;
pub mod format;
pub mod hash;
pub mod hasher;
pub mod registry;

pub use crate::config::{ConfigFile, default_config};
pub use crate::crypto::{Algorithm, Pbkdf2Params};
pub use crate::error::{HashError, Result};
pub use crate::format::{Envelope, pbkdf2::Pbkdf2Content};
pub use crate::hash::{PasswordHash, Pbkdf2Hash};
pub use crate::hasher::{PasswordHasher, Pbkdf2Hasher};
pub use crate::registry::Registry;

/// Parses any hash string a built-in family understands.
pub fn parse(text: &str) -> Option<Box<dyn PasswordHash>> {
    Registry::global().parse(text)
}

/// Checks `password` against a stored hash string.
///
/// # Errors
///
/// [`HashError::Format`] if `text` is not a recognised hash.
pub fn verify(password: &str, text: &str) -> Result<bool> {
    Registry::global().verify(password, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_sha1() {
        let hasher = Pbkdf2Hasher::new(Pbkdf2Params::new(8, 2, Algorithm::Sha1).unwrap()).unwrap();
        let stored = hasher.hash("foo").unwrap().to_string();

        assert!(stored.starts_with("$pbkdf2$2$"));
        assert!(verify("foo", &stored).unwrap());
        assert!(!verify("bar", &stored).unwrap());
    }

    #[test]
    fn known_sha1_hash() {
        let text = "$pbkdf2$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4";
        let hash = Pbkdf2Hash::parse(text).unwrap();

        assert_eq!(hash.iterations(), 2);
        assert_eq!(hash.salt(), [0u8; 8]);
        assert_eq!(hash.algorithm(), Algorithm::Sha1);
        assert!(verify("foo", text).unwrap());
    }

    #[test]
    fn known_sha256_hash() {
        let text = "$pbkdf2-sha256$2$AAAAAAAAAAA$GsyZFvH1KkJzOCU3pHFuMArmlXdON1uJo8VheAB3BSo";
        let hash = parse(text).unwrap();

        assert_eq!(hash.id(), "pbkdf2-sha256");
        assert!(hash.verify("foo").unwrap());
        assert!(!verify("bar", text).unwrap());
    }

    #[test]
    fn malformed_strings_do_not_parse() {
        for text in [
            "",
            "pbkdf2$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4",
            "$pbkdf2$2$AAAAAAAAAAA",
            "$pbkdf2$0$AA$AA",
            "$pbkdf2$a$AA$AA",
        ] {
            assert!(parse(text).is_none(), "{text:?}");
            assert!(matches!(verify("foo", text), Err(HashError::Format)));
        }
    }
}
