//! Content of a PBKDF2 hash string.
//!
//! ```text
//! ITERATIONS $ AB64(SALT) $ AB64(DERIVED_KEY)
//! ```

use std::fmt;

use subtle::ConstantTimeEq;
use tracing::trace;
use zeroize::Zeroize;

use super::{SEPARATOR, ab64};
use crate::error::{HashError, Result};

/// Iteration count, salt and derived key of a PBKDF2 hash.
#[derive(Clone)]
pub struct Pbkdf2Content {
    iterations: u32,
    salt: Vec<u8>,
    derived_key: Vec<u8>,
}

impl Drop for Pbkdf2Content {
    fn drop(&mut self) {
        self.derived_key.zeroize();
    }
}

impl Pbkdf2Content {
    /// Creates content from its components.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidIterationCount`] if `iterations` is zero.
    pub fn new(iterations: u32, salt: Vec<u8>, derived_key: Vec<u8>) -> Result<Self> {
        if iterations < 1 {
            return Err(HashError::InvalidIterationCount);
        }
        Ok(Self {
            iterations,
            salt,
            derived_key,
        })
    }

    /// Returns the PBKDF2 iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Returns the salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the stored derived key.
    pub fn derived_key(&self) -> &[u8] {
        &self.derived_key
    }

    /// Parses `iterations$salt$key`.
    ///
    /// Unlike the envelope, the content is split on every `$` and must have
    /// exactly three fields.
    pub fn parse(content: &str) -> Option<Self> {
        let fields: Vec<&str> = content.split(SEPARATOR).collect();
        let &[iterations, salt, derived_key] = fields.as_slice() else {
            trace!(fields = fields.len(), "pbkdf2 content needs 3 fields");
            return None;
        };

        let iterations = match iterations.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => {
                trace!(iterations, "invalid pbkdf2 iteration count");
                return None;
            }
        };

        let salt = ab64::decode(salt)
            .inspect_err(|e| trace!(error = %e, "invalid pbkdf2 salt encoding"))
            .ok()?;
        let derived_key = ab64::decode(derived_key)
            .inspect_err(|e| trace!(error = %e, "invalid pbkdf2 key encoding"))
            .ok()?;

        Some(Self {
            iterations,
            salt,
            derived_key,
        })
    }
}

impl fmt::Display for Pbkdf2Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.iterations,
            ab64::encode(&self.salt),
            ab64::encode(&self.derived_key)
        )
    }
}

impl fmt::Debug for Pbkdf2Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pbkdf2Content")
            .field("iterations", &self.iterations)
            .field("salt", &ab64::encode(&self.salt))
            .field("derived_key", &format_args!("[{} bytes]", self.derived_key.len()))
            .finish()
    }
}

// Constant-time comparison
impl PartialEq for Pbkdf2Content {
    fn eq(&self, other: &Self) -> bool {
        self.iterations == other.iterations
            && bool::from(self.salt.ct_eq(&other.salt))
            && bool::from(self.derived_key.ct_eq(&other.derived_key))
    }
}

impl Eq for Pbkdf2Content {}
