//! Producing new password hashes.

use tracing::debug;

use crate::crypto::{Algorithm, Pbkdf2Params, derive_key, generate_salt};
use crate::error::Result;
use crate::format::pbkdf2::Pbkdf2Content;
use crate::hash::{PasswordHash, Pbkdf2Hash};

/// Computes a fresh hash of a password.
pub trait PasswordHasher {
    type Output: PasswordHash;

    /// Hashes `password` with a newly generated salt.
    fn hash(&self, password: &str) -> Result<Self::Output>;
}

/// PBKDF2 hasher with a fixed salt size, iteration count and algorithm.
///
/// ```
/// use mcfhash::{Algorithm, PasswordHash, PasswordHasher, Pbkdf2Hasher, Pbkdf2Params};
///
/// let hasher = Pbkdf2Hasher::new(Pbkdf2Params::new(16, 1_000, Algorithm::Sha256)?)?;
/// let hash = hasher.hash("hunter2")?;
///
/// assert!(hash.to_string().starts_with("$pbkdf2-sha256$1000$"));
/// assert!(hash.verify("hunter2")?);
/// # Ok::<(), mcfhash::HashError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pbkdf2Hasher {
    params: Pbkdf2Params,
    derived_key_len: usize,
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        let params = Pbkdf2Params::default();
        Self {
            params,
            derived_key_len: params.algorithm().output_len(),
        }
    }
}

impl Pbkdf2Hasher {
    /// # Errors
    ///
    /// Returns a configuration error if the parameters are out of range or
    /// name an algorithm the hasher does not produce.
    pub fn new(params: Pbkdf2Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            derived_key_len: params.algorithm().output_len(),
        })
    }

    pub fn params(&self) -> &Pbkdf2Params {
        &self.params
    }

    pub fn salt_size(&self) -> usize {
        self.params.salt_size()
    }

    pub fn iterations(&self) -> u32 {
        self.params.iterations()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.params.algorithm()
    }

    /// Length of the derived key written into new hashes.
    pub fn derived_key_len(&self) -> usize {
        self.derived_key_len
    }
}

impl PasswordHasher for Pbkdf2Hasher {
    type Output = Pbkdf2Hash;

    fn hash(&self, password: &str) -> Result<Pbkdf2Hash> {
        debug!(
            algorithm = %self.algorithm(),
            iterations = self.iterations(),
            salt_size = self.salt_size(),
            "hashing password"
        );

        let salt = generate_salt(self.salt_size())?;
        let key = derive_key(
            password.as_bytes(),
            &salt,
            self.iterations(),
            self.algorithm(),
            self.derived_key_len,
        )?;

        let content = Pbkdf2Content::new(self.iterations(), salt, key.to_vec())?;
        Ok(Pbkdf2Hash::new(self.algorithm(), content))
    }
}
