use hmac::Hmac;
use md5::Md5;
use pbkdf2::pbkdf2;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::{Algorithm, DEFAULT_ITERATIONS, DEFAULT_SALT_LEN, MIN_SALT_LEN};
use crate::error::{HashError, Result};

/// Parameters of the PBKDF2 hasher.
///
/// Missing fields fall back to the defaults when deserialized, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pbkdf2Params {
    salt_size: usize,
    iterations: u32,
    algorithm: Algorithm,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            salt_size: DEFAULT_SALT_LEN,
            iterations: DEFAULT_ITERATIONS,
            algorithm: Algorithm::Sha1,
        }
    }
}

impl Pbkdf2Params {
    pub fn new(salt_size: usize, iterations: u32, algorithm: Algorithm) -> Result<Self> {
        let params = Self {
            salt_size,
            iterations,
            algorithm,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn salt_size(&self) -> usize {
        self.salt_size
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn validate(&self) -> Result<()> {
        if self.salt_size < MIN_SALT_LEN {
            return Err(HashError::SaltTooShort {
                min: MIN_SALT_LEN,
                actual: self.salt_size,
            });
        }
        if self.iterations < 1 {
            return Err(HashError::InvalidIterationCount);
        }
        if self.algorithm == Algorithm::Md5 {
            return Err(HashError::UnsupportedAlgorithm(self.algorithm.to_string()));
        }
        Ok(())
    }
}

/// Derive `len` bytes with PBKDF2-HMAC over `algorithm`.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    algorithm: Algorithm,
    len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if iterations < 1 {
        return Err(HashError::InvalidIterationCount);
    }

    let mut key = Zeroizing::new(vec![0u8; len]);
    let out = key.as_mut_slice();

    match algorithm {
        Algorithm::Sha1 => pbkdf2::<Hmac<Sha1>>(password, salt, iterations, out),
        Algorithm::Sha256 => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, out),
        Algorithm::Sha384 => pbkdf2::<Hmac<Sha384>>(password, salt, iterations, out),
        Algorithm::Sha512 => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, out),
        Algorithm::Md5 => pbkdf2::<Hmac<Md5>>(password, salt, iterations, out),
    }
    .map_err(|_| HashError::KeyDerivation)?;

    Ok(key)
}
