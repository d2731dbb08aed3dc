use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HashError;

/// HMAC digest used as the PBKDF2 pseudo-random function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    /// Legacy. Accepted when parsing, never produced by the hasher.
    Md5,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Md5,
    ];

    /// Natural digest length in bytes, used as the derived key length for new hashes.
    pub const fn output_len(self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
        }
    }

    /// Lowercase algorithm name.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Md5 => "md5",
        }
    }

    /// Identifier suffix after `pbkdf2-`. SHA1 is the unsuffixed default.
    pub const fn suffix(self) -> Option<&'static str> {
        match self {
            Algorithm::Sha1 => None,
            other => Some(other.name()),
        }
    }

    /// Inverse of [`Algorithm::suffix`]. Matching is exact: `Some("")`,
    /// `Some("sha1")` and upper-case names are rejected.
    pub fn from_suffix(suffix: Option<&str>) -> Option<Self> {
        match suffix {
            None => Some(Algorithm::Sha1),
            Some("sha256") => Some(Algorithm::Sha256),
            Some("sha384") => Some(Algorithm::Sha384),
            Some("sha512") => Some(Algorithm::Sha512),
            Some("md5") => Some(Algorithm::Md5),
            Some(_) => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| HashError::UnsupportedAlgorithm(s.to_string()))
    }
}
