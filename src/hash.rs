//! Parsed password hashes.

use std::fmt;

use subtle::ConstantTimeEq;
use tracing::{debug, trace};

use crate::crypto::{Algorithm, derive_key};
use crate::error::Result;
use crate::format::{Envelope, ID_SEPARATOR, pbkdf2::Pbkdf2Content};

/// A stored password hash that can check candidate passwords.
///
/// `Display` produces the string to persist.
pub trait PasswordHash: fmt::Display + fmt::Debug + Send + Sync {
    /// Identifier written between the first two `$`.
    fn id(&self) -> &str;

    /// Returns `true` if `password` hashes to the stored value.
    fn verify(&self, password: &str) -> Result<bool>;
}

/// A PBKDF2 hash: `$pbkdf2[-<algorithm>]$<iterations>$<salt>$<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbkdf2Hash {
    algorithm: Algorithm,
    envelope: Envelope<Pbkdf2Content>,
}

impl Pbkdf2Hash {
    /// Identifier prefix shared by all PBKDF2 variants.
    pub const ID_PREFIX: &'static str = "pbkdf2";

    pub fn new(algorithm: Algorithm, content: Pbkdf2Content) -> Self {
        Self {
            algorithm,
            envelope: Envelope {
                id: Self::id_for(algorithm),
                content,
            },
        }
    }

    /// `pbkdf2` for SHA1, `pbkdf2-<name>` for everything else.
    pub fn id_for(algorithm: Algorithm) -> String {
        match algorithm.suffix() {
            None => Self::ID_PREFIX.to_string(),
            Some(suffix) => format!("{}{ID_SEPARATOR}{suffix}", Self::ID_PREFIX),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn content(&self) -> &Pbkdf2Content {
        self.envelope.content()
    }

    pub fn iterations(&self) -> u32 {
        self.content().iterations()
    }

    pub fn salt(&self) -> &[u8] {
        self.content().salt()
    }

    pub fn derived_key(&self) -> &[u8] {
        self.content().derived_key()
    }

    /// Parses a PBKDF2 hash string.
    ///
    /// The identifier must be `pbkdf2` or `pbkdf2-` followed by a known
    /// algorithm suffix. Unknown suffixes are rejected rather than treated as
    /// SHA1.
    pub fn parse(text: &str) -> Option<Self> {
        let envelope = Envelope::parse(text)?;

        let (prefix, suffix) = match envelope.id().split_once(ID_SEPARATOR) {
            Some((prefix, suffix)) => (prefix, Some(suffix)),
            None => (envelope.id(), None),
        };
        if prefix != Self::ID_PREFIX {
            trace!(id = envelope.id(), "not a pbkdf2 identifier");
            return None;
        }
        let Some(algorithm) = Algorithm::from_suffix(suffix) else {
            trace!(id = envelope.id(), "unknown pbkdf2 algorithm");
            return None;
        };

        let content = Pbkdf2Content::parse(envelope.content())?;
        Some(Self::new(algorithm, content))
    }
}

impl PasswordHash for Pbkdf2Hash {
    fn id(&self) -> &str {
        self.envelope.id()
    }

    /// Re-derives with the stored salt, iteration count and algorithm.
    ///
    /// The output length is the length of the stored key, not the algorithm's
    /// digest length, so truncated or extended keys still verify.
    fn verify(&self, password: &str) -> Result<bool> {
        debug!(
            algorithm = %self.algorithm,
            iterations = self.iterations(),
            key_len = self.derived_key().len(),
            "verifying pbkdf2 hash"
        );

        let derived = derive_key(
            password.as_bytes(),
            self.salt(),
            self.iterations(),
            self.algorithm,
            self.derived_key().len(),
        )?;

        Ok(derived.ct_eq(self.derived_key()).into())
    }
}

impl fmt::Display for Pbkdf2Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.envelope, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA1_FOO: &str = "$pbkdf2$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4";
    const SHA256_FOO: &str =
        "$pbkdf2-sha256$2$AAAAAAAAAAA$GsyZFvH1KkJzOCU3pHFuMArmlXdON1uJo8VheAB3BSo";
    const SHA384_FOO: &str = "$pbkdf2-sha384$2$AAAAAAAAAAA$RwuJsaZnOAXBmNaJMEwf/EpyhFOSjRSrYECYNlRiJXfun5tKrWEjY8Z/tBVw.U5u";
    const SHA512_FOO: &str = "$pbkdf2-sha512$2$AAAAAAAAAAA$gARLBIWimddatzhOPHBsiwKx8gsv4vxc9AfyjTuOPsvcdiu9daIhrFm7tnn5ehMLAwiW.b/LjZbc6vVhV.4olQ";
    const MD5_FOO: &str = "$pbkdf2-md5$2$AAAAAAAAAAA$tsQoL6bwmh/.Y5tNUsOmJQ";

    fn hash(algorithm: Algorithm, iterations: u32, salt: &[u8], key: &[u8]) -> Pbkdf2Hash {
        Pbkdf2Hash::new(
            algorithm,
            Pbkdf2Content::new(iterations, salt.to_vec(), key.to_vec()).unwrap(),
        )
    }

    #[test]
    fn id_depends_on_algorithm() {
        assert_eq!(Pbkdf2Hash::id_for(Algorithm::Sha1), "pbkdf2");
        assert_eq!(Pbkdf2Hash::id_for(Algorithm::Sha256), "pbkdf2-sha256");
        assert_eq!(Pbkdf2Hash::id_for(Algorithm::Sha384), "pbkdf2-sha384");
        assert_eq!(Pbkdf2Hash::id_for(Algorithm::Sha512), "pbkdf2-sha512");
        assert_eq!(Pbkdf2Hash::id_for(Algorithm::Md5), "pbkdf2-md5");
    }

    #[test]
    fn display_formats_envelope() {
        let h = hash(Algorithm::Sha256, 2, &[0x01], &[0x02]);
        assert_eq!(h.to_string(), "$pbkdf2-sha256$2$AQ$Ag");
        assert_eq!(h.id(), "pbkdf2-sha256");
    }

    #[test]
    fn parse_sha1_vector() {
        let h = Pbkdf2Hash::parse(SHA1_FOO).unwrap();
        assert_eq!(h.algorithm(), Algorithm::Sha1);
        assert_eq!(h.iterations(), 2);
        assert_eq!(h.salt(), [0u8; 8]);
        assert_eq!(h.derived_key().len(), 20);
        assert_eq!(h.to_string(), SHA1_FOO);
        assert!(h.verify("foo").unwrap());
        assert!(!h.verify("bar").unwrap());
    }

    #[test]
    fn parse_suffixed_vectors() {
        for (text, algorithm) in [
            (SHA256_FOO, Algorithm::Sha256),
            (SHA384_FOO, Algorithm::Sha384),
            (SHA512_FOO, Algorithm::Sha512),
            (MD5_FOO, Algorithm::Md5),
        ] {
            let h = Pbkdf2Hash::parse(text).unwrap();
            assert_eq!(h.algorithm(), algorithm);
            assert_eq!(h.derived_key().len(), algorithm.output_len());
            assert_eq!(h.to_string(), text);
            assert!(h.verify("foo").unwrap(), "{text}");
            assert!(!h.verify("bar").unwrap(), "{text}");
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        for text in [
            "",
            "pbkdf2$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4",
            "$bkdf2$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4",
            "$pbkdf2$2$AAAAAAAAAAAev5EySepVq1cQ/aiG5axjtiH.s4",
            "$pbkdf2$2$AAAAAAAAAAA",
            "$pbkdf2-$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4",
            "$pbkdf2-sha1$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4",
            "$pbkdf2-sha128$2$AAAAAAAAAAA$ev5EySepVq1cQ/aiG5axjtiH.s4",
            "$pbkdf2-SHA256$2$AAAAAAAAAAA$GsyZFvH1KkJzOCU3pHFuMArmlXdON1uJo8VheAB3BSo",
            "$pbkdf2$0$AA$AA",
            "$pbkdf2$a$AA$AA",
            "$pbkdf2$2$A$AA",
        ] {
            assert_eq!(Pbkdf2Hash::parse(text), None, "{text:?}");
        }
    }

    #[test]
    fn verify_uses_stored_key_length() {
        // first 10 bytes of the SHA1 vector key
        let h = Pbkdf2Hash::parse("$pbkdf2$2$AAAAAAAAAAA$ev5EySepVq1cQw").unwrap();
        assert_eq!(h.derived_key().len(), 10);
        assert!(h.verify("foo").unwrap());
        assert!(!h.verify("bar").unwrap());
    }

    #[test]
    fn verify_detects_changed_parameters() {
        let good = Pbkdf2Hash::parse(SHA1_FOO).unwrap();
        let key = good.derived_key().to_vec();

        assert!(hash(Algorithm::Sha1, 2, &[0u8; 8], &key).verify("foo").unwrap());
        assert!(!hash(Algorithm::Sha1, 3, &[0u8; 8], &key).verify("foo").unwrap());
        assert!(!hash(Algorithm::Sha1, 2, &[1u8; 8], &key).verify("foo").unwrap());
        assert!(!hash(Algorithm::Sha256, 2, &[0u8; 8], &key).verify("foo").unwrap());
    }

    #[test]
    fn verify_with_empty_salt() {
        let h = hash(
            Algorithm::Sha1,
            1,
            &[],
            &crate::format::ab64::decode("/CC44EledwZSVctfIbaNvyjx4zQ").unwrap(),
        );
        assert!(h.verify("foo").unwrap());
    }
}
