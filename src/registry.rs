//! Dispatch of hash strings to the family that understands them.
//!
//! A [`Registry`] maps the identifier prefix (the part before the first `-`)
//! to a parser. It is immutable once built: [`Registry::with`] returns a new
//! registry and leaves the original untouched, so a registry can be shared
//! between threads without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use tracing::trace;

use crate::error::{HashError, Result};
use crate::format::Envelope;
use crate::hash::{PasswordHash, Pbkdf2Hash};

/// Parser for one hash family. Receives the complete hash string.
pub type ParseFn = fn(&str) -> Option<Box<dyn PasswordHash>>;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// Immutable prefix → parser table.
#[derive(Clone, Default)]
pub struct Registry {
    parsers: Arc<HashMap<String, ParseFn>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing every family this crate implements.
    pub fn builtin() -> Self {
        Self::new().with(Pbkdf2Hash::ID_PREFIX, parse_pbkdf2)
    }

    /// The process-wide registry used by [`crate::parse`] and [`crate::verify`].
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Returns a copy of this registry with `parser` registered for `prefix`,
    /// replacing any parser already registered for it.
    #[must_use]
    pub fn with(&self, prefix: impl Into<String>, parser: ParseFn) -> Self {
        let mut parsers = HashMap::clone(&self.parsers);
        parsers.insert(prefix.into(), parser);
        Self {
            parsers: Arc::new(parsers),
        }
    }

    /// Returns `true` if a parser is registered for `prefix`.
    pub fn contains(&self, prefix: &str) -> bool {
        self.parsers.contains_key(prefix)
    }

    /// Registered prefixes, in no particular order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }

    /// Parses `text` with the family named by its identifier prefix.
    ///
    /// The family parser sees the whole string and validates the full
    /// identifier itself.
    pub fn parse(&self, text: &str) -> Option<Box<dyn PasswordHash>> {
        let envelope = Envelope::parse(text)?;
        let Some(parser) = self.parsers.get(envelope.prefix()) else {
            trace!(id = envelope.id(), "no hash family registered");
            return None;
        };
        parser(text)
    }

    /// Checks `password` against the hash string `text`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Format`] if `text` is not a hash any registered
    /// family can parse, or the family's error if verification itself fails.
    pub fn verify(&self, password: &str, text: &str) -> Result<bool> {
        let hash = self.parse(text).ok_or(HashError::Format)?;
        hash.verify(password)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.prefixes()).finish()
    }
}

fn parse_pbkdf2(text: &str) -> Option<Box<dyn PasswordHash>> {
    Pbkdf2Hash::parse(text).map(|hash| Box::new(hash) as Box<dyn PasswordHash>)
}
