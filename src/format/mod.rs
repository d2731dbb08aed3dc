//! Text format of stored password hashes.
//!
//! Every hash string is a modular crypt format envelope:
//! ```text
//! $<id>$<content>
//! ```
//! The envelope only separates the identifier from the rest. What the content
//! means is up to the hash family named by the identifier, see [`pbkdf2`].

use std::fmt;

use crate::error::{HashError, Result};

pub mod ab64;
pub mod pbkdf2;

/// Separator between the envelope fields.
pub const SEPARATOR: char = '$';
/// Separator between an identifier prefix and its variant suffix.
pub const ID_SEPARATOR: char = '-';

/// A `$id$content` envelope.
///
/// `Envelope<String>` is the raw result of [`Envelope::parse`]. Hash families
/// wrap their own structured content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<C = String> {
    pub(crate) id: String,
    pub(crate) content: C,
}

impl<C> Envelope<C> {
    /// Creates an envelope from its components.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidEnvelope`] if `id` is empty or contains `$`.
    pub fn new(id: impl Into<String>, content: C) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.contains(SEPARATOR) {
            return Err(HashError::InvalidEnvelope(id));
        }
        Ok(Self { id, content })
    }

    /// Returns the hash identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the identifier up to the first `-`, or the whole identifier.
    pub fn prefix(&self) -> &str {
        id_prefix(&self.id)
    }

    /// Returns the content.
    pub fn content(&self) -> &C {
        &self.content
    }
}

impl Envelope<String> {
    /// Parses a hash string into identifier and raw content.
    ///
    /// The string must start with `$`. Leading empty fields are skipped, then
    /// the text is split once: everything after the identifier, further `$`
    /// included, is the content. Both parts must be non-empty.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix(SEPARATOR)?.trim_start_matches(SEPARATOR);
        let (id, content) = rest.split_once(SEPARATOR)?;

        if content.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            content: content.to_string(),
        })
    }
}

impl<C: fmt::Display> fmt::Display for Envelope<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SEPARATOR}{}{SEPARATOR}{}", self.id, self.content)
    }
}

pub(crate) fn id_prefix(id: &str) -> &str {
    id.split_once(ID_SEPARATOR).map_or(id, |(prefix, _)| prefix)
}
