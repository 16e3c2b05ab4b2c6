use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const ID_PREFIX: &str = "book_";

/// Unique identifier for a book in the collection.
///
/// Ids are opaque strings. Freshly generated ids carry a `book_` prefix
/// followed by a v4 UUID, but any string loaded from storage is accepted
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    #[must_use]
    pub fn new() -> Self {
        Self(format!("{ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id without the generated `book_` prefix, for compact display.
    #[must_use]
    pub fn short(&self) -> &str {
        let bare = self.0.strip_prefix(ID_PREFIX).unwrap_or(&self.0);
        bare.get(..8).unwrap_or(bare)
    }

    /// Whether `prefix` abbreviates this id, with or without `book_`.
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return false;
        }
        self.0.starts_with(prefix)
            || self
                .0
                .strip_prefix(ID_PREFIX)
                .is_some_and(|bare| bare.starts_with(prefix))
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
