use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A genre classification for a book.
///
/// Genres are stored by key (e.g. `science-fiction`) and shown by label
/// (e.g. "Science fiction"). Keys that this version does not know about
/// are kept verbatim so that reading and re-saving a collection never
/// loses data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Genre {
    Fiction,
    NonFiction,
    Fantasy,
    ScienceFiction,
    Mystery,
    Biography,
    Other,
    /// A key not in the built-in vocabulary; its label is the key itself.
    Unknown(String),
}

impl Genre {
    /// Every built-in genre, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Fiction,
        Self::NonFiction,
        Self::Fantasy,
        Self::ScienceFiction,
        Self::Mystery,
        Self::Biography,
        Self::Other,
    ];

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Fiction => "fiction",
            Self::NonFiction => "non-fiction",
            Self::Fantasy => "fantasy",
            Self::ScienceFiction => "science-fiction",
            Self::Mystery => "mystery",
            Self::Biography => "biography",
            Self::Other => "other",
            Self::Unknown(key) => key,
        }
    }

    /// The human-readable display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-fiction",
            Self::Fantasy => "Fantasy",
            Self::ScienceFiction => "Science fiction",
            Self::Mystery => "Mystery",
            Self::Biography => "Biography",
            Self::Other => "Other",
            Self::Unknown(key) => key,
        }
    }

    /// Look up a built-in genre by its storage key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.key() == key)
    }
}

impl From<String> for Genre {
    fn from(key: String) -> Self {
        Self::from_key(&key).unwrap_or(Self::Unknown(key))
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        match genre {
            Genre::Unknown(key) => key,
            known => known.key().to_string(),
        }
    }
}

/// Parses user input: a built-in key or label, case-insensitively.
impl FromStr for Genre {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|genre| genre.key() == wanted || genre.label().to_lowercase() == wanted)
            .ok_or_else(|| Error::Validation {
                field: "genre",
                reason: format!("unknown genre `{}`", s.trim()),
            })
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_key_and_label() {
        assert_eq!(Genre::ScienceFiction.key(), "science-fiction");
        assert_eq!(Genre::ScienceFiction.label(), "Science fiction");
        assert_eq!(Genre::NonFiction.to_string(), "Non-fiction");
    }

    #[test]
    fn test_genre_serializes_as_key() {
        let json = serde_json::to_string(&Genre::NonFiction).unwrap();
        assert_eq!(json, "\"non-fiction\"");

        let back: Genre = serde_json::from_str("\"fantasy\"").unwrap();
        assert_eq!(back, Genre::Fantasy);
    }

    #[test]
    fn test_unknown_genre_is_preserved() {
        let genre: Genre = serde_json::from_str("\"poetry\"").unwrap();
        assert_eq!(genre, Genre::Unknown("poetry".to_string()));
        assert_eq!(genre.label(), "poetry");
        assert_eq!(serde_json::to_string(&genre).unwrap(), "\"poetry\"");
    }

    #[test]
    fn test_parse_accepts_key_or_label() {
        assert_eq!("mystery".parse::<Genre>().unwrap(), Genre::Mystery);
        assert_eq!(
            "Science Fiction".parse::<Genre>().unwrap(),
            Genre::ScienceFiction
        );
        assert_eq!(" BIOGRAPHY ".parse::<Genre>().unwrap(), Genre::Biography);
        assert!("poetry".parse::<Genre>().is_err());
    }
}
