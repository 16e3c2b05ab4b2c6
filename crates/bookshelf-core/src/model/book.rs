use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::genre::Genre;
use crate::model::ids::BookId;
use crate::model::rating::Rating;

/// A book in the personal collection.
///
/// The JSON shape uses camelCase keys (`isRead`, `createdAt`) and omits the
/// review fields when they are unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: Genre,

    /// Whether the book has been finished.
    #[serde(default)]
    pub is_read: bool,

    /// Star rating; only meaningful while `is_read` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,

    /// Free-text review comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Book {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, genre: Genre) -> Self {
        Self {
            id: BookId::new(),
            title: title.into(),
            author: author.into(),
            genre,
            is_read: false,
            rating: None,
            comment: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether a rating or comment is attached.
    #[must_use]
    pub fn has_review(&self) -> bool {
        self.rating.is_some() || self.comment.is_some()
    }

    /// The rating, but only if the book is actually read.
    #[must_use]
    pub fn effective_rating(&self) -> Option<Rating> {
        self.rating.filter(|_| self.is_read)
    }
}
