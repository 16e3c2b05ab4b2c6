//! Validation of raw book input from a form or command line.

use crate::error::{Error, Result};
use crate::model::Genre;

/// Raw, unvalidated input for a new book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
}

/// A validated book ready to be added to the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Genre,
}

impl BookDraft {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
        }
    }

    /// Trim and check every required field.
    ///
    /// Fields are checked in form order, so the first empty field is the one
    /// reported.
    pub fn validate(&self) -> Result<NewBook> {
        let title = required("title", &self.title)?;
        let author = required("author", &self.author)?;
        let genre = required("genre", &self.genre)?.parse::<Genre>()?;

        Ok(NewBook {
            title,
            author,
            genre,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
