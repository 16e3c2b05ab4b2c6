//! Status filter and text search over a book collection.
//!
//! Both are pure predicates. [`filter_books`] combines them in a single
//! pass: a book is visible when it matches the status filter AND the search
//! query, and the query matches when ANY enabled field contains it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::Book;

/// Which books to show by read status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Read,
    Pending,
}

impl StatusFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Read, Self::Pending];

    #[must_use]
    pub fn matches(self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Read => book.is_read,
            Self::Pending => !book.is_read,
        }
    }

    /// The next filter in button order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Read,
            Self::Read => Self::Pending,
            Self::Pending => Self::All,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Read => "read",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "read" => Ok(Self::Read),
            "pending" | "unread" => Ok(Self::Pending),
            other => Err(Error::InvalidData(format!(
                "unknown filter `{other}` (expected all, read or pending)"
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fields a text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub title: bool,
    pub author: bool,
    /// Matches against the genre's display label, not its key.
    pub genre: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            title: true,
            author: true,
            genre: true,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            title: false,
            author: false,
            genre: false,
        }
    }

    #[must_use]
    pub const fn any_enabled(self) -> bool {
        self.title || self.author || self.genre
    }

    /// Names of the enabled fields, in display order.
    #[must_use]
    pub fn enabled_fields(self) -> Vec<&'static str> {
        [
            (self.title, "title"),
            (self.author, "author"),
            (self.genre, "genre"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Parses a comma-separated field list such as `title,author`.
impl FromStr for SearchOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = Self::none();
        for field in s.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            match field.to_lowercase().as_str() {
                "title" => options.title = true,
                "author" => options.author = true,
                "genre" => options.genre = true,
                other => {
                    return Err(Error::InvalidData(format!(
                        "unknown search field `{other}` (expected title, author or genre)"
                    )))
                }
            }
        }
        Ok(options)
    }
}

impl fmt::Display for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.enabled_fields();
        if fields.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&fields.join(","))
        }
    }
}

/// A case-insensitive substring query scoped to some fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub options: SearchOptions,
}

impl SearchQuery {
    #[must_use]
    pub fn new(text: impl Into<String>, options: SearchOptions) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }

    /// Whether this query filters anything at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.text.trim().is_empty() && self.options.any_enabled()
    }

    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        if !self.is_active() {
            return true;
        }
        self.matcher().matches(book)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            needle: self.text.trim().to_lowercase(),
            options: &self.options,
        }
    }
}

/// A query with its needle lowercased once, for scanning many books.
struct Matcher<'a> {
    needle: String,
    options: &'a SearchOptions,
}

impl Matcher<'_> {
    fn matches(&self, book: &Book) -> bool {
        let hit = |haystack: &str| haystack.to_lowercase().contains(&self.needle);
        (self.options.title && hit(&book.title))
            || (self.options.author && hit(&book.author))
            || (self.options.genre && hit(book.genre.label()))
    }
}

/// The visible subset of `books`, in collection order.
pub fn filter_books<'a>(
    books: &'a [Book],
    status: StatusFilter,
    query: &SearchQuery,
) -> Vec<&'a Book> {
    let matcher = query.is_active().then(|| query.matcher());
    books
        .iter()
        .filter(|book| status.matches(book))
        .filter(|book| matcher.as_ref().map_or(true, |m| m.matches(book)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Genre;

    fn sample() -> Vec<Book> {
        vec![
            Book::new("Dune", "Frank Herbert", Genre::ScienceFiction).with_read(true),
            Book::new("The Hobbit", "J.R.R. Tolkien", Genre::Fantasy),
            Book::new("Steve Jobs", "Walter Isaacson", Genre::Biography).with_read(true),
            Book::new("Gone Girl", "Gillian Flynn", Genre::Mystery),
        ]
    }

    fn titles(books: &[&Book]) -> Vec<String> {
        books.iter().map(|b| b.title.clone()).collect()
    }

    #[test]
    fn test_status_filter() {
        let books = sample();
        let query = SearchQuery::default();

        assert_eq!(filter_books(&books, StatusFilter::All, &query).len(), 4);
        assert_eq!(
            titles(&filter_books(&books, StatusFilter::Read, &query)),
            vec!["Dune", "Steve Jobs"]
        );
        assert_eq!(
            titles(&filter_books(&books, StatusFilter::Pending, &query)),
            vec!["The Hobbit", "Gone Girl"]
        );
    }

    #[test]
    fn test_read_and_pending_partition_the_collection() {
        let books = sample();
        let query = SearchQuery::default();
        let read = filter_books(&books, StatusFilter::Read, &query);
        let pending = filter_books(&books, StatusFilter::Pending, &query);

        assert_eq!(read.len() + pending.len(), books.len());
        for book in &read {
            assert!(!pending.iter().any(|p| p.id == book.id));
        }
        for book in &books {
            assert!(read.iter().chain(pending.iter()).any(|b| b.id == book.id));
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let books = sample();
        let query = SearchQuery::new("HOBB", SearchOptions::default());
        assert_eq!(
            titles(&filter_books(&books, StatusFilter::All, &query)),
            vec!["The Hobbit"]
        );
    }

    #[test]
    fn test_search_ors_across_fields() {
        let books = sample();
        // "an": Frank (author), Fantasy (genre label), Gillian (author).
        let query = SearchQuery::new("an", SearchOptions::default());
        assert_eq!(
            titles(&filter_books(&books, StatusFilter::All, &query)),
            vec!["Dune", "The Hobbit", "Gone Girl"]
        );
    }

    #[test]
    fn test_search_respects_field_scope() {
        let books = sample();
        let title_only = SearchOptions {
            title: true,
            author: false,
            genre: false,
        };
        let query = SearchQuery::new("herbert", title_only);
        assert!(filter_books(&books, StatusFilter::All, &query).is_empty());

        let author_only = SearchOptions {
            title: false,
            author: true,
            genre: false,
        };
        let query = SearchQuery::new("herbert", author_only);
        assert_eq!(filter_books(&books, StatusFilter::All, &query).len(), 1);
    }

    #[test]
    fn test_genre_search_uses_label_not_key() {
        let books = sample();
        let genre_only = SearchOptions {
            title: false,
            author: false,
            genre: true,
        };

        let by_label = SearchQuery::new("science fiction", genre_only);
        assert_eq!(
            titles(&filter_books(&books, StatusFilter::All, &by_label)),
            vec!["Dune"]
        );

        let by_key = SearchQuery::new("science-fiction", genre_only);
        assert!(filter_books(&books, StatusFilter::All, &by_key).is_empty());
    }

    #[test]
    fn test_search_and_status_are_combined() {
        let books = sample();
        let query = SearchQuery::new("o", SearchOptions::default());
        let visible = filter_books(&books, StatusFilter::Pending, &query);
        assert!(visible.iter().all(|b| !b.is_read));
        assert_eq!(titles(&visible), vec!["The Hobbit", "Gone Girl"]);
    }

    #[test]
    fn test_disabled_options_return_status_set_unchanged() {
        let books = sample();
        let query = SearchQuery::new("zzz", SearchOptions::none());
        for status in StatusFilter::ALL {
            let unfiltered = filter_books(&books, status, &SearchQuery::default());
            assert_eq!(filter_books(&books, status, &query), unfiltered);
        }
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let books = sample();
        let query = SearchQuery::new("   ", SearchOptions::default());
        assert!(!query.is_active());
        assert_eq!(filter_books(&books, StatusFilter::All, &query).len(), 4);
    }

    #[test]
    fn test_parse_search_options() {
        let options: SearchOptions = "title, genre".parse().unwrap();
        assert!(options.title && !options.author && options.genre);
        assert_eq!(options.to_string(), "title,genre");
        assert_eq!(SearchOptions::none().to_string(), "none");
        assert!("isbn".parse::<SearchOptions>().is_err());
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!("READ".parse::<StatusFilter>().unwrap(), StatusFilter::Read);
        assert_eq!(
            "unread".parse::<StatusFilter>().unwrap(),
            StatusFilter::Pending
        );
        assert!("finished".parse::<StatusFilter>().is_err());
        assert_eq!(StatusFilter::Pending.next(), StatusFilter::All);
    }

    #[test]
    fn test_search_options_json_defaults_missing_flags() {
        let options: SearchOptions = serde_json::from_str(r#"{"title": false}"#).unwrap();
        assert!(!options.title);
        assert!(options.author);
        assert!(options.genre);
    }
}
