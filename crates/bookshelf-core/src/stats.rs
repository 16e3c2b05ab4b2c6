use serde::Serialize;

use crate::model::Book;

/// Read/pending counts over the whole collection, ignoring any filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total: usize,
    pub read: usize,
    pub pending: usize,
}

impl LibraryStats {
    #[must_use]
    pub fn from_books(books: &[Book]) -> Self {
        let total = books.len();
        let read = books.iter().filter(|b| b.is_read).count();
        Self {
            total,
            read,
            pending: total - read,
        }
    }
}
