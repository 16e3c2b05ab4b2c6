//! Plain-text rendering of the collection.
//!
//! Every call renders the whole list from scratch, the same way the TUI
//! redraws a full frame after each state change.

use bookshelf_core::{Book, LibraryStats, SearchQuery, StatusFilter};

const EMPTY_STATE: &str = "No books to show.";

/// Render one book as a multi-line card.
pub fn render_card(book: &Book) -> String {
    let mark = if book.is_read { "[x]" } else { "[ ]" };
    let mut lines = vec![
        format!("{} {}  ({})", mark, book.title, book.id.short()),
        format!("    by {} · {}", book.author, book.genre.label()),
    ];

    let review = match (book.effective_rating(), book.comment.as_deref()) {
        (Some(rating), Some(comment)) => Some(format!("{}  \"{}\"", rating.stars(), comment)),
        (Some(rating), None) => Some(rating.stars()),
        (None, Some(comment)) => Some(format!("\"{}\"", comment)),
        (None, None) => None,
    };
    if let Some(review) = review {
        lines.push(format!("    {}", review));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Render the visible books, or the empty-state message when none match.
pub fn render_list(books: &[&Book], filter: StatusFilter, search: &SearchQuery) -> String {
    let header = if search.is_active() {
        format!(
            "Showing: {}  search: \"{}\" in {}",
            filter,
            search.text.trim(),
            search.options
        )
    } else {
        format!("Showing: {}", filter)
    };
    let mut parts = vec![header, String::new()];

    if books.is_empty() {
        parts.push(EMPTY_STATE.to_string());
        if filter != StatusFilter::All || search.is_active() {
            parts.push("Try `bookshelf filter all` or `bookshelf search --clear`.".to_string());
        }
        parts.push(String::new());
        return parts.join("\n");
    }

    for book in books {
        parts.push(render_card(book));
    }
    parts.join("\n")
}

pub fn render_stats(stats: &LibraryStats) -> String {
    format!(
        "Total: {}  Read: {}  Pending: {}",
        stats.total, stats.read, stats.pending
    )
}
