//! The application state object.
//!
//! A [`Library`] owns the book collection plus the view preferences (theme,
//! status filter, search) and the store they persist to. Every mutator
//! updates memory first and then rewrites the affected document wholesale,
//! so memory and storage never drift apart by more than one failed write.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::filter::{filter_books, SearchOptions, SearchQuery, StatusFilter};
use crate::model::{Book, BookId, Rating, Theme};
use crate::stats::LibraryStats;
use crate::storage::{keys, load_json, save_json, KeyValueStore};
use crate::validation::NewBook;

/// The whole collection and its persisted view state.
#[derive(Debug)]
pub struct Library<S: KeyValueStore> {
    store: S,
    books: Vec<Book>,
    theme: Theme,
    filter: StatusFilter,
    search: SearchQuery,
    save_failures: usize,
}

impl<S: KeyValueStore> Library<S> {
    /// Load all state from `store`, falling back to defaults for anything
    /// missing or unreadable.
    pub fn load(store: S) -> Self {
        let books = load_books(&store);
        let theme: Theme = load_json(&store, keys::THEME).unwrap_or_default();
        let filter: StatusFilter = load_json(&store, keys::FILTER).unwrap_or_default();
        let search = SearchQuery {
            text: load_json::<S, String>(&store, keys::SEARCH_QUERY).unwrap_or_default(),
            options: load_json::<S, SearchOptions>(&store, keys::SEARCH_OPTIONS)
                .unwrap_or_default(),
        };

        log::info!(
            "Loaded {} books (theme: {}, filter: {})",
            books.len(),
            theme,
            filter
        );

        Self {
            store,
            books,
            theme,
            filter,
            search,
            save_failures: 0,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the library, handing back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Every book, newest first.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    #[must_use]
    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub const fn filter(&self) -> StatusFilter {
        self.filter
    }

    #[must_use]
    pub const fn search(&self) -> &SearchQuery {
        &self.search
    }

    /// Whether any write since loading has failed.
    #[must_use]
    pub const fn save_failed(&self) -> bool {
        self.save_failures > 0
    }

    /// How many writes have failed since loading.
    #[must_use]
    pub const fn save_failures(&self) -> usize {
        self.save_failures
    }

    /// The books that pass the active filter and search.
    #[must_use]
    pub fn visible_books(&self) -> Vec<&Book> {
        filter_books(&self.books, self.filter, &self.search)
    }

    #[must_use]
    pub fn stats(&self) -> LibraryStats {
        LibraryStats::from_books(&self.books)
    }

    /// Resolve a full id or an unambiguous prefix of one.
    pub fn resolve_id(&self, prefix: &str) -> Result<BookId> {
        let prefix = prefix.trim();
        if let Some(book) = self.books.iter().find(|b| b.id.as_str() == prefix) {
            return Ok(book.id.clone());
        }

        let matches: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.id.matches_prefix(prefix))
            .collect();
        match matches.as_slice() {
            [book] => Ok(book.id.clone()),
            [] => Err(not_found(prefix)),
            many => Err(Error::AmbiguousId {
                prefix: prefix.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Add a validated book at the front of the collection.
    pub fn add_book(&mut self, new_book: NewBook) -> &Book {
        let book = Book::new(new_book.title, new_book.author, new_book.genre);
        log::debug!("Adding book {} ({})", book.id, book.title);
        self.books.insert(0, book);
        self.persist_books();
        &self.books[0]
    }

    /// Remove the book with `id`, returning it.
    pub fn delete_book(&mut self, id: &BookId) -> Result<Book> {
        let index = self.index_of(id)?;
        let book = self.books.remove(index);
        log::debug!("Deleted book {} ({})", book.id, book.title);
        self.persist_books();
        Ok(book)
    }

    /// Flip the read flag, returning its new value.
    ///
    /// Marking a book unread drops its rating; the comment is kept.
    pub fn toggle_read(&mut self, id: &BookId) -> Result<bool> {
        let index = self.index_of(id)?;
        let book = &mut self.books[index];
        book.is_read = !book.is_read;
        if !book.is_read {
            book.rating = None;
        }
        let is_read = book.is_read;
        log::debug!("Book {} is_read = {}", id, is_read);
        self.persist_books();
        Ok(is_read)
    }

    /// Attach a rating and comment to a read book.
    ///
    /// A blank comment is stored as no comment.
    pub fn set_review(
        &mut self,
        id: &BookId,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        let book = &mut self.books[index];
        if !book.is_read {
            return Err(Error::NotRead(id.to_string()));
        }
        book.rating = rating;
        book.comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        log::debug!("Reviewed book {} (rating: {:?})", id, book.rating);
        self.persist_books();
        Ok(())
    }

    /// Remove any rating and comment.
    pub fn clear_review(&mut self, id: &BookId) -> Result<()> {
        let index = self.index_of(id)?;
        let book = &mut self.books[index];
        book.rating = None;
        book.comment = None;
        self.persist_books();
        Ok(())
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        let ok = save_json(&mut self.store, keys::FILTER, &filter);
        self.record_save(ok);
    }

    pub fn set_search(&mut self, search: SearchQuery) {
        self.search = search;
        self.persist_search();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search.text = text.into();
        let ok = save_json(&mut self.store, keys::SEARCH_QUERY, &self.search.text);
        self.record_save(ok);
    }

    pub fn set_search_options(&mut self, options: SearchOptions) {
        self.search.options = options;
        let ok = save_json(&mut self.store, keys::SEARCH_OPTIONS, &options);
        self.record_save(ok);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let ok = save_json(&mut self.store, keys::THEME, &theme);
        self.record_save(ok);
    }

    /// Switch between light and dark, returning the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.toggled();
        self.set_theme(theme);
        theme
    }

    fn index_of(&self, id: &BookId) -> Result<usize> {
        self.books
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| not_found(id.as_str()))
    }

    fn record_save(&mut self, ok: bool) {
        if !ok {
            self.save_failures += 1;
        }
    }

    fn persist_books(&mut self) {
        let ok = save_json(&mut self.store, keys::BOOKS, &self.books);
        self.record_save(ok);
    }

    fn persist_search(&mut self) {
        let text_ok = save_json(&mut self.store, keys::SEARCH_QUERY, &self.search.text);
        let options_ok = save_json(&mut self.store, keys::SEARCH_OPTIONS, &self.search.options);
        self.record_save(text_ok && options_ok);
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound {
        entity: "book",
        id: id.to_string(),
    }
}

/// Load the book list entry by entry, so one corrupt record does not take
/// the rest of the collection with it. Duplicate ids keep the first copy.
fn load_books<S: KeyValueStore>(store: &S) -> Vec<Book> {
    let Some(raw) = load_json::<S, serde_json::Value>(store, keys::BOOKS) else {
        return Vec::new();
    };
    let serde_json::Value::Array(entries) = raw else {
        log::error!("Ignoring `{}`: expected a JSON array", keys::BOOKS);
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut books = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Book>(entry) {
            Ok(book) if seen.insert(book.id.clone()) => books.push(book),
            Ok(book) => log::warn!("Skipping duplicate book id {}", book.id),
            Err(e) => log::warn!("Skipping unreadable book at index {}: {}", index, e),
        }
    }
    books
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Genre;
    use crate::storage::MemoryStore;
    use crate::validation::BookDraft;

    fn new_book(title: &str) -> NewBook {
        BookDraft::new(title, "Some Author", "fiction")
            .validate()
            .unwrap()
    }

    fn library_with(titles: &[&str]) -> Library<MemoryStore> {
        let mut library = Library::load(MemoryStore::new());
        for title in titles {
            library.add_book(new_book(title));
        }
        library
    }

    /// A store whose writes always fail.
    #[derive(Debug, Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let library = Library::load(MemoryStore::new());
        assert!(library.books().is_empty());
        assert_eq!(library.theme(), Theme::Light);
        assert_eq!(library.filter(), StatusFilter::All);
        assert_eq!(library.search(), &SearchQuery::default());
    }

    #[test]
    fn test_add_book_inserts_newest_first() {
        let library = library_with(&["First", "Second", "Third"]);
        let titles: Vec<&str> = library.books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);
        assert!(library.books().iter().all(|b| !b.is_read));
    }

    #[test]
    fn test_add_book_persists() {
        let library = library_with(&["Persisted"]);
        let raw = library.store().get(keys::BOOKS).unwrap().unwrap();
        assert!(raw.contains("Persisted"));
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut library = library_with(&["A", "B", "C"]);
        let before: Vec<Book> = library.books().to_vec();
        let target = before[1].id.clone();

        let removed = library.delete_book(&target).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(library.books().len(), 2);
        assert_eq!(library.books()[0], before[0]);
        assert_eq!(library.books()[1], before[2]);
    }

    #[test]
    fn test_delete_missing_id() {
        let mut library = library_with(&["A"]);
        let err = library
            .delete_book(&BookId::from_string("book_missing"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "book", .. }));
        assert_eq!(library.books().len(), 1);
    }

    #[test]
    fn test_toggle_read_and_review() {
        let mut library = library_with(&["Emma"]);
        let id = library.books()[0].id.clone();

        assert!(library.toggle_read(&id).unwrap());
        let rating = Rating::new(5).unwrap();
        library
            .set_review(&id, Some(rating), Some("  Loved it ".to_string()))
            .unwrap();
        let book = library.get(&id).unwrap();
        assert_eq!(book.rating, Some(rating));
        assert_eq!(book.comment.as_deref(), Some("Loved it"));

        assert!(!library.toggle_read(&id).unwrap());
        let book = library.get(&id).unwrap();
        assert_eq!(book.rating, None);
        assert_eq!(book.comment.as_deref(), Some("Loved it"));
    }

    #[test]
    fn test_rereading_keeps_comment_but_not_rating() {
        let mut library = library_with(&["Emma"]);
        let id = library.books()[0].id.clone();
        library.toggle_read(&id).unwrap();
        library
            .set_review(&id, Rating::new(4).ok(), Some("Second half drags".to_string()))
            .unwrap();

        library.toggle_read(&id).unwrap();
        library.toggle_read(&id).unwrap();

        let book = library.get(&id).unwrap();
        assert!(book.is_read);
        assert_eq!(book.effective_rating(), None);
        assert_eq!(book.comment.as_deref(), Some("Second half drags"));
    }

    #[test]
    fn test_review_requires_read() {
        let mut library = library_with(&["Unread"]);
        let id = library.books()[0].id.clone();
        let err = library
            .set_review(&id, Rating::new(3).ok(), None)
            .unwrap_err();
        assert!(matches!(err, Error::NotRead(_)));
    }

    #[test]
    fn test_blank_comment_is_dropped() {
        let mut library = library_with(&["Emma"]);
        let id = library.books()[0].id.clone();
        library.toggle_read(&id).unwrap();
        library
            .set_review(&id, None, Some("   ".to_string()))
            .unwrap();
        assert!(library.get(&id).unwrap().comment.is_none());
    }

    #[test]
    fn test_clear_review() {
        let mut library = library_with(&["Emma"]);
        let id = library.books()[0].id.clone();
        library.toggle_read(&id).unwrap();
        library
            .set_review(&id, Rating::new(2).ok(), Some("meh".to_string()))
            .unwrap();
        library.clear_review(&id).unwrap();
        let book = library.get(&id).unwrap();
        assert!(book.is_read);
        assert!(!book.has_review());
    }

    #[test]
    fn test_view_state_survives_reload() {
        let mut library = library_with(&["Dune", "Emma"]);
        library.set_filter(StatusFilter::Pending);
        library.set_search(SearchQuery::new(
            "dune",
            SearchOptions {
                title: true,
                author: false,
                genre: false,
            },
        ));
        assert_eq!(library.toggle_theme(), Theme::Dark);

        let reloaded = Library::load(library.into_store());
        assert_eq!(reloaded.filter(), StatusFilter::Pending);
        assert_eq!(reloaded.theme(), Theme::Dark);
        assert_eq!(reloaded.search().text, "dune");
        assert!(!reloaded.search().options.author);
        assert_eq!(reloaded.visible_books().len(), 1);
    }

    #[test]
    fn test_visible_books_follow_filter() {
        let mut library = library_with(&["A", "B"]);
        let id = library.books()[0].id.clone();
        library.toggle_read(&id).unwrap();

        library.set_filter(StatusFilter::Read);
        assert_eq!(library.visible_books().len(), 1);
        library.set_filter(StatusFilter::Pending);
        assert_eq!(library.visible_books()[0].title, "A");
        assert_eq!(library.stats().read, 1);
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let mut store = MemoryStore::new();
        let books = vec![
            Book::new("A", "X", Genre::Other).with_id(BookId::from_string("book_aaa111")),
            Book::new("B", "Y", Genre::Other).with_id(BookId::from_string("book_aab222")),
        ];
        assert!(save_json(&mut store, keys::BOOKS, &books));
        let library = Library::load(store);

        assert_eq!(library.resolve_id("aaa").unwrap().as_str(), "book_aaa111");
        assert_eq!(
            library.resolve_id("book_aab222").unwrap().as_str(),
            "book_aab222"
        );
        assert!(matches!(
            library.resolve_id("aa"),
            Err(Error::AmbiguousId { count: 2, .. })
        ));
        assert!(matches!(
            library.resolve_id("zzz"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_books_degrade_to_empty() {
        let mut store = MemoryStore::new();
        store.set(keys::BOOKS, "{\"not\": \"an array\"}").unwrap();
        store.set(keys::THEME, "\"purple\"").unwrap();
        let library = Library::load(store);
        assert!(library.books().is_empty());
        assert_eq!(library.theme(), Theme::Light);
    }

    #[test]
    fn test_bad_entries_and_duplicates_are_skipped() {
        let mut store = MemoryStore::new();
        store
            .set(
                keys::BOOKS,
                r#"[
                    {"id": "b1", "title": "Kept", "author": "A", "genre": "fiction",
                     "isRead": false, "createdAt": "2024-01-01T00:00:00Z"},
                    {"id": "b2", "title": "Broken"},
                    {"id": "b1", "title": "Dup", "author": "A", "genre": "fiction",
                     "isRead": false, "createdAt": "2024-01-01T00:00:00Z"}
                ]"#,
            )
            .unwrap();
        let library = Library::load(store);
        assert_eq!(library.books().len(), 1);
        assert_eq!(library.books()[0].title, "Kept");
    }

    #[test]
    fn test_failed_writes_keep_memory_state() {
        let mut library = Library::load(ReadOnlyStore::default());
        assert!(!library.save_failed());

        library.add_book(new_book("Unsaved"));
        assert!(library.save_failed());
        assert_eq!(library.save_failures(), 1);
        assert_eq!(library.books().len(), 1);

        library.toggle_theme();
        assert_eq!(library.save_failures(), 2);
    }
}
