//! Collection-level properties of filtering and deletion.

use bookshelf_core::{
    filter_books, BookDraft, Library, MemoryStore, SearchOptions, SearchQuery, StatusFilter,
};

const SHELF: &[(&str, &str, &str, bool)] = &[
    ("Dune", "Frank Herbert", "science-fiction", true),
    ("The Hobbit", "J.R.R. Tolkien", "fantasy", false),
    ("Emma", "Jane Austen", "fiction", true),
    ("Sapiens", "Yuval Noah Harari", "non-fiction", false),
    ("Gone Girl", "Gillian Flynn", "mystery", false),
    ("Steve Jobs", "Walter Isaacson", "biography", true),
    ("Misc Notes", "Anonymous", "other", false),
];

fn shelf() -> Library<MemoryStore> {
    let mut library = Library::load(MemoryStore::new());
    for (title, author, genre, read) in SHELF {
        let id = library
            .add_book(BookDraft::new(*title, *author, *genre).validate().unwrap())
            .id
            .clone();
        if *read {
            library.toggle_read(&id).unwrap();
        }
    }
    library
}

#[test]
fn test_read_and_pending_partition_every_prefix_of_the_shelf() {
    let library = shelf();
    let all = library.books();
    let query = SearchQuery::default();

    for n in 0..=all.len() {
        let books = &all[..n];
        let read = filter_books(books, StatusFilter::Read, &query);
        let pending = filter_books(books, StatusFilter::Pending, &query);

        assert_eq!(read.len() + pending.len(), books.len());
        assert!(read.iter().all(|r| !pending.iter().any(|p| p.id == r.id)));
    }
}

#[test]
fn test_disabled_search_is_identity_for_every_status() {
    let library = shelf();
    for text in ["", "a", "tolkien", "no such book"] {
        let query = SearchQuery::new(text, SearchOptions::none());
        for status in StatusFilter::ALL {
            let baseline = filter_books(library.books(), status, &SearchQuery::default());
            assert_eq!(filter_books(library.books(), status, &query), baseline);
        }
    }
}

#[test]
fn test_delete_each_book_leaves_the_rest() {
    let original = shelf();
    for target in original.books() {
        let mut library = shelf_from(original.books());
        library.delete_book(&target.id).unwrap();

        let expected: Vec<_> = original
            .books()
            .iter()
            .filter(|b| b.id != target.id)
            .cloned()
            .collect();
        assert_eq!(library.books(), expected.as_slice());
    }
}

#[test]
fn test_filters_preserve_newest_first_order() {
    let library = shelf();
    let query = SearchQuery::default();
    let read: Vec<&str> = filter_books(library.books(), StatusFilter::Read, &query)
        .iter()
        .map(|b| b.title.as_str())
        .collect();
    assert_eq!(read, vec!["Steve Jobs", "Emma", "Dune"]);
}

fn shelf_from(books: &[bookshelf_core::Book]) -> Library<MemoryStore> {
    let mut store = MemoryStore::new();
    assert!(bookshelf_core::storage::save_json(
        &mut store,
        bookshelf_core::storage::keys::BOOKS,
        books
    ));
    Library::load(store)
}
