use anyhow::{Context, Result};
use bookshelf_core::{
    BookDraft, Genre, KeyValueStore, Library, Rating, SearchOptions, SearchQuery, StatusFilter,
};

use crate::render;

/// Validate and add a book.
pub fn add_book<S: KeyValueStore>(
    library: &mut Library<S>,
    title: &str,
    author: &str,
    genre: &str,
) -> Result<()> {
    let new_book = BookDraft::new(title, author, genre)
        .validate()
        .context("Book not added")?;
    let book = library.add_book(new_book);

    println!("✓ Added \"{}\" by {} ({})", book.title, book.author, book.id.short());
    Ok(())
}

/// Print the visible books. Explicit filter or search flags replace the
/// saved ones before rendering.
pub fn list_books<S: KeyValueStore>(
    library: &mut Library<S>,
    filter: Option<StatusFilter>,
    search: Option<String>,
    fields: Option<SearchOptions>,
) -> Result<()> {
    if let Some(filter) = filter {
        library.set_filter(filter);
    }
    match (search, fields) {
        (Some(text), Some(options)) => library.set_search(SearchQuery::new(text, options)),
        (Some(text), None) => library.set_search_text(text),
        (None, Some(options)) => library.set_search_options(options),
        (None, None) => {}
    }

    let visible = library.visible_books();
    print!(
        "{}",
        render::render_list(&visible, library.filter(), library.search())
    );
    println!("{}", render::render_stats(&library.stats()));
    Ok(())
}

/// Flip a book's read flag.
pub fn toggle_read<S: KeyValueStore>(library: &mut Library<S>, id: &str) -> Result<()> {
    let id = library.resolve_id(id)?;
    let is_read = library.toggle_read(&id)?;
    let title = library.get(&id).map(|b| b.title.as_str()).unwrap_or_default();

    if is_read {
        println!("✓ Marked \"{}\" as read", title);
    } else {
        println!("✓ Marked \"{}\" as pending", title);
    }
    Ok(())
}

pub fn delete_book<S: KeyValueStore>(library: &mut Library<S>, id: &str) -> Result<()> {
    let id = library.resolve_id(id)?;
    let book = library.delete_book(&id)?;
    println!("✓ Deleted \"{}\"", book.title);
    Ok(())
}

/// Set the rating and/or comment of a read book.
///
/// Fields that are not given keep their current value.
pub fn review_book<S: KeyValueStore>(
    library: &mut Library<S>,
    id: &str,
    rating: Option<u8>,
    comment: Option<String>,
) -> Result<()> {
    let id = library.resolve_id(id)?;
    let current = library
        .get(&id)
        .map(|b| (b.rating, b.comment.clone()))
        .unwrap_or_default();

    let rating = rating.map(Rating::new).transpose()?.or(current.0);
    let comment = comment.or(current.1);
    library.set_review(&id, rating, comment)?;

    if let Some(book) = library.get(&id) {
        print!("✓ Reviewed\n{}", render::render_card(book));
    }
    Ok(())
}

pub fn unreview_book<S: KeyValueStore>(library: &mut Library<S>, id: &str) -> Result<()> {
    let id = library.resolve_id(id)?;
    library.clear_review(&id)?;
    println!("✓ Cleared review");
    Ok(())
}

pub fn show_stats<S: KeyValueStore>(library: &Library<S>) -> Result<()> {
    println!("{}", render::render_stats(&library.stats()));
    Ok(())
}

pub fn list_genres() -> Result<()> {
    for genre in Genre::ALL {
        println!("  {:<16} {}", genre.key(), genre.label());
    }
    Ok(())
}
