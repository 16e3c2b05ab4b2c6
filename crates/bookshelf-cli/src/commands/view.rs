use anyhow::Result;
use bookshelf_core::{KeyValueStore, Library, SearchOptions, SearchQuery, StatusFilter, Theme};

/// What the `theme` command should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

pub fn set_filter<S: KeyValueStore>(library: &mut Library<S>, filter: StatusFilter) -> Result<()> {
    library.set_filter(filter);
    let visible = library.visible_books().len();
    println!("✓ Filter set to {} ({} books visible)", filter, visible);
    Ok(())
}

/// Set, scope, or clear the saved search.
///
/// With no arguments at all, prints the current search.
pub fn set_search<S: KeyValueStore>(
    library: &mut Library<S>,
    query: Option<String>,
    fields: Option<SearchOptions>,
    clear: bool,
) -> Result<()> {
    if clear {
        library.set_search(SearchQuery::default());
        println!("✓ Search cleared");
        return Ok(());
    }

    match (query, fields) {
        (None, None) => {
            let search = library.search();
            if search.text.trim().is_empty() {
                println!("No search set (fields: {})", search.options);
            } else {
                println!("\"{}\" in {}", search.text, search.options);
            }
            return Ok(());
        }
        (Some(text), Some(options)) => library.set_search(SearchQuery::new(text, options)),
        (Some(text), None) => library.set_search_text(text),
        (None, Some(options)) => library.set_search_options(options),
    }

    let search = library.search();
    println!(
        "✓ Searching \"{}\" in {} ({} books visible)",
        search.text,
        search.options,
        library.visible_books().len()
    );
    Ok(())
}

/// Show or change the theme.
pub fn set_theme<S: KeyValueStore>(
    library: &mut Library<S>,
    action: Option<ThemeAction>,
) -> Result<()> {
    let theme = match action {
        None => {
            println!("{}", library.theme());
            return Ok(());
        }
        Some(ThemeAction::Toggle) => library.toggle_theme(),
        Some(ThemeAction::Light) => {
            library.set_theme(Theme::Light);
            Theme::Light
        }
        Some(ThemeAction::Dark) => {
            library.set_theme(Theme::Dark);
            Theme::Dark
        }
    };
    println!("✓ Theme set to {}", theme);
    Ok(())
}
