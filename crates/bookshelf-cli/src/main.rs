use anyhow::{Context, Result};
use bookshelf_core::{Config, FileStore, Library, SearchOptions, StatusFilter};
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod render;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the library (default: ~/.local/share/bookshelf)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Add a book to the library
    ///
    /// Title and author are trimmed and must not be empty. The genre may be
    /// given by key (science-fiction) or label ("Science fiction"); run
    /// 'bookshelf genres' for the full list. New books start out pending and
    /// appear at the top of the list.
    Add {
        title: String,
        author: String,
        /// Genre key or label
        #[arg(long, short)]
        genre: String,
    },
    /// List books matching the active filter and search
    ///
    /// Any flag given here replaces the saved filter or search, and is kept
    /// for later commands and the TUI.
    List {
        /// Status filter: all, read or pending
        #[arg(long, short)]
        filter: Option<StatusFilter>,
        /// Case-insensitive text to search for
        #[arg(long, short)]
        search: Option<String>,
        /// Fields to search, comma-separated: title,author,genre
        #[arg(long = "in", value_name = "FIELDS")]
        fields: Option<SearchOptions>,
    },
    /// Toggle a book between read and pending
    ///
    /// Marking a book pending again removes its rating. The comment is kept.
    #[command(visible_alias = "read")]
    Toggle {
        /// Book id or unambiguous id prefix
        id: String,
    },
    /// Delete a book
    Delete {
        /// Book id or unambiguous id prefix
        id: String,
    },
    /// Rate and comment on a read book
    Review {
        /// Book id or unambiguous id prefix
        id: String,
        /// Rating from 0 to 5
        #[arg(long, short)]
        rating: Option<u8>,
        /// Free-text comment
        #[arg(long, short)]
        comment: Option<String>,
    },
    /// Remove a book's rating and comment
    Unreview {
        /// Book id or unambiguous id prefix
        id: String,
    },
    /// Set the active status filter
    Filter {
        /// all, read or pending
        filter: StatusFilter,
    },
    /// Show, set or clear the saved search
    Search {
        /// Text to search for
        query: Option<String>,
        /// Fields to search, comma-separated: title,author,genre
        #[arg(long = "in", value_name = "FIELDS")]
        fields: Option<SearchOptions>,
        /// Clear the search and re-enable every field
        #[arg(long, conflicts_with_all = ["query", "fields"])]
        clear: bool,
    },
    /// Show or change the colour theme
    Theme {
        #[arg(value_enum)]
        action: Option<commands::ThemeAction>,
    },
    /// Show read/pending totals
    Stats,
    /// List the available genres
    Genres,
    /// Browse and edit the library interactively
    Tui,
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Config(command) => return run_config(command),
        other => other,
    };

    let config = Config::load_with_data_dir(cli.data_dir)?;
    let _logger = twyg::setup(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    let store = FileStore::open(&config.data_dir).with_context(|| {
        format!(
            "Failed to open library directory {}",
            config.data_dir.display()
        )
    })?;
    log::debug!("Using library at {}", store.dir().display());
    let mut library = Library::load(store);

    match command {
        Commands::Add {
            title,
            author,
            genre,
        } => commands::add_book(&mut library, &title, &author, &genre)?,
        Commands::List {
            filter,
            search,
            fields,
        } => commands::list_books(&mut library, filter, search, fields)?,
        Commands::Toggle { id } => commands::toggle_read(&mut library, &id)?,
        Commands::Delete { id } => commands::delete_book(&mut library, &id)?,
        Commands::Review {
            id,
            rating,
            comment,
        } => commands::review_book(&mut library, &id, rating, comment)?,
        Commands::Unreview { id } => commands::unreview_book(&mut library, &id)?,
        Commands::Filter { filter } => commands::set_filter(&mut library, filter)?,
        Commands::Search {
            query,
            fields,
            clear,
        } => commands::set_search(&mut library, query, fields, clear)?,
        Commands::Theme { action } => commands::set_theme(&mut library, action)?,
        Commands::Stats => commands::show_stats(&library)?,
        Commands::Genres => commands::list_genres()?,
        Commands::Tui => tui::run_tui(&mut library)?,
        Commands::Config(command) => run_config(command)?,
    }

    if library.save_failed() {
        eprintln!(
            "warning: some changes could not be saved to {}",
            library.store().dir().display()
        );
    }

    Ok(())
}

fn run_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => commands::config::show_config(),
        ConfigCommands::Get { key } => commands::config::get_config(key),
        ConfigCommands::Set { key, value } => commands::config::set_config(key, value),
        ConfigCommands::Path => commands::config::show_path(),
        ConfigCommands::Example => commands::config::show_example(),
        ConfigCommands::Init => commands::config::init_config(),
    }
}
