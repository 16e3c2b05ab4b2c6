pub mod books;
pub mod config;
pub mod view;

pub use books::{
    add_book, delete_book, list_books, list_genres, review_book, show_stats, toggle_read,
    unreview_book,
};
pub use view::{set_filter, set_search, set_theme, ThemeAction};
