//! Core domain model for bookshelf.
//!
//! This crate defines the book collection model, form validation, the
//! status/search filter, key-value persistence, and the `Library` state
//! object that every view surface drives.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod filter;
pub mod library;
pub mod model;
pub mod stats;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{filter_books, SearchOptions, SearchQuery, StatusFilter};
pub use library::Library;
pub use model::{Book, BookId, Genre, Rating, Theme};
pub use stats::LibraryStats;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use validation::{BookDraft, NewBook};
