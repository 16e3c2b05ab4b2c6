pub mod book;
pub mod genre;
pub mod ids;
pub mod rating;
pub mod theme;

pub use book::Book;
pub use genre::Genre;
pub use ids::BookId;
pub use rating::Rating;
pub use theme::Theme;
