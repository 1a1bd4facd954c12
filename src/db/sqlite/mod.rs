mod articles;
mod common;
mod marks;

pub use articles::SqliteArticleRepo;
pub use marks::SqliteMarkRepo;
