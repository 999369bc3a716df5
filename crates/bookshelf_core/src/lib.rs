//! Storage core for the Bookshelf sample.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookDraft, BookId, BookValidationError, COLUMN_NAMES};
pub use repo::book_repo::{
    BookListQuery, BookPage, BookRepository, RepoError, RepoResult, SqliteBookRepository,
    DEFAULT_PAGE_SIZE,
};
pub use service::catalog_service::BookCatalog;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
