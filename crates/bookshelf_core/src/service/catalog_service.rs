//! Book catalog use-case service.
//!
//! # Responsibility
//! - Provide stable catalog entry points for the surrounding request layer.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Service layer remains storage-agnostic.

use crate::model::book::{Book, BookDraft, BookId};
use crate::repo::book_repo::{
    BookListQuery, BookPage, BookRepository, RepoResult, DEFAULT_PAGE_SIZE,
};
use serde_json::Value;

/// Use-case service wrapper for the five catalog operations.
pub struct BookCatalog<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookCatalog<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists one page of the catalog, ascending by id.
    ///
    /// # Contract
    /// - `limit` defaults to `DEFAULT_PAGE_SIZE` when `None`.
    /// - `cursor` is the id of the last book of the previous page.
    pub fn list_books(&self, limit: Option<u32>, cursor: Option<BookId>) -> RepoResult<BookPage> {
        self.repo.list_books(&BookListQuery {
            limit: Some(limit.unwrap_or(DEFAULT_PAGE_SIZE)),
            cursor,
        })
    }

    /// Creates a book, assigning an id when the draft carries none.
    pub fn create_book(&self, draft: &BookDraft) -> RepoResult<BookId> {
        self.repo.create_book(draft)
    }

    /// Creates a book from an untrusted JSON payload.
    ///
    /// Whitelist validation runs before any store interaction.
    pub fn create_book_from_json(&self, payload: &Value) -> RepoResult<BookId> {
        let draft = BookDraft::from_json(payload)?;
        self.repo.create_book(&draft)
    }

    /// Gets one book by id; absence is `Ok(None)`, not an error.
    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repo.get_book(id)
    }

    /// Replaces all fields of an existing book. The draft must carry an id.
    pub fn update_book(&self, draft: &BookDraft) -> RepoResult<usize> {
        self.repo.update_book(draft)
    }

    /// Updates a book from an untrusted JSON payload.
    pub fn update_book_from_json(&self, payload: &Value) -> RepoResult<usize> {
        let draft = BookDraft::from_json(payload)?;
        self.repo.update_book(&draft)
    }

    /// Deletes a book by id. Deleting an absent id is not an error.
    pub fn delete_book(&self, id: BookId) -> RepoResult<usize> {
        self.repo.delete_book(id)
    }
}
