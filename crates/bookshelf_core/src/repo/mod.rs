//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the five catalog data-access operations as a contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must validate drafts before any SQL mutation.
//! - Read of a missing id is a normal `None` result, never an error.

pub mod book_repo;
