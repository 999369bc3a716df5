//! Domain model for the book catalog.
//!
//! # Responsibility
//! - Define the canonical book record and its mutation payload.
//! - Enforce the closed attribute set before anything reaches storage.
//!
//! # Invariants
//! - Every persisted record is identified by a stable `BookId`.
//! - A payload may only carry the eight known column names.

pub mod book;
