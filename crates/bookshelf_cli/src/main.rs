//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bookshelf_core` linkage.
//! - Resolve store location and logging from the environment, matching the
//!   sample's env-driven configuration at the process edge only.

use bookshelf_core::db::{open_db, open_db_in_memory};
use bookshelf_core::{default_log_level, init_logging, BookCatalog, SqliteBookRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("BOOKSHELF_LOG_DIR") {
        let level =
            std::env::var("BOOKSHELF_LOG_LEVEL").unwrap_or_else(|_| default_log_level().into());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging init failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    // BOOKSHELF_DB selects a database file; unset means a throwaway
    // in-memory store, which is enough for a linkage probe.
    let opened = match std::env::var("BOOKSHELF_DB") {
        Ok(path) => open_db(path),
        Err(_) => open_db_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open bookshelf database: {err}");
            return ExitCode::FAILURE;
        }
    };

    let repo = match SqliteBookRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("failed to attach book repository: {err}");
            return ExitCode::FAILURE;
        }
    };
    let catalog = BookCatalog::new(repo);

    match catalog.list_books(None, None) {
        Ok(page) => {
            println!("bookshelf_core version={}", bookshelf_core::core_version());
            println!(
                "books_on_first_page={} has_more={}",
                page.books.len(),
                page.next_cursor.is_some()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to list books: {err}");
            ExitCode::FAILURE
        }
    }
}
