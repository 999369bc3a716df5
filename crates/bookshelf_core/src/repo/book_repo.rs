//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/create/read/update/delete over the canonical `books`
//!   relation.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths reject invalid drafts before touching a row.
//! - Listing is strictly ascending by `id`; the cursor is the id of the
//!   last row on the returned page.
//! - Id assignment for no-id creates runs inside one immediate transaction
//!   so concurrent writers never observe the same next id.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::book::{Book, BookDraft, BookId, BookValidationError, COLUMN_NAMES};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    published_date,
    image_url,
    description,
    created_by,
    created_by_id
FROM books";

/// Page size used when a caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection has schema version {actual_version}, expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination options for listing books.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookListQuery {
    /// Page size; the service layer substitutes the default when `None`.
    pub limit: Option<u32>,
    /// Id of the last row of the previous page, or `None` for the first page.
    pub cursor: Option<BookId>,
}

/// One page of the catalog plus the token for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    pub books: Vec<Book>,
    /// Set when at least one row exists beyond this page.
    pub next_cursor: Option<BookId>,
}

/// Repository interface for the five catalog operations.
pub trait BookRepository {
    fn list_books(&self, query: &BookListQuery) -> RepoResult<BookPage>;
    fn create_book(&self, draft: &BookDraft) -> RepoResult<BookId>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn update_book(&self, draft: &BookDraft) -> RepoResult<usize>;
    fn delete_book(&self, id: BookId) -> RepoResult<usize>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a connection after verifying the schema is provisioned.
    ///
    /// Verification never provisions: callers open through `db::open_db`
    /// (which migrates) or inject an already migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected = latest_version();
        let actual = current_user_version(conn)?;
        if actual != expected {
            return Err(RepoError::UninitializedConnection {
                expected_version: expected,
                actual_version: actual,
            });
        }

        if !table_exists(conn, "books")? {
            return Err(RepoError::MissingRequiredTable("books"));
        }
        if let Some(&column) = missing_columns(conn, "books")?.first() {
            return Err(RepoError::MissingRequiredColumn {
                table: "books",
                column,
            });
        }

        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn list_books(&self, query: &BookListQuery) -> RepoResult<BookPage> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let mut sql = String::from(BOOK_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(cursor) = query.cursor {
            sql.push_str(" WHERE id > ?");
            bind_values.push(Value::Integer(cursor));
        }

        // Over-fetch one row to learn whether another page exists without a
        // separate count query.
        sql.push_str(" ORDER BY id ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit) + 1));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books: Vec<Book> = Vec::new();
        let mut has_more = false;

        while let Some(row) = rows.next()? {
            if books.len() == limit as usize {
                has_more = true;
                break;
            }
            books.push(parse_book_row(row)?);
        }

        let next_cursor = if has_more {
            books.last().map(|book| book.id)
        } else {
            None
        };

        Ok(BookPage { books, next_cursor })
    }

    fn create_book(&self, draft: &BookDraft) -> RepoResult<BookId> {
        draft.validate()?;

        if let Some(id) = draft.id {
            // Caller asserts uniqueness; a collision surfaces as the
            // store's primary-key constraint violation.
            insert_book(self.conn, id, draft)?;
            return Ok(id);
        }

        // Immediate transaction: the max-then-insert sequence must be
        // serialized against concurrent no-id creates.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let next_id: BookId =
            tx.query_row("SELECT COALESCE(MAX(id), 0) + 1 FROM books;", [], |row| {
                row.get(0)
            })?;
        insert_book(&tx, next_id, draft)?;
        tx.commit()?;

        Ok(next_id)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn update_book(&self, draft: &BookDraft) -> RepoResult<usize> {
        draft.validate()?;
        let id = draft
            .id
            .ok_or(RepoError::Validation(BookValidationError::MissingId))?;

        self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author = ?2,
                published_date = ?3,
                image_url = ?4,
                description = ?5,
                created_by = ?6,
                created_by_id = ?7
             WHERE id = ?8;",
            params![
                draft.title.as_deref(),
                draft.author.as_deref(),
                draft.published_date.as_deref(),
                draft.image_url.as_deref(),
                draft.description.as_deref(),
                draft.created_by.as_deref(),
                draft.created_by_id.as_deref(),
                id,
            ],
        )?;

        // Affected-row contract is constant 1; whether the row previously
        // existed is the store's concern, not this adapter's.
        Ok(1)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<usize> {
        self.conn
            .execute("DELETE FROM books WHERE id = ?1;", params![id])?;

        // Deleting an absent id is not an error.
        Ok(1)
    }
}

fn insert_book(conn: &Connection, id: BookId, draft: &BookDraft) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO books (
            id,
            title,
            author,
            published_date,
            image_url,
            description,
            created_by,
            created_by_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        params![
            id,
            draft.title.as_deref(),
            draft.author.as_deref(),
            draft.published_date.as_deref(),
            draft.image_url.as_deref(),
            draft.description.as_deref(),
            draft.created_by.as_deref(),
            draft.created_by_id.as_deref(),
        ],
    )?;
    Ok(())
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        published_date: row.get("published_date")?,
        image_url: row.get("image_url")?,
        description: row.get("description")?,
        created_by: row.get("created_by")?,
        created_by_id: row.get("created_by_id")?,
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns whitelist columns absent from the live table, if any.
fn missing_columns(conn: &Connection, table: &str) -> RepoResult<Vec<&'static str>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut present: Vec<String> = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get("name")?);
    }

    Ok(COLUMN_NAMES
        .iter()
        .filter(|column| !present.iter().any(|name| name == *column))
        .copied()
        .collect())
}
