//! Book record and draft payload.
//!
//! # Responsibility
//! - Define the canonical `Book` row shape and the `BookDraft` write payload.
//! - Validate drafts against the column whitelist before persistence.
//!
//! # Invariants
//! - `id` is unique and immutable once assigned.
//! - The attribute set is closed over `COLUMN_NAMES`; foreign keys are
//!   rejected before any store interaction.
//! - Every string attribute holds at most `MAX_FIELD_CHARS` characters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a catalog record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = i64;

/// Column names of the `books` relation, in schema order.
pub const COLUMN_NAMES: &[&str] = &[
    "id",
    "title",
    "author",
    "published_date",
    "image_url",
    "description",
    "created_by",
    "created_by_id",
];

/// Upper bound on every string attribute, matching the `STRING(255)`
/// columns of the original schema.
pub const MAX_FIELD_CHARS: usize = 255;

/// Canonical persisted record. All attributes except `id` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub created_by_id: Option<String>,
}

/// Write payload for create/update operations.
///
/// `id` is optional: create assigns one transactionally when absent, while
/// update requires it to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub id: Option<BookId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub created_by_id: Option<String>,
}

/// Rejection reasons raised before any row is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// Payload carried keys outside the column whitelist.
    UnknownFields(Vec<String>),
    /// Update was requested without an id.
    MissingId,
    /// A string attribute exceeded `MAX_FIELD_CHARS`.
    FieldTooLong { field: &'static str, len: usize },
    /// JSON payload was not an object.
    NotAnObject,
    /// A known key carried a value of the wrong JSON type.
    InvalidFieldType(String),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFields(fields) => {
                write!(f, "unsupported book properties: \"{}\"", fields.join(", "))
            }
            Self::MissingId => write!(f, "book must have an id attribute"),
            Self::FieldTooLong { field, len } => write!(
                f,
                "book property `{field}` is {len} characters; limit is {MAX_FIELD_CHARS}"
            ),
            Self::NotAnObject => write!(f, "book payload must be a JSON object"),
            Self::InvalidFieldType(field) => {
                write!(f, "book property `{field}` has an unsupported value type")
            }
        }
    }
}

impl Error for BookValidationError {}

impl BookDraft {
    /// Builds a draft from an untrusted JSON payload.
    ///
    /// # Contract
    /// - Rejects non-object payloads.
    /// - Rejects any key outside `COLUMN_NAMES`, naming every offender.
    /// - `id` must be a JSON integer when present; the seven string
    ///   attributes must be JSON strings. `null` reads as absent.
    pub fn from_json(payload: &Value) -> Result<Self, BookValidationError> {
        let object = payload
            .as_object()
            .ok_or(BookValidationError::NotAnObject)?;

        let unknown: Vec<String> = object
            .keys()
            .filter(|key| !COLUMN_NAMES.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(BookValidationError::UnknownFields(unknown));
        }

        let id = match object.get("id") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value
                    .as_i64()
                    .ok_or_else(|| BookValidationError::InvalidFieldType("id".to_string()))?,
            ),
        };

        Ok(Self {
            id,
            title: string_field(object, "title")?,
            author: string_field(object, "author")?,
            published_date: string_field(object, "published_date")?,
            image_url: string_field(object, "image_url")?,
            description: string_field(object, "description")?,
            created_by: string_field(object, "created_by")?,
            created_by_id: string_field(object, "created_by_id")?,
        })
    }

    /// Checks length limits on every string attribute.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        for (field, value) in self.string_fields() {
            if let Some(text) = value {
                let len = text.chars().count();
                if len > MAX_FIELD_CHARS {
                    return Err(BookValidationError::FieldTooLong { field, len });
                }
            }
        }
        Ok(())
    }

    /// Promotes this draft into a full record once an id is known.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published_date: self.published_date,
            image_url: self.image_url,
            description: self.description,
            created_by: self.created_by,
            created_by_id: self.created_by_id,
        }
    }

    fn string_fields(&self) -> [(&'static str, &Option<String>); 7] {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("published_date", &self.published_date),
            ("image_url", &self.image_url),
            ("description", &self.description),
            ("created_by", &self.created_by),
            ("created_by_id", &self.created_by_id),
        ]
    }
}

impl From<Book> for BookDraft {
    fn from(book: Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title,
            author: book.author,
            published_date: book.published_date,
            image_url: book.image_url,
            description: book.description,
            created_by: book.created_by,
            created_by_id: book.created_by_id,
        }
    }
}

fn string_field(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, BookValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(BookValidationError::InvalidFieldType(field.to_string())),
    }
}
