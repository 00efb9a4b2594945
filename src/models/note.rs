//! Reading note model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    checkout::checkout_label,
    common::{format_float, Audit},
    enums::RecordStatus,
};

/// Note row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Note {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub checkout_id: Option<i32>,
    pub page: f64,
    pub content: String,
}

/// Note label: "<book>:<page>", or "1" when the note has no checkout
pub fn note_label(book_name: Option<&str>, page: f64) -> String {
    match book_name {
        Some(book) => format!("{}:{}", book, format_float(page)),
        None => "1".to_string(),
    }
}

/// Note with its checkout label
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct NoteDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub note: Note,
    #[serde(skip)]
    pub book_name: Option<String>,
    #[serde(skip)]
    pub username: Option<String>,
    #[sqlx(skip)]
    pub checkout_label: String,
    #[sqlx(skip)]
    pub label: String,
}

impl NoteDetails {
    pub fn finish(mut self) -> Self {
        self.checkout_label = checkout_label(self.book_name.as_deref(), self.username.as_deref());
        self.label = note_label(self.book_name.as_deref(), self.note.page);
        self
    }
}

/// Note list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct NoteQuery {
    pub status: Option<RecordStatus>,
    pub checkout_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create note request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNote {
    pub checkout_id: Option<i32>,
    #[validate(range(min = 0.0))]
    pub page: Option<f64>,
    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: String,
    pub status: Option<RecordStatus>,
}

/// Update note request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateNote {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub checkout_id: Option<Option<i32>>,
    #[validate(range(min = 0.0))]
    pub page: Option<f64>,
    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: Option<String>,
    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_label() {
        assert_eq!(note_label(Some("Dune"), 12.0), "Dune:12.0");
        assert_eq!(note_label(Some("Dune"), 12.5), "Dune:12.5");
        assert_eq!(note_label(None, 12.0), "1");
    }
}
