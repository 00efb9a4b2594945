//! Book model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    common::{media_url, Audit},
    enums::{BookStatus, RecordStatus},
};

/// Placeholder shown when a book has no cover
pub const COVER_PLACEHOLDER: &str = "book.png";

pub const DEFAULT_TOTAL_PAGE: i32 = 200;
pub const DEFAULT_SCORE: f64 = 4.0;

/// Default list price
pub fn default_price() -> Decimal {
    Decimal::new(5000, 2)
}

/// Default selling price
pub fn default_real_price() -> Decimal {
    Decimal::new(4000, 2)
}

/// Book row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    pub version: String,
    pub author: String,
    /// Translator
    pub trans: String,
    pub press: String,
    pub isbn: String,
    pub total_page: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[schema(value_type = String)]
    pub real_price: Decimal,
    /// Cover path relative to the media root
    pub cover: Option<String>,
    /// Reader score, not editable from the admin
    pub score: f64,
    pub category_id: Option<i32>,
    pub shelf_id: Option<i32>,
    pub shelf_floor: i32,
    pub book_status: BookStatus,
    pub series: String,
    pub series_number: i32,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Book with the admin list columns resolved
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub book: Book,
    pub category_name: Option<String>,
    pub shelf_code: Option<String>,
    #[sqlx(skip)]
    pub cover_url: String,
}

impl BookDetails {
    pub fn with_media_url(mut self, base: &str) -> Self {
        self.cover_url = media_url(base, self.book.cover.as_deref(), COVER_PLACEHOLDER);
        self
    }
}

/// Book list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub status: Option<RecordStatus>,
    pub category_id: Option<i32>,
    pub shelf_id: Option<i32>,
    pub book_status: Option<BookStatus>,
    /// Substring of name, author or press
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: String,
    #[validate(length(max = 10))]
    pub version: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Author must be 1-20 characters"))]
    pub author: String,
    #[validate(length(max = 50))]
    pub trans: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Press must be 1-20 characters"))]
    pub press: String,
    #[validate(length(min = 1, max = 20, message = "ISBN must be 1-20 characters"))]
    pub isbn: String,
    #[validate(range(min = 0))]
    pub total_page: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub real_price: Option<Decimal>,
    pub category_id: Option<i32>,
    pub shelf_id: Option<i32>,
    #[validate(range(min = 1))]
    pub shelf_floor: Option<i32>,
    pub book_status: Option<BookStatus>,
    #[validate(length(max = 20))]
    pub series: Option<String>,
    pub series_number: Option<i32>,
    pub status: Option<RecordStatus>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 10))]
    pub version: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Author must be 1-20 characters"))]
    pub author: Option<String>,
    #[validate(length(max = 50))]
    pub trans: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Press must be 1-20 characters"))]
    pub press: Option<String>,
    #[validate(length(min = 1, max = 20, message = "ISBN must be 1-20 characters"))]
    pub isbn: Option<String>,
    #[validate(range(min = 0))]
    pub total_page: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub real_price: Option<Decimal>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub shelf_id: Option<Option<i32>>,
    #[validate(range(min = 1))]
    pub shelf_floor: Option<i32>,
    pub book_status: Option<BookStatus>,
    #[validate(length(max = 20))]
    pub series: Option<String>,
    pub series_number: Option<i32>,
    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prices() {
        assert_eq!(default_price().to_string(), "50.00");
        assert_eq!(default_real_price().to_string(), "40.00");
    }
}
