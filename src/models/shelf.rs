//! Shelf model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{common::Audit, enums::RecordStatus};

pub const DEFAULT_FLOORS: i32 = 4;
pub const DEFAULT_CAPACITY: i32 = 100;

/// Shelf row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Shelf {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub category_id: Option<i32>,
    /// Shelf code painted on the furniture
    pub code: String,
    pub location: String,
    pub floors: i32,
    /// Number of books the shelf holds
    pub capacity: i32,
}

impl std::fmt::Display for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Shelf with its category name, as listed in the admin
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ShelfDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub shelf: Shelf,
    pub category_name: Option<String>,
}

/// Shelf list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ShelfQuery {
    pub status: Option<RecordStatus>,
    pub category_id: Option<i32>,
    /// Substring of the code or location
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create shelf request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShelf {
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 10, message = "Code must be 1-10 characters"))]
    pub code: String,
    #[validate(length(max = 20, message = "Location must be at most 20 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "A shelf has at least one floor"))]
    pub floors: Option<i32>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    pub status: Option<RecordStatus>,
}

/// Update shelf request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateShelf {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 10, message = "Code must be 1-10 characters"))]
    pub code: Option<String>,
    #[validate(length(max = 20, message = "Location must be at most 20 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "A shelf has at least one floor"))]
    pub floors: Option<i32>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    pub status: Option<RecordStatus>,
}
