//! Book category model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{common::Audit, enums::RecordStatus};

/// Category row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    pub description: String,
    /// Position in lists, ascending
    pub order_number: i32,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Category list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CategoryQuery {
    pub status: Option<RecordStatus>,
    /// Substring of the name
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
    pub order_number: Option<i32>,
    pub status: Option<RecordStatus>,
}

/// Update category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
    pub order_number: Option<i32>,
    pub status: Option<RecordStatus>,
}
