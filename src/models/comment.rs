//! Reader comment model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    checkout::checkout_label,
    common::{format_float, Audit},
    enums::RecordStatus,
};

pub const DEFAULT_COMMENT_SCORE: f64 = 5.0;

/// Comment row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub checkout_id: Option<i32>,
    pub score: f64,
    pub content: String,
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_float(self.score))
    }
}

/// Comment with its checkout label
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CommentDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(skip)]
    pub book_name: Option<String>,
    #[serde(skip)]
    pub username: Option<String>,
    #[sqlx(skip)]
    pub checkout_label: String,
    #[sqlx(skip)]
    pub label: String,
}

impl CommentDetails {
    pub fn finish(mut self) -> Self {
        self.checkout_label = checkout_label(self.book_name.as_deref(), self.username.as_deref());
        self.label = self.comment.to_string();
        self
    }
}

/// Comment list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CommentQuery {
    pub status: Option<RecordStatus>,
    pub checkout_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create comment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    pub checkout_id: Option<i32>,
    #[validate(range(min = 0.0, max = 5.0, message = "Score must be between 0 and 5"))]
    pub score: Option<f64>,
    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: String,
    pub status: Option<RecordStatus>,
}

/// Update comment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateComment {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub checkout_id: Option<Option<i32>>,
    #[validate(range(min = 0.0, max = 5.0, message = "Score must be between 0 and 5"))]
    pub score: Option<f64>,
    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: Option<String>,
    pub status: Option<RecordStatus>,
}
