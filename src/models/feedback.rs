//! Reader feedback model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{common::Audit, enums::RecordStatus};

/// Characters of the content kept in list labels
pub const LABEL_LENGTH: usize = 35;

/// Feedback row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Feedback {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub user_profile_id: Option<i32>,
    pub content: String,
    #[serde(skip_serializing)]
    pub wx_form_id: Option<String>,
    pub reply: String,
    pub reply_time: Option<DateTime<Utc>>,
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", feedback_label(&self.content))
    }
}

/// Content shortened to the first 35 characters followed by ".."
pub fn feedback_label(content: &str) -> String {
    if content.chars().count() < LABEL_LENGTH {
        content.to_string()
    } else {
        let head: String = content.chars().take(LABEL_LENGTH).collect();
        format!("{}..", head)
    }
}

/// Feedback with its author resolved
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct FeedbackDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub feedback: Feedback,
    pub username: Option<String>,
    #[sqlx(skip)]
    pub label: String,
}

impl FeedbackDetails {
    pub fn finish(mut self) -> Self {
        self.label = self.feedback.to_string();
        self
    }
}

/// Feedback list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct FeedbackQuery {
    pub status: Option<RecordStatus>,
    pub user_profile_id: Option<i32>,
    /// Only feedback without a reply
    pub unanswered: Option<bool>,
    /// Substring of the content
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create feedback request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFeedback {
    pub user_profile_id: Option<i32>,
    #[validate(length(min = 1, max = 300, message = "Content must be 1-300 characters"))]
    pub content: String,
    pub status: Option<RecordStatus>,
}

/// Update feedback request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFeedback {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub user_profile_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 300, message = "Content must be 1-300 characters"))]
    pub content: Option<String>,
    #[validate(length(max = 200, message = "Reply must be at most 200 characters"))]
    pub reply: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub reply_time: Option<Option<DateTime<Utc>>>,
    pub status: Option<RecordStatus>,
}

/// Reply to a feedback
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplyFeedback {
    #[validate(length(min = 1, max = 200, message = "Reply must be 1-200 characters"))]
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_kept() {
        assert_eq!(feedback_label("Too noisy on Sundays"), "Too noisy on Sundays");
    }

    #[test]
    fn test_long_content_truncated() {
        let content = "a".repeat(40);
        let label = feedback_label(&content);
        assert_eq!(label, format!("{}..", "a".repeat(35)));

        // exactly 35 characters is already truncated
        assert_eq!(feedback_label(&"b".repeat(35)), format!("{}..", "b".repeat(35)));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let content = "图书馆".repeat(12);
        let label = feedback_label(&content);
        assert_eq!(label.chars().count(), 37);
        assert!(label.ends_with(".."));
    }
}
