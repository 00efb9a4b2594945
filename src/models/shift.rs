//! Shift (transfer of custody) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    checkout::checkout_label,
    common::Audit,
    enums::{RecordStatus, ShiftStatus},
};

/// Shift row: a reader asks the current holder of a checkout to hand the book over
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Shift {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub checkout_id: Option<i32>,
    pub request_user_profile_id: Option<i32>,
    pub reason: String,
    pub agreed: bool,
    pub reply: String,
    pub shift_status: ShiftStatus,
    pub request_time: DateTime<Utc>,
    pub reply_time: Option<DateTime<Utc>>,
    pub complete_time: Option<DateTime<Utc>>,
}

/// Shift label: "<book>:<requester>", or "----" when either side is missing
pub fn shift_label(book_name: Option<&str>, requester: Option<&str>) -> String {
    match (book_name, requester) {
        (Some(book), Some(user)) => format!("{}:{}", book, user),
        _ => "----".to_string(),
    }
}

/// Shift with checkout and requester columns resolved
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ShiftDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub shift: Shift,
    #[serde(skip)]
    pub book_name: Option<String>,
    /// Reader currently holding the book
    #[serde(skip)]
    pub holder_username: Option<String>,
    pub requester_username: Option<String>,
    #[sqlx(skip)]
    pub checkout_label: String,
    #[sqlx(skip)]
    pub label: String,
}

impl ShiftDetails {
    pub fn finish(mut self) -> Self {
        self.checkout_label =
            checkout_label(self.book_name.as_deref(), self.holder_username.as_deref());
        self.label = shift_label(self.book_name.as_deref(), self.requester_username.as_deref());
        self
    }
}

/// Shift list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ShiftQuery {
    pub status: Option<RecordStatus>,
    pub shift_status: Option<ShiftStatus>,
    pub checkout_id: Option<i32>,
    pub request_user_profile_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create shift request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShift {
    pub checkout_id: Option<i32>,
    pub request_user_profile_id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Reason must be 1-100 characters"))]
    pub reason: String,
    pub agreed: Option<bool>,
    #[validate(length(max = 100))]
    pub reply: Option<String>,
    pub shift_status: Option<ShiftStatus>,
    pub request_time: Option<DateTime<Utc>>,
    pub reply_time: Option<DateTime<Utc>>,
    pub complete_time: Option<DateTime<Utc>>,
    pub status: Option<RecordStatus>,
}

/// Update shift request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateShift {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub checkout_id: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub request_user_profile_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 100, message = "Reason must be 1-100 characters"))]
    pub reason: Option<String>,
    pub agreed: Option<bool>,
    #[validate(length(max = 100))]
    pub reply: Option<String>,
    pub shift_status: Option<ShiftStatus>,
    pub request_time: Option<DateTime<Utc>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub reply_time: Option<Option<DateTime<Utc>>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub complete_time: Option<Option<DateTime<Utc>>>,
    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_label() {
        assert_eq!(shift_label(Some("Dune"), Some("chani")), "Dune:chani");
        assert_eq!(shift_label(Some("Dune"), None), "----");
        assert_eq!(shift_label(None, Some("chani")), "----");
    }
}
