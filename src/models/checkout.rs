//! Checkout (lending record) model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    common::{fullname, Audit},
    enums::{BookStatus, CheckOutType, RecordStatus},
};

/// Checkout row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CheckOut {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub user_profile_id: Option<i32>,
    pub book_id: Option<i32>,
    pub book_status: BookStatus,
    /// When the book was taken
    pub time: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: CheckOutType,
    /// Date the book is due back
    pub return_date: NaiveDate,
    pub returned_time: Option<DateTime<Utc>>,
    /// Whether another reader may request the book through a shift
    pub allow_shift: bool,
}

impl CheckOut {
    pub fn is_returned(&self) -> bool {
        self.returned_time.is_some()
    }

    /// Not returned and past its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_returned() && self.return_date < today
    }
}

/// Checkout label: "<book> -> <username>", or "#->#" when either side is missing
pub fn checkout_label(book_name: Option<&str>, username: Option<&str>) -> String {
    match (book_name, username) {
        (Some(book), Some(user)) => format!("{} -> {}", book, user),
        _ => "#->#".to_string(),
    }
}

/// Checkout with book and reader columns resolved
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CheckOutDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub checkout: CheckOut,
    pub book_name: Option<String>,
    pub username: Option<String>,
    #[serde(skip)]
    pub first_name: Option<String>,
    #[serde(skip)]
    pub last_name: Option<String>,
    #[sqlx(skip)]
    pub fullname: String,
    #[sqlx(skip)]
    pub label: String,
    #[sqlx(skip)]
    pub is_overdue: bool,
}

impl CheckOutDetails {
    pub fn finish(mut self) -> Self {
        self.fullname = fullname(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.username.as_deref(),
        );
        self.label = checkout_label(self.book_name.as_deref(), self.username.as_deref());
        self.is_overdue = self.checkout.is_overdue(Utc::now().date_naive());
        self
    }
}

/// Checkout list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CheckOutQuery {
    pub status: Option<RecordStatus>,
    #[serde(rename = "type")]
    pub kind: Option<CheckOutType>,
    pub user_profile_id: Option<i32>,
    pub book_id: Option<i32>,
    /// Only checkouts not returned yet
    pub open: Option<bool>,
    /// Substring of the book name or username
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCheckOut {
    pub user_profile_id: Option<i32>,
    pub book_id: Option<i32>,
    pub book_status: Option<BookStatus>,
    pub time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<CheckOutType>,
    pub return_date: Option<NaiveDate>,
    pub returned_time: Option<DateTime<Utc>>,
    pub allow_shift: Option<bool>,
    pub status: Option<RecordStatus>,
}

/// Update checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCheckOut {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub user_profile_id: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub book_id: Option<Option<i32>>,
    pub book_status: Option<BookStatus>,
    pub time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<CheckOutType>,
    pub return_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub returned_time: Option<Option<DateTime<Utc>>>,
    pub allow_shift: Option<bool>,
    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::calc_return_date;

    fn checkout(returned: bool) -> CheckOut {
        let now = Utc::now();
        CheckOut {
            id: 1,
            audit: crate::models::common::Audit {
                status: RecordStatus::Valid,
                create_user_id: None,
                create_time: now,
                update_user_id: None,
                update_time: now,
            },
            user_profile_id: Some(1),
            book_id: Some(1),
            book_status: BookStatus::default(),
            time: now,
            kind: CheckOutType::default(),
            return_date: calc_return_date(now).date_naive(),
            returned_time: returned.then_some(now),
            allow_shift: true,
        }
    }

    #[test]
    fn test_checkout_label() {
        assert_eq!(checkout_label(Some("Dune"), Some("paul")), "Dune -> paul");
        assert_eq!(checkout_label(Some("Dune"), None), "#->#");
        assert_eq!(checkout_label(None, Some("paul")), "#->#");
    }

    #[test]
    fn test_overdue() {
        let open = checkout(false);
        let today = Utc::now().date_naive();
        assert!(!open.is_overdue(today));
        assert!(open.is_overdue(open.return_date.succ_opt().unwrap()));

        let closed = checkout(true);
        assert!(!closed.is_overdue(closed.return_date.succ_opt().unwrap()));
    }

    #[test]
    fn test_type_field_serialized_as_type() {
        let json = serde_json::to_value(checkout(false)).unwrap();
        assert_eq!(json["type"], "SC");
        assert_eq!(json["book_status"], "ON");
        assert_eq!(json["status"], 2);
    }

    #[test]
    fn test_update_tells_null_from_absent() {
        let absent: UpdateCheckOut = serde_json::from_str(r#"{"allow_shift": false}"#).unwrap();
        assert_eq!(absent.returned_time, None);
        assert_eq!(absent.book_id, None);

        let cleared: UpdateCheckOut =
            serde_json::from_str(r#"{"returned_time": null, "book_id": null}"#).unwrap();
        assert_eq!(cleared.returned_time, Some(None));
        assert_eq!(cleared.book_id, Some(None));

        let set: UpdateCheckOut = serde_json::from_str(r#"{"book_id": 4}"#).unwrap();
        assert_eq!(set.book_id, Some(Some(4)));
    }
}
