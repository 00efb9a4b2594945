//! Fields and helpers shared by every lending record

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::{BatchAction, RecordStatus};

/// Days a reader may keep a book
pub const RETURN_WINDOW_DAYS: i64 = 15;

/// Reader account validity, six 31-day months
pub const ACCOUNT_VALIDITY_DAYS: i64 = 31 * 6;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Default return date of a new checkout
pub fn calc_return_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(RETURN_WINDOW_DAYS)
}

/// Default expiry of a new reader profile
pub fn calc_end_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(ACCOUNT_VALIDITY_DAYS)
}

/// Status flag and audit columns present on every table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Audit {
    pub status: RecordStatus,
    pub create_user_id: Option<i32>,
    pub create_time: DateTime<Utc>,
    pub update_user_id: Option<i32>,
    pub update_time: DateTime<Utc>,
}

/// Resolved page window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Paginated list wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    CategoryPage = Paginated<super::category::Category>,
    ShelfPage = Paginated<super::shelf::ShelfDetails>,
    BookPage = Paginated<super::book::BookDetails>,
    UserProfilePage = Paginated<super::user_profile::UserProfileDetails>,
    CheckOutPage = Paginated<super::checkout::CheckOutDetails>,
    CommentPage = Paginated<super::comment::CommentDetails>,
    NotePage = Paginated<super::note::NoteDetails>,
    RentPage = Paginated<super::rent::RentDetails>,
    ShiftPage = Paginated<super::shift::ShiftDetails>,
    FeedbackPage = Paginated<super::feedback::FeedbackDetails>,
    AccountPage = Paginated<super::account::Account>
)]
pub struct Paginated<T> {
    /// Records of the requested page
    pub items: Vec<T>,
    /// Total number of matching records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub per_page: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

/// Ids selected for a batch action
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    pub ids: Vec<i32>,
}

/// Outcome of a batch action
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchResponse {
    pub action: BatchAction,
    pub status: RecordStatus,
    pub affected: u64,
}

/// Display name of an account: "<last><first>" when both are set, else the username
pub fn fullname(first_name: Option<&str>, last_name: Option<&str>, username: Option<&str>) -> String {
    match (first_name, last_name) {
        (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
            format!("{}{}", last, first)
        }
        _ => username.unwrap_or("Unknown").to_string(),
    }
}

/// URL of an uploaded image, falling back to a placeholder under the same prefix
pub fn media_url(base: &str, path: Option<&str>, fallback: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}{}", base, p),
        _ => format!("{}{}", base, fallback),
    }
}

/// Formats a float the way admin labels show it ("5.0", "12.5")
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_calc_return_date() {
        let now = Utc.with_ymd_and_hms(2024, 2, 20, 10, 30, 0).unwrap();
        let due = calc_return_date(now);
        assert_eq!(due, Utc.with_ymd_and_hms(2024, 3, 6, 10, 30, 0).unwrap());
        assert_eq!((due - now).num_days(), 15);
    }

    #[test]
    fn test_calc_end_date() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = calc_end_date(now);
        assert_eq!((end - now).num_days(), 186);
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 7, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_page_bounds() {
        let page = Page::new(None, None);
        assert_eq!(page, Page { page: 1, per_page: 20 });
        assert_eq!(page.offset(), 0);

        let page = Page::new(Some(3), Some(10));
        assert_eq!(page.offset(), 20);

        let page = Page::new(Some(0), Some(5000));
        assert_eq!(page, Page { page: 1, per_page: MAX_PER_PAGE });
    }

    #[test]
    fn test_fullname() {
        assert_eq!(fullname(Some("Lei"), Some("Li"), Some("lilei")), "LiLei");
        assert_eq!(fullname(Some("Lei"), Some(""), Some("lilei")), "lilei");
        assert_eq!(fullname(None, None, Some("lilei")), "lilei");
        assert_eq!(fullname(None, None, None), "Unknown");
    }

    #[test]
    fn test_media_url() {
        assert_eq!(media_url("/media/", Some("book/a.png"), "book.png"), "/media/book/a.png");
        assert_eq!(media_url("/media/", Some(""), "book.png"), "/media/book.png");
        assert_eq!(media_url("/media/", None, "user.png"), "/media/user.png");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(5.0), "5.0");
        assert_eq!(format_float(12.5), "12.5");
        assert_eq!(format_float(-3.0), "-3.0");
    }
}
