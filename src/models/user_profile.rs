//! Reader profile model

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    common::{fullname, media_url, Audit},
    enums::{RecordStatus, Sex},
};

/// Placeholder shown when a reader has no avatar
pub const AVATAR_PLACEHOLDER: &str = "user.png";

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{0,11}$").expect("valid regex"));

/// Reader profile row, one per account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub account_id: Option<i32>,
    pub mobile: String,
    pub sex: Sex,
    pub birth: Option<NaiveDate>,
    /// Avatar path relative to the media root
    pub avatar: Option<String>,
    pub job: String,
    pub start_date: NaiveDate,
    /// Date the reader card expires
    pub end_date: NaiveDate,
    pub wx_id: String,
}

/// Profile label: the account username, or the mobile number when unlinked
pub fn profile_label(username: Option<&str>, mobile: &str) -> String {
    username.unwrap_or(mobile).to_string()
}

/// Profile with account columns resolved
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserProfileDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: UserProfile,
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
    pub avatar_url: String,
}

impl UserProfileDetails {
    pub fn finish(mut self) -> Self {
        self.fullname = if self.username.is_some() {
            fullname(
                self.first_name.as_deref(),
                self.last_name.as_deref(),
                self.username.as_deref(),
            )
        } else {
            fullname(None, None, None)
        };
        self.label = profile_label(self.username.as_deref(), &self.profile.mobile);
        self
    }

    pub fn with_media_url(mut self, base: &str) -> Self {
        self.avatar_url = media_url(base, self.profile.avatar.as_deref(), AVATAR_PLACEHOLDER);
        self
    }
}

/// Profile list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct UserProfileQuery {
    pub status: Option<RecordStatus>,
    pub sex: Option<Sex>,
    /// Substring of the username or mobile
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create profile request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserProfile {
    pub account_id: Option<i32>,
    #[validate(regex(path = *MOBILE_RE, message = "Mobile must be at most 11 digits"))]
    pub mobile: Option<String>,
    pub sex: Option<Sex>,
    pub birth: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub job: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<RecordStatus>,
}

/// Update profile request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserProfile {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub account_id: Option<Option<i32>>,
    #[validate(regex(path = *MOBILE_RE, message = "Mobile must be at most 11 digits"))]
    pub mobile: Option<String>,
    pub sex: Option<Sex>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub birth: Option<Option<NaiveDate>>,
    #[validate(length(max = 20))]
    pub job: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_label() {
        assert_eq!(profile_label(Some("wang"), "13800000000"), "wang");
        assert_eq!(profile_label(None, "13800000000"), "13800000000");
    }

    #[test]
    fn test_mobile_validation() {
        let valid = CreateUserProfile {
            account_id: None,
            mobile: Some("13800000000".to_string()),
            sex: None,
            birth: None,
            job: None,
            start_date: None,
            end_date: None,
            status: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateUserProfile {
            mobile: Some("138-0000-0000".to_string()),
            ..valid
        };
        assert!(invalid.validate().is_err());
    }
}
