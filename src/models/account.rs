//! Login accounts and token claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::fullname;
use crate::error::AppError;

/// Account row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Account {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    pub fn fullname(&self) -> String {
        fullname(Some(&self.first_name), Some(&self.last_name), Some(&self.username))
    }

    /// Superusers count as staff
    pub fn can_administer(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Account list filters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AccountQuery {
    /// Substring of username, first or last name
    pub q: Option<String>,
    pub is_staff: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create account request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccount {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Update account request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccount {
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

/// JWT claims for authenticated accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountClaims {
    pub sub: String,
    pub account_id: i32,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub exp: i64,
    pub iat: i64,
}

impl AccountClaims {
    pub fn for_account(account: &Account, now: i64, ttl_hours: u64) -> Self {
        Self {
            sub: account.username.clone(),
            account_id: account.id,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            exp: now + ttl_hours as i64 * 3600,
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Admin screens are reserved to staff
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff || self.is_superuser {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff account required".to_string()))
        }
    }

    pub fn require_superuser(&self) -> Result<(), AppError> {
        if self.is_superuser {
            Ok(())
        } else {
            Err(AppError::Authorization("Superuser privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(is_staff: bool, is_superuser: bool) -> Account {
        Account {
            id: 7,
            username: "librarian".to_string(),
            password: String::new(),
            first_name: "Mei".to_string(),
            last_name: "Han".to_string(),
            email: String::new(),
            is_staff,
            is_superuser,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_can_administer() {
        assert!(account(true, false).can_administer());
        assert!(account(false, true).can_administer());
        assert!(!account(false, false).can_administer());
    }

    #[test]
    fn test_token_round_trip() {
        let now = Utc::now().timestamp();
        let claims = AccountClaims::for_account(&account(true, false), now, 2);
        let token = claims.create_token("secret").unwrap();

        let parsed = AccountClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.account_id, 7);
        assert_eq!(parsed.sub, "librarian");
        assert_eq!(parsed.exp - parsed.iat, 7200);

        assert!(AccountClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_rights() {
        let now = Utc::now().timestamp();
        let reader = AccountClaims::for_account(&account(false, false), now, 1);
        assert!(reader.require_staff().is_err());

        let staff = AccountClaims::for_account(&account(true, false), now, 1);
        assert!(staff.require_staff().is_ok());
        assert!(staff.require_superuser().is_err());

        let root = AccountClaims::for_account(&account(false, true), now, 1);
        assert!(root.require_staff().is_ok());
        assert!(root.require_superuser().is_ok());
    }

    #[test]
    fn test_password_never_serialized() {
        let mut acc = account(true, false);
        acc.password = "$argon2id$hash".to_string();
        let json = serde_json::to_value(&acc).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(acc.fullname(), "HanMei");
    }
}
