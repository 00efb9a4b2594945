//! Authentication and account management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::account::{Account, AccountClaims, AccountQuery, CreateAccount, UpdateAccount},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check credentials and issue a token for an active account
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, Account)> {
        let account = self.check_credentials(username, password).await?;
        self.sign_in(account).await
    }

    /// Same as [`authenticate`](Self::authenticate), restricted to staff accounts.
    ///
    /// Non-staff accounts are refused before `last_login` is touched.
    pub async fn authenticate_staff(&self, username: &str, password: &str) -> AppResult<(String, Account)> {
        let account = self.check_credentials(username, password).await?;
        if !account.can_administer() {
            return Err(AppError::Authorization("Staff account required".to_string()));
        }
        self.sign_in(account).await
    }

    async fn check_credentials(&self, username: &str, password: &str) -> AppResult<Account> {
        let account = self
            .repository
            .accounts
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !account.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        if !verify_password(&account.password, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }
        Ok(account)
    }

    async fn sign_in(&self, account: Account) -> AppResult<(String, Account)> {
        self.repository.accounts.touch_last_login(account.id).await?;
        let token = self.create_token(&account)?;

        tracing::info!(username = %account.username, "account logged in");
        Ok((token, account))
    }

    pub fn create_token(&self, account: &Account) -> AppResult<String> {
        AccountClaims::for_account(account, Utc::now().timestamp(), self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode a token and make sure its account is still active
    pub async fn verify_token(&self, token: &str) -> AppResult<AccountClaims> {
        let claims = AccountClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        let account = self.repository.accounts.get_by_id(claims.account_id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::Authentication("Account no longer exists".to_string()),
            other => other,
        })?;
        if !account.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        // privileges may have changed since the token was issued
        Ok(AccountClaims {
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            ..claims
        })
    }

    /// Create the configured superuser when no account exists yet
    pub async fn ensure_admin(&self) -> AppResult<()> {
        let (Some(username), Some(password)) =
            (self.config.admin_username.as_ref(), self.config.admin_password.as_ref())
        else {
            return Ok(());
        };

        if self.repository.accounts.count().await? > 0 {
            return Ok(());
        }

        let data = CreateAccount {
            username: username.clone(),
            password: password.clone(),
            first_name: None,
            last_name: None,
            email: None,
            is_staff: Some(true),
            is_superuser: Some(true),
        };
        let hash = hash_password(password)?;
        self.repository.accounts.create(&data, &hash).await?;

        tracing::warn!(%username, "created initial superuser, change its password");
        Ok(())
    }

    pub async fn get_account(&self, id: i32) -> AppResult<Account> {
        self.repository.accounts.get_by_id(id).await
    }

    pub async fn list_accounts(&self, query: &AccountQuery) -> AppResult<(Vec<Account>, i64)> {
        self.repository.accounts.list(query).await
    }

    pub async fn create_account(&self, data: &CreateAccount) -> AppResult<Account> {
        if self.repository.accounts.get_by_username(&data.username).await?.is_some() {
            return Err(AppError::Conflict(format!("Username {} is already taken", data.username)));
        }
        let hash = hash_password(&data.password)?;
        self.repository.accounts.create(data, &hash).await
    }

    pub async fn update_account(&self, id: i32, data: &UpdateAccount) -> AppResult<Account> {
        let hash = match data.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };
        self.repository.accounts.update(id, data, hash).await
    }
}

/// Hash a password with argon2 and a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "s3cret").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        assert!(matches!(verify_password("plain", "plain"), Err(AppError::Internal(_))));
    }
}
