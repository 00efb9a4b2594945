//! API handlers for the library REST endpoints

pub mod accounts;
pub mod auth;
pub mod batch;
pub mod books;
pub mod categories;
pub mod checkouts;
pub mod comments;
pub mod feedbacks;
pub mod health;
pub mod notes;
pub mod openapi;
pub mod pages;
pub mod rents;
pub mod shelves;
pub mod shifts;
pub mod user_profiles;

use axum::{
    async_trait,
    extract::{FromRequestParts, Multipart},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use utoipa::ToSchema;

use crate::{error::AppError, models::AccountClaims, AppState};

/// Extractor for the authenticated account.
///
/// Accepts a `Bearer` token, or the session cookie set by the login page.
pub struct AuthenticatedUser(pub AccountClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(value) => {
                let header = value
                    .to_str()
                    .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;
                header
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| {
                        AppError::Authentication("Invalid authorization header format".to_string())
                    })?
                    .to_string()
            }
            None => CookieJar::from_headers(&parts.headers)
                .get(&state.config.auth.session_cookie)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?,
        };

        let claims = state.services.auth.verify_token(&token).await?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Multipart form carrying one image
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Bytes of the `file` field of an upload form
pub async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}

