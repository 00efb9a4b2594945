//! Reader profile endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        common::UserProfilePage,
        user_profile::{CreateUserProfile, UserProfileDetails, UserProfileQuery, UpdateUserProfile},
        Page, Paginated,
    },
};

use super::{read_upload, AuthenticatedUser};

/// List user profiles
#[utoipa::path(
    get,
    path = "/user_profiles",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(UserProfileQuery),
    responses(
        (status = 200, description = "List of user profiles", body = UserProfilePage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_profiles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserProfileQuery>,
) -> AppResult<Json<UserProfilePage>> {
    claims.require_staff()?;

    let (profiles, total) = state.services.readers.list_profiles(&query).await?;
    Ok(Json(Paginated::new(profiles, total, Page::new(query.page, query.per_page))))
}

/// Get user profile by ID
#[utoipa::path(
    get,
    path = "/user_profiles/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User profile ID")),
    responses(
        (status = 200, description = "User profile details", body = UserProfileDetails),
        (status = 404, description = "User profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<UserProfileDetails>> {
    claims.require_staff()?;

    let profile = state.services.readers.get_profile(id).await?;
    Ok(Json(profile))
}

/// Create a user profile
#[utoipa::path(
    post,
    path = "/user_profiles",
    tag = "readers",
    security(("bearer_auth" = [])),
    request_body = CreateUserProfile,
    responses(
        (status = 201, description = "User profile created", body = UserProfileDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateUserProfile>,
) -> AppResult<(StatusCode, Json<UserProfileDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let profile = state
        .services
        .readers
        .create_profile(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Update a user profile
#[utoipa::path(
    put,
    path = "/user_profiles/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User profile ID")),
    request_body = UpdateUserProfile,
    responses(
        (status = 200, description = "User profile updated", body = UserProfileDetails),
        (status = 404, description = "User profile not found")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateUserProfile>,
) -> AppResult<Json<UserProfileDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let profile = state
        .services
        .readers
        .update_profile(id, &data, claims.account_id)
        .await?;
    Ok(Json(profile))
}

/// Upload an avatar; it is cropped to a centered square and scaled to 200x200
#[utoipa::path(
    post,
    path = "/user_profiles/{id}/avatar",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User profile ID")),
    request_body(content = super::ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar stored", body = UserProfileDetails),
        (status = 404, description = "User profile not found"),
        (status = 422, description = "Unreadable image")
    )
)]
pub async fn upload_avatar(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<UserProfileDetails>> {
    claims.require_staff()?;

    let bytes = read_upload(multipart).await?;
    let profile = state
        .services
        .readers
        .upload_avatar(id, bytes, claims.account_id)
        .await?;
    Ok(Json(profile))
}
