//! Comment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        comment::{CreateComment, CommentDetails, CommentQuery, UpdateComment},
        common::CommentPage,
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List comments
#[utoipa::path(
    get,
    path = "/comments",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(CommentQuery),
    responses(
        (status = 200, description = "List of comments", body = CommentPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_comments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<CommentQuery>,
) -> AppResult<Json<CommentPage>> {
    claims.require_staff()?;

    let (comments, total) = state.services.reviews.list_comments(&query).await?;
    Ok(Json(Paginated::new(comments, total, Page::new(query.page, query.per_page))))
}

/// Get comment by ID
#[utoipa::path(
    get,
    path = "/comments/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment details", body = CommentDetails),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn get_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CommentDetails>> {
    claims.require_staff()?;

    let comment = state.services.reviews.get_comment(id).await?;
    Ok(Json(comment))
}

/// Create a comment
#[utoipa::path(
    post,
    path = "/comments",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = CommentDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<CommentDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let comment = state
        .services
        .reviews
        .create_comment(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Update a comment
#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = UpdateComment,
    responses(
        (status = 200, description = "Comment updated", body = CommentDetails),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn update_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateComment>,
) -> AppResult<Json<CommentDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let comment = state
        .services
        .reviews
        .update_comment(id, &data, claims.account_id)
        .await?;
    Ok(Json(comment))
}
