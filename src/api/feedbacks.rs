//! Feedback endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        common::FeedbackPage,
        feedback::{CreateFeedback, FeedbackDetails, FeedbackQuery, ReplyFeedback, UpdateFeedback},
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List feedbacks
#[utoipa::path(
    get,
    path = "/feedbacks",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(FeedbackQuery),
    responses(
        (status = 200, description = "List of feedbacks", body = FeedbackPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_feedbacks(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<FeedbackQuery>,
) -> AppResult<Json<FeedbackPage>> {
    claims.require_staff()?;

    let (feedbacks, total) = state.services.reviews.list_feedbacks(&query).await?;
    Ok(Json(Paginated::new(feedbacks, total, Page::new(query.page, query.per_page))))
}

/// Get feedback by ID
#[utoipa::path(
    get,
    path = "/feedbacks/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback details", body = FeedbackDetails),
        (status = 404, description = "Feedback not found")
    )
)]
pub async fn get_feedback(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<FeedbackDetails>> {
    claims.require_staff()?;

    let feedback = state.services.reviews.get_feedback(id).await?;
    Ok(Json(feedback))
}

/// Create a feedback
#[utoipa::path(
    post,
    path = "/feedbacks",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateFeedback,
    responses(
        (status = 201, description = "Feedback created", body = FeedbackDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_feedback(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateFeedback>,
) -> AppResult<(StatusCode, Json<FeedbackDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let feedback = state
        .services
        .reviews
        .create_feedback(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// Update a feedback
#[utoipa::path(
    put,
    path = "/feedbacks/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Feedback ID")),
    request_body = UpdateFeedback,
    responses(
        (status = 200, description = "Feedback updated", body = FeedbackDetails),
        (status = 404, description = "Feedback not found")
    )
)]
pub async fn update_feedback(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateFeedback>,
) -> AppResult<Json<FeedbackDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let feedback = state
        .services
        .reviews
        .update_feedback(id, &data, claims.account_id)
        .await?;
    Ok(Json(feedback))
}

/// Answer a feedback
#[utoipa::path(
    post,
    path = "/feedbacks/{id}/reply",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Feedback ID")),
    request_body = ReplyFeedback,
    responses(
        (status = 200, description = "Reply stored", body = FeedbackDetails),
        (status = 404, description = "Feedback not found")
    )
)]
pub async fn reply_feedback(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ReplyFeedback>,
) -> AppResult<Json<FeedbackDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let feedback = state
        .services
        .reviews
        .reply_feedback(id, &data.reply, claims.account_id)
        .await?;
    Ok(Json(feedback))
}
