//! Reading note endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        common::NotePage,
        note::{CreateNote, NoteDetails, NoteQuery, UpdateNote},
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List notes
#[utoipa::path(
    get,
    path = "/notes",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(NoteQuery),
    responses(
        (status = 200, description = "List of notes", body = NotePage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_notes(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<NoteQuery>,
) -> AppResult<Json<NotePage>> {
    claims.require_staff()?;

    let (notes, total) = state.services.reviews.list_notes(&query).await?;
    Ok(Json(Paginated::new(notes, total, Page::new(query.page, query.per_page))))
}

/// Get note by ID
#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note details", body = NoteDetails),
        (status = 404, description = "Note not found")
    )
)]
pub async fn get_note(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<NoteDetails>> {
    claims.require_staff()?;

    let note = state.services.reviews.get_note(id).await?;
    Ok(Json(note))
}

/// Create a note
#[utoipa::path(
    post,
    path = "/notes",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateNote,
    responses(
        (status = 201, description = "Note created", body = NoteDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_note(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<NoteDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let note = state
        .services
        .reviews
        .create_note(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Update a note
#[utoipa::path(
    put,
    path = "/notes/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Note ID")),
    request_body = UpdateNote,
    responses(
        (status = 200, description = "Note updated", body = NoteDetails),
        (status = 404, description = "Note not found")
    )
)]
pub async fn update_note(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateNote>,
) -> AppResult<Json<NoteDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let note = state
        .services
        .reviews
        .update_note(id, &data, claims.account_id)
        .await?;
    Ok(Json(note))
}
