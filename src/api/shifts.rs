//! Shift endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        common::ShiftPage,
        shift::{CreateShift, ShiftDetails, ShiftQuery, UpdateShift},
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List shifts
#[utoipa::path(
    get,
    path = "/shifts",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(ShiftQuery),
    responses(
        (status = 200, description = "List of shifts", body = ShiftPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_shifts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ShiftQuery>,
) -> AppResult<Json<ShiftPage>> {
    claims.require_staff()?;

    let (shifts, total) = state.services.circulation.list_shifts(&query).await?;
    Ok(Json(Paginated::new(shifts, total, Page::new(query.page, query.per_page))))
}

/// Get shift by ID
#[utoipa::path(
    get,
    path = "/shifts/{id}",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Shift details", body = ShiftDetails),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn get_shift(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ShiftDetails>> {
    claims.require_staff()?;

    let shift = state.services.circulation.get_shift(id).await?;
    Ok(Json(shift))
}

/// Create a shift
#[utoipa::path(
    post,
    path = "/shifts",
    tag = "circulation",
    security(("bearer_auth" = [])),
    request_body = CreateShift,
    responses(
        (status = 201, description = "Shift created", body = ShiftDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_shift(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateShift>,
) -> AppResult<(StatusCode, Json<ShiftDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let shift = state
        .services
        .circulation
        .create_shift(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

/// Update a shift
#[utoipa::path(
    put,
    path = "/shifts/{id}",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shift ID")),
    request_body = UpdateShift,
    responses(
        (status = 200, description = "Shift updated", body = ShiftDetails),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn update_shift(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateShift>,
) -> AppResult<Json<ShiftDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let shift = state
        .services
        .circulation
        .update_shift(id, &data, claims.account_id)
        .await?;
    Ok(Json(shift))
}
