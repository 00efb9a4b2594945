//! Checkout endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        checkout::{CreateCheckOut, CheckOutDetails, CheckOutQuery, UpdateCheckOut},
        common::CheckOutPage,
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List checkouts
#[utoipa::path(
    get,
    path = "/checkouts",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(CheckOutQuery),
    responses(
        (status = 200, description = "List of checkouts", body = CheckOutPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_checkouts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<CheckOutQuery>,
) -> AppResult<Json<CheckOutPage>> {
    claims.require_staff()?;

    let (checkouts, total) = state.services.circulation.list_checkouts(&query).await?;
    Ok(Json(Paginated::new(checkouts, total, Page::new(query.page, query.per_page))))
}

/// Get checkout by ID
#[utoipa::path(
    get,
    path = "/checkouts/{id}",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Checkout ID")),
    responses(
        (status = 200, description = "Checkout details", body = CheckOutDetails),
        (status = 404, description = "Checkout not found")
    )
)]
pub async fn get_checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckOutDetails>> {
    claims.require_staff()?;

    let checkout = state.services.circulation.get_checkout(id).await?;
    Ok(Json(checkout))
}

/// Create a checkout
#[utoipa::path(
    post,
    path = "/checkouts",
    tag = "circulation",
    security(("bearer_auth" = [])),
    request_body = CreateCheckOut,
    responses(
        (status = 201, description = "Checkout created", body = CheckOutDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCheckOut>,
) -> AppResult<(StatusCode, Json<CheckOutDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let checkout = state
        .services
        .circulation
        .create_checkout(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(checkout)))
}

/// Update a checkout
#[utoipa::path(
    put,
    path = "/checkouts/{id}",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Checkout ID")),
    request_body = UpdateCheckOut,
    responses(
        (status = 200, description = "Checkout updated", body = CheckOutDetails),
        (status = 404, description = "Checkout not found")
    )
)]
pub async fn update_checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateCheckOut>,
) -> AppResult<Json<CheckOutDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let checkout = state
        .services
        .circulation
        .update_checkout(id, &data, claims.account_id)
        .await?;
    Ok(Json(checkout))
}

/// Mark a checkout returned
#[utoipa::path(
    post,
    path = "/checkouts/{id}/return",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Checkout ID")),
    responses(
        (status = 200, description = "Book returned", body = CheckOutDetails),
        (status = 404, description = "Checkout not found"),
        (status = 422, description = "Already returned")
    )
)]
pub async fn return_checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckOutDetails>> {
    claims.require_staff()?;

    let checkout = state
        .services
        .circulation
        .return_checkout(id, claims.account_id)
        .await?;
    Ok(Json(checkout))
}
