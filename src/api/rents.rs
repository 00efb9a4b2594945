//! Rent endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        common::RentPage,
        rent::{CreateRent, RentDetails, RentQuery, UpdateRent},
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List rents
#[utoipa::path(
    get,
    path = "/rents",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(RentQuery),
    responses(
        (status = 200, description = "List of rents", body = RentPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_rents(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RentQuery>,
) -> AppResult<Json<RentPage>> {
    claims.require_staff()?;

    let (rents, total) = state.services.circulation.list_rents(&query).await?;
    Ok(Json(Paginated::new(rents, total, Page::new(query.page, query.per_page))))
}

/// Get rent by ID
#[utoipa::path(
    get,
    path = "/rents/{id}",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rent ID")),
    responses(
        (status = 200, description = "Rent details", body = RentDetails),
        (status = 404, description = "Rent not found")
    )
)]
pub async fn get_rent(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentDetails>> {
    claims.require_staff()?;

    let rent = state.services.circulation.get_rent(id).await?;
    Ok(Json(rent))
}

/// Create a rent
#[utoipa::path(
    post,
    path = "/rents",
    tag = "circulation",
    security(("bearer_auth" = [])),
    request_body = CreateRent,
    responses(
        (status = 201, description = "Rent created", body = RentDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_rent(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateRent>,
) -> AppResult<(StatusCode, Json<RentDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let rent = state
        .services
        .circulation
        .create_rent(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(rent)))
}

/// Update a rent
#[utoipa::path(
    put,
    path = "/rents/{id}",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rent ID")),
    request_body = UpdateRent,
    responses(
        (status = 200, description = "Rent updated", body = RentDetails),
        (status = 404, description = "Rent not found")
    )
)]
pub async fn update_rent(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateRent>,
) -> AppResult<Json<RentDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let rent = state
        .services
        .circulation
        .update_rent(id, &data, claims.account_id)
        .await?;
    Ok(Json(rent))
}
