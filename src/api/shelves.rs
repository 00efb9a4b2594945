//! Shelf endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        common::ShelfPage,
        shelf::{CreateShelf, ShelfDetails, ShelfQuery, UpdateShelf},
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List shelves
#[utoipa::path(
    get,
    path = "/shelves",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(ShelfQuery),
    responses(
        (status = 200, description = "List of shelves", body = ShelfPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_shelves(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ShelfQuery>,
) -> AppResult<Json<ShelfPage>> {
    claims.require_staff()?;

    let (shelves, total) = state.services.catalog.list_shelves(&query).await?;
    Ok(Json(Paginated::new(shelves, total, Page::new(query.page, query.per_page))))
}

/// Get shelf by ID
#[utoipa::path(
    get,
    path = "/shelves/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shelf ID")),
    responses(
        (status = 200, description = "Shelf details", body = ShelfDetails),
        (status = 404, description = "Shelf not found")
    )
)]
pub async fn get_shelf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ShelfDetails>> {
    claims.require_staff()?;

    let shelf = state.services.catalog.get_shelf(id).await?;
    Ok(Json(shelf))
}

/// Create a shelf
#[utoipa::path(
    post,
    path = "/shelves",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateShelf,
    responses(
        (status = 201, description = "Shelf created", body = ShelfDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_shelf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateShelf>,
) -> AppResult<(StatusCode, Json<ShelfDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let shelf = state
        .services
        .catalog
        .create_shelf(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(shelf)))
}

/// Update a shelf
#[utoipa::path(
    put,
    path = "/shelves/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Shelf ID")),
    request_body = UpdateShelf,
    responses(
        (status = 200, description = "Shelf updated", body = ShelfDetails),
        (status = 404, description = "Shelf not found")
    )
)]
pub async fn update_shelf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateShelf>,
) -> AppResult<Json<ShelfDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let shelf = state
        .services
        .catalog
        .update_shelf(id, &data, claims.account_id)
        .await?;
    Ok(Json(shelf))
}
