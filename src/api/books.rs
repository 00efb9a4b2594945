//! Book endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{CreateBook, BookDetails, BookQuery, UpdateBook},
        common::BookPage,
        Page, Paginated,
    },
};

use super::{read_upload, AuthenticatedUser};

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = BookPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookPage>> {
    claims.require_staff()?;

    let (books, total) = state.services.catalog.list_books(&query).await?;
    Ok(Json(Paginated::new(books, total, Page::new(query.page, query.per_page))))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    claims.require_staff()?;

    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    claims.require_staff()?;
    data.validate()?;

    let book = state
        .services
        .catalog
        .create_book(&data, claims.account_id)
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBook>,
) -> AppResult<Json<BookDetails>> {
    claims.require_staff()?;
    data.validate()?;

    let book = state
        .services
        .catalog
        .update_book(id, &data, claims.account_id)
        .await?;
    Ok(Json(book))
}

/// Upload a cover image; it is shrunk to fit 240x240
#[utoipa::path(
    post,
    path = "/books/{id}/cover",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body(content = super::ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cover stored", body = BookDetails),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Unreadable image")
    )
)]
pub async fn upload_cover(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<BookDetails>> {
    claims.require_staff()?;

    let bytes = read_upload(multipart).await?;
    let book = state
        .services
        .catalog
        .upload_cover(id, bytes, claims.account_id)
        .await?;
    Ok(Json(book))
}
