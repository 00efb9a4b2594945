//! Account management endpoints (superuser only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        account::{Account, AccountQuery, CreateAccount, UpdateAccount},
        common::AccountPage,
        Page, Paginated,
    },
};

use super::AuthenticatedUser;

/// List accounts
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(AccountQuery),
    responses(
        (status = 200, description = "List of accounts", body = AccountPage),
        (status = 403, description = "Superuser required")
    )
)]
pub async fn list_accounts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<AccountQuery>,
) -> AppResult<Json<AccountPage>> {
    claims.require_superuser()?;

    let (accounts, total) = state.services.auth.list_accounts(&query).await?;
    Ok(Json(Paginated::new(accounts, total, Page::new(query.page, query.per_page))))
}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = Account),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Account>> {
    claims.require_superuser()?;

    let account = state.services.auth.get_account(id).await?;
    Ok(Json(account))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreateAccount,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn create_account(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAccount>,
) -> AppResult<(StatusCode, Json<Account>)> {
    claims.require_superuser()?;
    data.validate()?;

    let account = state.services.auth.create_account(&data).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Update an account
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Account ID")),
    request_body = UpdateAccount,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_account(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateAccount>,
) -> AppResult<Json<Account>> {
    claims.require_superuser()?;
    data.validate()?;

    let account = state.services.auth.update_account(id, &data).await?;
    Ok(Json(account))
}
