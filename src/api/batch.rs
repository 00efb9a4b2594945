//! Batch status actions shared by every admin list

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{BatchAction, BatchRequest, BatchResponse},
    repository::Table,
};

use super::AuthenticatedUser;

/// Enable or disable a selection of records of one resource
#[utoipa::path(
    post,
    path = "/batch/{resource}/{action}",
    tag = "batch",
    security(("bearer_auth" = [])),
    params(
        ("resource" = String, Path, description = "Resource name, e.g. books or user_profiles"),
        ("action" = BatchAction, Path, description = "enable or disable")
    ),
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Status updated", body = BatchResponse),
        (status = 400, description = "No ids given"),
        (status = 404, description = "Unknown resource")
    )
)]
pub async fn apply_action(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((resource, action)): Path<(String, BatchAction)>,
    Json(request): Json<BatchRequest>,
) -> AppResult<Json<BatchResponse>> {
    claims.require_staff()?;

    let table: Table = resource.parse()?;
    let response = state
        .services
        .batch
        .apply(table, action, &request.ids, claims.account_id)
        .await?;
    Ok(Json(response))
}
