//! Bulk enable/disable of admin records

use crate::{
    error::{AppError, AppResult},
    models::{BatchAction, BatchResponse},
    repository::{Repository, Table},
};

#[derive(Clone)]
pub struct BatchService {
    repository: Repository,
}

impl BatchService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn apply(
        &self,
        table: Table,
        action: BatchAction,
        ids: &[i32],
        actor: i32,
    ) -> AppResult<BatchResponse> {
        if ids.is_empty() {
            return Err(AppError::BadRequest("No records selected".to_string()));
        }

        let status = action.target_status();
        let affected = self.repository.set_status(table, ids, status, actor).await?;

        tracing::info!(
            table = table.as_str(),
            action = action.description(),
            selected = ids.len(),
            affected,
            "batch action applied"
        );
        Ok(BatchResponse { action, status, affected })
    }
}
