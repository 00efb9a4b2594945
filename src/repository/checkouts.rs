//! Checkouts repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, like_pattern, set_fields, update_builder, Table};
use crate::{
    error::{AppError, AppResult},
    models::{
        calc_return_date,
        checkout::{CheckOutDetails, CheckOutQuery, CreateCheckOut, UpdateCheckOut},
        BookStatus, Page,
    },
};

const FROM_JOINS: &str = r#"
    FROM checkouts co
    LEFT JOIN books b ON b.id = co.book_id
    LEFT JOIN user_profiles p ON p.id = co.user_profile_id
    LEFT JOIN accounts a ON a.id = p.account_id
"#;

#[derive(Clone)]
pub struct CheckOutsRepository {
    pool: Pool<Postgres>,
}

impl CheckOutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn select_details() -> String {
        format!(
            "SELECT co.*, b.name AS book_name, a.username, a.first_name, a.last_name {}",
            FROM_JOINS
        )
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &CheckOutQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND co.status = ").push_bind(status);
        }
        if let Some(kind) = query.kind {
            qb.push(" AND co.\"type\" = ").push_bind(kind);
        }
        if let Some(user_profile_id) = query.user_profile_id {
            qb.push(" AND co.user_profile_id = ").push_bind(user_profile_id);
        }
        if let Some(book_id) = query.book_id {
            qb.push(" AND co.book_id = ").push_bind(book_id);
        }
        if query.open == Some(true) {
            qb.push(" AND co.returned_time IS NULL");
        }
        if let Some(ref q) = query.q {
            let pattern = like_pattern(q);
            qb.push(" AND (b.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.username ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// List checkouts, most recent first
    pub async fn list(&self, query: &CheckOutQuery) -> AppResult<(Vec<CheckOutDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new(format!("SELECT COUNT(*) {}", FROM_JOINS));
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(Self::select_details());
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY co.\"time\" DESC, co.id DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select
            .build_query_as::<CheckOutDetails>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(CheckOutDetails::finish).collect(), total))
    }

    /// Get checkout by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<CheckOutDetails> {
        sqlx::query_as::<_, CheckOutDetails>(&format!("{} WHERE co.id = $1", Self::select_details()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(CheckOutDetails::finish)
            .ok_or_else(|| AppError::NotFound(format!("Checkout {} not found", id)))
    }

    /// Create a checkout; due back fifteen days from now unless a date is given
    pub async fn create(&self, data: &CreateCheckOut, actor: i32) -> AppResult<CheckOutDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO checkouts (
                user_profile_id, book_id, book_status, "time", "type", return_date,
                returned_time, allow_shift, status, create_user_id, create_time, update_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING id
            "#,
        )
        .bind(data.user_profile_id)
        .bind(data.book_id)
        .bind(data.book_status.unwrap_or_default())
        .bind(data.time.unwrap_or(now))
        .bind(data.kind.unwrap_or_default())
        .bind(data.return_date.unwrap_or_else(|| calc_return_date(now).date_naive()))
        .bind(data.returned_time)
        .bind(data.allow_shift.unwrap_or(true))
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update a checkout
    pub async fn update(&self, id: i32, data: &UpdateCheckOut, actor: i32) -> AppResult<CheckOutDetails> {
        let mut qb = update_builder(Table::CheckOuts, actor, Utc::now());
        set_fields!(
            qb,
            data,
            [user_profile_id, book_id, book_status, return_date, returned_time, allow_shift, status]
        );
        if let Some(time) = data.time {
            qb.push(", \"time\" = ").push_bind(time);
        }
        if let Some(kind) = data.kind {
            qb.push(", \"type\" = ").push_bind(kind);
        }
        execute_update(&self.pool, qb, Table::CheckOuts, id).await?;
        self.get_by_id(id).await
    }

    /// Mark an open checkout returned at `at`.
    ///
    /// Only one caller can close a given checkout: the row is matched on
    /// `returned_time IS NULL`, and a checkout that is already closed is
    /// a business-rule error.
    pub async fn mark_returned(&self, id: i32, at: DateTime<Utc>, actor: i32) -> AppResult<CheckOutDetails> {
        let mut qb = return_builder(id, at, actor);
        let result = qb.build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            // NotFound when the row is missing
            self.get_by_id(id).await?;
            return Err(AppError::BusinessRule(format!("Checkout {} is already returned", id)));
        }
        self.get_by_id(id).await
    }
}

fn return_builder<'a>(id: i32, at: DateTime<Utc>, actor: i32) -> QueryBuilder<'a, Postgres> {
    let mut qb = update_builder(Table::CheckOuts, actor, at);
    qb.push(", returned_time = ")
        .push_bind(at)
        .push(", book_status = ")
        .push_bind(BookStatus::Returned)
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND returned_time IS NULL");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_only_matches_open_checkouts() {
        let qb = return_builder(7, Utc::now(), 1);
        assert_eq!(
            qb.sql(),
            "UPDATE checkouts SET update_user_id = $1, update_time = $2, returned_time = $3, \
             book_status = $4 WHERE id = $5 AND returned_time IS NULL"
        );
    }
}
