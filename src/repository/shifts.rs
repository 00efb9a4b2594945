//! Shifts repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, set_fields, update_builder, Table, CHECKOUT_JOINS};
use crate::{
    error::{AppError, AppResult},
    models::{
        shift::{CreateShift, ShiftDetails, ShiftQuery, UpdateShift},
        Page,
    },
};

#[derive(Clone)]
pub struct ShiftsRepository {
    pool: Pool<Postgres>,
}

impl ShiftsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn select_details() -> String {
        format!(
            r#"SELECT t.*, b.name AS book_name, a.username AS holder_username,
                      ra.username AS requester_username
               FROM shifts t {}
               LEFT JOIN user_profiles rp ON rp.id = t.request_user_profile_id
               LEFT JOIN accounts ra ON ra.id = rp.account_id"#,
            CHECKOUT_JOINS
        )
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ShiftQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND t.status = ").push_bind(status);
        }
        if let Some(shift_status) = query.shift_status {
            qb.push(" AND t.shift_status = ").push_bind(shift_status);
        }
        if let Some(checkout_id) = query.checkout_id {
            qb.push(" AND t.checkout_id = ").push_bind(checkout_id);
        }
        if let Some(request_user_profile_id) = query.request_user_profile_id {
            qb.push(" AND t.request_user_profile_id = ")
                .push_bind(request_user_profile_id);
        }
    }

    /// List shifts, latest requests first
    pub async fn list(&self, query: &ShiftQuery) -> AppResult<(Vec<ShiftDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM shifts t");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(Self::select_details());
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY t.request_time DESC, t.id DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<ShiftDetails>().fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(ShiftDetails::finish).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ShiftDetails> {
        sqlx::query_as::<_, ShiftDetails>(&format!("{} WHERE t.id = $1", Self::select_details()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ShiftDetails::finish)
            .ok_or_else(|| AppError::NotFound(format!("Shift {} not found", id)))
    }

    pub async fn create(&self, data: &CreateShift, actor: i32) -> AppResult<ShiftDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO shifts (
                checkout_id, request_user_profile_id, reason, agreed, reply, shift_status,
                request_time, reply_time, complete_time, status,
                create_user_id, create_time, update_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING id
            "#,
        )
        .bind(data.checkout_id)
        .bind(data.request_user_profile_id)
        .bind(&data.reason)
        .bind(data.agreed.unwrap_or(false))
        .bind(data.reply.clone().unwrap_or_default())
        .bind(data.shift_status.unwrap_or_default())
        .bind(data.request_time.unwrap_or(now))
        .bind(data.reply_time)
        .bind(data.complete_time)
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &UpdateShift, actor: i32) -> AppResult<ShiftDetails> {
        let mut qb = update_builder(Table::Shifts, actor, Utc::now());
        set_fields!(
            qb,
            data,
            [
                checkout_id,
                request_user_profile_id,
                reason,
                agreed,
                reply,
                shift_status,
                request_time,
                reply_time,
                complete_time,
                status,
            ]
        );
        execute_update(&self.pool, qb, Table::Shifts, id).await?;
        self.get_by_id(id).await
    }
}
