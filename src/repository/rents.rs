//! Rents repository

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, like_pattern, set_fields, update_builder, Table, CHECKOUT_JOINS};
use crate::{
    error::{AppError, AppResult},
    models::{
        rent::{CreateRent, RentDetails, RentQuery, UpdateRent},
        Page,
    },
};

#[derive(Clone)]
pub struct RentsRepository {
    pool: Pool<Postgres>,
}

impl RentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn select_details() -> String {
        format!(
            "SELECT t.*, b.name AS book_name, a.username FROM rents t {}",
            CHECKOUT_JOINS
        )
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &RentQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND t.status = ").push_bind(status);
        }
        if let Some(pay_status) = query.pay_status {
            qb.push(" AND t.pay_status = ").push_bind(pay_status);
        }
        if let Some(checkout_id) = query.checkout_id {
            qb.push(" AND t.checkout_id = ").push_bind(checkout_id);
        }
        if let Some(ref q) = query.q {
            let pattern = like_pattern(q);
            qb.push(" AND (t.order_no ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR t.trade_no ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    pub async fn list(&self, query: &RentQuery) -> AppResult<(Vec<RentDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM rents t");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(Self::select_details());
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY t.create_time DESC, t.id DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<RentDetails>().fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(RentDetails::finish).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<RentDetails> {
        sqlx::query_as::<_, RentDetails>(&format!("{} WHERE t.id = $1", Self::select_details()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(RentDetails::finish)
            .ok_or_else(|| AppError::NotFound(format!("Rent {} not found", id)))
    }

    pub async fn create(&self, data: &CreateRent, actor: i32) -> AppResult<RentDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO rents (checkout_id, days, amount, order_no, trade_no, pay_status, status,
                               create_user_id, create_time, update_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING id
            "#,
        )
        .bind(data.checkout_id)
        .bind(data.days.unwrap_or(1))
        .bind(data.amount.unwrap_or(Decimal::ZERO))
        .bind(data.order_no.clone().unwrap_or_default())
        .bind(data.trade_no.clone().unwrap_or_default())
        .bind(data.pay_status.unwrap_or_default())
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &UpdateRent, actor: i32) -> AppResult<RentDetails> {
        let mut qb = update_builder(Table::Rents, actor, Utc::now());
        set_fields!(
            qb,
            data,
            [checkout_id, days, amount, order_no, trade_no, pay_status, status]
        );
        execute_update(&self.pool, qb, Table::Rents, id).await?;
        self.get_by_id(id).await
    }
}
