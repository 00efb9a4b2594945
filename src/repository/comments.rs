//! Comments repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, set_fields, update_builder, Table, CHECKOUT_JOINS};
use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{CommentDetails, CommentQuery, CreateComment, UpdateComment, DEFAULT_COMMENT_SCORE},
        Page,
    },
};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn select_details() -> String {
        format!(
            "SELECT t.*, b.name AS book_name, a.username FROM comments t {}",
            CHECKOUT_JOINS
        )
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &CommentQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND t.status = ").push_bind(status);
        }
        if let Some(checkout_id) = query.checkout_id {
            qb.push(" AND t.checkout_id = ").push_bind(checkout_id);
        }
    }

    pub async fn list(&self, query: &CommentQuery) -> AppResult<(Vec<CommentDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM comments t");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(Self::select_details());
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY t.create_time DESC, t.id DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select
            .build_query_as::<CommentDetails>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(CommentDetails::finish).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<CommentDetails> {
        sqlx::query_as::<_, CommentDetails>(&format!("{} WHERE t.id = $1", Self::select_details()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(CommentDetails::finish)
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))
    }

    pub async fn create(&self, data: &CreateComment, actor: i32) -> AppResult<CommentDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (checkout_id, score, content, status,
                                  create_user_id, create_time, update_time)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(data.checkout_id)
        .bind(data.score.unwrap_or(DEFAULT_COMMENT_SCORE))
        .bind(&data.content)
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &UpdateComment, actor: i32) -> AppResult<CommentDetails> {
        let mut qb = update_builder(Table::Comments, actor, Utc::now());
        set_fields!(qb, data, [checkout_id, score, content, status]);
        execute_update(&self.pool, qb, Table::Comments, id).await?;
        self.get_by_id(id).await
    }
}
