//! Feedbacks repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, like_pattern, set_fields, update_builder, Table};
use crate::{
    error::{AppError, AppResult},
    models::{
        feedback::{CreateFeedback, FeedbackDetails, FeedbackQuery, UpdateFeedback},
        Page,
    },
};

const SELECT_DETAILS: &str = r#"
    SELECT f.*, a.username
    FROM feedbacks f
    LEFT JOIN user_profiles p ON p.id = f.user_profile_id
    LEFT JOIN accounts a ON a.id = p.account_id
"#;

#[derive(Clone)]
pub struct FeedbacksRepository {
    pool: Pool<Postgres>,
}

impl FeedbacksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &FeedbackQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND f.status = ").push_bind(status);
        }
        if let Some(user_profile_id) = query.user_profile_id {
            qb.push(" AND f.user_profile_id = ").push_bind(user_profile_id);
        }
        if query.unanswered == Some(true) {
            qb.push(" AND f.reply = ''");
        }
        if let Some(ref q) = query.q {
            qb.push(" AND f.content ILIKE ").push_bind(like_pattern(q));
        }
    }

    /// List feedback, newest first
    pub async fn list(&self, query: &FeedbackQuery) -> AppResult<(Vec<FeedbackDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM feedbacks f");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(SELECT_DETAILS);
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY f.create_time DESC, f.id DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select
            .build_query_as::<FeedbackDetails>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(FeedbackDetails::finish).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<FeedbackDetails> {
        sqlx::query_as::<_, FeedbackDetails>(&format!("{} WHERE f.id = $1", SELECT_DETAILS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(FeedbackDetails::finish)
            .ok_or_else(|| AppError::NotFound(format!("Feedback {} not found", id)))
    }

    pub async fn create(&self, data: &CreateFeedback, actor: i32) -> AppResult<FeedbackDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO feedbacks (user_profile_id, content, status,
                                   create_user_id, create_time, update_time)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(data.user_profile_id)
        .bind(&data.content)
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &UpdateFeedback, actor: i32) -> AppResult<FeedbackDetails> {
        let mut qb = update_builder(Table::Feedbacks, actor, Utc::now());
        set_fields!(qb, data, [user_profile_id, content, reply, reply_time, status]);
        execute_update(&self.pool, qb, Table::Feedbacks, id).await?;
        self.get_by_id(id).await
    }

    /// Store a reply and stamp its time
    pub async fn reply(&self, id: i32, reply: &str, actor: i32) -> AppResult<FeedbackDetails> {
        let now = Utc::now();
        let mut qb = update_builder(Table::Feedbacks, actor, now);
        qb.push(", reply = ")
            .push_bind(reply.to_string())
            .push(", reply_time = ")
            .push_bind(now);
        execute_update(&self.pool, qb, Table::Feedbacks, id).await?;
        self.get_by_id(id).await
    }
}
