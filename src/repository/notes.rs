//! Notes repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, set_fields, update_builder, Table, CHECKOUT_JOINS};
use crate::{
    error::{AppError, AppResult},
    models::{
        note::{CreateNote, NoteDetails, NoteQuery, UpdateNote},
        Page,
    },
};

#[derive(Clone)]
pub struct NotesRepository {
    pool: Pool<Postgres>,
}

impl NotesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn select_details() -> String {
        format!(
            "SELECT t.*, b.name AS book_name, a.username FROM notes t {}",
            CHECKOUT_JOINS
        )
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &NoteQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND t.status = ").push_bind(status);
        }
        if let Some(checkout_id) = query.checkout_id {
            qb.push(" AND t.checkout_id = ").push_bind(checkout_id);
        }
    }

    /// List notes, ordered by checkout then page
    pub async fn list(&self, query: &NoteQuery) -> AppResult<(Vec<NoteDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM notes t");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(Self::select_details());
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY t.checkout_id, t.page, t.id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<NoteDetails>().fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(NoteDetails::finish).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<NoteDetails> {
        sqlx::query_as::<_, NoteDetails>(&format!("{} WHERE t.id = $1", Self::select_details()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(NoteDetails::finish)
            .ok_or_else(|| AppError::NotFound(format!("Note {} not found", id)))
    }

    pub async fn create(&self, data: &CreateNote, actor: i32) -> AppResult<NoteDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO notes (checkout_id, page, content, status,
                               create_user_id, create_time, update_time)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(data.checkout_id)
        .bind(data.page.unwrap_or(1.0))
        .bind(&data.content)
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &UpdateNote, actor: i32) -> AppResult<NoteDetails> {
        let mut qb = update_builder(Table::Notes, actor, Utc::now());
        set_fields!(qb, data, [checkout_id, page, content, status]);
        execute_update(&self.pool, qb, Table::Notes, id).await?;
        self.get_by_id(id).await
    }
}
