//! Shelves repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, like_pattern, set_fields, update_builder, Table};
use crate::{
    error::{AppError, AppResult},
    models::{
        shelf::{CreateShelf, ShelfDetails, ShelfQuery, UpdateShelf, DEFAULT_CAPACITY, DEFAULT_FLOORS},
        Page,
    },
};

const SELECT_DETAILS: &str = r#"
    SELECT s.*, c.name AS category_name
    FROM shelves s
    LEFT JOIN categories c ON c.id = s.category_id
"#;

#[derive(Clone)]
pub struct ShelvesRepository {
    pool: Pool<Postgres>,
}

impl ShelvesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ShelfQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND s.status = ").push_bind(status);
        }
        if let Some(category_id) = query.category_id {
            qb.push(" AND s.category_id = ").push_bind(category_id);
        }
        if let Some(ref q) = query.q {
            let pattern = like_pattern(q);
            qb.push(" AND (s.code ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR s.location ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// List shelves with their category
    pub async fn list(&self, query: &ShelfQuery) -> AppResult<(Vec<ShelfDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM shelves s");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(SELECT_DETAILS);
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY s.status DESC, s.code LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<ShelfDetails>().fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Get shelf by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<ShelfDetails> {
        sqlx::query_as::<_, ShelfDetails>(&format!("{} WHERE s.id = $1", SELECT_DETAILS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Shelf {} not found", id)))
    }

    /// Create a shelf
    pub async fn create(&self, data: &CreateShelf, actor: i32) -> AppResult<ShelfDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO shelves (category_id, code, location, floors, capacity, status,
                                 create_user_id, create_time, update_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id
            "#,
        )
        .bind(data.category_id)
        .bind(&data.code)
        .bind(data.location.clone().unwrap_or_default())
        .bind(data.floors.unwrap_or(DEFAULT_FLOORS))
        .bind(data.capacity.unwrap_or(DEFAULT_CAPACITY))
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update a shelf
    pub async fn update(&self, id: i32, data: &UpdateShelf, actor: i32) -> AppResult<ShelfDetails> {
        let mut qb = update_builder(Table::Shelves, actor, Utc::now());
        set_fields!(qb, data, [category_id, code, location, floors, capacity, status]);
        execute_update(&self.pool, qb, Table::Shelves, id).await?;
        self.get_by_id(id).await
    }
}
