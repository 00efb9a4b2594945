//! Categories repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, like_pattern, set_fields, update_builder, Table};
use crate::{
    error::{AppError, AppResult},
    models::{
        category::{Category, CategoryQuery, CreateCategory, UpdateCategory},
        Page,
    },
};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &CategoryQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(ref q) = query.q {
            qb.push(" AND name ILIKE ").push_bind(like_pattern(q));
        }
    }

    /// List categories, valid ones first then by order number
    pub async fn list(&self, query: &CategoryQuery) -> AppResult<(Vec<Category>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM categories");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM categories");
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY status DESC, order_number, id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<Category>().fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Create a category
    pub async fn create(&self, data: &CreateCategory, actor: i32) -> AppResult<Category> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, order_number, status,
                                    create_user_id, create_time, update_time)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.description.clone().unwrap_or_default())
        .bind(data.order_number.unwrap_or(0))
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a category
    pub async fn update(&self, id: i32, data: &UpdateCategory, actor: i32) -> AppResult<Category> {
        let mut qb = update_builder(Table::Categories, actor, Utc::now());
        set_fields!(qb, data, [name, description, order_number, status]);
        execute_update(&self.pool, qb, Table::Categories, id).await?;
        self.get_by_id(id).await
    }
}
