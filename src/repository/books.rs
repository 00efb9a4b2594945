//! Books repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, like_pattern, set_fields, update_builder, Table};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{
            default_price, default_real_price, BookDetails, BookQuery, CreateBook, UpdateBook,
            DEFAULT_SCORE, DEFAULT_TOTAL_PAGE,
        },
        Page,
    },
};

const SELECT_DETAILS: &str = r#"
    SELECT b.*, c.name AS category_name, s.code AS shelf_code
    FROM books b
    LEFT JOIN categories c ON c.id = b.category_id
    LEFT JOIN shelves s ON s.id = b.shelf_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND b.status = ").push_bind(status);
        }
        if let Some(category_id) = query.category_id {
            qb.push(" AND b.category_id = ").push_bind(category_id);
        }
        if let Some(shelf_id) = query.shelf_id {
            qb.push(" AND b.shelf_id = ").push_bind(shelf_id);
        }
        if let Some(book_status) = query.book_status {
            qb.push(" AND b.book_status = ").push_bind(book_status);
        }
        if let Some(ref q) = query.q {
            let pattern = like_pattern(q);
            qb.push(" AND (b.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR b.author ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR b.press ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// List books, valid ones first then best scored
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<BookDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM books b");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(SELECT_DETAILS);
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY b.status DESC, b.score DESC, b.id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<BookDetails>().fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookDetails> {
        sqlx::query_as::<_, BookDetails>(&format!("{} WHERE b.id = $1", SELECT_DETAILS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Create a book
    pub async fn create(&self, data: &CreateBook, actor: i32) -> AppResult<BookDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (
                name, version, author, trans, press, isbn, total_page,
                price, real_price, score, category_id, shelf_id, shelf_floor,
                book_status, series, series_number, status,
                create_user_id, create_time, update_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $19)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(data.version.clone().unwrap_or_default())
        .bind(&data.author)
        .bind(data.trans.clone().unwrap_or_default())
        .bind(&data.press)
        .bind(&data.isbn)
        .bind(data.total_page.unwrap_or(DEFAULT_TOTAL_PAGE))
        .bind(data.price.unwrap_or_else(default_price))
        .bind(data.real_price.unwrap_or_else(default_real_price))
        .bind(DEFAULT_SCORE)
        .bind(data.category_id)
        .bind(data.shelf_id)
        .bind(data.shelf_floor.unwrap_or(1))
        .bind(data.book_status.unwrap_or_default())
        .bind(data.series.clone().unwrap_or_default())
        .bind(data.series_number.unwrap_or(0))
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update a book
    pub async fn update(&self, id: i32, data: &UpdateBook, actor: i32) -> AppResult<BookDetails> {
        let mut qb = update_builder(Table::Books, actor, Utc::now());
        set_fields!(
            qb,
            data,
            [
                name,
                version,
                author,
                trans,
                press,
                isbn,
                total_page,
                price,
                real_price,
                category_id,
                shelf_id,
                shelf_floor,
                book_status,
                series,
                series_number,
                status,
            ]
        );
        execute_update(&self.pool, qb, Table::Books, id).await?;
        self.get_by_id(id).await
    }

    /// Point the book at a new cover file
    pub async fn set_cover(&self, id: i32, cover: &str, actor: i32) -> AppResult<BookDetails> {
        let mut qb = update_builder(Table::Books, actor, Utc::now());
        qb.push(", cover = ").push_bind(cover.to_string());
        execute_update(&self.pool, qb, Table::Books, id).await?;
        self.get_by_id(id).await
    }
}
