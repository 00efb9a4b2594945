//! Accounts repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{like_pattern, set_fields};
use crate::{
    error::{AppError, AppResult},
    models::{
        account::{Account, AccountQuery, CreateAccount, UpdateAccount},
        Page,
    },
};

#[derive(Clone)]
pub struct AccountsRepository {
    pool: Pool<Postgres>,
}

impl AccountsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AccountQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(is_staff) = query.is_staff {
            qb.push(" AND is_staff = ").push_bind(is_staff);
        }
        if let Some(ref q) = query.q {
            let pattern = like_pattern(q);
            qb.push(" AND (username ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// List accounts with filters and pagination
    pub async fn list(&self, query: &AccountQuery) -> AppResult<(Vec<Account>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM accounts");
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM accounts");
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY username LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<Account>().fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Account> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
    }

    /// Get account by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create an account; `password_hash` is already hashed
    pub async fn create(&self, data: &CreateAccount, password_hash: &str) -> AppResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, password, first_name, last_name, email,
                                  is_staff, is_superuser, is_active, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(password_hash)
        .bind(data.first_name.clone().unwrap_or_default())
        .bind(data.last_name.clone().unwrap_or_default())
        .bind(data.email.clone().unwrap_or_default())
        .bind(data.is_staff.unwrap_or(false))
        .bind(data.is_superuser.unwrap_or(false))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }

    /// Update an account; `password_hash` replaces the password when set
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateAccount,
        password_hash: Option<String>,
    ) -> AppResult<Account> {
        let mut qb = QueryBuilder::new("UPDATE accounts SET id = id");
        set_fields!(qb, data, [first_name, last_name, email, is_staff, is_superuser, is_active]);
        if let Some(hash) = password_hash {
            qb.push(", password = ").push_bind(hash);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Account>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
    }

    pub async fn touch_last_login(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET last_login = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
