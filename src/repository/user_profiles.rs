//! Reader profiles repository

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{execute_update, like_pattern, set_fields, update_builder, Table};
use crate::{
    error::{AppError, AppResult},
    models::{
        calc_end_date,
        user_profile::{CreateUserProfile, UpdateUserProfile, UserProfileDetails, UserProfileQuery},
        Page,
    },
};

const SELECT_DETAILS: &str = r#"
    SELECT p.*, a.username, a.first_name, a.last_name
    FROM user_profiles p
    LEFT JOIN accounts a ON a.id = p.account_id
"#;

#[derive(Clone)]
pub struct UserProfilesRepository {
    pool: Pool<Postgres>,
}

impl UserProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &UserProfileQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(status) = query.status {
            qb.push(" AND p.status = ").push_bind(status);
        }
        if let Some(sex) = query.sex {
            qb.push(" AND p.sex = ").push_bind(sex);
        }
        if let Some(ref q) = query.q {
            let pattern = like_pattern(q);
            qb.push(" AND (a.username ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.mobile ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// List profiles with their account
    pub async fn list(&self, query: &UserProfileQuery) -> AppResult<(Vec<UserProfileDetails>, i64)> {
        let page = Page::new(query.page, query.per_page);

        let mut count = QueryBuilder::new(
            "SELECT COUNT(*) FROM user_profiles p LEFT JOIN accounts a ON a.id = p.account_id",
        );
        Self::push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(SELECT_DETAILS);
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY p.id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select
            .build_query_as::<UserProfileDetails>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(UserProfileDetails::finish).collect(), total))
    }

    /// Get profile by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<UserProfileDetails> {
        sqlx::query_as::<_, UserProfileDetails>(&format!("{} WHERE p.id = $1", SELECT_DETAILS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserProfileDetails::finish)
            .ok_or_else(|| AppError::NotFound(format!("User profile {} not found", id)))
    }

    /// Create a profile; the card runs from today for six months unless dates are given
    pub async fn create(&self, data: &CreateUserProfile, actor: i32) -> AppResult<UserProfileDetails> {
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO user_profiles (
                account_id, mobile, sex, birth, job, start_date, end_date, status,
                create_user_id, create_time, update_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id
            "#,
        )
        .bind(data.account_id)
        .bind(data.mobile.clone().unwrap_or_default())
        .bind(data.sex.unwrap_or_default())
        .bind(data.birth)
        .bind(data.job.clone().unwrap_or_default())
        .bind(data.start_date.unwrap_or_else(|| now.date_naive()))
        .bind(data.end_date.unwrap_or_else(|| calc_end_date(now).date_naive()))
        .bind(data.status.unwrap_or_default())
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update a profile
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateUserProfile,
        actor: i32,
    ) -> AppResult<UserProfileDetails> {
        let mut qb = update_builder(Table::UserProfiles, actor, Utc::now());
        set_fields!(
            qb,
            data,
            [account_id, mobile, sex, birth, job, start_date, end_date, status]
        );
        execute_update(&self.pool, qb, Table::UserProfiles, id).await?;
        self.get_by_id(id).await
    }

    /// Point the profile at a new avatar file
    pub async fn set_avatar(&self, id: i32, avatar: &str, actor: i32) -> AppResult<UserProfileDetails> {
        let mut qb = update_builder(Table::UserProfiles, actor, Utc::now());
        qb.push(", avatar = ").push_bind(avatar.to_string());
        execute_update(&self.pool, qb, Table::UserProfiles, id).await?;
        self.get_by_id(id).await
    }
}
