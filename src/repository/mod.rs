//! Repository layer for database operations

pub mod accounts;
pub mod books;
pub mod categories;
pub mod checkouts;
pub mod comments;
pub mod feedbacks;
pub mod notes;
pub mod rents;
pub mod shelves;
pub mod shifts;
pub mod user_profiles;

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::RecordStatus,
};

/// Tables carrying the status flag and audit columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Categories,
    Shelves,
    Books,
    UserProfiles,
    CheckOuts,
    Comments,
    Notes,
    Rents,
    Shifts,
    Feedbacks,
}

impl Table {
    pub const ALL: [Table; 10] = [
        Table::Categories,
        Table::Shelves,
        Table::Books,
        Table::UserProfiles,
        Table::CheckOuts,
        Table::Comments,
        Table::Notes,
        Table::Rents,
        Table::Shifts,
        Table::Feedbacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::Shelves => "shelves",
            Table::Books => "books",
            Table::UserProfiles => "user_profiles",
            Table::CheckOuts => "checkouts",
            Table::Comments => "comments",
            Table::Notes => "notes",
            Table::Rents => "rents",
            Table::Shifts => "shifts",
            Table::Feedbacks => "feedbacks",
        }
    }

    /// Singular name used in error messages
    pub fn entity(&self) -> &'static str {
        match self {
            Table::Categories => "Category",
            Table::Shelves => "Shelf",
            Table::Books => "Book",
            Table::UserProfiles => "User profile",
            Table::CheckOuts => "Checkout",
            Table::Comments => "Comment",
            Table::Notes => "Note",
            Table::Rents => "Rent",
            Table::Shifts => "Shift",
            Table::Feedbacks => "Feedback",
        }
    }
}

impl std::str::FromStr for Table {
    type Err = AppError;

    /// Resource names are the table names, as used in the API paths
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown resource: {}", s)))
    }
}

/// Resolves book and reader of a row hanging off a checkout (aliased `t`)
pub(crate) const CHECKOUT_JOINS: &str = r#"
    LEFT JOIN checkouts co ON co.id = t.checkout_id
    LEFT JOIN books b ON b.id = co.book_id
    LEFT JOIN user_profiles p ON p.id = co.user_profile_id
    LEFT JOIN accounts a ON a.id = p.account_id
"#;

/// Copies every `Some` field of an update payload into a SET list
/// whose column is named like the field.
///
/// Nullable columns use `Option<Option<T>>`; `Some(None)` binds NULL.
macro_rules! set_fields {
    ($qb:expr, $data:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $data.$field.clone() {
                $qb.push(concat!(", ", stringify!($field), " = ")).push_bind(value);
            }
        )*
    };
}

pub(crate) use set_fields;

/// ILIKE pattern matching `term` anywhere, with wildcards in the term escaped
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped.trim())
}

/// Starts an `UPDATE` that stamps the update audit columns
pub(crate) fn update_builder<'a>(table: Table, actor: i32, now: DateTime<Utc>) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("UPDATE {} SET update_user_id = ", table.as_str()));
    qb.push_bind(actor).push(", update_time = ").push_bind(now);
    qb
}

/// Runs an update built with [`update_builder`] against one row
pub(crate) async fn execute_update(
    pool: &Pool<Postgres>,
    mut qb: QueryBuilder<'_, Postgres>,
    table: Table,
    id: i32,
) -> AppResult<()> {
    qb.push(" WHERE id = ").push_bind(id);
    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("{} {} not found", table.entity(), id)));
    }
    Ok(())
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub accounts: accounts::AccountsRepository,
    pub categories: categories::CategoriesRepository,
    pub shelves: shelves::ShelvesRepository,
    pub books: books::BooksRepository,
    pub user_profiles: user_profiles::UserProfilesRepository,
    pub checkouts: checkouts::CheckOutsRepository,
    pub comments: comments::CommentsRepository,
    pub notes: notes::NotesRepository,
    pub rents: rents::RentsRepository,
    pub shifts: shifts::ShiftsRepository,
    pub feedbacks: feedbacks::FeedbacksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            accounts: accounts::AccountsRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            shelves: shelves::ShelvesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            user_profiles: user_profiles::UserProfilesRepository::new(pool.clone()),
            checkouts: checkouts::CheckOutsRepository::new(pool.clone()),
            comments: comments::CommentsRepository::new(pool.clone()),
            notes: notes::NotesRepository::new(pool.clone()),
            rents: rents::RentsRepository::new(pool.clone()),
            shifts: shifts::ShiftsRepository::new(pool.clone()),
            feedbacks: feedbacks::FeedbacksRepository::new(pool.clone()),
            pool,
        }
    }

    /// Flip the status flag of several rows at once.
    ///
    /// Ids that do not exist are ignored; the number of rows touched is returned.
    pub async fn set_status(
        &self,
        table: Table,
        ids: &[i32],
        status: RecordStatus,
        actor: i32,
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let query = format!(
            "UPDATE {} SET status = $1, update_user_id = $2, update_time = $3 WHERE id = ANY($4)",
            table.as_str()
        );
        let result = sqlx::query(&query)
            .bind(status)
            .bind(actor)
            .bind(Utc::now())
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Database round-trip used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_resource_name() {
        for table in Table::ALL {
            assert_eq!(table.as_str().parse::<Table>().unwrap(), table);
        }
        assert!(matches!("accounts".parse::<Table>(), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("dune"), "%dune%");
        assert_eq!(like_pattern(" dune "), "%dune%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_update_builder_stamps_audit() {
        let qb = update_builder(Table::Books, 3, Utc::now());
        assert_eq!(
            qb.sql(),
            "UPDATE books SET update_user_id = $1, update_time = $2"
        );
    }

    #[test]
    fn test_set_fields_only_touches_some() {
        struct Patch {
            name: Option<String>,
            floors: Option<i32>,
            category_id: Option<Option<i32>>,
        }
        let patch = Patch { name: None, floors: Some(5), category_id: None };
        let mut qb = update_builder(Table::Shelves, 1, Utc::now());
        set_fields!(qb, patch, [name, floors, category_id]);
        assert_eq!(
            qb.sql(),
            "UPDATE shelves SET update_user_id = $1, update_time = $2, floors = $3"
        );

        let patch = Patch { name: None, floors: None, category_id: Some(None) };
        let mut qb = update_builder(Table::Shelves, 1, Utc::now());
        set_fields!(qb, patch, [name, floors, category_id]);
        assert_eq!(
            qb.sql(),
            "UPDATE shelves SET update_user_id = $1, update_time = $2, category_id = $3"
        );
    }
}
