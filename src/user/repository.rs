//! Handle user database requests.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::{DuplicateField, Result, ServerError};
use crate::user::{CurrentUser, NewUser, User};

/// Persistence operations the account and identity flows rely on.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by its `email` or `username` field, case-insensitively.
    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<User>>;

    /// Insert a new [`User`]. The store enforces username and email
    /// uniqueness and reports conflicts as [`ServerError::Duplicate`].
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Find current user using `id` field, password hash excluded.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<CurrentUser>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new [`PgUserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password_hash, created_at
                FROM users
                WHERE email = LOWER($1) OR username = LOWER($1)"#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let inserted = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, username, email, password_hash)
                VALUES ($1, $2, $3, $4)
                RETURNING id, username, email, password_hash, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(duplicate_from_sql)?;

        Ok(inserted)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<CurrentUser>> {
        let user = sqlx::query_as::<_, CurrentUser>(
            r#"SELECT id, username, email, created_at
                FROM users
                WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Map unique violations onto [`ServerError::Duplicate`], so a registration
/// losing a race past the handler pre-check still gets its 400.
fn duplicate_from_sql(err: sqlx::Error) -> ServerError {
    let field = match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            match db_err.constraint() {
                Some("users_email_key") => Some(DuplicateField::Email),
                Some("users_username_key") => Some(DuplicateField::Username),
                _ => Some(DuplicateField::EmailOrUsername),
            }
        },
        _ => None,
    };

    match field {
        Some(field) => ServerError::Duplicate(field),
        None => err.into(),
    }
}

/// In-memory implementation mirroring the database unique constraints, so
/// handler tests run without a live Postgres.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryUserRepository {
    users: std::sync::Mutex<Vec<User>>,
}

#[cfg(test)]
impl MemoryUserRepository {
    /// Drop a user row, as an operator deleting the account would.
    pub fn remove(&self, user_id: Uuid) {
        self.users.lock().unwrap().retain(|user| user.id != user_id);
    }
}

#[cfg(test)]
#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();

        Ok(users
            .iter()
            .find(|user| {
                user.email.eq_ignore_ascii_case(identifier)
                    || user.username.eq_ignore_ascii_case(identifier)
            })
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(ServerError::Duplicate(DuplicateField::Email));
        }
        if users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(ServerError::Duplicate(DuplicateField::Username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: chrono::Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<CurrentUser>> {
        let users = self.users.lock().unwrap();

        Ok(users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.clone().into()))
    }
}
