//! PostgreSQL implementation of UserStore.
//!
//! Expects the tables:
//!
//! ```sql
//! users (id bigserial PK, google_uid text UNIQUE NOT NULL, name text,
//!        email text, picture text NULL, role text, logged_in boolean)
//! login_history (id bigserial PK, user_id bigint REFERENCES users
//!                ON DELETE CASCADE, device_info text, ip_address text,
//!                logged_in_at timestamptz)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{LoginHistoryEntry, Role, StorageError, User};
use crate::ports::{NewUser, UserStore, UserUpdate};

use super::map_sqlx_error;

/// PostgreSQL implementation of the UserStore port.
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    google_uid: String,
    name: String,
    email: String,
    picture: Option<String>,
    role: String,
    logged_in: bool,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| StorageError::Database(format!("invalid role value: {}", row.role)))?;
        Ok(User {
            id: row.id,
            google_uid: row.google_uid,
            name: row.name,
            email: row.email,
            picture: row.picture,
            role,
            logged_in: row.logged_in,
        })
    }
}

const SELECT_USER: &str =
    "SELECT id, google_uid, name, email, picture, role, logged_in FROM users";

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_subject(&self, google_uid: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE google_uid = $1"))
            .bind(google_uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (google_uid, name, email, picture, role, logged_in) \
             VALUES ($1, $2, $3, $4, $5, false) \
             RETURNING id, google_uid, name, email, picture, role, logged_in",
        )
        .bind(&user.google_uid)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.picture)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        User::try_from(row)
    }

    async fn list(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE users SET name = $1, email = $2, role = $3, picture = $4 WHERE id = $5",
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.role.as_str())
        .bind(&update.picture)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        // Login history and refresh credentials cascade via foreign keys.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_login_state(&self, id: i64, logged_in: bool) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET logged_in = $1 WHERE id = $2")
            .bind(logged_in)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn insert_login_history(&self, entry: LoginHistoryEntry) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO login_history (user_id, device_info, ip_address, logged_in_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(entry.user_id)
        .bind(&entry.device_info)
        .bind(&entry.ip_address)
        .bind::<DateTime<Utc>>(entry.logged_in_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }
}
