use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::session::errors::CredentialStoreError;
use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::domain::session::models::Username;
use crate::domain::session::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = CredentialStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| {
            CredentialStoreError::CorruptRecord(format!("user {}: {}", row.id, e))
        })?;

        Ok(User {
            id: UserId(row.id),
            username,
            password_hash: row.password_hash,
            role: row.role,
        })
    }
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the admin account, or reset its password and role if it exists.
    ///
    /// # Returns
    /// Identifier of the admin account
    ///
    /// # Errors
    /// * `Unavailable` - Database operation failed
    pub async fn upsert_admin(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<UserId, CredentialStoreError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, 'admin')
            ON CONFLICT (username)
            DO UPDATE SET password_hash = EXCLUDED.password_hash, role = EXCLUDED.role
            RETURNING id
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map(UserId)
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        row.map(User::try_from).transpose()
    }
}
