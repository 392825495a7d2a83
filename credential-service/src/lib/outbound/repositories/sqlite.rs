use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Utc;
use sqlx::QueryBuilder;
use sqlx::Row;
use sqlx::Sqlite;
use sqlx::SqlitePool;

use super::check_password;
use crate::credential::errors::StoreError;
use crate::credential::models::Identity;
use crate::credential::models::Password;
use crate::credential::models::StoredPassword;
use crate::credential::models::UserId;
use crate::credential::ports::CredentialStore;

/// SQLite credential store.
///
/// Ids are stored as hyphenated text and timestamps as Unix seconds.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
    hasher: PasswordHasher,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create(&self, identity: Identity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, password_digest, salt, created_on, last_login, is_bootstrapped)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(identity.id.to_string())
        .bind(&identity.password_digest)
        .bind(&identity.salt)
        .bind(identity.created_on.timestamp())
        .bind(identity.last_login.timestamp())
        .bind(identity.is_bootstrapped)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::AlreadyExists(identity.id.to_string());
                }
            }
            StoreError::Database(e.to_string())
        })?;

        Ok(())
    }

    async fn verify_password(&self, id: &UserId, password: &Password) -> Result<(), StoreError> {
        let row = sqlx::query(
            r#"
            SELECT password_digest, salt
            FROM credentials
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let stored = row
            .map(|r| {
                Ok::<_, sqlx::Error>(StoredPassword {
                    password_digest: r.try_get("password_digest")?,
                    salt: r.try_get("salt")?,
                })
            })
            .transpose()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        check_password(&self.hasher, id, password, stored)
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE credentials SET last_login = ? WHERE id = ?")
            .bind(at.timestamp())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn update_refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET refresh_token = ?, refresh_token_expire = ?
            WHERE id = ?
            "#,
        )
        .bind(refresh_token)
        .bind(expires_at.timestamp())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn check_refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id
            FROM credentials
            WHERE id = ? AND refresh_token = ? AND refresh_token_expire > ?
            "#,
        )
        .bind(id.to_string())
        .bind(refresh_token)
        .bind(now.timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        match row {
            Some(_) => Ok(()),
            None => Err(StoreError::Unauthorized(id.to_string())),
        }
    }

    async fn rotate_refresh_token(
        &self,
        id: &UserId,
        presented: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET refresh_token = ?, refresh_token_expire = ?
            WHERE id = ? AND refresh_token = ? AND refresh_token_expire > ?
            "#,
        )
        .bind(refresh_token)
        .bind(expires_at.timestamp())
        .bind(id.to_string())
        .bind(presented)
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Unauthorized(id.to_string()));
        }

        Ok(())
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_digest: &str,
        salt: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET password_digest = ?, salt = ?
            WHERE id = ?
            "#,
        )
        .bind(password_digest)
        .bind(salt)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM credentials WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_bootstrapped_except(&self, keep: &[UserId]) -> Result<u64, StoreError> {
        let mut builder =
            QueryBuilder::<Sqlite>::new("DELETE FROM credentials WHERE is_bootstrapped = 1");

        if !keep.is_empty() {
            builder.push(" AND id NOT IN (");
            let mut separated = builder.separated(", ");
            for id in keep {
                separated.push_bind(id.to_string());
            }
            separated.push_unseparated(")");
        }

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
