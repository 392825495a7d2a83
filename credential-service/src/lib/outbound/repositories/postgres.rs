use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use super::check_password;
use crate::credential::errors::StoreError;
use crate::credential::models::Identity;
use crate::credential::models::Password;
use crate::credential::models::StoredPassword;
use crate::credential::models::UserId;
use crate::credential::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
    hasher: PasswordHasher,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, identity: Identity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, password_digest, salt, created_on, last_login, is_bootstrapped)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(identity.id.0)
        .bind(&identity.password_digest)
        .bind(&identity.salt)
        .bind(identity.created_on)
        .bind(identity.last_login)
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
            WHERE id = $1
            "#,
        )
        .bind(id.0)
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
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET last_login = $2
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(at)
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
            SET refresh_token = $2, refresh_token_expire = $3
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(refresh_token)
        .bind(expires_at)
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
            WHERE id = $1 AND refresh_token = $2 AND refresh_token_expire > $3
            "#,
        )
        .bind(id.0)
        .bind(refresh_token)
        .bind(now)
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
            SET refresh_token = $1, refresh_token_expire = $2
            WHERE id = $3 AND refresh_token = $4 AND refresh_token_expire > $5
            "#,
        )
        .bind(refresh_token)
        .bind(expires_at)
        .bind(id.0)
        .bind(presented)
        .bind(now)
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
            SET password_digest = $2, salt = $3
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(password_digest)
        .bind(salt)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM credentials
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_bootstrapped_except(&self, keep: &[UserId]) -> Result<u64, StoreError> {
        let uuids: Vec<Uuid> = keep.iter().map(|id| id.0).collect();

        let result = sqlx::query(
            r#"
            DELETE FROM credentials
            WHERE is_bootstrapped AND NOT (id = ANY($1))
            "#,
        )
        .bind(&uuids)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
