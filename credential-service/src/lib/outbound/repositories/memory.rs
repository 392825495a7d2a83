use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Utc;

use super::check_password;
use crate::credential::errors::StoreError;
use crate::credential::models::Identity;
use crate::credential::models::Password;
use crate::credential::models::StoredPassword;
use crate::credential::models::UserId;
use crate::credential::ports::CredentialStore;

struct Row {
    identity: Identity,
    refresh_token: Option<String>,
    refresh_token_expire: Option<DateTime<Utc>>,
}

impl Row {
    fn holds_refresh_token(&self, refresh_token: &str, now: DateTime<Utc>) -> bool {
        match (&self.refresh_token, self.refresh_token_expire) {
            (Some(current), Some(expire)) => current == refresh_token && expire > now,
            _ => false,
        }
    }
}

/// Process-local credential store.
///
/// Used for tests and single-node development. Every operation runs under one lock,
/// which gives the same per-row atomicity as the SQL stores.
pub struct InMemoryCredentialStore {
    rows: Mutex<HashMap<UserId, Row>>,
    hasher: PasswordHasher,
}

impl InMemoryCredentialStore {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            hasher,
        }
    }

    fn rows(&self) -> Result<MutexGuard<'_, HashMap<UserId, Row>>, StoreError> {
        self.rows
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, identity: Identity) -> Result<(), StoreError> {
        let mut rows = self.rows()?;

        if rows.contains_key(&identity.id) {
            return Err(StoreError::AlreadyExists(identity.id.to_string()));
        }

        rows.insert(
            identity.id,
            Row {
                identity,
                refresh_token: None,
                refresh_token_expire: None,
            },
        );
        Ok(())
    }

    async fn verify_password(&self, id: &UserId, password: &Password) -> Result<(), StoreError> {
        // Hash outside the lock.
        let stored = self.rows()?.get(id).map(|row| StoredPassword {
            password_digest: row.identity.password_digest.clone(),
            salt: row.identity.salt.clone(),
        });

        check_password(&self.hasher, id, password, stored)
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        row.identity.last_login = at;
        Ok(())
    }

    async fn update_refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        row.refresh_token = Some(refresh_token.to_string());
        row.refresh_token_expire = Some(expires_at);
        Ok(())
    }

    async fn check_refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let rows = self.rows()?;

        match rows.get(id) {
            Some(row) if row.holds_refresh_token(refresh_token, now) => Ok(()),
            _ => Err(StoreError::Unauthorized(id.to_string())),
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
        let mut rows = self.rows()?;

        match rows.get_mut(id) {
            Some(row) if row.holds_refresh_token(presented, now) => {
                row.refresh_token = Some(refresh_token.to_string());
                row.refresh_token_expire = Some(expires_at);
                Ok(())
            }
            _ => Err(StoreError::Unauthorized(id.to_string())),
        }
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_digest: &str,
        salt: &str,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        row.identity.password_digest = password_digest.to_string();
        row.identity.salt = salt.to_string();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        self.rows()?.remove(id);
        Ok(())
    }

    async fn delete_bootstrapped_except(&self, keep: &[UserId]) -> Result<u64, StoreError> {
        let mut rows = self.rows()?;
        let before = rows.len();

        rows.retain(|id, row| !row.identity.is_bootstrapped || keep.contains(id));

        Ok((before - rows.len()) as u64)
    }
}
