use argon2::{
    Argon2, Params,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use super::super::StoreError;
use crate::config::SecurityConfig;
use crate::entities::{admin_users, prelude::*};

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<admin_users::Model>, StoreError> {
        let user = AdminUsers::find()
            .filter(admin_users::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        Ok(user)
    }

    /// Verify credentials and return the matching admin on success.
    ///
    /// Argon2 verification is CPU-bound, so it runs on a blocking task.
    /// An unknown username and a wrong password are indistinguishable to
    /// the caller.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<admin_users::Model>, StoreError> {
        let Some(user) = self.get_by_username(username).await? else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let Ok(parsed_hash) = PasswordHash::new(&password_hash) else {
                return false;
            };

            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .map_err(|e| StoreError::Internal(format!("password verification task panicked: {e}")))?;

        Ok(is_valid.then_some(user))
    }

    pub async fn touch_last_login(&self, id: i32) -> Result<(), StoreError> {
        let user = AdminUsers::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(StoreError::NotFound("admin user"))?;

        let mut active: admin_users::ActiveModel = user.into();
        active.last_login = Set(Some(chrono::Utc::now().to_rfc3339()));
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn update_password(
        &self,
        username: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<(), StoreError> {
        let user = self
            .get_by_username(username)
            .await?
            .ok_or(StoreError::NotFound("admin user"))?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .map_err(|e| StoreError::Internal(format!("password hashing task panicked: {e}")))?
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        let mut active: admin_users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.update(&self.conn).await?;

        Ok(())
    }
}

/// Hash a password using Argon2id with optional custom params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
