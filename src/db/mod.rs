use std::path::Path;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{admin_users, contact_messages, event_registrations, events, members};

pub mod migrator;
pub mod repositories;

pub use repositories::contact::{ContactStats, NewContactMessage};
pub use repositories::event::{EventRecord, EventStats, EventUpdate, NewEvent, NewRegistration};
pub use repositories::member::{MemberStats, NewMember};

/// Storage-layer failures, tagged by constraint kind so callers can map to
/// HTTP semantics without inspecting driver message text.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("already registered for this event")]
    AlreadyRegistered,

    #[error("event is full")]
    EventFull,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        Self::classify(err)
    }
}

impl StoreError {
    /// Tag a `DbErr` by its constraint kind via `sql_err()`, never by
    /// matching message substrings.
    pub fn classify(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::UniqueViolation,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::ForeignKeyViolation,
            _ => Self::Db(err),
        }
    }
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> anyhow::Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let mut max_connections = max_connections;

        if db_url.contains(":memory:") {
            // Each pooled connection would get its own in-memory database,
            // so the pool must stay at one.
            max_connections = 1;
        } else {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        // Cascade delete of registrations depends on this.
        conn.execute_unprepared("PRAGMA foreign_keys = ON").await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn member_repo(&self) -> repositories::member::MemberRepository {
        repositories::member::MemberRepository::new(self.conn.clone())
    }

    fn contact_repo(&self) -> repositories::contact::ContactRepository {
        repositories::contact::ContactRepository::new(self.conn.clone())
    }

    fn event_repo(&self) -> repositories::event::EventRepository {
        repositories::event::EventRepository::new(self.conn.clone())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    // ========== Members ==========

    pub async fn create_member(&self, input: NewMember) -> Result<members::Model, StoreError> {
        self.member_repo().create(input).await
    }

    pub async fn list_members(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<members::Model>, StoreError> {
        self.member_repo().list(status).await
    }

    pub async fn get_member(&self, id: i32) -> Result<Option<members::Model>, StoreError> {
        self.member_repo().get(id).await
    }

    pub async fn update_member_status(
        &self,
        id: i32,
        status: &str,
    ) -> Result<members::Model, StoreError> {
        self.member_repo().update_status(id, status).await
    }

    pub async fn remove_member(&self, id: i32) -> Result<bool, StoreError> {
        self.member_repo().remove(id).await
    }

    pub async fn member_stats(&self) -> Result<MemberStats, StoreError> {
        self.member_repo().stats().await
    }

    pub async fn recent_members(&self, limit: u64) -> Result<Vec<members::Model>, StoreError> {
        self.member_repo().recent(limit).await
    }

    // ========== Contact messages ==========

    pub async fn create_contact_message(
        &self,
        input: NewContactMessage,
    ) -> Result<contact_messages::Model, StoreError> {
        self.contact_repo().create(input).await
    }

    pub async fn list_contact_messages(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<contact_messages::Model>, StoreError> {
        self.contact_repo().list(status).await
    }

    pub async fn mark_contact_message_read(
        &self,
        id: i32,
    ) -> Result<contact_messages::Model, StoreError> {
        self.contact_repo().mark_read(id).await
    }

    pub async fn remove_contact_message(&self, id: i32) -> Result<bool, StoreError> {
        self.contact_repo().remove(id).await
    }

    pub async fn contact_stats(&self) -> Result<ContactStats, StoreError> {
        self.contact_repo().stats().await
    }

    pub async fn recent_contact_messages(
        &self,
        limit: u64,
    ) -> Result<Vec<contact_messages::Model>, StoreError> {
        self.contact_repo().recent(limit).await
    }

    // ========== Events ==========

    pub async fn create_event(&self, input: NewEvent) -> Result<events::Model, StoreError> {
        self.event_repo().create(input).await
    }

    pub async fn list_events(&self, status: Option<&str>) -> Result<Vec<EventRecord>, StoreError> {
        self.event_repo().list(status).await
    }

    pub async fn get_event(&self, id: i32) -> Result<Option<EventRecord>, StoreError> {
        self.event_repo().get(id).await
    }

    pub async fn register_for_event(
        &self,
        event_id: i32,
        input: NewRegistration,
    ) -> Result<event_registrations::Model, StoreError> {
        self.event_repo().register(event_id, input).await
    }

    pub async fn event_registrations(
        &self,
        event_id: i32,
    ) -> Result<Vec<event_registrations::Model>, StoreError> {
        self.event_repo().registrations(event_id).await
    }

    pub async fn update_event(
        &self,
        id: i32,
        input: EventUpdate,
    ) -> Result<events::Model, StoreError> {
        self.event_repo().update(id, input).await
    }

    pub async fn remove_event(&self, id: i32) -> Result<bool, StoreError> {
        self.event_repo().remove(id).await
    }

    pub async fn upcoming_events(&self, limit: u64) -> Result<Vec<events::Model>, StoreError> {
        self.event_repo().upcoming(limit).await
    }

    pub async fn event_stats(&self) -> Result<EventStats, StoreError> {
        self.event_repo().stats().await
    }

    // ========== Admin users ==========

    pub async fn verify_admin_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<admin_users::Model>, StoreError> {
        self.admin_repo()
            .verify_credentials(username, password)
            .await
    }

    pub async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<admin_users::Model>, StoreError> {
        self.admin_repo().get_by_username(username).await
    }

    pub async fn touch_admin_last_login(&self, id: i32) -> Result<(), StoreError> {
        self.admin_repo().touch_last_login(id).await
    }

    pub async fn update_admin_password(
        &self,
        username: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<(), StoreError> {
        self.admin_repo()
            .update_password(username, new_password, config)
            .await
    }
}
