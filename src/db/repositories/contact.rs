use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

use super::super::StoreError;
use crate::entities::{contact_messages, prelude::*};

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactStats {
    pub total: u64,
    pub unread: u64,
    pub read: u64,
}

pub struct ContactRepository {
    conn: DatabaseConnection,
}

impl ContactRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        input: NewContactMessage,
    ) -> Result<contact_messages::Model, StoreError> {
        let active = contact_messages::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            subject: Set(input.subject),
            message: Set(input.message),
            status: Set("unread".to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        Ok(active.insert(&self.conn).await?)
    }

    pub async fn list(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<contact_messages::Model>, StoreError> {
        let mut query = ContactMessages::find();

        if let Some(status) = status {
            query = query.filter(contact_messages::Column::Status.eq(status));
        }

        let rows = query
            .order_by_desc(contact_messages::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<contact_messages::Model>, StoreError> {
        Ok(ContactMessages::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<contact_messages::Model>, StoreError> {
        let rows = ContactMessages::find()
            .order_by_desc(contact_messages::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Transition unread -> read. Marking an already-read message again is
    /// a no-op, not an error.
    pub async fn mark_read(&self, id: i32) -> Result<contact_messages::Model, StoreError> {
        let message = ContactMessages::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(StoreError::NotFound("message"))?;

        if message.status == "read" {
            return Ok(message);
        }

        let mut active: contact_messages::ActiveModel = message.into();
        active.status = Set("read".to_string());

        Ok(active.update(&self.conn).await?)
    }

    pub async fn remove(&self, id: i32) -> Result<bool, StoreError> {
        let result = ContactMessages::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn stats(&self) -> Result<ContactStats, StoreError> {
        let total = ContactMessages::find().count(&self.conn).await?;
        let unread = ContactMessages::find()
            .filter(contact_messages::Column::Status.eq("unread"))
            .count(&self.conn)
            .await?;

        Ok(ContactStats {
            total,
            unread,
            read: total - unread,
        })
    }
}
