use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use super::super::StoreError;
use crate::entities::{event_registrations, events, prelude::*};

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub schedule: String,
    pub location: String,
    pub max_participants: Option<i32>,
}

/// Full field set accepted by the admin update endpoint.
#[derive(Debug, Clone)]
pub struct EventUpdate {
    pub name: String,
    pub description: Option<String>,
    pub schedule: String,
    pub location: String,
    pub max_participants: Option<i32>,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
}

/// An event row together with its derived registration count.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub schedule: String,
    pub location: String,
    pub max_participants: Option<i32>,
    pub status: String,
    pub created_at: String,
    pub registered_count: i64,
}

impl EventRecord {
    fn from_model(model: events::Model, registered_count: i64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            schedule: model.schedule,
            location: model.location,
            max_participants: model.max_participants,
            status: model.status,
            created_at: model.created_at,
            registered_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventStats {
    pub total: u64,
    pub upcoming: u64,
}

pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, input: NewEvent) -> Result<events::Model, StoreError> {
        let active = events::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            schedule: Set(input.schedule),
            location: Set(input.location),
            max_participants: Set(input.max_participants),
            status: Set("upcoming".to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let event = active.insert(&self.conn).await?;
        info!("Created event '{}' (ID: {})", event.name, event.id);
        Ok(event)
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<EventRecord>, StoreError> {
        let mut query = Events::find();

        if let Some(status) = status {
            query = query.filter(events::Column::Status.eq(status));
        }

        let rows = query
            .order_by_asc(events::Column::Schedule)
            .all(&self.conn)
            .await?;

        let counts = self.registration_counts(&rows).await?;

        Ok(rows
            .into_iter()
            .map(|e| {
                let count = counts.get(&e.id).copied().unwrap_or(0);
                EventRecord::from_model(e, count)
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<EventRecord>, StoreError> {
        let Some(event) = Events::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let count = EventRegistrations::find()
            .filter(event_registrations::Column::EventId.eq(id))
            .count(&self.conn)
            .await?;

        Ok(Some(EventRecord::from_model(event, count as i64)))
    }

    /// Register a participant. The duplicate check, the capacity check and
    /// the insert run in one transaction so concurrent registrations for the
    /// last slot cannot both pass the read; the unique index on
    /// (event_id, email) backstops the duplicate path.
    pub async fn register(
        &self,
        event_id: i32,
        input: NewRegistration,
    ) -> Result<event_registrations::Model, StoreError> {
        let txn = self.conn.begin().await?;

        let event = Events::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound("event"))?;

        let existing = EventRegistrations::find()
            .filter(event_registrations::Column::EventId.eq(event_id))
            .filter(event_registrations::Column::Email.eq(input.email.as_str()))
            .one(&txn)
            .await?;

        if existing.is_some() {
            return Err(StoreError::AlreadyRegistered);
        }

        if let Some(capacity) = event.max_participants {
            let registered = EventRegistrations::find()
                .filter(event_registrations::Column::EventId.eq(event_id))
                .count(&txn)
                .await?;

            if registered >= capacity as u64 {
                return Err(StoreError::EventFull);
            }
        }

        let active = event_registrations::ActiveModel {
            event_id: Set(event_id),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            department: Set(input.department),
            year: Set(input.year),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let registration = active.insert(&txn).await.map_err(|e| {
            match StoreError::classify(e) {
                StoreError::UniqueViolation => StoreError::AlreadyRegistered,
                other => other,
            }
        })?;

        txn.commit().await?;

        info!(
            "Registered {} for event '{}' (ID: {})",
            registration.email, event.name, event_id
        );
        Ok(registration)
    }

    pub async fn registrations(
        &self,
        event_id: i32,
    ) -> Result<Vec<event_registrations::Model>, StoreError> {
        let rows = EventRegistrations::find()
            .filter(event_registrations::Column::EventId.eq(event_id))
            .order_by_asc(event_registrations::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn update(&self, id: i32, input: EventUpdate) -> Result<events::Model, StoreError> {
        let event = Events::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(StoreError::NotFound("event"))?;

        let mut active: events::ActiveModel = event.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.schedule = Set(input.schedule);
        active.location = Set(input.location);
        active.max_participants = Set(input.max_participants);
        active.status = Set(input.status);

        Ok(active.update(&self.conn).await?)
    }

    /// Deletes the event; registrations go with it via cascade.
    pub async fn remove(&self, id: i32) -> Result<bool, StoreError> {
        let result = Events::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn upcoming(&self, limit: u64) -> Result<Vec<events::Model>, StoreError> {
        let now = chrono::Utc::now().to_rfc3339();

        let rows = Events::find()
            .filter(events::Column::Schedule.gt(now))
            .order_by_asc(events::Column::Schedule)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn stats(&self) -> Result<EventStats, StoreError> {
        let total = Events::find().count(&self.conn).await?;
        let now = chrono::Utc::now().to_rfc3339();
        let upcoming = Events::find()
            .filter(events::Column::Schedule.gt(now))
            .count(&self.conn)
            .await?;

        Ok(EventStats { total, upcoming })
    }

    /// Registration counts for a batch of events in one grouped query.
    async fn registration_counts(
        &self,
        events: &[events::Model],
    ) -> Result<HashMap<i32, i64>, StoreError> {
        if events.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i32> = events.iter().map(|e| e.id).collect();

        let counts: Vec<(i32, i64)> = EventRegistrations::find()
            .select_only()
            .column(event_registrations::Column::EventId)
            .column_as(event_registrations::Column::Id.count(), "count")
            .filter(event_registrations::Column::EventId.is_in(ids))
            .group_by(event_registrations::Column::EventId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(counts.into_iter().collect())
    }
}
