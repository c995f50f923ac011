use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::info;

use super::super::StoreError;
use crate::entities::{members, prelude::*};

/// Input for a membership application.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub year: i32,
    pub experience: Option<String>,
    pub motivation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemberStats {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub departments: Vec<DepartmentCount>,
}

#[derive(Debug, Serialize)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}

pub struct MemberRepository {
    conn: DatabaseConnection,
}

impl MemberRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new application with status `pending`.
    ///
    /// A second application with the same email surfaces as
    /// `StoreError::DuplicateEmail`, mapped from the unique-constraint
    /// kind rather than from driver message text.
    pub async fn create(&self, input: NewMember) -> Result<members::Model, StoreError> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = members::ActiveModel {
            full_name: Set(input.full_name),
            email: Set(input.email),
            phone: Set(input.phone),
            department: Set(input.department),
            year: Set(input.year),
            experience: Set(input.experience),
            motivation: Set(input.motivation),
            status: Set("pending".to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let member = active.insert(&self.conn).await.map_err(|e| {
            match StoreError::classify(e) {
                StoreError::UniqueViolation => StoreError::DuplicateEmail,
                other => other,
            }
        })?;

        info!("New membership application from {}", member.email);
        Ok(member)
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<members::Model>, StoreError> {
        let mut query = Members::find();

        if let Some(status) = status {
            query = query.filter(members::Column::Status.eq(status));
        }

        let rows = query
            .order_by_desc(members::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<members::Model>, StoreError> {
        Ok(Members::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<members::Model>, StoreError> {
        let rows = Members::find()
            .order_by_desc(members::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<members::Model>, StoreError> {
        let row = Members::find()
            .filter(members::Column::Email.eq(email))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    pub async fn update_status(&self, id: i32, status: &str) -> Result<members::Model, StoreError> {
        let member = Members::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(StoreError::NotFound("member"))?;

        let mut active: members::ActiveModel = member.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.conn).await?)
    }

    pub async fn remove(&self, id: i32) -> Result<bool, StoreError> {
        let result = Members::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Read-only projection, recomputed per call.
    pub async fn stats(&self) -> Result<MemberStats, StoreError> {
        let total = Members::find().count(&self.conn).await?;
        let approved = Members::find()
            .filter(members::Column::Status.eq("approved"))
            .count(&self.conn)
            .await?;
        let pending = Members::find()
            .filter(members::Column::Status.eq("pending"))
            .count(&self.conn)
            .await?;
        let rejected = total - approved - pending;

        let departments: Vec<(String, i64)> = Members::find()
            .select_only()
            .column(members::Column::Department)
            .column_as(members::Column::Id.count(), "count")
            .filter(members::Column::Status.eq("approved"))
            .group_by(members::Column::Department)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(MemberStats {
            total,
            approved,
            pending,
            rejected,
            departments: departments
                .into_iter()
                .map(|(department, count)| DepartmentCount { department, count })
                .collect(),
        })
    }
}
