use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default login seeded on first run. Change the password immediately
/// after deploying.
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_EMAIL: &str = "admin@clubhouse.local";

fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"admin123";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_default_password();

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(AdminUsers)
            .columns([
                crate::entities::admin_users::Column::Username,
                crate::entities::admin_users::Column::PasswordHash,
                crate::entities::admin_users::Column::Email,
                crate::entities::admin_users::Column::Role,
                crate::entities::admin_users::Column::CreatedAt,
            ])
            .values_panic([
                DEFAULT_USERNAME.into(),
                password_hash.into(),
                DEFAULT_EMAIL.into(),
                "admin".into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = sea_orm_migration::sea_query::Query::delete()
            .from_table(AdminUsers)
            .and_where(
                Expr::col(crate::entities::admin_users::Column::Username).eq(DEFAULT_USERNAME),
            )
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
