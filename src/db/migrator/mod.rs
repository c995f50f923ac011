use sea_orm_migration::prelude::*;

mod m20250815_initial;
mod m20250816_seed_admin;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250815_initial::Migration),
            Box::new(m20250816_seed_admin::Migration),
        ]
    }
}
