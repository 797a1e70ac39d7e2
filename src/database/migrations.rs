pub use sea_orm_migration::prelude::*;

mod m20261016_120000_create_tour;
mod m20261016_120500_create_submissions;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_120000_create_tour::Migration),
            Box::new(m20261016_120500_create_submissions::Migration),
        ]
    }
}

pub struct Migrator;
