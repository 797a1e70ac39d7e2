use std::cmp;

use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::{
    cli::MigrateAction, config::Config, database::migrations::Migrator,
    database::setup_database_connection,
};

pub async fn handle_migrate_command(config: &Config, action: MigrateAction) -> Result<(), DbErr> {
    // Plain connection: no background migrations here
    let db = setup_database_connection(&config.database).await?;

    run(&db, action).await
}

pub async fn run(db: &DatabaseConnection, action: MigrateAction) -> Result<(), DbErr> {
    match action {
        MigrateAction::Up { steps } => {
            let pending = Migrator::get_pending_migrations(db).await?;
            if pending.is_empty() {
                println!("✅ All migrations are already up to date");
                return Ok(());
            }

            let count = steps.map_or(pending.len(), |steps| {
                cmp::min(steps as usize, pending.len())
            });
            println!("Applying {count} migration(s):");
            for migration in &pending[..count] {
                println!("  📄 {}", migration.name());
            }

            Migrator::up(db, steps).await?;
            println!("✅ Migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            let applied = Migrator::get_applied_migrations(db).await?;
            if applied.is_empty() {
                println!("❌ No migrations to roll back");
                return Ok(());
            }

            print_latest(&applied, steps, "Rolling back");
            Migrator::down(db, Some(steps)).await?;
            println!("✅ Rollback completed successfully");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_migration_with_status(db).await? {
                let marker = match migration.status() {
                    MigrationStatus::Applied => "✓",
                    MigrationStatus::Pending => "-",
                };
                println!("  {marker} {}", migration.name());
            }
        }
        MigrateAction::Reset => {
            println!("🔄 Resetting database (this will drop all submissions!)...");
            Migrator::refresh(db).await?;
            println!("✅ Database reset completed successfully");
        }
        MigrateAction::Reapply { steps } => {
            let applied = Migrator::get_applied_migrations(db).await?;
            if applied.is_empty() {
                println!("❌ No migrations to reapply");
                return Ok(());
            }

            let count = print_latest(&applied, steps, "Reapplying");
            let count = u32::try_from(count).unwrap_or(steps);
            Migrator::down(db, Some(count)).await?;
            Migrator::up(db, Some(count)).await?;
            println!("✅ Reapply completed successfully");
        }
    }

    Ok(())
}

fn print_latest(applied: &[sea_orm_migration::Migration], steps: u32, verb: &str) -> usize {
    let count = cmp::min(steps as usize, applied.len());

    println!("{verb} {count} migration(s):");
    for migration in applied[applied.len() - count..].iter().rev() {
        println!("  📄 {}", migration.name());
    }

    count
}
