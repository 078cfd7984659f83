//! Database migrations.

use sea_orm_migration::prelude::*;

mod m20260120_000001_initial;

/// Migrator for all schema versions.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260120_000001_initial::Migration)]
    }
}
