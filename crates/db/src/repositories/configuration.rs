//! Per-kind report configuration.
//!
//! The `configuration_etats` table carries the defaults the selection form
//! is built from: default title, default periodicity, displayable columns,
//! and available filters.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use tresor_core::etat::ReportKind;

use crate::entities::configuration_etats;

/// Repository for per-kind report defaults.
#[derive(Debug, Clone)]
pub struct ConfigurationRepository {
    db: DatabaseConnection,
}

impl ConfigurationRepository {
    /// Creates a new configuration repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the configuration for one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get(
        &self,
        kind: ReportKind,
    ) -> Result<Option<configuration_etats::Model>, DbErr> {
        configuration_etats::Entity::find()
            .filter(configuration_etats::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await
    }

    /// Fetches all kind configurations, in form order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn all(&self) -> Result<Vec<configuration_etats::Model>, DbErr> {
        configuration_etats::Entity::find()
            .order_by_asc(configuration_etats::Column::Kind)
            .all(&self.db)
            .await
    }
}
