//! Audit recorder.
//!
//! Every user-visible action on a descriptor (CREATE, GENERATE, VIEW,
//! DOWNLOAD) appends one entry. Audit writes run in their own transaction;
//! a failed append must never roll back or fail the operation it records,
//! so [`AuditRepository::record`] swallows and logs persistence errors.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use tracing::warn;
use uuid::Uuid;

use tresor_core::etat::AuditAction;

use crate::entities::etat_audits;

/// Repository for descriptor audit entries.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; use [`Self::record`] from
    /// operation paths that must not fail on audit errors.
    pub async fn append(
        &self,
        etat_id: Uuid,
        action: AuditAction,
        principal: &str,
        details: serde_json::Value,
    ) -> Result<etat_audits::Model, DbErr> {
        let model = etat_audits::ActiveModel {
            id: Set(Uuid::new_v4()),
            etat_id: Set(etat_id),
            action: Set(action.as_str().to_string()),
            principal: Set(principal.to_string()),
            details: Set(details),
            created_at: Set(Utc::now().into()),
        };
        model.insert(&self.db).await
    }

    /// Appends one audit entry, logging instead of propagating failures.
    pub async fn record(
        &self,
        etat_id: Uuid,
        action: AuditAction,
        principal: &str,
        details: serde_json::Value,
    ) {
        if let Err(e) = self.append(etat_id, action, principal, details).await {
            warn!(error = %e, %etat_id, %action, "audit entry could not be persisted");
        }
    }

    /// Returns the audit history of a descriptor, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn history(&self, etat_id: Uuid) -> Result<Vec<etat_audits::Model>, DbErr> {
        etat_audits::Entity::find()
            .filter(etat_audits::Column::EtatId.eq(etat_id))
            .order_by_desc(etat_audits::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_history_query_is_scoped_and_ordered() {
        let id = Uuid::new_v4();
        let query = etat_audits::Entity::find()
            .filter(etat_audits::Column::EtatId.eq(id))
            .order_by_desc(etat_audits::Column::CreatedAt)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(query.contains(r#""etat_id" ="#));
        assert!(query.contains(r#"ORDER BY "etat_audits"."created_at" DESC"#));
    }
}
