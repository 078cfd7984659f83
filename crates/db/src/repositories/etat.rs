//! Report store: persisted report descriptors.
//!
//! A descriptor is created in GENERATING status and moves to GENERATED or
//! ERROR through row-level updates. Concurrent generation on the same
//! descriptor may race, but every path lands on a terminal state.
//! Descriptors are never deleted by the engine.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use tresor_core::etat::{Periodicity, ReportKind, ReportSpec, ReportStatus, ReportTotals};
use tresor_shared::types::PageRequest;

use crate::entities::etats;

/// Error types for report store operations.
#[derive(Debug, thiserror::Error)]
pub enum EtatStoreError {
    /// Descriptor not found.
    #[error("Report descriptor not found: {0}")]
    NotFound(Uuid),

    /// A stored descriptor no longer deserializes into a specification.
    #[error("Stored descriptor {id} is corrupt: {detail}")]
    Corrupt {
        /// Descriptor ID.
        id: Uuid,
        /// What failed to deserialize.
        detail: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EtatStoreError> for tresor_shared::AppError {
    fn from(e: EtatStoreError) -> Self {
        match e {
            EtatStoreError::NotFound(id) => Self::NotFound(format!("état {id}")),
            other => Self::Database(other.to_string()),
        }
    }
}

/// Repository for report descriptors.
#[derive(Debug, Clone)]
pub struct EtatRepository {
    db: DatabaseConnection,
}

impl EtatRepository {
    /// Creates a new report store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new descriptor in GENERATING status.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails. The specification is assumed
    /// validated by the caller; validation failures never reach the store.
    pub async fn create(
        &self,
        spec: &ReportSpec,
        principal: &str,
    ) -> Result<etats::Model, EtatStoreError> {
        let now = Utc::now();
        let model = etats::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(spec.kind.as_str().to_string()),
            titre: Set(spec.titre.clone()),
            description: Set(spec.description.clone()),
            date_debut: Set(spec.date_debut),
            date_fin: Set(spec.date_fin),
            periodicite: Set(spec.periodicite.as_str().to_string()),
            filtres: Set(serde_json::to_value(&spec.filtres).unwrap_or_default()),
            criteres: Set(serde_json::to_value(&spec.criteres).unwrap_or_default()),
            options: Set(serde_json::to_value(&spec.options).unwrap_or_default()),
            statut: Set(ReportStatus::Generating.as_str().to_string()),
            total_usd: Set(rust_decimal::Decimal::ZERO),
            total_cdf: Set(rust_decimal::Decimal::ZERO),
            total_general: Set(rust_decimal::Decimal::ZERO),
            fichier_pdf: Set(None),
            fichier_excel: Set(None),
            erreur: Set(None),
            cree_par: Set(principal.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Fetches a descriptor by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get(&self, id: Uuid) -> Result<Option<etats::Model>, EtatStoreError> {
        Ok(etats::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Fetches a descriptor by ID, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`EtatStoreError::NotFound`] for unknown descriptors.
    pub async fn require(&self, id: Uuid) -> Result<etats::Model, EtatStoreError> {
        self.get(id).await?.ok_or(EtatStoreError::NotFound(id))
    }

    /// Lists descriptors, newest first, filterable by kind and status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        kind: Option<ReportKind>,
        statut: Option<ReportStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<etats::Model>, u64), EtatStoreError> {
        let mut query = etats::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(etats::Column::Kind.eq(kind.as_str()));
        }
        if let Some(statut) = statut {
            query = query.filter(etats::Column::Statut.eq(statut.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(etats::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((models, total))
    }

    /// Persists the computed totals on a descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is missing or the update fails.
    pub async fn mark_totals(
        &self,
        id: Uuid,
        totals: ReportTotals,
    ) -> Result<(), EtatStoreError> {
        let model = self.require(id).await?;
        let mut active: etats::ActiveModel = model.into();
        active.total_usd = Set(totals.total_usd);
        active.total_cdf = Set(totals.total_cdf);
        active.total_general = Set(totals.total_general());
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Moves a descriptor to GENERATED with its artifact handles.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is missing or the update fails.
    pub async fn mark_generated(
        &self,
        id: Uuid,
        fichier_pdf: Option<String>,
        fichier_excel: Option<String>,
    ) -> Result<(), EtatStoreError> {
        let model = self.require(id).await?;
        let mut active: etats::ActiveModel = model.into();
        active.statut = Set(ReportStatus::Generated.as_str().to_string());
        active.fichier_pdf = Set(fichier_pdf);
        active.fichier_excel = Set(fichier_excel);
        active.erreur = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Moves a descriptor to ERROR, recording the failure message and
    /// discarding any partially written artifact handles.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is missing or the update fails.
    pub async fn mark_error(&self, id: Uuid, message: &str) -> Result<(), EtatStoreError> {
        let model = self.require(id).await?;
        let mut active: etats::ActiveModel = model.into();
        active.statut = Set(ReportStatus::Error.as_str().to_string());
        active.erreur = Set(Some(message.to_string()));
        active.fichier_pdf = Set(None);
        active.fichier_excel = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Reconstructs the submitted specification from a stored descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`EtatStoreError::Corrupt`] if a stored field no longer
    /// parses.
    pub fn spec_of(model: &etats::Model) -> Result<ReportSpec, EtatStoreError> {
        let corrupt = |detail: &str| EtatStoreError::Corrupt {
            id: model.id,
            detail: detail.to_string(),
        };

        let kind = ReportKind::parse(&model.kind).ok_or_else(|| corrupt("kind"))?;
        let periodicite =
            Periodicity::parse(&model.periodicite).ok_or_else(|| corrupt("periodicite"))?;
        let filtres = serde_json::from_value(model.filtres.clone())
            .map_err(|_| corrupt("filtres"))?;
        let criteres = serde_json::from_value(model.criteres.clone())
            .map_err(|_| corrupt("criteres"))?;
        let options = serde_json::from_value(model.options.clone())
            .map_err(|_| corrupt("options"))?;

        Ok(ReportSpec {
            kind,
            titre: model.titre.clone(),
            description: model.description.clone(),
            date_debut: model.date_debut,
            date_fin: model.date_fin,
            periodicite,
            filtres,
            criteres,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DbBackend, QueryTrait};
    use tresor_core::etat::{OutputOptions, Periodicity, ScalarFilters, SetFilters};

    fn spec() -> ReportSpec {
        ReportSpec {
            kind: ReportKind::Recette,
            titre: "Recettes de juin".to_string(),
            description: Some("Mensuel".to_string()),
            date_debut: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            date_fin: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            periodicite: Periodicity::Monthly,
            filtres: SetFilters::default(),
            criteres: ScalarFilters::default(),
            options: OutputOptions::default(),
        }
    }

    fn model_for(spec: &ReportSpec) -> etats::Model {
        let now = Utc::now();
        etats::Model {
            id: Uuid::new_v4(),
            kind: spec.kind.as_str().to_string(),
            titre: spec.titre.clone(),
            description: spec.description.clone(),
            date_debut: spec.date_debut,
            date_fin: spec.date_fin,
            periodicite: "MONTHLY".to_string(),
            filtres: serde_json::to_value(&spec.filtres).unwrap(),
            criteres: serde_json::to_value(&spec.criteres).unwrap(),
            options: serde_json::to_value(&spec.options).unwrap(),
            statut: "GENERATING".to_string(),
            total_usd: rust_decimal::Decimal::ZERO,
            total_cdf: rust_decimal::Decimal::ZERO,
            total_general: rust_decimal::Decimal::ZERO,
            fichier_pdf: None,
            fichier_excel: None,
            erreur: None,
            cree_par: "agent.comptable".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn test_spec_round_trips_through_storage_model() {
        let spec = spec();
        let model = model_for(&spec);
        let back = EtatRepository::spec_of(&model).expect("spec reconstructs");
        assert_eq!(back, spec);
    }

    #[test]
    fn test_corrupt_kind_is_detected() {
        let mut model = model_for(&spec());
        model.kind = "FACTURE".to_string();
        let err = EtatRepository::spec_of(&model).unwrap_err();
        assert!(matches!(err, EtatStoreError::Corrupt { .. }));
    }

    #[test]
    fn test_list_query_filters_kind_and_status() {
        let query = etats::Entity::find()
            .filter(etats::Column::Kind.eq(ReportKind::Paiement.as_str()))
            .filter(etats::Column::Statut.eq(ReportStatus::Generated.as_str()))
            .order_by_desc(etats::Column::CreatedAt)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(query.contains(r#""kind" = 'PAIEMENT'"#));
        assert!(query.contains(r#""statut" = 'GENERATED'"#));
        assert!(query.contains(r#"ORDER BY "etats"."created_at" DESC"#));
    }
}
