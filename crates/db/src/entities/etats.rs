//! `SeaORM` Entity for the report descriptors table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "etats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    pub titre: String,
    pub description: Option<String>,
    pub date_debut: Date,
    pub date_fin: Date,
    pub periodicite: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub filtres: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub criteres: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub options: Json,
    pub statut: String,
    pub total_usd: Decimal,
    pub total_cdf: Decimal,
    pub total_general: Decimal,
    pub fichier_pdf: Option<String>,
    pub fichier_excel: Option<String>,
    pub erreur: Option<String>,
    pub cree_par: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::etat_audits::Entity")]
    EtatAudits,
}

impl Related<super::etat_audits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EtatAudits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
