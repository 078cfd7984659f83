//! `SeaORM` Entity for payment requests (read-only source collection).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "demandes_paiement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub numero: String,
    pub beneficiaire: String,
    pub motif: String,
    pub service_id: Uuid,
    pub nature_economique_id: Option<Uuid>,
    pub devise: String,
    pub montant: Decimal,
    pub statut: String,
    pub date_soumission: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
