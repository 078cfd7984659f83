//! `SeaORM` Entity for expenditures (read-only source collection).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "depenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code_depense: String,
    pub libelle: String,
    pub service_id: Uuid,
    pub nature_economique_id: Option<Uuid>,
    pub montant_usd: Option<Decimal>,
    pub montant_fc: Option<Decimal>,
    pub statut: String,
    pub date_depense: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
