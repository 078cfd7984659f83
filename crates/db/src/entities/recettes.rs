//! `SeaORM` Entity for receipts (read-only source collection).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recettes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub numero: String,
    pub libelle: String,
    pub source: String,
    pub service_id: Uuid,
    pub banque_id: Option<Uuid>,
    pub montant_usd: Option<Decimal>,
    pub montant_cdf: Option<Decimal>,
    pub date_encaissement: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
