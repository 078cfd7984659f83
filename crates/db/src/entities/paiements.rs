//! `SeaORM` Entity for executed payments (read-only source collection).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paiements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub numero: String,
    pub beneficiaire: String,
    pub demande_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub banque_id: Option<Uuid>,
    pub devise: String,
    pub montant_paye: Decimal,
    pub est_partiel: bool,
    pub date_paiement: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
