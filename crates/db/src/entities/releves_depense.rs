//! `SeaORM` Entity for monthly expense statements (read-only source
//! collection).
//!
//! The `periode` column is anchored to the first day of the statement's
//! month; see the period normalizer in `tresor-core`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "releves_depense")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub libelle: String,
    pub periode: Date,
    pub net_usd: Option<Decimal>,
    pub net_cdf: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
