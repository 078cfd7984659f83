//! `SeaORM` Entity for per-kind report defaults.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "configuration_etats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub kind: String,
    pub titre_defaut: String,
    pub periodicite_defaut: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub colonnes: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub filtres_disponibles: Json,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
