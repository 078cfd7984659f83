//! `SeaORM` Entity for the report audit log table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "etat_audits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub etat_id: Uuid,
    pub action: String,
    pub principal: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub details: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::etats::Entity",
        from = "Column::EtatId",
        to = "super::etats::Column::Id"
    )]
    Etats,
}

impl Related<super::etats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Etats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
