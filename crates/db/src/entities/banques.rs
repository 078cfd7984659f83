//! `SeaORM` Entity for banks (read-only reference data).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "banques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nom: String,
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comptes_bancaires::Entity")]
    ComptesBancaires,
}

impl Related<super::comptes_bancaires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComptesBancaires.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
