//! `SeaORM` Entity for bank accounts (read-only source collection).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comptes_bancaires")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub banque_id: Uuid,
    pub numero_compte: String,
    pub intitule: String,
    pub devise: String,
    pub solde_courant: Decimal,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::banques::Entity",
        from = "Column::BanqueId",
        to = "super::banques::Column::Id"
    )]
    Banques,
}

impl Related<super::banques::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Banques.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
