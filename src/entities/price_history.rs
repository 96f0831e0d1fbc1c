use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::service::ServiceKey;

/// Caller-assigned ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistoryId(pub i32);

impl From<PriceHistoryId> for i32 {
    fn from(id: PriceHistoryId) -> Self {
        id.0
    }
}

/// The `price_history` table: one row per recorded price of a service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub service_name: String,
    pub company_name: String,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub price: Decimal,
}

impl Model {
    pub fn service_key(&self) -> ServiceKey {
        ServiceKey::new(self.service_name.clone(), self.company_name.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "(Column::ServiceName, Column::CompanyName)",
        to = "(super::service::Column::ServiceName, super::service::Column::CompanyName)",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Service,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
