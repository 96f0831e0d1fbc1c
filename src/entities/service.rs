use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Composite key of a service: its name within the offering company.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceKey {
    pub service_name: String,
    pub company_name: String,
}

impl ServiceKey {
    pub fn new(service_name: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            company_name: company_name.into(),
        }
    }
}

impl std::fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.service_name, self.company_name)
    }
}

/// The `service` table, keyed by (`service_name`, `company_name`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub service_name: String,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub price: Decimal,
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_name: String,
}

impl Model {
    pub fn key(&self) -> ServiceKey {
        ServiceKey::new(self.service_name.clone(), self.company_name.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyName",
        to = "super::company::Column::CompanyName",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Company,
    #[sea_orm(has_many = "super::price_history::Entity")]
    PriceHistory,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
