use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MOBILE_NUMBER: &str = "+999(99)999-99-99";
pub const DEFAULT_EMAIL: &str = "myemail@domain.com";

/// Role an account acts under. Stored as its upper-case name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Rolename {
    #[sea_orm(string_value = "BROKER")]
    Broker,
    #[sea_orm(string_value = "CONSULTANT")]
    Consultant,
    #[sea_orm(string_value = "USER")]
    #[default]
    User,
}

/// The `account` table.
///
/// Every column but the identity may be NULL; omitted contact details and
/// role fall back to the column defaults on insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub login: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub mob_num: Option<String>,
    pub email: Option<String>,
    pub rolename: Option<Rolename>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::ban_list::Entity")]
    BanList,
    #[sea_orm(has_many = "super::basket::Entity")]
    Basket,
}

impl Related<super::ban_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BanList.def()
    }
}

impl Related<super::basket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Basket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
