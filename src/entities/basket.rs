use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a basket entry refers to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
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
pub enum BasketType {
    #[sea_orm(string_value = "SERVICE")]
    Service,
    #[sea_orm(string_value = "CONSULTATION")]
    Consultation,
}

/// The `basket` table, keyed by (`acc_id`, `name`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "basket")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub acc_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: BasketType,
    pub time: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccId",
        to = "super::account::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serializes_kind_under_its_column_name() {
        let entry = Model {
            acc_id: 3,
            name: "tax help".into(),
            kind: BasketType::Consultation,
            time: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "CONSULTATION");
        assert!(json.get("kind").is_none());
    }
}
