use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `ban_list` table: at most one ban record per account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ban_list")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub acc_id: i32,
    pub started: DateTime,
    pub ended: DateTime,
}

impl Model {
    /// Whether the ban covers `at` (start inclusive, end exclusive).
    pub fn is_active_at(&self, at: DateTime) -> bool {
        self.started <= at && at < self.ended
    }
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

    fn at(hour: u32) -> DateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn ban_window_is_half_open() {
        let ban = Model {
            id: 1,
            acc_id: 7,
            started: at(8),
            ended: at(12),
        };
        assert!(!ban.is_active_at(at(7)));
        assert!(ban.is_active_at(at(8)));
        assert!(ban.is_active_at(at(11)));
        assert!(!ban.is_active_at(at(12)));
    }
}
