use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::ban_list::{ActiveModel as BanActiveModel, Column};
use crate::entities::{BanList, BanListModel};
use crate::errors::{SchemaError, SchemaResult, WriteContext};
use crate::repositories::{rejected, Repository};

use super::BaseRepository;

const TABLE: &str = "ban_list";

/// Repository for account bans. An account holds at most one ban record.
#[derive(Debug, Clone)]
pub struct BanListRepository {
    base: BaseRepository,
}

impl BanListRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Ban an account from now until `ended`.
    #[instrument(skip(self))]
    pub async fn ban(&self, acc_id: i32, ended: NaiveDateTime) -> SchemaResult<BanListModel> {
        let ban = BanActiveModel {
            id: NotSet,
            acc_id: Set(acc_id),
            started: NotSet,
            ended: Set(ended),
        }
        .insert(self.get_db())
        .await
        .map_err(rejected(WriteContext::insert(TABLE)))?;

        info!(ban_id = ban.id, "account banned");
        Ok(ban)
    }

    /// End an account's ban at `at`.
    #[instrument(skip(self))]
    pub async fn lift(&self, acc_id: i32, at: NaiveDateTime) -> SchemaResult<BanListModel> {
        let existing = self
            .find_for_account(acc_id)
            .await?
            .ok_or_else(|| SchemaError::NotFound(format!("ban for account {acc_id}")))?;

        let mut active: BanActiveModel = existing.into();
        active.ended = Set(at);
        active
            .update(self.get_db())
            .await
            .map_err(rejected(WriteContext::update(TABLE)))
    }

    pub async fn find_for_account(&self, acc_id: i32) -> SchemaResult<Option<BanListModel>> {
        Ok(BanList::find()
            .filter(Column::AccId.eq(acc_id))
            .one(self.get_db())
            .await?)
    }

    pub async fn is_banned(&self, acc_id: i32, at: NaiveDateTime) -> SchemaResult<bool> {
        Ok(self
            .find_for_account(acc_id)
            .await?
            .map(|ban| ban.is_active_at(at))
            .unwrap_or(false))
    }

    /// Stored timestamps are UTC; the column defaults write UTC on every engine.
    pub async fn is_banned_now(&self, acc_id: i32) -> SchemaResult<bool> {
        self.is_banned(acc_id, Utc::now().naive_utc()).await
    }

    /// Remove an account's ban record entirely.
    pub async fn delete(&self, acc_id: i32) -> SchemaResult<()> {
        let result = BanList::delete_many()
            .filter(Column::AccId.eq(acc_id))
            .exec(self.get_db())
            .await
            .map_err(rejected(WriteContext::delete(TABLE)))?;

        if result.rows_affected == 0 {
            return Err(SchemaError::NotFound(format!("ban for account {acc_id}")));
        }
        Ok(())
    }
}

impl Repository for BanListRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
