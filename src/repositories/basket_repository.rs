use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::debug;

use crate::entities::basket::{ActiveModel as BasketActiveModel, Column};
use crate::entities::{Basket, BasketModel, BasketType};
use crate::errors::{SchemaError, SchemaResult, WriteContext};
use crate::repositories::{rejected, Repository};

use super::BaseRepository;

const TABLE: &str = "basket";

/// Repository for basket entries
#[derive(Debug, Clone)]
pub struct BasketRepository {
    base: BaseRepository,
}

impl BasketRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Add an entry; `time` is stamped by the database.
    pub async fn add(
        &self,
        acc_id: i32,
        name: &str,
        kind: BasketType,
    ) -> SchemaResult<BasketModel> {
        let entry = BasketActiveModel {
            acc_id: Set(acc_id),
            name: Set(name.to_string()),
            kind: Set(kind),
            time: NotSet,
        }
        .insert(self.get_db())
        .await
        .map_err(rejected(WriteContext::insert(TABLE)))?;

        debug!(acc_id, basket = name, %kind, "basket entry added");
        Ok(entry)
    }

    /// Entries of one account, oldest first
    pub async fn list_for_account(&self, acc_id: i32) -> SchemaResult<Vec<BasketModel>> {
        Ok(Basket::find()
            .filter(Column::AccId.eq(acc_id))
            .order_by_asc(Column::Time)
            .order_by_asc(Column::Name)
            .all(self.get_db())
            .await?)
    }

    pub async fn remove(&self, acc_id: i32, name: &str) -> SchemaResult<()> {
        let result = Basket::delete_by_id((acc_id, name.to_string()))
            .exec(self.get_db())
            .await
            .map_err(rejected(WriteContext::delete(TABLE)))?;

        if result.rows_affected == 0 {
            return Err(SchemaError::NotFound(format!(
                "basket entry {name} of account {acc_id}"
            )));
        }
        Ok(())
    }
}

impl Repository for BasketRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
