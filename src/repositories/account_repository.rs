use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::entities::account::{self, ActiveModel as AccountActiveModel, Column};
use crate::entities::{Account, AccountModel, Rolename};
use crate::errors::{SchemaError, SchemaResult, WriteContext};
use crate::repositories::{rejected, Repository};

use super::BaseRepository;

const TABLE: &str = "account";

/// Fields supplied when opening an account. Contact details and role left
/// as `None` take the column defaults.
#[derive(Clone, Default)]
pub struct NewAccount {
    pub login: String,
    pub password: String,
    pub mob_num: Option<String>,
    pub email: Option<String>,
    pub rolename: Option<Rolename>,
}

impl NewAccount {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            ..Default::default()
        }
    }
}

fn set_or_default<T>(value: Option<T>) -> sea_orm::ActiveValue<Option<T>>
where
    Option<T>: Into<sea_orm::Value>,
{
    match value {
        Some(v) => Set(Some(v)),
        None => NotSet,
    }
}

/// Repository for account operations
#[derive(Debug, Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an account; format and uniqueness are enforced by the engine
    pub async fn create(&self, account: NewAccount) -> SchemaResult<AccountModel> {
        let model = AccountActiveModel {
            id: NotSet,
            login: Set(Some(account.login)),
            password: Set(Some(account.password)),
            mob_num: set_or_default(account.mob_num),
            email: set_or_default(account.email),
            rolename: set_or_default(account.rolename),
        };

        let created = model
            .insert(self.get_db())
            .await
            .map_err(rejected(WriteContext::insert(TABLE)))?;
        info!(account_id = created.id, "account created");
        Ok(created)
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: i32) -> SchemaResult<Option<AccountModel>> {
        Ok(Account::find_by_id(id).one(self.get_db()).await?)
    }

    pub async fn find_by_login(&self, login: &str) -> SchemaResult<Option<AccountModel>> {
        Ok(Account::find()
            .filter(Column::Login.eq(login))
            .one(self.get_db())
            .await?)
    }

    /// Change the role an account acts under
    pub async fn update_role(&self, id: i32, rolename: Rolename) -> SchemaResult<AccountModel> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| SchemaError::NotFound(format!("account {id}")))?;

        let mut active: account::ActiveModel = existing.into();
        active.rolename = Set(Some(rolename));

        let updated = active
            .update(self.get_db())
            .await
            .map_err(rejected(WriteContext::update(TABLE)))?;
        debug!(account_id = id, %rolename, "account role updated");
        Ok(updated)
    }

    /// Delete an account. Refused while a ban or basket entry references it.
    pub async fn delete(&self, id: i32) -> SchemaResult<()> {
        let result = Account::delete_by_id(id)
            .exec(self.get_db())
            .await
            .map_err(rejected(WriteContext::delete(TABLE)))?;

        if result.rows_affected == 0 {
            return Err(SchemaError::NotFound(format!("account {id}")));
        }
        info!(account_id = id, "account deleted");
        Ok(())
    }
}

impl Repository for AccountRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
