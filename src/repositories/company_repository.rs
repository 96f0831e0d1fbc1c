use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::db::transaction::with_transaction;
use crate::entities::company::{ActiveModel as CompanyActiveModel, Column};
use crate::entities::service::ActiveModel as ServiceActiveModel;
use crate::entities::{Company, CompanyId, CompanyModel, ServiceModel};
use crate::errors::{SchemaError, SchemaResult, WriteContext};
use crate::repositories::{rejected, Repository};

use super::BaseRepository;

const TABLE: &str = "company";

/// A service offered from the moment its company is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewService {
    pub service_name: String,
    pub price: Decimal,
}

impl NewService {
    pub fn new(service_name: impl Into<String>, price: Decimal) -> Self {
        Self {
            service_name: service_name.into(),
            price,
        }
    }
}

/// Repository for companies
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    base: BaseRepository,
}

impl CompanyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, id: CompanyId, name: &str) -> SchemaResult<CompanyModel> {
        let company = CompanyActiveModel {
            id: Set(id.into()),
            company_name: Set(Some(name.to_string())),
        }
        .insert(self.get_db())
        .await
        .map_err(rejected(WriteContext::insert(TABLE)))?;

        info!(company_id = %id, name, "company created");
        Ok(company)
    }

    /// Insert a company together with its initial services.
    ///
    /// Either every row is written or none is: a rejected service leaves no
    /// company behind.
    #[instrument(skip(self, services), fields(services = services.len()))]
    pub async fn register(
        &self,
        id: CompanyId,
        name: &str,
        services: Vec<NewService>,
    ) -> SchemaResult<(CompanyModel, Vec<ServiceModel>)> {
        let name = name.to_string();

        let result = with_transaction(self.get_db(), move |txn| {
            Box::pin(async move {
                let company = CompanyActiveModel {
                    id: Set(id.into()),
                    company_name: Set(Some(name.clone())),
                }
                .insert(txn)
                .await
                .map_err(rejected(WriteContext::insert(TABLE)))?;

                let mut created = Vec::with_capacity(services.len());
                for service in services {
                    let row = ServiceActiveModel {
                        service_name: Set(service.service_name),
                        price: Set(service.price),
                        company_name: Set(name.clone()),
                    }
                    .insert(txn)
                    .await
                    .map_err(rejected(WriteContext::insert("service")))?;
                    created.push(row);
                }

                Ok::<_, SchemaError>((company, created))
            })
        })
        .await;

        if let Err(e) = &result {
            warn!(company_id = %id, error = %e, "company registration rolled back");
        }
        result
    }

    pub async fn find_by_id(&self, id: CompanyId) -> SchemaResult<Option<CompanyModel>> {
        Ok(Company::find_by_id(i32::from(id)).one(self.get_db()).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> SchemaResult<Option<CompanyModel>> {
        Ok(Company::find()
            .filter(Column::CompanyName.eq(name))
            .one(self.get_db())
            .await?)
    }

    /// Rename a company. Its services and their price history follow the
    /// new name.
    pub async fn rename(&self, id: CompanyId, new_name: &str) -> SchemaResult<CompanyModel> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| SchemaError::NotFound(format!("company {id}")))?;

        let mut active: CompanyActiveModel = existing.into();
        active.company_name = Set(Some(new_name.to_string()));
        active
            .update(self.get_db())
            .await
            .map_err(rejected(WriteContext::update(TABLE)))
    }

    /// Delete a company along with its services and their price history.
    pub async fn delete(&self, id: CompanyId) -> SchemaResult<()> {
        let result = Company::delete_by_id(i32::from(id))
            .exec(self.get_db())
            .await
            .map_err(rejected(WriteContext::delete(TABLE)))?;

        if result.rows_affected == 0 {
            return Err(SchemaError::NotFound(format!("company {id}")));
        }
        info!(company_id = %id, "company deleted");
        Ok(())
    }
}

impl Repository for CompanyRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
