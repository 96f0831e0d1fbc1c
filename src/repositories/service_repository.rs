use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::transaction::with_transaction;
use crate::entities::price_history::{self, ActiveModel as PriceHistoryActiveModel};
use crate::entities::service::{ActiveModel as ServiceActiveModel, Column};
use crate::entities::{
    PriceHistory, PriceHistoryId, PriceHistoryModel, Service, ServiceKey, ServiceModel,
};
use crate::errors::{SchemaError, SchemaResult, WriteContext};
use crate::repositories::{rejected, Repository};

use super::BaseRepository;

const TABLE: &str = "service";

/// Repository for services and their price ledger
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    base: BaseRepository,
}

impl ServiceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Offer a service under an existing company.
    pub async fn create(&self, key: ServiceKey, price: Decimal) -> SchemaResult<ServiceModel> {
        let service = ServiceActiveModel {
            service_name: Set(key.service_name),
            price: Set(price),
            company_name: Set(key.company_name),
        }
        .insert(self.get_db())
        .await
        .map_err(rejected(WriteContext::insert(TABLE)))?;

        info!(service = %service.key(), "service created");
        Ok(service)
    }

    pub async fn find(&self, key: &ServiceKey) -> SchemaResult<Option<ServiceModel>> {
        Ok(
            Service::find_by_id((key.service_name.clone(), key.company_name.clone()))
                .one(self.get_db())
                .await?,
        )
    }

    pub async fn list_for_company(&self, company_name: &str) -> SchemaResult<Vec<ServiceModel>> {
        Ok(Service::find()
            .filter(Column::CompanyName.eq(company_name))
            .order_by_asc(Column::ServiceName)
            .all(self.get_db())
            .await?)
    }

    /// Append a price to the service's ledger.
    ///
    /// `service.price` keeps the price the service was created with; the
    /// ledger records every change after it. The caller supplies the key,
    /// which must be greater than every key already in this service's ledger.
    pub async fn record_price(
        &self,
        id: PriceHistoryId,
        key: &ServiceKey,
        price: Decimal,
    ) -> SchemaResult<PriceHistoryModel> {
        let key = key.clone();
        let entry = with_transaction(self.get_db(), move |txn| {
            Box::pin(async move {
                let latest = PriceHistory::find()
                    .filter(price_history::Column::ServiceName.eq(key.service_name.as_str()))
                    .filter(price_history::Column::CompanyName.eq(key.company_name.as_str()))
                    .order_by_desc(price_history::Column::Id)
                    .one(txn)
                    .await?;
                if let Some(latest) = latest {
                    if i32::from(id) <= latest.id {
                        return Err(SchemaError::LedgerOutOfOrder {
                            id: id.into(),
                            latest: latest.id,
                        });
                    }
                }

                let entry = PriceHistoryActiveModel {
                    id: Set(id.into()),
                    service_name: Set(key.service_name),
                    company_name: Set(key.company_name),
                    price: Set(price),
                }
                .insert(txn)
                .await
                .map_err(rejected(WriteContext::insert("price_history")))?;

                Ok::<_, SchemaError>(entry)
            })
        })
        .await?;

        debug!(entry_id = entry.id, service = %entry.service_key(), %price, "price recorded");
        Ok(entry)
    }

    /// Ledger entries of a service in key order.
    pub async fn price_history(&self, key: &ServiceKey) -> SchemaResult<Vec<PriceHistoryModel>> {
        Ok(PriceHistory::find()
            .filter(price_history::Column::ServiceName.eq(key.service_name.as_str()))
            .filter(price_history::Column::CompanyName.eq(key.company_name.as_str()))
            .order_by_asc(price_history::Column::Id)
            .all(self.get_db())
            .await?)
    }

    /// The current price: the newest ledger entry, or the service's own
    /// price when nothing has been recorded yet. Ledger keys only grow, so
    /// the highest key is the newest entry.
    pub async fn latest_price(&self, key: &ServiceKey) -> SchemaResult<Decimal> {
        let latest = PriceHistory::find()
            .filter(price_history::Column::ServiceName.eq(key.service_name.as_str()))
            .filter(price_history::Column::CompanyName.eq(key.company_name.as_str()))
            .order_by_desc(price_history::Column::Id)
            .one(self.get_db())
            .await?;

        if let Some(entry) = latest {
            return Ok(entry.price);
        }

        self.find(key)
            .await?
            .map(|service| service.price)
            .ok_or_else(|| SchemaError::NotFound(format!("service {key}")))
    }

    /// Withdraw a service. Its price history goes with it.
    pub async fn delete(&self, key: &ServiceKey) -> SchemaResult<()> {
        let result = Service::delete_by_id((key.service_name.clone(), key.company_name.clone()))
            .exec(self.get_db())
            .await
            .map_err(rejected(WriteContext::delete(TABLE)))?;

        if result.rows_affected == 0 {
            return Err(SchemaError::NotFound(format!("service {key}")));
        }
        Ok(())
    }
}

impl Repository for ServiceRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
