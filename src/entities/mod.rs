//! SeaORM mappings for the six marketplace relations.

pub mod account;
pub mod ban_list;
pub mod basket;
pub mod company;
pub mod price_history;
pub mod service;

pub use account::{Entity as Account, Model as AccountModel, Rolename};
pub use ban_list::{Entity as BanList, Model as BanListModel};
pub use basket::{BasketType, Entity as Basket, Model as BasketModel};
pub use company::{CompanyId, Entity as Company, Model as CompanyModel};
pub use price_history::{Entity as PriceHistory, Model as PriceHistoryModel, PriceHistoryId};
pub use service::{Entity as Service, Model as ServiceModel, ServiceKey};
