use serde::de::IgnoredAny;
use serde_json::Value;
use types::{Page, PageQuery, Record, Result};

use crate::{ApiClient, endpoints};

/// Reference-data collections under `/core/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreResource {
    Branches,
    Warehouses,
    Vendors,
    Customers,
    Sellers,
    WarehouseTransactions,
}

impl CoreResource {
    pub fn path(self) -> &'static str {
        match self {
            CoreResource::Branches => endpoints::BRANCHES,
            CoreResource::Warehouses => endpoints::WAREHOUSES,
            CoreResource::Vendors => endpoints::VENDORS,
            CoreResource::Customers => endpoints::CUSTOMERS,
            CoreResource::Sellers => endpoints::SELLERS,
            CoreResource::WarehouseTransactions => endpoints::WAREHOUSE_TRANSACTIONS,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CoreResource::Branches => "Branches",
            CoreResource::Warehouses => "Warehouses",
            CoreResource::Vendors => "Vendors",
            CoreResource::Customers => "Customers",
            CoreResource::Sellers => "Sellers",
            CoreResource::WarehouseTransactions => "Warehouse Transfers",
        }
    }

    /// Singular noun for buttons and confirmations.
    pub fn noun(self) -> &'static str {
        match self {
            CoreResource::Branches => "branch",
            CoreResource::Warehouses => "warehouse",
            CoreResource::Vendors => "vendor",
            CoreResource::Customers => "customer",
            CoreResource::Sellers => "seller",
            CoreResource::WarehouseTransactions => "transfer",
        }
    }
}

impl ApiClient {
    pub async fn list_records(&self, resource: CoreResource, query: &PageQuery) -> Result<Page<Record>> {
        self.call(self.get(resource.path())?.query(&query.to_pairs()))
            .await
    }

    pub async fn create_record(&self, resource: CoreResource, data: &Value) -> Result<Record> {
        self.call(self.post(resource.path())?.json(data)).await
    }

    pub async fn update_record(&self, resource: CoreResource, id: i64, data: &Value) -> Result<Record> {
        self.call(self.patch(endpoints::item(resource.path(), id))?.json(data))
            .await
    }

    pub async fn delete_record(&self, resource: CoreResource, id: i64) -> Result<()> {
        self.call::<IgnoredAny>(self.delete(endpoints::item(resource.path(), id))?)
            .await
            .map(|_| ())
    }

    /// Total rows in a collection.
    pub async fn count_records(&self, resource: CoreResource) -> Result<u64> {
        let page: Page<IgnoredAny> = self
            .call(self.get(resource.path())?.query(&PageQuery::count_only().to_pairs()))
            .await?;
        Ok(page.count)
    }
}
