//! Read-only catalog of purchasable items.

use common::ItemId;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::money::Money;
use crate::query::{ItemQuery, filter};
use crate::store::{Entity, InMemoryStore};

/// A purchasable good with its reference price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub unit_price: Money,
    pub unit: String,
    pub category: String,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: Money,
        unit: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            unit_price,
            unit: unit.into(),
            category: category.into(),
        }
    }
}

impl Entity for CatalogItem {
    type Id = ItemId;
    const KIND: &'static str = "Item";

    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// Query access to the item collection.
#[derive(Clone)]
pub struct Catalog {
    store: InMemoryStore,
}

impl Catalog {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    /// Lists items matching the query, in catalog order.
    #[tracing::instrument(skip(self))]
    pub async fn list_items(&self, query: &ItemQuery) -> Vec<CatalogItem> {
        let items = self.store.items.read().await;
        filter(items.rows(), query)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, id: &ItemId) -> Result<CatalogItem> {
        self.store.items.get(id).await
    }
}
