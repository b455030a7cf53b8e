//! Catalog item endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use common::ItemId;
use domain::{CatalogItem, ItemQuery, RawItemQuery};
use serde::Serialize;

use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unit_price_cents: i64,
    pub unit: String,
    pub category: String,
}

impl From<CatalogItem> for ItemResponse {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            description: item.description,
            unit_price_cents: item.unit_price.cents(),
            unit: item.unit,
            category: item.category,
        }
    }
}

/// GET /api/items: list catalog items, filtered by `category` and `search`.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RawItemQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<ItemResponse>>>, ApiError> {
    let Query(raw) = query?;
    let items = state.catalog.list_items(&ItemQuery::from(raw)).await;

    Ok(Json(Envelope::data(
        items.into_iter().map(ItemResponse::from).collect(),
    )))
}

/// GET /api/items/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<ItemResponse>>, ApiError> {
    let item = state.catalog.get_item(&ItemId::new(id)).await?;
    Ok(Json(Envelope::data(item.into())))
}
