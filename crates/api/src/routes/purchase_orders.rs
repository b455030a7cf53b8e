//! Purchase order CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{PurchaseOrderId, VendorId};
use domain::{
    CreatePurchaseOrder, CurrencyCode, ExpandedLine, ExpandedOrder, LineItem, Money, OrderQuery,
    OrderSummary, PaymentTerms, PurchaseOrder, PurchaseOrderPatch, RawOrderQuery, ShippingMethod,
    Vendor,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;

// -- Request types --

/// Body of `POST /api/purchase-orders`.
///
/// Totals are always computed server-side; any totals a client sends are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderRequest {
    #[serde(alias = "vendorId")]
    pub vendor_id: u64,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
    pub order_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_terms: PaymentTerms,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub shipping_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    pub item_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl From<CreatePurchaseOrderRequest> for CreatePurchaseOrder {
    fn from(req: CreatePurchaseOrderRequest) -> Self {
        let lines = req
            .items
            .into_iter()
            .map(|line| {
                LineItem::new(
                    line.item_id,
                    line.quantity,
                    Money::from_cents(line.unit_price_cents),
                )
            })
            .collect();

        let mut cmd = CreatePurchaseOrder::new(VendorId::new(req.vendor_id), lines)
            .payment_terms(req.payment_terms)
            .shipping_method(req.shipping_method)
            .currency(req.currency)
            .shipping(Money::from_cents(req.shipping_cents));
        if let Some(date) = req.order_date {
            cmd = cmd.order_date(date);
        }
        if let Some(date) = req.delivery_date {
            cmd = cmd.delivery_date(date);
        }
        cmd
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub item_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl From<&LineItem> for LineResponse {
    fn from(line: &LineItem) -> Self {
        Self {
            item_id: line.item_id.to_string(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price.cents(),
            line_total_cents: line.line_total().cents(),
            name: None,
            description: None,
            unit: None,
        }
    }
}

impl From<ExpandedLine> for LineResponse {
    fn from(line: ExpandedLine) -> Self {
        Self {
            item_id: line.item_id.to_string(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price.cents(),
            line_total_cents: line.line_total.cents(),
            name: Some(line.name),
            description: Some(line.description),
            unit: Some(line.unit),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub vendor_id: VendorId,
    /// Vendor display name; present on listings and detail views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Full vendor record; present on detail views when the vendor exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_data: Option<Vendor>,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub status: String,
    pub payment_terms: PaymentTerms,
    pub shipping_method: ShippingMethod,
    pub currency: CurrencyCode,
    pub items: Vec<LineResponse>,
    pub subtotal_cents: i64,
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
}

impl OrderResponse {
    fn base(order: &PurchaseOrder, items: Vec<LineResponse>) -> Self {
        Self {
            id: order.id().to_string(),
            vendor_id: order.vendor_id(),
            vendor: None,
            vendor_data: None,
            order_date: order.order_date(),
            delivery_date: order.delivery_date(),
            status: order.status().to_string(),
            payment_terms: order.payment_terms(),
            shipping_method: order.shipping_method(),
            currency: order.currency().clone(),
            items,
            subtotal_cents: order.subtotal().cents(),
            tax_rate_bps: order.tax_policy().rate_bps(),
            tax_cents: order.tax().cents(),
            shipping_cents: order.shipping().cents(),
            total_cents: order.total().cents(),
        }
    }
}

impl From<PurchaseOrder> for OrderResponse {
    fn from(order: PurchaseOrder) -> Self {
        let items = order.lines().iter().map(LineResponse::from).collect();
        Self::base(&order, items)
    }
}

impl From<OrderSummary> for OrderResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            vendor: Some(summary.vendor_name),
            ..Self::from(summary.order)
        }
    }
}

impl From<ExpandedOrder> for OrderResponse {
    fn from(expanded: ExpandedOrder) -> Self {
        let items = expanded.lines.into_iter().map(LineResponse::from).collect();
        Self {
            vendor: Some(expanded.vendor_name),
            vendor_data: expanded.vendor,
            ..Self::base(&expanded.order, items)
        }
    }
}

// -- Handlers --

/// GET /api/purchase-orders: list orders filtered by `status`, `vendor_id`,
/// `date_from`, `date_to` and `search`.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RawOrderQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<OrderResponse>>>, ApiError> {
    let Query(raw) = query?;
    let query = OrderQuery::try_from(raw)?;
    let orders = state.orders.list_orders(&query).await;

    Ok(Json(Envelope::data(
        orders.into_iter().map(OrderResponse::from).collect(),
    )))
}

/// GET /api/purchase-orders/{id}: an order with vendor and items resolved.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    let expanded = state.orders.get_expanded(&PurchaseOrderId::new(id)).await?;
    Ok(Json(Envelope::data(expanded.into())))
}

/// POST /api/purchase-orders: place a new order.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    req: Result<Json<CreatePurchaseOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<OrderResponse>>), ApiError> {
    let Json(req) = req?;
    let order = state.orders.create_order(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(order.into()).with_message("Purchase order created successfully")),
    ))
}

/// PUT /api/purchase-orders/{id}: change status, dates, shipping method or cost.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    req: Result<Json<PurchaseOrderPatch>, JsonRejection>,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    let Json(patch) = req?;
    let order = state
        .orders
        .update_order(&PurchaseOrderId::new(id), patch)
        .await?;

    Ok(Json(
        Envelope::data(order.into()).with_message("Purchase order updated successfully"),
    ))
}

/// DELETE /api/purchase-orders/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state
        .orders
        .delete_order(&PurchaseOrderId::new(id))
        .await?;
    Ok(Json(Envelope::message("Purchase order deleted successfully")))
}
