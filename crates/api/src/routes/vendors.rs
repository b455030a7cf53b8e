//! Vendor CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::VendorId;
use domain::{DomainError, NewVendor, RawVendorQuery, Vendor, VendorPatch, VendorQuery};

use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;

/// GET /api/vendors: list vendors, filtered by `status`, `category` and `search`.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RawVendorQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Vendor>>>, ApiError> {
    let Query(raw) = query?;
    let query = VendorQuery::try_from(raw)?;

    Ok(Json(Envelope::data(state.vendors.list_vendors(&query).await)))
}

/// GET /api/vendors/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Vendor>>, ApiError> {
    let vendor = state.vendors.get_vendor(parse_vendor_id(&id)?).await?;
    Ok(Json(Envelope::data(vendor)))
}

/// POST /api/vendors: register a vendor under the next id.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    req: Result<Json<NewVendor>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Vendor>>), ApiError> {
    let Json(new_vendor) = req?;
    let vendor = state.vendors.create_vendor(new_vendor).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(vendor).with_message("Vendor created successfully")),
    ))
}

/// PUT /api/vendors/{id}: apply a partial update.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    req: Result<Json<VendorPatch>, JsonRejection>,
) -> Result<Json<Envelope<Vendor>>, ApiError> {
    let id = parse_vendor_id(&id)?;
    let Json(patch) = req?;
    let vendor = state.vendors.update_vendor(id, patch).await?;

    Ok(Json(
        Envelope::data(vendor).with_message("Vendor updated successfully"),
    ))
}

/// DELETE /api/vendors/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.vendors.delete_vendor(parse_vendor_id(&id)?).await?;
    Ok(Json(Envelope::message("Vendor deleted successfully")))
}

fn parse_vendor_id(raw: &str) -> Result<VendorId, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::invalid(format!("vendor id must be a number, got '{raw}'")))
}
