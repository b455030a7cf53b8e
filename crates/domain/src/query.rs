//! Filtering over entity collections.
//!
//! Each query type holds independent, optional predicates that are combined
//! with logical AND. An absent predicate means "no constraint". Filtering
//! keeps the relative order of the input and never sorts.
//!
//! The `Raw*Query` types carry untyped strings from a boundary (for example
//! HTTP query parameters) and convert into typed queries, failing with
//! `InvalidArgument` on malformed input. Empty strings count as absent.

use chrono::NaiveDate;
use common::VendorId;
use serde::Deserialize;

use crate::catalog::CatalogItem;
use crate::error::{DomainError, Result};
use crate::purchase_order::{OrderStatus, PurchaseOrder};
use crate::vendor::{Vendor, VendorStatus};

/// Date format accepted for date-range bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A set of predicates over `T`.
pub trait Criteria<T> {
    fn matches(&self, candidate: &T) -> bool;
}

/// Returns the elements of `collection` that satisfy `criteria`, in order.
pub fn filter<T: Clone, C: Criteria<T> + ?Sized>(collection: &[T], criteria: &C) -> Vec<T> {
    collection
        .iter()
        .filter(|candidate| criteria.matches(candidate))
        .cloned()
        .collect()
}

/// Case-insensitive substring needle, lower-cased once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Needle(String);

impl Needle {
    fn new(search: &str) -> Self {
        Self(search.to_lowercase())
    }

    fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    fn found_in_any(&self, haystacks: &[&str]) -> bool {
        haystacks.iter().any(|h| self.found_in(h))
    }
}

/// Filter for vendors. Search covers name, contact and email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorQuery {
    pub status: Option<VendorStatus>,
    pub category: Option<String>,
    search: Option<Needle>,
}

impl VendorQuery {
    /// Creates a query with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: VendorStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(Needle::new(search));
        self
    }
}

impl Criteria<Vendor> for VendorQuery {
    fn matches(&self, vendor: &Vendor) -> bool {
        self.status.is_none_or(|status| vendor.status == status)
            && self
                .category
                .as_ref()
                .is_none_or(|category| &vendor.category == category)
            && self
                .search
                .as_ref()
                .is_none_or(|n| n.found_in_any(&[&vendor.name, &vendor.contact, &vendor.email]))
    }
}

/// Filter for catalog items. Search covers name and description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub category: Option<String>,
    search: Option<Needle>,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(Needle::new(search));
        self
    }
}

impl Criteria<CatalogItem> for ItemQuery {
    fn matches(&self, item: &CatalogItem) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| &item.category == category)
            && self
                .search
                .as_ref()
                .is_none_or(|n| n.found_in_any(&[&item.name, &item.description]))
    }
}

/// Filter for purchase orders.
///
/// Date bounds are inclusive and apply to the order date. Search covers the
/// order number only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub vendor_id: Option<VendorId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    search: Option<Needle>,
}

impl OrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(Needle::new(search));
        self
    }
}

impl Criteria<PurchaseOrder> for OrderQuery {
    fn matches(&self, order: &PurchaseOrder) -> bool {
        self.status.is_none_or(|status| order.status() == status)
            && self.vendor_id.is_none_or(|id| order.vendor_id() == id)
            && self.date_from.is_none_or(|from| order.order_date() >= from)
            && self.date_to.is_none_or(|to| order.order_date() <= to)
            && self
                .search
                .as_ref()
                .is_none_or(|n| n.found_in(order.id().as_str()))
    }
}

/// Untyped vendor filter parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVendorQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl TryFrom<RawVendorQuery> for VendorQuery {
    type Error = DomainError;

    fn try_from(raw: RawVendorQuery) -> Result<Self> {
        let mut query = VendorQuery::new();
        if let Some(status) = present(&raw.status) {
            query = query.status(status.parse()?);
        }
        if let Some(category) = present(&raw.category) {
            query = query.category(category);
        }
        if let Some(search) = present(&raw.search) {
            query = query.search(search);
        }
        Ok(query)
    }
}

/// Untyped item filter parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItemQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl From<RawItemQuery> for ItemQuery {
    fn from(raw: RawItemQuery) -> Self {
        let mut query = ItemQuery::new();
        if let Some(category) = present(&raw.category) {
            query = query.category(category);
        }
        if let Some(search) = present(&raw.search) {
            query = query.search(search);
        }
        query
    }
}

/// Untyped purchase order filter parameters.
///
/// The camelCase aliases keep older dashboard clients working.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOrderQuery {
    pub status: Option<String>,
    #[serde(alias = "vendorId")]
    pub vendor_id: Option<String>,
    #[serde(alias = "dateFrom")]
    pub date_from: Option<String>,
    #[serde(alias = "dateTo")]
    pub date_to: Option<String>,
    pub search: Option<String>,
}

impl TryFrom<RawOrderQuery> for OrderQuery {
    type Error = DomainError;

    fn try_from(raw: RawOrderQuery) -> Result<Self> {
        let mut query = OrderQuery::new();
        if let Some(status) = present(&raw.status) {
            query = query.status(status.parse()?);
        }
        if let Some(vendor_id) = present(&raw.vendor_id) {
            let id = vendor_id.parse::<VendorId>().map_err(|_| {
                DomainError::invalid(format!("vendor_id must be a number, got '{vendor_id}'"))
            })?;
            query = query.vendor(id);
        }
        if let Some(from) = present(&raw.date_from) {
            query = query.date_from(parse_date("date_from", from)?);
        }
        if let Some(to) = present(&raw.date_to) {
            query = query.date_to(parse_date("date_to", to)?);
        }
        if let Some(search) = present(&raw.search) {
            query = query.search(search);
        }
        Ok(query)
    }
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::invalid(format!("{field} must be a date in YYYY-MM-DD form, got '{value}'"))
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
