//! Denormalized read views of purchase orders.
//!
//! References that no longer resolve degrade to placeholders instead of
//! failing the read, so deleting a vendor never breaks order history.

use common::ItemId;
use serde::Serialize;

use super::{LineItem, PurchaseOrder};
use crate::catalog::CatalogItem;
use crate::money::Money;
use crate::vendor::Vendor;

/// Display name used when an order's vendor no longer exists.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// Display name used when a line's catalog item no longer exists.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Unit of measure used when a line's catalog item no longer exists.
pub const DEFAULT_UNIT: &str = "ea";

/// An order together with its vendor's display name, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub order: PurchaseOrder,
    pub vendor_name: String,
}

impl OrderSummary {
    pub fn new(order: PurchaseOrder, vendor: Option<&Vendor>) -> Self {
        Self {
            order,
            vendor_name: vendor_display_name(vendor),
        }
    }
}

/// A line item joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedLine {
    pub item_id: ItemId,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub name: String,
    pub description: String,
    pub unit: String,
}

impl ExpandedLine {
    pub fn new(line: &LineItem, item: Option<&CatalogItem>) -> Self {
        let (name, description, unit) = match item {
            Some(item) => (item.name.clone(), item.description.clone(), item.unit.clone()),
            None => (UNKNOWN_ITEM.to_string(), String::new(), DEFAULT_UNIT.to_string()),
        };
        Self {
            item_id: line.item_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total(),
            name,
            description,
            unit,
        }
    }
}

/// A purchase order with vendor and item references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedOrder {
    pub order: PurchaseOrder,
    pub vendor_name: String,
    /// The full vendor record, absent if the vendor was deleted.
    pub vendor: Option<Vendor>,
    pub lines: Vec<ExpandedLine>,
}

impl ExpandedOrder {
    /// Joins an order with whatever vendor and items could be resolved.
    pub fn assemble(order: PurchaseOrder, vendor: Option<Vendor>, items: &[CatalogItem]) -> Self {
        let lines = order
            .lines()
            .iter()
            .map(|line| {
                let item = items.iter().find(|item| item.id == line.item_id);
                ExpandedLine::new(line, item)
            })
            .collect();

        Self {
            vendor_name: vendor_display_name(vendor.as_ref()),
            vendor,
            lines,
            order,
        }
    }
}

fn vendor_display_name(vendor: Option<&Vendor>) -> String {
    vendor
        .map(|v| v.name.clone())
        .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
}
