//! Demo data loaded at startup when seeding is enabled.
//!
//! Entities are inserted straight into the store without publishing events;
//! callers rebuild their projections afterwards.

use chrono::NaiveDate;
use common::{PurchaseOrderId, VendorId};

use crate::catalog::CatalogItem;
use crate::error::{DomainError, Result};
use crate::money::{Money, TaxPolicy};
use crate::purchase_order::{
    CreatePurchaseOrder, LineItem, OrderStatus, PaymentTerms, PurchaseOrder, PurchaseOrderPatch,
    ShippingMethod,
};
use crate::store::{InMemoryStore, Patch};
use crate::vendor::{Vendor, VendorStatus};

/// Counts of what [`load_demo_data`] inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub vendors: usize,
    pub items: usize,
    pub orders: usize,
}

/// Inserts the demo vendors, items and orders.
///
/// Fails with `AlreadyExists` if any demo id is already taken.
#[tracing::instrument(skip(store))]
pub async fn load_demo_data(store: &InMemoryStore, tax_policy: TaxPolicy) -> Result<SeedSummary> {
    let vendors = demo_vendors();
    let items = demo_items();
    let orders = demo_orders(tax_policy)?;

    let summary = SeedSummary {
        vendors: vendors.len(),
        items: items.len(),
        orders: orders.len(),
    };

    for vendor in vendors {
        store.vendors.insert(vendor).await?;
    }
    for item in items {
        store.items.insert(item).await?;
    }
    for order in orders {
        store.orders.insert(order).await?;
    }

    tracing::debug!(
        vendors = summary.vendors,
        items = summary.items,
        orders = summary.orders,
        "demo data loaded"
    );
    Ok(summary)
}

fn demo_vendors() -> Vec<Vendor> {
    vec![
        vendor(
            1,
            "ABC Supplies",
            "John Smith",
            "john@abcsupplies.com",
            "555-123-4567",
            "123 Main St, Anytown, USA",
            VendorStatus::Active,
            "supplier",
        ),
        vendor(
            2,
            "XYZ Manufacturing",
            "Jane Doe",
            "jane@xyzmanufacturing.com",
            "555-987-6543",
            "456 Oak Ave, Somewhere, USA",
            VendorStatus::Active,
            "manufacturer",
        ),
        vendor(
            3,
            "Global Parts Inc.",
            "Bob Johnson",
            "bob@globalparts.com",
            "555-456-7890",
            "789 Pine St, Nowhere, USA",
            VendorStatus::Inactive,
            "distributor",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn vendor(
    id: u64,
    name: &str,
    contact: &str,
    email: &str,
    phone: &str,
    address: &str,
    status: VendorStatus,
    category: &str,
) -> Vendor {
    Vendor {
        id: VendorId::new(id),
        name: name.to_string(),
        contact: contact.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        status,
        category: category.to_string(),
    }
}

fn demo_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(
            "item1",
            "Widget A",
            "Standard widget for general use",
            Money::from_cents(1099),
            "ea",
            "widgets",
        ),
        CatalogItem::new(
            "item2",
            "Widget B",
            "Premium widget for specialized applications",
            Money::from_cents(2499),
            "ea",
            "widgets",
        ),
        CatalogItem::new(
            "item3",
            "Component X",
            "Basic component for assemblies",
            Money::from_cents(549),
            "ea",
            "components",
        ),
    ]
}

fn demo_orders(tax_policy: TaxPolicy) -> Result<Vec<PurchaseOrder>> {
    let specs = [
        (
            "PO-2023-001",
            date(2023, 6, 15)?,
            CreatePurchaseOrder::new(
                VendorId::new(1),
                vec![
                    LineItem::new("item1", 50, Money::from_cents(1099)),
                    LineItem::new("item3", 100, Money::from_cents(549)),
                ],
            )
            .delivery_date(date(2023, 6, 30)?)
            .payment_terms(PaymentTerms::Net30)
            .shipping_method(ShippingMethod::Ground)
            .shipping(Money::from_cents(4055)),
            OrderStatus::Open,
        ),
        (
            "PO-2023-002",
            date(2023, 6, 10)?,
            CreatePurchaseOrder::new(
                VendorId::new(2),
                vec![LineItem::new("item2", 150, Money::from_cents(2499))],
            )
            .delivery_date(date(2023, 6, 25)?)
            .payment_terms(PaymentTerms::Net60)
            .shipping_method(ShippingMethod::Express)
            .shipping(Money::from_cents(12665)),
            OrderStatus::Closed,
        ),
        (
            "PO-2023-003",
            date(2023, 6, 5)?,
            CreatePurchaseOrder::new(
                VendorId::new(3),
                vec![
                    LineItem::new("item1", 25, Money::from_cents(1099)),
                    LineItem::new("item2", 25, Money::from_cents(2499)),
                ],
            )
            .delivery_date(date(2023, 6, 20)?)
            .payment_terms(PaymentTerms::Cod)
            .shipping_method(ShippingMethod::Pickup),
            OrderStatus::Cancelled,
        ),
    ];

    specs
        .into_iter()
        .map(|(id, order_date, cmd, status)| {
            let mut order =
                PurchaseOrder::place(PurchaseOrderId::new(id), cmd, order_date, tax_policy)?;
            PurchaseOrderPatch::status(status).apply_to(&mut order)?;
            Ok(order)
        })
        .collect()
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DomainError::invalid(format!("invalid date {year}-{month}-{day}")))
}
