//! Domain layer for the purchasing system.
//!
//! This crate provides:
//! - An in-memory entity store with one lock per collection
//! - Vendors, catalog items and purchase orders with derived totals
//! - Typed query criteria and a generic filter
//! - The order composer and vendor directory services
//! - Domain events and the publisher seam used by projections

pub mod catalog;
pub mod clock;
pub mod composer;
pub mod directory;
pub mod error;
pub mod events;
pub mod money;
pub mod purchase_order;
pub mod query;
pub mod seed;
pub mod store;
pub mod vendor;

pub use catalog::{Catalog, CatalogItem};
pub use clock::{Clock, FixedClock, SystemClock};
pub use composer::OrderComposer;
pub use directory::VendorDirectory;
pub use error::{DomainError, Result};
pub use events::{EventPublisher, NoopPublisher, PurchasingEvent, RecordingPublisher};
pub use money::{Money, TaxPolicy};
pub use purchase_order::{
    CreatePurchaseOrder, CurrencyCode, ExpandedLine, ExpandedOrder, LineItem, OrderStatus,
    OrderSummary, PaymentTerms, PurchaseOrder, PurchaseOrderPatch, ShippingMethod,
};
pub use query::{
    Criteria, ItemQuery, OrderQuery, RawItemQuery, RawOrderQuery, RawVendorQuery, VendorQuery,
    filter,
};
pub use store::{Collection, Entity, InMemoryStore, Patch, Table};
pub use vendor::{NewVendor, Vendor, VendorPatch, VendorStatus};
