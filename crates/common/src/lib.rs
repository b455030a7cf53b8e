//! Identifier types shared by the domain, projection and API layers.

mod types;

pub use types::{ItemId, PurchaseOrderId, VendorId};
