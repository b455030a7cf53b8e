//! Purchase orders and related types.

mod commands;
mod expanded;
mod order;
mod state;
mod value_objects;

pub use commands::CreatePurchaseOrder;
pub use expanded::{
    DEFAULT_UNIT, ExpandedLine, ExpandedOrder, OrderSummary, UNKNOWN_ITEM, UNKNOWN_VENDOR,
};
pub use order::{PurchaseOrder, PurchaseOrderPatch};
pub use state::OrderStatus;
pub use value_objects::{CurrencyCode, LineItem, PaymentTerms, ShippingMethod};
