//! HTTP route handlers.

pub mod dashboard;
pub mod health;
pub mod items;
pub mod metrics;
pub mod purchase_orders;
pub mod vendors;
