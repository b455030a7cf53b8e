//! Read model views.

pub mod dashboard;

pub use dashboard::{DashboardSnapshot, DashboardView, TrendDeltas};
