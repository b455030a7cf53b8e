//! Projections for the purchasing dashboard.
//!
//! This crate provides the read side fed by domain events:
//! - [`Projection`] trait for processing events into read models
//! - [`ProjectionProcessor`], the [`domain::EventPublisher`] that fans events
//!   out to projections and can rebuild them from the entity store
//! - [`DashboardView`], the aggregate tracker behind the dashboard counters

pub mod error;
pub mod processor;
pub mod projection;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition};
pub use views::{DashboardSnapshot, DashboardView, TrendDeltas};
