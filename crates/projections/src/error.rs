//! Projection error types.

use common::PurchaseOrderId;
use thiserror::Error;

/// Errors that can occur during projection processing.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An event referenced an open order the projection has never seen.
    #[error("Order {0} is not tracked as open")]
    UntrackedOrder(PurchaseOrderId),

    /// A projection-specific error.
    #[error("Projection error: {0}")]
    Projection(String),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
