//! Domain error types.

use common::VendorId;
use thiserror::Error;

use crate::purchase_order::OrderStatus;

/// Errors that can occur during purchasing operations.
///
/// Every variant is a local validation outcome; none of them is transient,
/// so callers should not retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The requested entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A purchase order referenced a vendor that does not exist.
    #[error("Invalid vendor: {0}")]
    InvalidVendor(VendorId),

    /// A purchase order had no line items or a zero quantity.
    #[error("Purchase order must have at least one item with a positive quantity")]
    EmptyOrder,

    /// Malformed input such as an unparseable date or an unknown enum value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested status change is not allowed.
    #[error("Invalid status transition: cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// An entity with the same identifier is already stored.
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },
}

impl DomainError {
    /// Builds a `NotFound` error for the given entity kind.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Builds an `InvalidArgument` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument(message.into())
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
