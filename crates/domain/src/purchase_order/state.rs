//! Purchase order status machine.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The status of a purchase order.
///
/// State transitions:
/// ```text
/// Open ──┬──► Closed     (terminal)
///        └──► Cancelled  (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed with the vendor, goods not yet received.
    #[default]
    Open,

    /// Fulfilled and closed out (terminal state).
    Closed,

    /// Withdrawn before fulfilment (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Closed | OrderStatus::Cancelled)
    }

    /// Returns true if moving to `next` is allowed.
    ///
    /// Staying in the current status is always allowed and is a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        *self == next || matches!(self, OrderStatus::Open)
    }

    /// Returns the status name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(OrderStatus::Open),
            "closed" => Ok(OrderStatus::Closed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::invalid(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}
