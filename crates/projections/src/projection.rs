//! The projection trait and how far a projection has read.

use async_trait::async_trait;
use domain::PurchasingEvent;

use crate::Result;

/// How many purchasing events a projection has applied, and the last kind seen.
///
/// Only successfully applied events move the position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionPosition {
    pub events_processed: u64,
    pub last_event_type: Option<&'static str>,
}

impl ProjectionPosition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns the position after `event` has been applied.
    pub fn advance(self, event: &PurchasingEvent) -> Self {
        Self {
            events_processed: self.events_processed + 1,
            last_event_type: Some(event.event_type()),
        }
    }
}

impl std::fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last_event_type {
            Some(kind) => write!(f, "{} events, last {kind}", self.events_processed),
            None => write!(f, "{} events", self.events_processed),
        }
    }
}

/// A read model fed by purchasing events.
///
/// Handlers run while the publishing collection is still locked, so they
/// must not call back into the entity store.
#[async_trait]
pub trait Projection: Send + Sync {
    fn name(&self) -> &'static str;

    /// Applies one event. On error the read model must be left unchanged.
    async fn handle(&self, event: &PurchasingEvent) -> Result<()>;

    async fn position(&self) -> ProjectionPosition;

    /// Drops all state so the projection can be rebuilt from the store.
    async fn reset(&self) -> Result<()>;
}
