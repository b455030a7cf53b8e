//! Projection processor for feeding events to projections.

use async_trait::async_trait;
use domain::{EventPublisher, InMemoryStore, PurchasingEvent};

use crate::Result;
use crate::projection::Projection;

/// Delivers purchasing events to every registered projection.
///
/// The processor supports:
/// - Live delivery: as the [`EventPublisher`] injected into domain services
/// - Rebuild: resets all projections and replays the current store contents
///
/// Register projections before sharing the processor; afterwards it is
/// typically held in an `Arc`.
#[derive(Default)]
pub struct ProjectionProcessor {
    projections: Vec<Box<dyn Projection>>,
}

impl ProjectionProcessor {
    /// Creates a processor with no projections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a projection with this processor.
    pub fn register(&mut self, projection: Box<dyn Projection>) {
        self.projections.push(projection);
    }

    /// Returns the number of registered projections.
    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Delivers a single event to all registered projections.
    ///
    /// Every projection sees the event even if an earlier one fails; the
    /// first error is returned.
    #[tracing::instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn process_event(&self, event: &PurchasingEvent) -> Result<()> {
        let mut first_error = None;

        for projection in &self.projections {
            match projection.handle(event).await {
                Ok(()) => {
                    metrics::counter!("projections_events_processed").increment(1);
                }
                Err(err) => {
                    metrics::counter!("projection_errors").increment(1);
                    tracing::error!(
                        projection = projection.name(),
                        error = %err,
                        "projection failed"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resets all projections and replays the store's current contents.
    ///
    /// Vendors are replayed as registrations and orders as placements in
    /// their current status. Read locks on both collections are held for the
    /// whole rebuild, so no mutation can interleave with the replay.
    #[tracing::instrument(skip(self, store))]
    pub async fn rebuild_all(&self, store: &InMemoryStore) -> Result<()> {
        let vendors = store.vendors.read().await;
        let orders = store.orders.read().await;

        for projection in &self.projections {
            projection.reset().await?;
        }

        let replay = vendors
            .rows()
            .iter()
            .map(PurchasingEvent::vendor_registered)
            .chain(orders.rows().iter().map(PurchasingEvent::order_placed));

        let mut replayed: u64 = 0;
        for event in replay {
            self.process_event(&event).await?;
            replayed += 1;
        }

        tracing::info!(events_replayed = replayed, "rebuild complete");

        Ok(())
    }
}

#[async_trait]
impl EventPublisher for ProjectionProcessor {
    async fn publish(&self, event: &PurchasingEvent) {
        // Failures are already logged and counted per projection.
        let _ = self.process_event(event).await;
    }
}
