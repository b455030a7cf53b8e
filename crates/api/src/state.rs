//! Shared application state and start-up wiring.

use std::sync::Arc;

use domain::seed::{SeedSummary, load_demo_data};
use domain::{Catalog, Clock, InMemoryStore, OrderComposer, SystemClock, VendorDirectory};
use projections::{DashboardView, ProjectionProcessor};

use crate::auth::Sessions;
use crate::config::Config;
use crate::error::ApiError;

/// Publisher injected into the domain services.
pub type Publisher = Arc<ProjectionProcessor>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: Config,
    pub store: InMemoryStore,
    pub vendors: VendorDirectory<Publisher>,
    pub catalog: Catalog,
    pub orders: OrderComposer<Publisher>,
    pub dashboard: DashboardView,
    pub processor: Publisher,
    pub sessions: Sessions,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires an empty store to the services and the dashboard projection.
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let store = InMemoryStore::new();
        let dashboard = DashboardView::new();
        let sessions = Sessions::with_ttl(config.session_ttl());

        let mut processor = ProjectionProcessor::new();
        processor.register(Box::new(dashboard.clone()));
        let processor = Arc::new(processor);

        Self {
            vendors: VendorDirectory::new(store.clone(), Arc::clone(&processor)),
            catalog: Catalog::new(store.clone()),
            orders: OrderComposer::new(store.clone(), Arc::clone(&processor))
                .with_tax_policy(config.tax_policy())
                .with_clock(Arc::clone(&clock)),
            config,
            store,
            dashboard,
            processor,
            sessions,
            clock,
        }
    }

    /// Loads the demo data set and rebuilds the projections from it.
    #[tracing::instrument(skip(self))]
    pub async fn seed_demo_data(&self) -> Result<SeedSummary, ApiError> {
        let summary = load_demo_data(&self.store, self.config.tax_policy()).await?;
        self.processor.rebuild_all(&self.store).await?;
        Ok(summary)
    }
}

/// Creates the default application state using the system clock.
pub fn create_default_state(config: Config) -> Arc<AppState> {
    Arc::new(AppState::new(config, Arc::new(SystemClock)))
}
