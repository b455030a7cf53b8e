//! Dashboard read model: open orders, spend, active vendors and deliveries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::{PurchaseOrderId, VendorId};
use domain::events::{
    OrderDeletedData, OrderPlacedData, OrderRevisedData, OrderStatusChangedData,
    VendorStatusChangedData,
};
use domain::{Money, OrderStatus, PurchasingEvent, VendorStatus};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::projection::{Projection, ProjectionPosition};
use crate::{ProjectionError, Result};

/// Period-over-period changes shown next to each counter, in percent.
///
/// No history is kept, so these are always zero for now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendDeltas {
    pub open_orders: i32,
    pub total_spend: i32,
    pub active_vendors: i32,
    pub pending_deliveries: i32,
}

/// The dashboard counters at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub open_orders: usize,
    pub total_spend: Money,
    pub active_vendors: usize,
    /// Open orders due today or later.
    pub pending_deliveries: usize,
    /// Open orders whose delivery date has passed.
    pub overdue_deliveries: usize,
    pub trends: TrendDeltas,
}

#[derive(Debug, Default)]
struct DashboardState {
    /// Open orders and their requested delivery dates.
    open_orders: HashMap<PurchaseOrderId, Option<NaiveDate>>,
    /// What each non-cancelled order contributes to total spend.
    spend: HashMap<PurchaseOrderId, Money>,
    active_vendors: HashSet<VendorId>,
}

impl DashboardState {
    fn apply(&mut self, event: &PurchasingEvent) -> Result<()> {
        match event {
            PurchasingEvent::VendorRegistered(data) => {
                self.set_vendor_active(data.vendor_id, data.status);
            }
            PurchasingEvent::VendorStatusChanged(VendorStatusChangedData { vendor_id, to, .. }) => {
                self.set_vendor_active(*vendor_id, *to);
            }
            PurchasingEvent::VendorRemoved(data) => {
                self.active_vendors.remove(&data.vendor_id);
            }
            PurchasingEvent::OrderPlaced(OrderPlacedData {
                order_id,
                status,
                total,
                delivery_date,
                ..
            }) => {
                if *status == OrderStatus::Open {
                    self.open_orders.insert(order_id.clone(), *delivery_date);
                }
                if *status != OrderStatus::Cancelled {
                    self.spend.insert(order_id.clone(), *total);
                }
            }
            PurchasingEvent::OrderStatusChanged(OrderStatusChangedData { order_id, from, to }) => {
                if *from == OrderStatus::Open
                    && *to != OrderStatus::Open
                    && self.open_orders.remove(order_id).is_none()
                {
                    return Err(ProjectionError::UntrackedOrder(order_id.clone()));
                }
                if *to == OrderStatus::Cancelled {
                    self.spend.remove(order_id);
                }
            }
            PurchasingEvent::OrderRevised(OrderRevisedData {
                order_id,
                total,
                delivery_date,
                ..
            }) => {
                if let Some(due) = self.open_orders.get_mut(order_id) {
                    *due = *delivery_date;
                }
                if let Some(contribution) = self.spend.get_mut(order_id) {
                    *contribution = *total;
                }
            }
            PurchasingEvent::OrderDeleted(OrderDeletedData { order_id, .. }) => {
                self.open_orders.remove(order_id);
                self.spend.remove(order_id);
            }
        }
        Ok(())
    }

    fn set_vendor_active(&mut self, vendor_id: VendorId, status: VendorStatus) {
        match status {
            VendorStatus::Active => self.active_vendors.insert(vendor_id),
            VendorStatus::Inactive => self.active_vendors.remove(&vendor_id),
        };
    }

    fn snapshot(&self, today: NaiveDate) -> DashboardSnapshot {
        let (pending, overdue) = self
            .open_orders
            .values()
            .flatten()
            .fold((0, 0), |(pending, overdue), due| {
                if *due < today {
                    (pending, overdue + 1)
                } else {
                    (pending + 1, overdue)
                }
            });

        DashboardSnapshot {
            open_orders: self.open_orders.len(),
            total_spend: self
                .spend
                .values()
                .fold(Money::zero(), |acc, spend| acc.saturating_add(*spend)),
            active_vendors: self.active_vendors.len(),
            pending_deliveries: pending,
            overdue_deliveries: overdue,
            trends: TrendDeltas::default(),
        }
    }
}

/// Aggregate tracker behind the dashboard.
///
/// Counters are derived from per-order and per-vendor entries rather than
/// running totals, so replaying an event for an order already seen cannot
/// count it twice.
///
/// Spend rules: an order contributes its total while it is open or closed.
/// Cancelling or deleting it withdraws the contribution, and a revision
/// replaces it with the new total.
#[derive(Clone, Default)]
pub struct DashboardView {
    state: Arc<RwLock<DashboardState>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl DashboardView {
    /// Creates a new empty dashboard view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counters with deliveries judged against `today`.
    pub async fn snapshot_as_of(&self, today: NaiveDate) -> DashboardSnapshot {
        self.state.read().await.snapshot(today)
    }

    /// Returns the counters with deliveries judged against the current UTC date.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot_as_of(Utc::now().date_naive()).await
    }
}

#[async_trait]
impl Projection for DashboardView {
    fn name(&self) -> &'static str {
        "DashboardView"
    }

    async fn handle(&self, event: &PurchasingEvent) -> Result<()> {
        self.state.write().await.apply(event)?;

        let mut pos = self.position.write().await;
        *pos = pos.advance(event);

        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        *self.state.write().await = DashboardState::default();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}
