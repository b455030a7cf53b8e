//! Domain events emitted by purchasing mutations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{PurchaseOrderId, VendorId};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::purchase_order::{OrderStatus, PurchaseOrder};
use crate::vendor::{Vendor, VendorStatus};

/// Facts published after a store mutation has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PurchasingEvent {
    /// A vendor was added to the directory.
    VendorRegistered(VendorRegisteredData),

    /// A vendor moved between active and inactive.
    VendorStatusChanged(VendorStatusChangedData),

    /// A vendor was deleted.
    VendorRemoved(VendorRemovedData),

    /// A purchase order entered the store.
    OrderPlaced(OrderPlacedData),

    /// A purchase order changed status.
    OrderStatusChanged(OrderStatusChangedData),

    /// Shipping or dates changed, possibly moving the total.
    OrderRevised(OrderRevisedData),

    /// A purchase order was deleted.
    OrderDeleted(OrderDeletedData),
}

impl PurchasingEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            PurchasingEvent::VendorRegistered(_) => "VendorRegistered",
            PurchasingEvent::VendorStatusChanged(_) => "VendorStatusChanged",
            PurchasingEvent::VendorRemoved(_) => "VendorRemoved",
            PurchasingEvent::OrderPlaced(_) => "OrderPlaced",
            PurchasingEvent::OrderStatusChanged(_) => "OrderStatusChanged",
            PurchasingEvent::OrderRevised(_) => "OrderRevised",
            PurchasingEvent::OrderDeleted(_) => "OrderDeleted",
        }
    }

    pub fn vendor_registered(vendor: &Vendor) -> Self {
        PurchasingEvent::VendorRegistered(VendorRegisteredData {
            vendor_id: vendor.id,
            status: vendor.status,
        })
    }

    pub fn vendor_status_changed(
        vendor_id: VendorId,
        from: VendorStatus,
        to: VendorStatus,
    ) -> Self {
        PurchasingEvent::VendorStatusChanged(VendorStatusChangedData {
            vendor_id,
            from,
            to,
        })
    }

    pub fn vendor_removed(vendor: &Vendor) -> Self {
        PurchasingEvent::VendorRemoved(VendorRemovedData {
            vendor_id: vendor.id,
            status: vendor.status,
        })
    }

    /// Describes an order as it currently stands.
    ///
    /// Used both for new orders and when replaying stored orders into a
    /// freshly reset projection, which is why it carries the status.
    pub fn order_placed(order: &PurchaseOrder) -> Self {
        PurchasingEvent::OrderPlaced(OrderPlacedData {
            order_id: order.id().clone(),
            vendor_id: order.vendor_id(),
            status: order.status(),
            total: order.total(),
            delivery_date: order.delivery_date(),
        })
    }

    /// Derives the events describing the difference between two versions of an order.
    pub fn order_changes(before: &PurchaseOrder, after: &PurchaseOrder) -> Vec<Self> {
        let mut events = Vec::new();
        if before.total() != after.total() || before.delivery_date() != after.delivery_date() {
            events.push(PurchasingEvent::OrderRevised(OrderRevisedData {
                order_id: after.id().clone(),
                previous_total: before.total(),
                total: after.total(),
                delivery_date: after.delivery_date(),
            }));
        }
        if before.status() != after.status() {
            events.push(PurchasingEvent::OrderStatusChanged(OrderStatusChangedData {
                order_id: after.id().clone(),
                from: before.status(),
                to: after.status(),
            }));
        }
        events
    }

    pub fn order_deleted(order: &PurchaseOrder) -> Self {
        PurchasingEvent::OrderDeleted(OrderDeletedData {
            order_id: order.id().clone(),
            status: order.status(),
            total: order.total(),
        })
    }
}

/// Data for VendorRegistered event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRegisteredData {
    pub vendor_id: VendorId,
    pub status: VendorStatus,
}

/// Data for VendorStatusChanged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorStatusChangedData {
    pub vendor_id: VendorId,
    pub from: VendorStatus,
    pub to: VendorStatus,
}

/// Data for VendorRemoved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRemovedData {
    pub vendor_id: VendorId,
    /// Status at the time of removal.
    pub status: VendorStatus,
}

/// Data for OrderPlaced event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedData {
    pub order_id: PurchaseOrderId,
    pub vendor_id: VendorId,
    pub status: OrderStatus,
    pub total: Money,
    pub delivery_date: Option<NaiveDate>,
}

/// Data for OrderStatusChanged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedData {
    pub order_id: PurchaseOrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Data for OrderRevised event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRevisedData {
    pub order_id: PurchaseOrderId,
    pub previous_total: Money,
    pub total: Money,
    pub delivery_date: Option<NaiveDate>,
}

/// Data for OrderDeleted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeletedData {
    pub order_id: PurchaseOrderId,
    /// Status at the time of deletion.
    pub status: OrderStatus,
    pub total: Money,
}

/// Receives events after each successful mutation.
///
/// Publication happens while the mutated collection is still locked, so
/// subscribers observe events in the same order the store applied them.
/// Delivery problems are the publisher's to handle; a mutation that has been
/// applied is never rolled back because a subscriber failed.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &PurchasingEvent);
}

#[async_trait]
impl<T: EventPublisher + ?Sized> EventPublisher for Arc<T> {
    async fn publish(&self, event: &PurchasingEvent) {
        (**self).publish(event).await;
    }
}

/// Publisher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: &PurchasingEvent) {}
}

/// Publisher that records events in memory, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    events: Arc<tokio::sync::Mutex<Vec<PurchasingEvent>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event published so far.
    pub async fn events(&self) -> Vec<PurchasingEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &PurchasingEvent) {
        self.events.lock().await.push(event.clone());
    }
}
