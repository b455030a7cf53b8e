//! Order composer: validates, numbers, prices and expands purchase orders.

use std::sync::Arc;

use chrono::Datelike;
use common::PurchaseOrderId;

use crate::clock::{Clock, SystemClock};
use crate::error::{DomainError, Result};
use crate::events::{EventPublisher, PurchasingEvent};
use crate::money::TaxPolicy;
use crate::purchase_order::{
    CreatePurchaseOrder, ExpandedOrder, OrderSummary, PurchaseOrder, PurchaseOrderPatch,
};
use crate::query::{OrderQuery, filter};
use crate::store::InMemoryStore;

/// Service owning every purchase order mutation.
///
/// All creates, updates and deletes go through here so the events seen by
/// the dashboard always agree with the store.
pub struct OrderComposer<P: EventPublisher> {
    store: InMemoryStore,
    publisher: P,
    tax_policy: TaxPolicy,
    clock: Arc<dyn Clock>,
}

impl<P: EventPublisher> OrderComposer<P> {
    /// Creates a composer with the standard 10% tax policy and the system clock.
    pub fn new(store: InMemoryStore, publisher: P) -> Self {
        Self {
            store,
            publisher,
            tax_policy: TaxPolicy::standard(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_tax_policy(mut self, tax_policy: TaxPolicy) -> Self {
        self.tax_policy = tax_policy;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn tax_policy(&self) -> TaxPolicy {
        self.tax_policy
    }

    /// Places a new purchase order.
    ///
    /// Checks run in order and the first failure wins: the vendor must
    /// exist (`InvalidVendor`), then the lines must be non-empty with
    /// positive quantities (`EmptyOrder`). Nothing is stored on failure.
    ///
    /// The vendors read lock is held until the order is stored, so the vendor
    /// cannot be deleted between the check and the insert. Locks are taken
    /// vendors first, then orders.
    #[tracing::instrument(
        skip(self, cmd),
        fields(vendor_id = %cmd.vendor_id, lines = cmd.lines.len())
    )]
    pub async fn create_order(&self, cmd: CreatePurchaseOrder) -> Result<PurchaseOrder> {
        let vendors = self.store.vendors.read().await;
        if vendors.find(&cmd.vendor_id).is_none() {
            return Err(DomainError::InvalidVendor(cmd.vendor_id));
        }

        let today = self.clock.today();
        let mut orders = self.store.orders.write().await;

        // The number is only claimed by the insert, so a rejected order leaves no gap.
        let id = PurchaseOrderId::generate(today.year(), orders.issued() + 1);
        let order = PurchaseOrder::place(id, cmd, today, self.tax_policy)?;
        orders.insert(order.clone())?;
        self.publisher
            .publish(&PurchasingEvent::order_placed(&order))
            .await;

        metrics::counter!("purchase_orders_created").increment(1);
        tracing::debug!(order_id = %order.id(), total = %order.total(), "purchase order created");

        Ok(order)
    }

    /// Loads an order by number.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: &PurchaseOrderId) -> Result<PurchaseOrder> {
        self.store.orders.get(id).await
    }

    /// Loads an order with its vendor and line items resolved.
    ///
    /// Fails only if the order itself is missing; dangling vendor or item
    /// references become placeholders.
    #[tracing::instrument(skip(self))]
    pub async fn get_expanded(&self, id: &PurchaseOrderId) -> Result<ExpandedOrder> {
        let order = self.store.orders.get(id).await?;
        let vendor = self.store.vendors.get(&order.vendor_id()).await.ok();
        let items = self.store.items.list().await;

        Ok(ExpandedOrder::assemble(order, vendor, &items))
    }

    /// Lists orders matching the query, each with its vendor display name.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self, query: &OrderQuery) -> Vec<OrderSummary> {
        let orders = {
            let table = self.store.orders.read().await;
            filter(table.rows(), query)
        };
        let vendors = self.store.vendors.read().await;

        orders
            .into_iter()
            .map(|order| {
                let vendor = vendors.find(&order.vendor_id());
                OrderSummary::new(order, vendor)
            })
            .collect()
    }

    /// Applies a patch to an order.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_order(
        &self,
        id: &PurchaseOrderId,
        patch: PurchaseOrderPatch,
    ) -> Result<PurchaseOrder> {
        let mut orders = self.store.orders.write().await;
        let (before, after) = orders.update(id, patch)?;

        for event in PurchasingEvent::order_changes(&before, &after) {
            self.publisher.publish(&event).await;
        }

        Ok(after)
    }

    /// Deletes an order and returns it as it was.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, id: &PurchaseOrderId) -> Result<PurchaseOrder> {
        let mut orders = self.store.orders.write().await;
        let removed = orders.remove(id)?;

        self.publisher
            .publish(&PurchasingEvent::order_deleted(&removed))
            .await;
        metrics::counter!("purchase_orders_deleted").increment(1);

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::clock::FixedClock;
    use crate::directory::VendorDirectory;
    use crate::events::{NoopPublisher, RecordingPublisher};
    use crate::money::Money;
    use crate::purchase_order::{LineItem, OrderStatus};
    use crate::vendor::NewVendor;
    use chrono::NaiveDate;
    use common::VendorId;

    async fn setup() -> (OrderComposer<RecordingPublisher>, RecordingPublisher, InMemoryStore) {
        let store = InMemoryStore::new();
        store
            .vendors
            .insert(NewVendor::named("ABC Supplies").into_vendor(VendorId::new(1)).unwrap())
            .await
            .unwrap();
        let publisher = RecordingPublisher::new();
        let composer = OrderComposer::new(store.clone(), publisher.clone())
            .with_clock(FixedClock(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()));
        (composer, publisher, store)
    }

    fn one_line() -> Vec<LineItem> {
        vec![LineItem::new("item1", 2, Money::from_cents(1099))]
    }

    #[tokio::test]
    async fn test_create_order_numbers_and_publishes() {
        let (composer, publisher, _) = setup().await;

        let order = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(1), one_line()))
            .await
            .unwrap();

        assert_eq!(order.id().as_str(), "PO-2023-001");
        assert_eq!(order.status(), OrderStatus::Open);
        assert_eq!(publisher.events().await, vec![PurchasingEvent::order_placed(&order)]);
    }

    #[tokio::test]
    async fn test_rejected_order_does_not_consume_number() {
        let (composer, publisher, store) = setup().await;

        let err = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(1), vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::EmptyOrder);
        assert!(store.orders.is_empty().await);
        assert!(publisher.events().await.is_empty());

        let order = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(1), one_line()))
            .await
            .unwrap();
        assert_eq!(order.id().as_str(), "PO-2023-001");
    }

    #[tokio::test]
    async fn test_vendor_checked_before_lines() {
        let (composer, _, _) = setup().await;

        let err = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(99), vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidVendor(VendorId::new(99)));
    }

    #[tokio::test]
    async fn test_overflowing_order_not_stored() {
        let (composer, publisher, store) = setup().await;

        let err = composer
            .create_order(CreatePurchaseOrder::new(
                VendorId::new(1),
                vec![LineItem::new("item1", 4, Money::from_cents(i64::MAX / 2))],
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert!(store.orders.is_empty().await);
        assert!(publisher.events().await.is_empty());

        let order = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(1), one_line()))
            .await
            .unwrap();
        assert_eq!(order.id().as_str(), "PO-2023-001");
    }

    #[tokio::test]
    async fn test_overflowing_update_leaves_order_untouched() {
        let (composer, _, _) = setup().await;
        let order = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(1), one_line()))
            .await
            .unwrap();

        let err = composer
            .update_order(order.id(), PurchaseOrderPatch::shipping(Money::from_cents(i64::MAX)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(composer.get_order(order.id()).await.unwrap(), order);
    }

    #[tokio::test]
    async fn test_vendor_delete_waits_for_order_creation() {
        let (composer, _, store) = setup().await;
        let composer = Arc::new(composer);
        let directory = Arc::new(VendorDirectory::new(store.clone(), NoopPublisher));

        // Park the create after its vendor check by holding the orders lock.
        let orders_guard = store.orders.write().await;
        let create = tokio::spawn({
            let composer = Arc::clone(&composer);
            async move {
                composer
                    .create_order(CreatePurchaseOrder::new(VendorId::new(1), one_line()))
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let delete = tokio::spawn({
            let directory = Arc::clone(&directory);
            async move { directory.delete_vendor(VendorId::new(1)).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!delete.is_finished());
        assert!(!create.is_finished());

        drop(orders_guard);
        let order = create.await.unwrap().unwrap();
        delete.await.unwrap().unwrap();

        assert_eq!(order.vendor_id(), VendorId::new(1));
        assert!(!store.vendors.contains(&VendorId::new(1)).await);
    }

    #[tokio::test]
    async fn test_update_publishes_status_and_revision() {
        let (composer, publisher, _) = setup().await;
        let order = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(1), one_line()))
            .await
            .unwrap();

        let patch = PurchaseOrderPatch {
            status: Some(OrderStatus::Closed),
            shipping: Some(Money::from_cents(500)),
            ..Default::default()
        };
        let updated = composer.update_order(order.id(), patch).await.unwrap();
        assert_eq!(updated.total().cents(), order.total().cents() + 500);

        let types: Vec<&str> = publisher
            .events()
            .await
            .iter()
            .map(PurchasingEvent::event_type)
            .collect();
        assert_eq!(types, vec!["OrderPlaced", "OrderRevised", "OrderStatusChanged"]);
    }

    #[tokio::test]
    async fn test_noop_update_publishes_nothing() {
        let (composer, publisher, _) = setup().await;
        let order = composer
            .create_order(CreatePurchaseOrder::new(VendorId::new(1), one_line()))
            .await
            .unwrap();

        composer
            .update_order(order.id(), PurchaseOrderPatch::status(OrderStatus::Open))
            .await
            .unwrap();
        assert_eq!(publisher.events().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_order() {
        let (composer, _, _) = setup().await;
        let err = composer
            .delete_order(&PurchaseOrderId::new("PO-2023-404"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
