//! Integration tests: domain services → ProjectionProcessor → DashboardView.

use std::sync::Arc;

use chrono::NaiveDate;
use common::{PurchaseOrderId, VendorId};
use domain::seed::load_demo_data;
use domain::{
    CreatePurchaseOrder, FixedClock, InMemoryStore, LineItem, Money, NewVendor, OrderComposer,
    OrderStatus, PurchaseOrderPatch, TaxPolicy, VendorDirectory, VendorPatch, VendorStatus,
};
use projections::{DashboardView, ProjectionProcessor};

struct Setup {
    store: InMemoryStore,
    vendors: VendorDirectory<Arc<ProjectionProcessor>>,
    orders: OrderComposer<Arc<ProjectionProcessor>>,
    processor: Arc<ProjectionProcessor>,
    dashboard: DashboardView,
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, d).unwrap()
}

/// Helper to wire the services, processor and dashboard over one store.
fn setup() -> Setup {
    let store = InMemoryStore::new();
    let dashboard = DashboardView::new();

    let mut processor = ProjectionProcessor::new();
    processor.register(Box::new(dashboard.clone()));
    let processor = Arc::new(processor);

    Setup {
        vendors: VendorDirectory::new(store.clone(), Arc::clone(&processor)),
        orders: OrderComposer::new(store.clone(), Arc::clone(&processor))
            .with_clock(FixedClock(date(15))),
        store,
        processor,
        dashboard,
    }
}

async fn seeded() -> Setup {
    let setup = setup();
    load_demo_data(&setup.store, TaxPolicy::standard())
        .await
        .unwrap();
    setup.processor.rebuild_all(&setup.store).await.unwrap();
    setup
}

#[tokio::test]
async fn test_rebuild_from_seed_data() {
    let s = seeded().await;

    let snapshot = s.dashboard.snapshot_as_of(date(15)).await;
    assert_eq!(snapshot.open_orders, 1);
    assert_eq!(snapshot.active_vendors, 2);
    // PO-2023-001 (1250.00) + PO-2023-002 closed; the cancelled order is excluded.
    let closed = s
        .store
        .orders
        .get(&PurchaseOrderId::new("PO-2023-002"))
        .await
        .unwrap();
    assert_eq!(snapshot.total_spend.cents(), 125000 + closed.total().cents());
    assert_eq!(snapshot.pending_deliveries, 1);
    assert_eq!(snapshot.overdue_deliveries, 0);

    let later = s
        .dashboard
        .snapshot_as_of(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
        .await;
    assert_eq!(later.pending_deliveries, 0);
    assert_eq!(later.overdue_deliveries, 1);
}

#[tokio::test]
async fn test_order_lifecycle_updates_dashboard() {
    let s = setup();
    let vendor = s
        .vendors
        .create_vendor(NewVendor::named("ABC Supplies"))
        .await
        .unwrap();

    let order = s
        .orders
        .create_order(
            CreatePurchaseOrder::new(
                vendor.id,
                vec![LineItem::new("item1", 10, Money::from_cents(1000))],
            )
            .delivery_date(date(20)),
        )
        .await
        .unwrap();

    let snapshot = s.dashboard.snapshot_as_of(date(15)).await;
    assert_eq!(snapshot.open_orders, 1);
    assert_eq!(snapshot.total_spend, order.total());
    assert_eq!(snapshot.active_vendors, 1);
    assert_eq!(snapshot.pending_deliveries, 1);

    let updated = s
        .orders
        .update_order(order.id(), PurchaseOrderPatch::shipping(Money::from_cents(500)))
        .await
        .unwrap();
    assert_eq!(
        s.dashboard.snapshot_as_of(date(15)).await.total_spend,
        updated.total()
    );

    s.orders
        .update_order(order.id(), PurchaseOrderPatch::status(OrderStatus::Closed))
        .await
        .unwrap();
    let snapshot = s.dashboard.snapshot_as_of(date(15)).await;
    assert_eq!(snapshot.open_orders, 0);
    assert_eq!(snapshot.total_spend, updated.total());
    assert_eq!(snapshot.pending_deliveries, 0);

    s.orders.delete_order(order.id()).await.unwrap();
    assert_eq!(
        s.dashboard.snapshot_as_of(date(15)).await.total_spend,
        Money::zero()
    );
}

#[tokio::test]
async fn test_deleting_orders_only_moves_open_count_for_open_orders() {
    let s = seeded().await;
    s.orders
        .create_order(CreatePurchaseOrder::new(
            VendorId::new(2),
            vec![LineItem::new("item2", 1, Money::from_cents(2499))],
        ))
        .await
        .unwrap();
    assert_eq!(s.dashboard.snapshot_as_of(date(15)).await.open_orders, 2);

    for terminal in ["PO-2023-002", "PO-2023-003"] {
        s.orders
            .delete_order(&PurchaseOrderId::new(terminal))
            .await
            .unwrap();
        assert_eq!(
            s.dashboard.snapshot_as_of(date(15)).await.open_orders,
            2,
            "deleting {terminal} must not change the open count"
        );
    }

    s.orders
        .delete_order(&PurchaseOrderId::new("PO-2023-001"))
        .await
        .unwrap();
    let snapshot = s.dashboard.snapshot_as_of(date(15)).await;
    assert_eq!(snapshot.open_orders, 1);

    s.processor.rebuild_all(&s.store).await.unwrap();
    assert_eq!(s.dashboard.snapshot_as_of(date(15)).await, snapshot);
}

#[tokio::test]
async fn test_clearing_delivery_date_leaves_delivery_counts() {
    let s = seeded().await;
    let patch = PurchaseOrderPatch {
        delivery_date: Some(None),
        ..Default::default()
    };

    s.orders
        .update_order(&PurchaseOrderId::new("PO-2023-001"), patch)
        .await
        .unwrap();

    let snapshot = s.dashboard.snapshot_as_of(date(15)).await;
    assert_eq!(snapshot.open_orders, 1);
    assert_eq!(snapshot.pending_deliveries, 0);
    assert_eq!(snapshot.overdue_deliveries, 0);
}

#[tokio::test]
async fn test_cancellation_withdraws_spend() {
    let s = seeded().await;
    let before = s.dashboard.snapshot_as_of(date(15)).await;

    s.orders
        .update_order(
            &PurchaseOrderId::new("PO-2023-001"),
            PurchaseOrderPatch::status(OrderStatus::Cancelled),
        )
        .await
        .unwrap();

    let after = s.dashboard.snapshot_as_of(date(15)).await;
    assert_eq!(after.open_orders, before.open_orders - 1);
    assert_eq!(after.total_spend.cents(), before.total_spend.cents() - 125000);
}

#[tokio::test]
async fn test_rejected_mutations_leave_dashboard_unchanged() {
    let s = seeded().await;
    let before = s.dashboard.snapshot_as_of(date(15)).await;

    assert!(
        s.orders
            .create_order(CreatePurchaseOrder::new(VendorId::new(99), vec![]))
            .await
            .is_err()
    );
    assert!(
        s.orders
            .update_order(
                &PurchaseOrderId::new("PO-2023-003"),
                PurchaseOrderPatch::status(OrderStatus::Open),
            )
            .await
            .is_err()
    );

    assert_eq!(s.dashboard.snapshot_as_of(date(15)).await, before);
}

#[tokio::test]
async fn test_vendor_changes_update_active_count() {
    let s = seeded().await;

    s.vendors
        .update_vendor(VendorId::new(3), VendorPatch::status(VendorStatus::Active))
        .await
        .unwrap();
    assert_eq!(s.dashboard.snapshot_as_of(date(15)).await.active_vendors, 3);

    s.vendors.delete_vendor(VendorId::new(1)).await.unwrap();
    assert_eq!(s.dashboard.snapshot_as_of(date(15)).await.active_vendors, 2);
}

#[tokio::test]
async fn test_incremental_matches_rebuild() {
    let s = seeded().await;
    let vendor = s
        .vendors
        .create_vendor(NewVendor::named("New Vendor"))
        .await
        .unwrap();
    for quantity in 1..=3 {
        s.orders
            .create_order(
                CreatePurchaseOrder::new(
                    vendor.id,
                    vec![LineItem::new("item2", quantity, Money::from_cents(2499))],
                )
                .delivery_date(date(10)),
            )
            .await
            .unwrap();
    }
    s.orders
        .update_order(
            &PurchaseOrderId::new("PO-2023-004"),
            PurchaseOrderPatch::status(OrderStatus::Cancelled),
        )
        .await
        .unwrap();
    s.orders
        .delete_order(&PurchaseOrderId::new("PO-2023-005"))
        .await
        .unwrap();

    let incremental = s.dashboard.snapshot_as_of(date(15)).await;
    s.processor.rebuild_all(&s.store).await.unwrap();
    let rebuilt = s.dashboard.snapshot_as_of(date(15)).await;

    assert_eq!(incremental, rebuilt);
    assert_eq!(rebuilt.open_orders, 2);
    assert_eq!(rebuilt.overdue_deliveries, 1);
}
