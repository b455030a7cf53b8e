use chrono::NaiveDate;
use common::VendorId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    CreatePurchaseOrder, FixedClock, InMemoryStore, LineItem, Money, NewVendor, NoopPublisher,
    OrderComposer, OrderQuery, OrderStatus, PurchaseOrder, filter,
};

fn populated_orders(count: u64) -> Vec<PurchaseOrder> {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let store = InMemoryStore::new();
        for id in 1..=5 {
            store
                .vendors
                .insert(
                    NewVendor::named(format!("Vendor {id}"))
                        .into_vendor(VendorId::new(id))
                        .unwrap(),
                )
                .await
                .unwrap();
        }
        let composer = OrderComposer::new(store.clone(), NoopPublisher)
            .with_clock(FixedClock(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()));

        for n in 0..count {
            let day = (n % 28) as u32 + 1;
            let cmd = CreatePurchaseOrder::new(
                VendorId::new(n % 5 + 1),
                vec![LineItem::new("item1", 1 + (n % 10) as u32, Money::from_cents(1099))],
            )
            .order_date(NaiveDate::from_ymd_opt(2023, 6, day).unwrap());
            composer.create_order(cmd).await.unwrap();
        }

        store.orders.list().await
    })
}

fn bench_filter_no_criteria(c: &mut Criterion) {
    let orders = populated_orders(1_000);
    let query = OrderQuery::new();

    c.bench_function("query/filter_1000_orders_identity", |b| {
        b.iter(|| filter(&orders, &query));
    });
}

fn bench_filter_all_criteria(c: &mut Criterion) {
    let orders = populated_orders(1_000);
    let query = OrderQuery::new()
        .status(OrderStatus::Open)
        .vendor(VendorId::new(2))
        .date_from(NaiveDate::from_ymd_opt(2023, 6, 5).unwrap())
        .date_to(NaiveDate::from_ymd_opt(2023, 6, 20).unwrap())
        .search("po-2023");

    c.bench_function("query/filter_1000_orders_all_criteria", |b| {
        b.iter(|| filter(&orders, &query));
    });
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryStore::new();
    rt.block_on(async {
        store
            .vendors
            .insert(NewVendor::named("Bench").into_vendor(VendorId::new(1)).unwrap())
            .await
            .unwrap();
    });
    let composer = OrderComposer::new(store, NoopPublisher);

    c.bench_function("composer/create_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let cmd = CreatePurchaseOrder::new(
                    VendorId::new(1),
                    vec![LineItem::new("item1", 3, Money::from_cents(1099))],
                );
                composer.create_order(cmd).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_filter_no_criteria,
    bench_filter_all_criteria,
    bench_create_order
);
criterion_main!(benches);
