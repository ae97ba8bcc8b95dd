use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use supplyfeed::notifications::{FeedFilter, NotificationStore, ReadFilter};

fn bench_add_with_subscribers(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_notification");

    for subscribers in [0usize, 1, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(subscribers), &subscribers, |b, &subscribers| {
            let store = NotificationStore::default();
            let delivered = Arc::new(AtomicUsize::new(0));
            let _subscriptions: Vec<_> = (0..subscribers)
                .map(|i| {
                    let counter = Arc::clone(&delivered);
                    store.subscribe_fn(format!("panel-{}", i), move |feed| {
                        counter.fetch_add(feed.len(), Ordering::Relaxed);
                        Ok(())
                    })
                })
                .collect();

            b.iter(|| {
                store.simulate_inventory_alert(black_box("Paracetamol"), black_box(7)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_mark_and_count(c: &mut Criterion) {
    let store = NotificationStore::default();
    for stock in 0..50 {
        store.simulate_inventory_alert("Saline", stock).unwrap();
    }
    let ids: Vec<_> = store.notifications().iter().map(|r| r.id).collect();

    c.bench_function("mark_as_read_full_feed", |b| {
        let mut index = 0;
        b.iter(|| {
            store.mark_as_read(black_box(&ids[index % ids.len()]));
            index += 1;
        });
    });

    c.bench_function("summary_full_feed", |b| {
        b.iter(|| black_box(store.summary()));
    });

    let filter = FeedFilter::new(ReadFilter::HighPriority);
    c.bench_function("filter_full_feed", |b| {
        b.iter(|| {
            let feed = store.notifications();
            black_box(filter.apply(&feed).len())
        });
    });
}

criterion_group!(benches, bench_add_with_subscribers, bench_mark_and_count);
criterion_main!(benches);
