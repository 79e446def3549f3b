use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use minimem::memory::{Role, SessionStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Appends to a session that is already at capacity, so every call also trims
fn bench_add_message(c: &mut Criterion) {
    let rt = runtime();
    let store = SessionStore::new(50, Duration::from_secs(1800)).unwrap();
    rt.block_on(async {
        for i in 0..50 {
            store.add_message("bench", Role::User, format!("warmup {}", i)).await;
        }
    });

    c.bench_function("add_message_at_capacity", |b| {
        b.to_async(&rt).iter(|| async {
            store
                .add_message(black_box("bench"), Role::Assistant, "benchmark reply")
                .await;
        });
    });
}

fn bench_get_history(c: &mut Criterion) {
    let rt = runtime();
    let store = SessionStore::new(50, Duration::from_secs(1800)).unwrap();
    rt.block_on(async {
        for i in 0..50 {
            store.add_message("bench", Role::User, format!("message {}", i)).await;
        }
    });

    let mut group = c.benchmark_group("get_history");
    for limit in [Some(5), Some(20), None] {
        let label = limit.map_or("all".to_string(), |n: usize| n.to_string());
        group.bench_with_input(BenchmarkId::from_parameter(label), &limit, |b, &limit| {
            b.to_async(&rt).iter(|| async {
                black_box(store.get_history("bench", limit).await);
            });
        });
    }
    group.finish();
}

fn bench_cleanup_expired(c: &mut Criterion) {
    let rt = runtime();
    let store = SessionStore::new(10, Duration::from_secs(1800)).unwrap();
    rt.block_on(async {
        for i in 0..1000 {
            store
                .add_message(&format!("session-{}", i), Role::User, "hello")
                .await;
        }
    });

    // Nothing expires, so this measures the full scan over 1000 sessions
    c.bench_function("cleanup_expired_1000_live_sessions", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(store.cleanup_expired().await);
        });
    });
}

criterion_group!(
    benches,
    bench_add_message,
    bench_get_history,
    bench_cleanup_expired
);
criterion_main!(benches);
