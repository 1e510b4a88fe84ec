use std::sync::Arc;

use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use models::price::{NewPriceItem, PriceItem};
use uuid::Uuid;

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repo::KvAccountRepository;
use service::auth::{AuthConfig, AuthService};
use service::clock::SystemClock;
use service::quote::{calculate, QuoteRequest};
use service::storage::{KvStore, MemoryKvStore, Namespace};

fn bench_quote(c: &mut Criterion) {
    let category = Uuid::new_v4();
    let items: Vec<PriceItem> = (0..200)
        .map(|i| {
            let input = NewPriceItem { name: format!("item {i}"), base_price_cents: 1_000 + i, ..Default::default() };
            PriceItem::create(category, input, Utc::now()).unwrap()
        })
        .collect();
    let request = QuoteRequest { item_ids: items.iter().step_by(7).map(|i| i.id).collect(), adjustment_cents: -500 };

    c.bench_function("quote_calculate_200_items", |b| {
        b.iter(|| calculate(&items, &request).unwrap());
    });
}

fn bench_login(c: &mut Criterion) {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let repo = Arc::new(KvAccountRepository::new(store.clone(), Namespace::default()));
    let cfg = AuthConfig { jwt_secret: Some("secret".into()), ..Default::default() };
    let svc = AuthService::new(repo, store, Namespace::default(), cfg, Arc::new(SystemClock));

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register(RegisterInput { email: "bench@example.com".into(), name: "Bench".into(), password: "Benchmark1".into() }))
        .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.to_async(&rt).iter(|| async {
            svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() }).await.unwrap();
        });
    });
}

criterion_group!(benches, bench_quote, bench_login);
criterion_main!(benches);
