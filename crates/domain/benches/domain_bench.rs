use criterion::{Criterion, criterion_group, criterion_main};
use domain::{InventoryItem, Transaction, TransactionSearch};

fn raw_transactions(n: usize) -> String {
    let rows: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "title": format!("Sale {i}"),
                "owner_id": (i % 5) + 1,
                "transaction_type": if i % 2 == 0 { "earning" } else { "expense" },
                "amount_per_unit": "15.50",
                "quantity": (i % 7) + 1,
                "total_amount": "15.50",
                "date": "2025-10-21",
                "inventory_id": (i % 3) + 1,
                "purchase_price": 9.25
            })
        })
        .collect();
    serde_json::to_string(&rows).unwrap()
}

fn bench_decode_transactions(c: &mut Criterion) {
    let raw = raw_transactions(500);

    c.bench_function("domain/decode_500_transactions", |b| {
        b.iter(|| {
            let decoded: Vec<Transaction> = serde_json::from_str(&raw).unwrap();
            assert_eq!(decoded.len(), 500);
        });
    });
}

fn bench_decode_inventory(c: &mut Criterion) {
    let rows: Vec<serde_json::Value> = (0..500)
        .map(|i| {
            serde_json::json!({
                "id": i, "name": format!("Item {i}"), "category_id": 1,
                "weight_id": 2, "quantity": format!("{}.5", i)
            })
        })
        .collect();
    let raw = serde_json::to_string(&rows).unwrap();

    c.bench_function("domain/decode_500_inventory_items", |b| {
        b.iter(|| {
            let decoded: Vec<InventoryItem> = serde_json::from_str(&raw).unwrap();
            assert_eq!(decoded.len(), 500);
        });
    });
}

fn bench_search_filter(c: &mut Criterion) {
    let decoded: Vec<Transaction> = serde_json::from_str(&raw_transactions(1000)).unwrap();
    let search = TransactionSearch::new().text("sale 9");

    c.bench_function("domain/search_1000_transactions", |b| {
        b.iter(|| decoded.iter().filter(|tx| search.matches(tx)).count());
    });
}

criterion_group!(
    benches,
    bench_decode_transactions,
    bench_decode_inventory,
    bench_search_filter
);
criterion_main!(benches);
