//! Integration tests: InMemoryRemote → status aggregator and chart views.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::{TransactionType, UserId};
use domain::{CategoryCreate, InventoryCreate, TransactionCreate, WeightCreate};
use projections::{
    InventoryChart, InventoryChartQuery, LedgerChart, LedgerQuery, ProjectionError,
    StatusAggregator,
};
use remote::{CategoryResource, InMemoryRemote, InventoryResource, TransactionResource, WeightResource};
use rust_decimal::Decimal;

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

async fn record(
    remote: &InMemoryRemote,
    title: &str,
    ty: TransactionType,
    date: &str,
    amount: &str,
    quantity: &str,
) {
    remote
        .create_transaction(
            TransactionCreate::new(title, UserId::new(1), at(date))
                .transaction_type(ty)
                .amount_per_unit(dec(amount))
                .quantity(dec(quantity)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_status_counts_out_and_low_stock() {
    let remote = Arc::new(InMemoryRemote::new());
    remote.seed_inventory("LPG 11kg", dec("0")).await;
    remote.seed_inventory("LPG 22kg", dec("2")).await;
    remote.seed_inventory("Beer", dec("3")).await;
    remote.seed_inventory("Coke", dec("24")).await;

    let aggregator = StatusAggregator::new(remote.clone());
    assert!(aggregator.snapshot().await.is_none());

    let status = aggregator.refresh().await.unwrap();
    assert_eq!(status.out_of_stock_count, 1);
    assert_eq!(status.low_stock_count, 2);
    assert_eq!(status.out_of_stock_items[0].name, "LPG 11kg");
    assert_eq!(aggregator.snapshot().await, Some(status));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let remote = Arc::new(InMemoryRemote::new());
    let item = remote.seed_inventory("Butane", dec("0")).await;

    let aggregator = StatusAggregator::new(remote.clone());
    let first = aggregator.refresh().await.unwrap();

    remote
        .update_inventory(item.id, item.with_quantity(dec("10")))
        .await
        .unwrap();
    remote.set_fail_on_inventory_list(true).await;

    let result = aggregator.refresh().await;
    assert!(matches!(result, Err(ProjectionError::Remote(_))));
    assert_eq!(aggregator.snapshot().await, Some(first));

    remote.set_fail_on_inventory_list(false).await;
    let fresh = aggregator.refresh().await.unwrap();
    assert_eq!(fresh.out_of_stock_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_polling_picks_up_stock_changes() {
    let remote = Arc::new(InMemoryRemote::new());
    let item = remote.seed_inventory("Pepsi", dec("5")).await;

    let aggregator = Arc::new(StatusAggregator::with_threshold(remote.clone(), dec("10")));
    let handle = aggregator.clone().spawn_polling(Duration::from_secs(30));

    tokio::time::sleep(Duration::from_millis(10)).await;
    let status = aggregator.snapshot().await.unwrap();
    assert_eq!(status.low_stock_count, 1);

    remote
        .update_inventory(item.id, item.with_quantity(Decimal::ZERO))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(31)).await;

    let status = aggregator.snapshot().await.unwrap();
    assert_eq!(status.out_of_stock_count, 1);
    assert_eq!(status.low_stock_count, 0);

    handle.abort();
}

#[tokio::test]
async fn test_ledger_chart_from_remote() {
    let remote = InMemoryRemote::new();
    record(&remote, "Restock", TransactionType::Expense, "2025-10-02T09:00:00Z", "12.50", "4").await;
    record(&remote, "Restock", TransactionType::Expense, "2025-10-02T15:00:00Z", "10", "1").await;
    record(&remote, "Sale", TransactionType::Earning, "2025-10-05T10:00:00Z", "20", "2").await;
    record(&remote, "Loan", TransactionType::Capital, "2025-09-28T10:00:00Z", "500", "1").await;

    let chart = LedgerChart::load(&remote, &LedgerQuery::new(2025, 10)).await.unwrap();
    assert_eq!(chart.points.len(), 1);
    assert_eq!(chart.points[0].total, dec("60"));
    assert_eq!(chart.month_total, dec("60"));
    // Only types inside the month are fetched.
    assert_eq!(
        chart.types_present,
        vec![TransactionType::Earning, TransactionType::Expense]
    );

    let all = LedgerChart::load(&remote, &LedgerQuery::new(2025, 10).transaction_type(None))
        .await
        .unwrap();
    assert_eq!(all.month_total, dec("100"));
}

#[tokio::test]
async fn test_ledger_chart_owner_filter() {
    let remote = InMemoryRemote::new();
    record(&remote, "Restock", TransactionType::Expense, "2025-10-02T09:00:00Z", "5", "1").await;

    let query = LedgerQuery::new(2025, 10).owner(UserId::new(2));
    let chart = LedgerChart::load(&remote, &query).await.unwrap();
    assert!(chart.points.is_empty());
    assert_eq!(chart.month_total, Decimal::ZERO);
}

#[tokio::test]
async fn test_inventory_chart_resolves_catalog_names() {
    let remote = InMemoryRemote::new();
    let lpg = remote
        .create_category(CategoryCreate {
            name: "LPG".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let kg = remote
        .create_weight(WeightCreate {
            name: "11kg".to_string(),
            description: None,
        })
        .await
        .unwrap();
    for (name, qty) in [("Petron", "7"), ("Solane", "15")] {
        remote
            .create_inventory(InventoryCreate {
                name: name.to_string(),
                quantity: dec(qty),
                category_id: lpg.id,
                weight_id: kg.id,
            })
            .await
            .unwrap();
    }

    let chart = InventoryChart::load(&remote, &InventoryChartQuery::default())
        .await
        .unwrap();
    let bars: Vec<(&str, &str, &str)> = chart
        .bars
        .iter()
        .map(|b| (b.name.as_str(), b.category.as_str(), b.weight.as_str()))
        .collect();
    assert_eq!(
        bars,
        vec![("Solane", "LPG", "11kg"), ("Petron", "LPG", "11kg")]
    );

    let query = InventoryChartQuery {
        category_id: Some(lpg.id),
        weight_id: None,
    };
    let filtered = InventoryChart::load(&remote, &query).await.unwrap();
    let total: Decimal = filtered.bars.iter().map(|b| b.quantity).sum();
    assert_eq!(total, dec("22"));
}
