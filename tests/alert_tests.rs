//! Spread alerting through the service facade.

use pricelens::app::PriceTracker;
use pricelens::domain::AlertConfig;
use pricelens::testkit::{fixtures, MemoryAuth, MemoryStore};
use rust_decimal_macros::dec;

fn tracker() -> PriceTracker<MemoryStore, MemoryAuth> {
    PriceTracker::new(MemoryStore::new(), MemoryAuth::signed_in("user-1"))
}

async fn quote_product(
    tracker: &PriceTracker<MemoryStore, MemoryAuth>,
    product_name: &str,
    quotes: &[(&str, &str, &str)],
) {
    let product = tracker
        .create_product(fixtures::product_draft(product_name))
        .await
        .expect("create product");
    for (supplier_name, amount, day) in quotes {
        let supplier = tracker
            .create_supplier(fixtures::supplier_draft(supplier_name))
            .await
            .expect("create supplier");
        tracker
            .create_price(fixtures::price_draft(product.id(), supplier.id(), amount, day))
            .await
            .expect("create price");
    }
}

#[tokio::test]
async fn spread_above_ten_percent_alerts() {
    let tracker = tracker();
    quote_product(
        &tracker,
        "Widget",
        &[("A", "10", "2024-01-01"), ("B", "12", "2024-01-02")],
    )
    .await;

    let alerts = tracker.price_alerts().await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].product(), "Widget");
    assert_eq!(alerts[0].diff(), dec!(20));
}

#[tokio::test]
async fn spread_of_exactly_ten_percent_does_not_alert() {
    let tracker = tracker();
    quote_product(
        &tracker,
        "Widget",
        &[("A", "10", "2024-01-01"), ("B", "11", "2024-01-02")],
    )
    .await;

    assert!(tracker.price_alerts().await.is_empty());
}

#[tokio::test]
async fn single_supplier_products_never_alert() {
    let tracker = tracker();
    quote_product(&tracker, "Widget", &[("A", "10", "2024-01-01")]).await;

    assert!(tracker.price_alerts().await.is_empty());
}

#[tokio::test]
async fn alerts_follow_product_order_not_severity() {
    let tracker = tracker();
    // Products list sorts by name, so Anvil precedes Widget even though
    // Widget has the larger spread.
    quote_product(
        &tracker,
        "Widget",
        &[("A", "10", "2024-01-01"), ("B", "20", "2024-01-02")],
    )
    .await;
    quote_product(
        &tracker,
        "Anvil",
        &[("C", "10", "2024-01-01"), ("D", "12", "2024-01-02")],
    )
    .await;

    let alerts = tracker.price_alerts().await;
    let names: Vec<&str> = alerts.iter().map(|a| a.product()).collect();
    assert_eq!(names, vec!["Anvil", "Widget"]);
}

#[tokio::test]
async fn custom_threshold_changes_the_cutoff() {
    let tracker = PriceTracker::with_config(
        MemoryStore::new(),
        MemoryAuth::signed_in("user-1"),
        AlertConfig {
            threshold_percent: dec!(25),
        },
    );
    quote_product(
        &tracker,
        "Widget",
        &[("A", "10", "2024-01-01"), ("B", "12", "2024-01-02")],
    )
    .await;

    // 20% spread stays below the raised threshold.
    assert!(tracker.price_alerts().await.is_empty());
}
