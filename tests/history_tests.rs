//! Price history shaping through the service facade.

use pricelens::app::PriceTracker;
use pricelens::domain::{Product, ProductId, Supplier};
use pricelens::testkit::{fixtures, MemoryAuth, MemoryStore};
use rust_decimal_macros::dec;

fn tracker() -> PriceTracker<MemoryStore, MemoryAuth> {
    PriceTracker::new(MemoryStore::new(), MemoryAuth::signed_in("user-1"))
}

async fn seed(
    tracker: &PriceTracker<MemoryStore, MemoryAuth>,
) -> (Product, Supplier, Supplier) {
    let flour = tracker
        .create_product(fixtures::product_draft("Flour"))
        .await
        .expect("create product");
    let acme = tracker
        .create_supplier(fixtures::supplier_draft("Acme"))
        .await
        .expect("create Acme");
    let bolt = tracker
        .create_supplier(fixtures::supplier_draft("Bolt Co"))
        .await
        .expect("create Bolt Co");
    (flour, acme, bolt)
}

#[tokio::test]
async fn dates_are_strictly_increasing_and_distinct() {
    let tracker = tracker();
    let (flour, acme, bolt) = seed(&tracker).await;

    tracker
        .create_price(fixtures::price_draft(flour.id(), acme.id(), "10", "2024-01-05"))
        .await
        .expect("quote");
    tracker
        .create_price(fixtures::price_draft(flour.id(), bolt.id(), "12", "2024-01-01"))
        .await
        .expect("quote");
    tracker
        .create_price(fixtures::price_draft(flour.id(), acme.id(), "11", "2024-01-01"))
        .await
        .expect("quote");

    let history = tracker.price_history(flour.id(), None).await;
    assert_eq!(history.dates(), ["2024-01-01", "2024-01-05"]);
    assert!(history.dates().windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn series_are_keyed_by_supplier_name_and_compacted() {
    let tracker = tracker();
    let (flour, acme, bolt) = seed(&tracker).await;

    tracker
        .create_price(fixtures::price_draft(flour.id(), acme.id(), "10", "2024-01-01"))
        .await
        .expect("quote");
    tracker
        .create_price(fixtures::price_draft(flour.id(), bolt.id(), "12", "2024-01-01"))
        .await
        .expect("quote");
    // Only Acme quotes on the 3rd; Bolt's series must skip that date.
    tracker
        .create_price(fixtures::price_draft(flour.id(), acme.id(), "9", "2024-01-03"))
        .await
        .expect("quote");
    tracker
        .create_price(fixtures::price_draft(flour.id(), bolt.id(), "11", "2024-01-05"))
        .await
        .expect("quote");

    let history = tracker.price_history(flour.id(), None).await;
    assert_eq!(history.dates().len(), 3);
    assert_eq!(
        history.series_for("Acme").unwrap(),
        [dec!(10), dec!(9)].as_slice()
    );
    assert_eq!(
        history.series_for("Bolt Co").unwrap(),
        [dec!(12), dec!(11)].as_slice()
    );
}

#[tokio::test]
async fn supplier_filter_restricts_the_series() {
    let tracker = tracker();
    let (flour, acme, bolt) = seed(&tracker).await;

    tracker
        .create_price(fixtures::price_draft(flour.id(), acme.id(), "10", "2024-01-01"))
        .await
        .expect("quote");
    tracker
        .create_price(fixtures::price_draft(flour.id(), bolt.id(), "12", "2024-01-02"))
        .await
        .expect("quote");

    let history = tracker.price_history(flour.id(), Some(acme.id())).await;
    assert_eq!(history.dates(), ["2024-01-01"]);
    assert!(history.series_for("Acme").is_some());
    assert!(history.series_for("Bolt Co").is_none());
}

#[tokio::test]
async fn other_products_do_not_leak_into_history() {
    let tracker = tracker();
    let (flour, acme, _) = seed(&tracker).await;
    let sugar = tracker
        .create_product(fixtures::product_draft("Sugar"))
        .await
        .expect("create product");

    tracker
        .create_price(fixtures::price_draft(flour.id(), acme.id(), "10", "2024-01-01"))
        .await
        .expect("quote");
    tracker
        .create_price(fixtures::price_draft(sugar.id(), acme.id(), "3", "2024-01-02"))
        .await
        .expect("quote");

    let history = tracker.price_history(flour.id(), None).await;
    assert_eq!(history.dates(), ["2024-01-01"]);
    assert_eq!(history.series_for("Acme").unwrap(), [dec!(10)].as_slice());
}

#[tokio::test]
async fn every_series_value_appears_in_some_source_row() {
    let tracker = tracker();
    let (flour, acme, bolt) = seed(&tracker).await;

    for (supplier, amount, day) in [
        (&acme, "10", "2024-01-01"),
        (&bolt, "12", "2024-01-02"),
        (&acme, "9.50", "2024-01-04"),
    ] {
        tracker
            .create_price(fixtures::price_draft(flour.id(), supplier.id(), amount, day))
            .await
            .expect("quote");
    }

    let rows = tracker.fetch_prices_by_product(flour.id()).await;
    let history = tracker.price_history(flour.id(), None).await;

    for (name, points) in history.series() {
        for point in points {
            assert!(rows
                .iter()
                .any(|r| r.supplier().name() == name && r.price().price() == *point));
        }
    }
}

#[tokio::test]
async fn unknown_product_yields_empty_history() {
    let tracker = tracker();
    seed(&tracker).await;

    let history = tracker
        .price_history(&ProductId::from("nope"), None)
        .await;
    assert!(history.is_empty());
}
