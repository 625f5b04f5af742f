//! End-to-end comparison scenarios through the service facade.

use pricelens::app::PriceTracker;
use pricelens::domain::{Product, SavingsPotential, Supplier};
use pricelens::testkit::{fixtures, MemoryAuth, MemoryStore};
use rust_decimal_macros::dec;

fn tracker() -> PriceTracker<MemoryStore, MemoryAuth> {
    PriceTracker::new(MemoryStore::new(), MemoryAuth::signed_in("user-1"))
}

async fn seed_widget(
    tracker: &PriceTracker<MemoryStore, MemoryAuth>,
) -> (Product, Supplier, Supplier) {
    let widget = tracker
        .create_product(fixtures::product_draft("Widget"))
        .await
        .expect("create product");
    let supplier_a = tracker
        .create_supplier(fixtures::supplier_draft("SupplierA"))
        .await
        .expect("create supplier A");
    let supplier_b = tracker
        .create_supplier(fixtures::supplier_draft("SupplierB"))
        .await
        .expect("create supplier B");
    (widget, supplier_a, supplier_b)
}

#[tokio::test]
async fn two_supplier_comparison_ranks_and_labels() {
    let tracker = tracker();
    let (widget, a, b) = seed_widget(&tracker).await;

    tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "10", "2024-01-01"))
        .await
        .expect("quote A");
    tracker
        .create_price(fixtures::price_draft(widget.id(), b.id(), "12", "2024-01-02"))
        .await
        .expect("quote B");

    let comparisons = tracker.price_comparisons().await;
    assert_eq!(comparisons.len(), 1);

    let comparison = &comparisons[0];
    assert_eq!(comparison.product_name(), "Widget");
    assert_eq!(comparison.supplier_count(), 2);

    let sorted = comparison.suppliers_by_price();
    assert_eq!(sorted[0].supplier_name(), "SupplierA");
    assert_eq!(sorted[0].latest_price(), dec!(10));
    assert_eq!(sorted[1].supplier_name(), "SupplierB");
    assert_eq!(sorted[1].latest_price(), dec!(12));

    assert_eq!(
        comparison.best_supplier().unwrap().supplier_name(),
        "SupplierA"
    );
    assert_eq!(comparison.price_difference_percentage(), dec!(20));
    assert_eq!(comparison.savings_potential(), SavingsPotential::High);
}

#[tokio::test]
async fn newer_quote_replaces_suppliers_latest_price() {
    let tracker = tracker();
    let (widget, a, b) = seed_widget(&tracker).await;

    tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "10", "2024-01-01"))
        .await
        .expect("quote A");
    tracker
        .create_price(fixtures::price_draft(widget.id(), b.id(), "12", "2024-01-02"))
        .await
        .expect("quote B");
    tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "9", "2024-01-03"))
        .await
        .expect("re-quote A");

    let comparisons = tracker.price_comparisons().await;
    let comparison = &comparisons[0];
    assert_eq!(comparison.supplier_count(), 2);

    let entry_a = comparison
        .suppliers()
        .iter()
        .find(|q| q.supplier_id() == a.id())
        .unwrap();
    assert_eq!(entry_a.latest_price(), dec!(9));
    assert_eq!(entry_a.price_date(), "2024-01-03".parse().unwrap());
}

#[tokio::test]
async fn same_date_tie_resolves_to_most_recently_created() {
    let tracker = tracker();
    let (widget, a, _) = seed_widget(&tracker).await;

    tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "10", "2024-01-01"))
        .await
        .expect("first quote");
    tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "11", "2024-01-01"))
        .await
        .expect("second quote, same date");

    let comparisons = tracker.price_comparisons().await;
    assert_eq!(comparisons[0].suppliers()[0].latest_price(), dec!(11));
}

#[tokio::test]
async fn created_price_shows_up_immediately() {
    let tracker = tracker();
    let (widget, a, _) = seed_widget(&tracker).await;

    let created = tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "7.25", "2024-02-01"))
        .await
        .expect("create price");

    let comparisons = tracker.price_comparisons().await;
    let entry = comparisons[0]
        .suppliers()
        .iter()
        .find(|q| q.supplier_id() == a.id())
        .unwrap();
    assert_eq!(entry.latest_price(), created.price());
    assert_eq!(entry.price_date(), created.date());
}

#[tokio::test]
async fn products_without_quotes_produce_no_entry() {
    let tracker = tracker();
    let (widget, a, _) = seed_widget(&tracker).await;
    tracker
        .create_product(fixtures::product_draft("Gadget"))
        .await
        .expect("quote-less product");

    tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "10", "2024-01-01"))
        .await
        .expect("quote");

    let comparisons = tracker.price_comparisons().await;
    assert_eq!(comparisons.len(), 1);
    assert_eq!(comparisons[0].product_name(), "Widget");
}

#[tokio::test]
async fn deleting_the_only_price_removes_the_comparison() {
    let tracker = tracker();
    let (widget, a, _) = seed_widget(&tracker).await;

    let price = tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "10", "2024-01-01"))
        .await
        .expect("quote");
    assert_eq!(tracker.price_comparisons().await.len(), 1);

    assert!(tracker.delete_price(price.id()).await);
    assert!(tracker.price_comparisons().await.is_empty());
}

#[tokio::test]
async fn no_duplicate_suppliers_across_many_quotes() {
    let tracker = tracker();
    let (widget, a, b) = seed_widget(&tracker).await;

    for (day, amount) in [("2024-01-01", "10"), ("2024-01-05", "9"), ("2024-01-09", "11")] {
        tracker
            .create_price(fixtures::price_draft(widget.id(), a.id(), amount, day))
            .await
            .expect("quote A");
        tracker
            .create_price(fixtures::price_draft(widget.id(), b.id(), amount, day))
            .await
            .expect("quote B");
    }

    let comparisons = tracker.price_comparisons().await;
    let comparison = &comparisons[0];
    assert_eq!(comparison.supplier_count(), 2);

    let mut ids: Vec<&str> = comparison
        .suppliers()
        .iter()
        .map(|q| q.supplier_id().as_str())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 2);

    // Both latest prices come from the most recent day.
    for quote in comparison.suppliers() {
        assert_eq!(quote.latest_price(), dec!(11));
        assert_eq!(quote.price_date(), "2024-01-09".parse().unwrap());
    }
}

#[tokio::test]
async fn deleting_a_supplier_cascades_out_of_comparisons() {
    let tracker = tracker();
    let (widget, a, b) = seed_widget(&tracker).await;

    tracker
        .create_price(fixtures::price_draft(widget.id(), a.id(), "10", "2024-01-01"))
        .await
        .expect("quote A");
    tracker
        .create_price(fixtures::price_draft(widget.id(), b.id(), "12", "2024-01-02"))
        .await
        .expect("quote B");

    assert!(tracker.delete_supplier(b.id()).await);

    let comparisons = tracker.price_comparisons().await;
    assert_eq!(comparisons[0].supplier_count(), 1);
    assert_eq!(comparisons[0].suppliers()[0].supplier_id(), a.id());
}
