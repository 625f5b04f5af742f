//! Latest-price comparison across suppliers.
//!
//! - [`PriceComparison`] - One product's latest quote per supplier
//! - [`SupplierQuote`] - A single supplier's most recent quote
//! - [`SavingsPotential`] - Three-tier label for the price spread
//! - [`build_comparison`] - Fold date-descending rows into a comparison

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::id::{ProductId, SupplierId};
use super::price::PriceWithDetails;
use super::product::Product;

/// A supplier's most recent quote for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierQuote {
    supplier_id: SupplierId,
    supplier_name: String,
    latest_price: Decimal,
    price_date: NaiveDate,
}

impl SupplierQuote {
    /// Create a quote entry.
    pub fn new(
        supplier_id: SupplierId,
        supplier_name: impl Into<String>,
        latest_price: Decimal,
        price_date: NaiveDate,
    ) -> Self {
        Self {
            supplier_id,
            supplier_name: supplier_name.into(),
            latest_price,
            price_date,
        }
    }

    /// Get the supplier ID.
    #[must_use]
    pub const fn supplier_id(&self) -> &SupplierId {
        &self.supplier_id
    }

    /// Get the supplier name.
    #[must_use]
    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    /// Get the supplier's latest quoted price.
    #[must_use]
    pub const fn latest_price(&self) -> Decimal {
        self.latest_price
    }

    /// Get the date of the latest quote.
    #[must_use]
    pub const fn price_date(&self) -> NaiveDate {
        self.price_date
    }
}

/// Three-tier savings label derived from a comparison's price spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavingsPotential {
    /// Spread of at most 5%.
    Low,
    /// Spread above 5% and at most 15%.
    Medium,
    /// Spread above 15%.
    High,
}

impl SavingsPotential {
    /// Classify a spread percentage.
    #[must_use]
    pub fn from_spread(spread_percent: Decimal) -> Self {
        if spread_percent <= dec!(5) {
            Self::Low
        } else if spread_percent <= dec!(15) {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl fmt::Display for SavingsPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        write!(f, "{label}")
    }
}

/// One product's latest quote per supplier.
///
/// Each supplier that has ever quoted the product appears exactly once,
/// holding only its most recent quote. Entries keep the order suppliers
/// were first encountered in the date-descending row scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceComparison {
    product_id: ProductId,
    product_name: String,
    suppliers: Vec<SupplierQuote>,
}

impl PriceComparison {
    /// Create a comparison from already-deduplicated quote entries.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        suppliers: Vec<SupplierQuote>,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            suppliers,
        }
    }

    /// Get the product ID.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Get the product name.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Get the per-supplier quote entries.
    #[must_use]
    pub fn suppliers(&self) -> &[SupplierQuote] {
        &self.suppliers
    }

    /// Number of suppliers with a quote for this product.
    #[must_use]
    pub fn supplier_count(&self) -> usize {
        self.suppliers.len()
    }

    /// The cheapest supplier's entry.
    ///
    /// On an exact price tie the first-encountered entry wins.
    #[must_use]
    pub fn best_supplier(&self) -> Option<&SupplierQuote> {
        self.suppliers.iter().fold(None, |best, quote| match best {
            Some(b) if quote.latest_price < b.latest_price => Some(quote),
            Some(b) => Some(b),
            None => Some(quote),
        })
    }

    /// Quote entries sorted ascending by price (stable).
    #[must_use]
    pub fn suppliers_by_price(&self) -> Vec<&SupplierQuote> {
        let mut sorted: Vec<&SupplierQuote> = self.suppliers.iter().collect();
        sorted.sort_by(|a, b| a.latest_price.cmp(&b.latest_price));
        sorted
    }

    /// Spread between the highest and lowest latest price, as a percentage
    /// of the lowest: `(max - min) / min * 100`.
    ///
    /// Zero when fewer than two suppliers have quoted.
    #[must_use]
    pub fn price_difference_percentage(&self) -> Decimal {
        if self.suppliers.len() < 2 {
            return Decimal::ZERO;
        }

        let mut min = self.suppliers[0].latest_price;
        let mut max = min;
        for quote in &self.suppliers[1..] {
            min = min.min(quote.latest_price);
            max = max.max(quote.latest_price);
        }

        (max - min) / min * dec!(100)
    }

    /// Savings label for this comparison's spread.
    #[must_use]
    pub fn savings_potential(&self) -> SavingsPotential {
        SavingsPotential::from_spread(self.price_difference_percentage())
    }
}

/// Build one product's comparison from joined price rows.
///
/// `rows` must be ordered by date descending (ties broken by the store's
/// created-at/id ordering); the first row seen per supplier is that
/// supplier's latest quote. Rows for other products are skipped. Returns
/// `None` when the product has no quotes, so products without prices
/// never produce an empty entry.
#[must_use]
pub fn build_comparison(product: &Product, rows: &[PriceWithDetails]) -> Option<PriceComparison> {
    let mut seen: HashSet<&SupplierId> = HashSet::new();
    let mut suppliers = Vec::new();

    for row in rows {
        if row.price().product_id() != product.id() {
            continue;
        }
        let supplier_id = row.price().supplier_id();
        if seen.insert(supplier_id) {
            suppliers.push(SupplierQuote::new(
                supplier_id.clone(),
                row.supplier().name(),
                row.price().price(),
                row.price().date(),
            ));
        }
    }

    if suppliers.is_empty() {
        return None;
    }

    Some(PriceComparison::new(
        product.id().clone(),
        product.name(),
        suppliers,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::PriceId;
    use crate::domain::price::Price;
    use crate::domain::supplier::Supplier;
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    fn product(id: &str, name: &str) -> Product {
        Product::new(
            ProductId::from(id),
            name,
            None,
            None,
            None,
            None,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    fn supplier(id: &str, name: &str) -> Supplier {
        Supplier::new(
            SupplierId::from(id),
            name,
            None,
            None,
            None,
            None,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    fn row(
        price_id: &str,
        product: &Product,
        sup: &Supplier,
        amount: Decimal,
        day: &str,
    ) -> PriceWithDetails {
        let price = Price::new(
            PriceId::from(price_id),
            amount,
            date(day),
            None,
            product.id().clone(),
            sup.id().clone(),
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        PriceWithDetails::new(price, product.clone(), sup.clone())
    }

    #[test]
    fn first_row_per_supplier_wins_in_descending_scan() {
        let widget = product("p1", "Widget");
        let acme = supplier("s1", "Acme");

        // Date-descending order: the $9 quote is newer than the $10 one.
        let rows = vec![
            row("q2", &widget, &acme, dec!(9), "2024-01-03"),
            row("q1", &widget, &acme, dec!(10), "2024-01-01"),
        ];

        let comparison = build_comparison(&widget, &rows).unwrap();
        assert_eq!(comparison.supplier_count(), 1);
        assert_eq!(comparison.suppliers()[0].latest_price(), dec!(9));
        assert_eq!(comparison.suppliers()[0].price_date(), date("2024-01-03"));
    }

    #[test]
    fn no_duplicate_suppliers() {
        let widget = product("p1", "Widget");
        let acme = supplier("s1", "Acme");
        let bolt = supplier("s2", "Bolt Co");

        let rows = vec![
            row("q3", &widget, &bolt, dec!(12), "2024-01-02"),
            row("q2", &widget, &acme, dec!(10), "2024-01-01"),
            row("q1", &widget, &acme, dec!(11), "2023-12-01"),
        ];

        let comparison = build_comparison(&widget, &rows).unwrap();
        assert_eq!(comparison.supplier_count(), 2);

        let ids: Vec<&str> = comparison
            .suppliers()
            .iter()
            .map(|q| q.supplier_id().as_str())
            .collect();
        assert_eq!(ids, vec!["s2", "s1"]);
    }

    #[test]
    fn rows_for_other_products_are_skipped() {
        let widget = product("p1", "Widget");
        let gadget = product("p2", "Gadget");
        let acme = supplier("s1", "Acme");

        let rows = vec![row("q1", &gadget, &acme, dec!(4), "2024-01-01")];

        assert!(build_comparison(&widget, &rows).is_none());
    }

    #[test]
    fn no_quotes_yields_no_entry() {
        let widget = product("p1", "Widget");
        assert!(build_comparison(&widget, &[]).is_none());
    }

    #[test]
    fn best_supplier_is_minimum_price() {
        let widget = product("p1", "Widget");
        let acme = supplier("s1", "Acme");
        let bolt = supplier("s2", "Bolt Co");

        let rows = vec![
            row("q2", &widget, &bolt, dec!(12), "2024-01-02"),
            row("q1", &widget, &acme, dec!(10), "2024-01-01"),
        ];

        let comparison = build_comparison(&widget, &rows).unwrap();
        let best = comparison.best_supplier().unwrap();
        assert_eq!(best.supplier_name(), "Acme");
        assert_eq!(best.latest_price(), dec!(10));
    }

    #[test]
    fn best_supplier_tie_keeps_first_encountered() {
        let comparison = PriceComparison::new(
            ProductId::from("p1"),
            "Widget",
            vec![
                SupplierQuote::new(SupplierId::from("s1"), "Acme", dec!(10), date("2024-01-02")),
                SupplierQuote::new(
                    SupplierId::from("s2"),
                    "Bolt Co",
                    dec!(10),
                    date("2024-01-01"),
                ),
            ],
        );

        assert_eq!(
            comparison.best_supplier().unwrap().supplier_id().as_str(),
            "s1"
        );
    }

    #[test]
    fn spread_is_zero_for_single_supplier() {
        let comparison = PriceComparison::new(
            ProductId::from("p1"),
            "Widget",
            vec![SupplierQuote::new(
                SupplierId::from("s1"),
                "Acme",
                dec!(10),
                date("2024-01-01"),
            )],
        );

        assert_eq!(comparison.price_difference_percentage(), Decimal::ZERO);
        assert_eq!(comparison.savings_potential(), SavingsPotential::Low);
    }

    #[test]
    fn spread_matches_max_minus_min_over_min() {
        let comparison = PriceComparison::new(
            ProductId::from("p1"),
            "Widget",
            vec![
                SupplierQuote::new(SupplierId::from("s1"), "Acme", dec!(10), date("2024-01-01")),
                SupplierQuote::new(
                    SupplierId::from("s2"),
                    "Bolt Co",
                    dec!(12),
                    date("2024-01-02"),
                ),
            ],
        );

        assert_eq!(comparison.price_difference_percentage(), dec!(20));
        assert_eq!(comparison.savings_potential(), SavingsPotential::High);
    }

    #[test]
    fn suppliers_by_price_sorts_ascending() {
        let comparison = PriceComparison::new(
            ProductId::from("p1"),
            "Widget",
            vec![
                SupplierQuote::new(
                    SupplierId::from("s2"),
                    "Bolt Co",
                    dec!(12),
                    date("2024-01-02"),
                ),
                SupplierQuote::new(SupplierId::from("s1"), "Acme", dec!(10), date("2024-01-01")),
            ],
        );

        let sorted = comparison.suppliers_by_price();
        assert_eq!(sorted[0].supplier_name(), "Acme");
        assert_eq!(sorted[1].supplier_name(), "Bolt Co");
    }

    #[test]
    fn savings_labels_at_tier_boundaries() {
        assert_eq!(SavingsPotential::from_spread(dec!(0)), SavingsPotential::Low);
        assert_eq!(SavingsPotential::from_spread(dec!(5)), SavingsPotential::Low);
        assert_eq!(
            SavingsPotential::from_spread(dec!(5.01)),
            SavingsPotential::Medium
        );
        assert_eq!(
            SavingsPotential::from_spread(dec!(15)),
            SavingsPotential::Medium
        );
        assert_eq!(
            SavingsPotential::from_spread(dec!(15.01)),
            SavingsPotential::High
        );
    }

    #[test]
    fn savings_labels_display() {
        assert_eq!(SavingsPotential::Low.to_string(), "Low");
        assert_eq!(SavingsPotential::Medium.to_string(), "Medium");
        assert_eq!(SavingsPotential::High.to_string(), "High");
    }
}
