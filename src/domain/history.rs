//! Per-product price history shaped for charting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::price::PriceWithDetails;

/// A product's quotes folded into a date axis and per-supplier series.
///
/// `dates` is the strictly increasing set of distinct `yyyy-MM-dd` strings
/// appearing in the source rows; it is not padded with missing dates.
/// Each series holds a supplier's prices in date order but **only** for
/// dates where that supplier has a value - the series is compacted, not
/// positionally aligned to `dates`. `series[supplier][i]` corresponds to
/// `dates[i]` only when every supplier quotes on every date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceHistory {
    dates: Vec<String>,
    series: BTreeMap<String, Vec<Decimal>>,
}

impl PriceHistory {
    /// An empty history (no dates, no series).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the sorted distinct date axis.
    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Get all per-supplier series, keyed by supplier name.
    #[must_use]
    pub const fn series(&self) -> &BTreeMap<String, Vec<Decimal>> {
        &self.series
    }

    /// Get one supplier's compacted price sequence.
    #[must_use]
    pub fn series_for(&self, supplier_name: &str) -> Option<&[Decimal]> {
        self.series.get(supplier_name).map(Vec::as_slice)
    }

    /// True when no rows contributed to this history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Fold joined price rows into a [`PriceHistory`].
///
/// `rows` must be ordered by date ascending (ties broken by the store's
/// created-at/id ordering). When several rows share a date for the same
/// supplier, the last one processed wins within that date bucket, i.e.
/// the most recently created quote.
#[must_use]
pub fn build_history(rows: &[PriceWithDetails]) -> PriceHistory {
    let mut buckets: BTreeMap<NaiveDate, BTreeMap<&str, Decimal>> = BTreeMap::new();

    for row in rows {
        buckets
            .entry(row.price().date())
            .or_default()
            .insert(row.supplier().name(), row.price().price());
    }

    let dates: Vec<String> = buckets
        .keys()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    let mut series: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for row in rows {
        series.entry(row.supplier().name().to_string()).or_default();
    }
    for by_supplier in buckets.values() {
        for (name, price) in by_supplier {
            if let Some(points) = series.get_mut(*name) {
                points.push(*price);
            }
        }
    }

    PriceHistory { dates, series }
}
