//! Significant price difference alerting.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::comparison::PriceComparison;

/// Configuration for the price spread alert rule.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Spread percentage a product must exceed to raise an alert.
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: Decimal,
}

fn default_threshold_percent() -> Decimal {
    Decimal::from(10)
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold_percent: default_threshold_percent(),
        }
    }
}

/// An alert for a product whose supplier spread exceeds the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceAlert {
    product: String,
    diff: Decimal,
}

impl PriceAlert {
    /// Create an alert.
    pub fn new(product: impl Into<String>, diff: Decimal) -> Self {
        Self {
            product: product.into(),
            diff,
        }
    }

    /// Get the product name.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Get the spread percentage that triggered the alert.
    #[must_use]
    pub const fn diff(&self) -> Decimal {
        self.diff
    }
}

/// Flag comparisons whose spread strictly exceeds the threshold.
///
/// Only products quoted by at least two suppliers can alert; a spread of
/// exactly the threshold does not. Alert order follows the order the
/// comparisons were produced, not severity.
#[must_use]
pub fn significant_differences(
    comparisons: &[PriceComparison],
    config: &AlertConfig,
) -> Vec<PriceAlert> {
    comparisons
        .iter()
        .filter(|c| c.supplier_count() > 1)
        .filter_map(|c| {
            let diff = c.price_difference_percentage();
            (diff > config.threshold_percent).then(|| PriceAlert::new(c.product_name(), diff))
        })
        .collect()
}
