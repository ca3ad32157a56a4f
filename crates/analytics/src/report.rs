use core_types::Seller;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of decimal places money is rounded to in the final report.
pub const MONEY_DP: u32 = 2;

/// Rounds a monetary amount for presentation. Midpoints round away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-sku occurrence counter that remembers the order in which skus were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCounts {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl ProductCounts {
    /// Adds one occurrence of `sku`.
    pub fn record(&mut self, sku: &str) {
        match self.index.get(sku) {
            Some(&position) => self.counts[position].1 += 1,
            None => {
                self.index.insert(sku.to_string(), self.counts.len());
                self.counts.push((sku.to_string(), 1));
            }
        }
    }

    /// Iterates `(sku, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(sku, count)| (sku.as_str(), *count))
    }

    /// The `limit` most frequent skus, most frequent first.
    ///
    /// Ties keep first-seen order.
    pub fn top(&self, limit: usize) -> Vec<TopProduct> {
        let mut products: Vec<TopProduct> = self
            .iter()
            .map(|(sku, quantity)| TopProduct {
                sku: sku.to_string(),
                quantity,
            })
            .collect();
        products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        products.truncate(limit);
        products
    }
}

/// Running totals for one seller while purchase records are folded in.
///
/// Values are kept at full precision; rounding happens only in `ReportEntry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerStat {
    pub id: String,
    pub name: String,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub sales_count: usize,
    pub products_sold: ProductCounts,
}

impl SellerStat {
    /// Creates a zeroed accumulator for `seller`.
    pub fn new(seller: &Seller) -> Self {
        Self {
            id: seller.id.clone(),
            name: seller.full_name(),
            revenue: Decimal::ZERO,
            profit: Decimal::ZERO,
            sales_count: 0,
            products_sold: ProductCounts::default(),
        }
    }
}

/// A sku together with how many line items of it a seller sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub sku: String,
    pub quantity: usize,
}

/// One row of the final sales report.
///
/// This struct is the output of the `SalesAnalyzer` and the data transfer
/// object handed to whatever renders or stores the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub seller_id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
    pub sales_count: usize,
    pub top_products: Vec<TopProduct>,
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus: Decimal,
}

impl ReportEntry {
    /// Builds the rounded report row from a finished accumulator.
    pub fn from_stat(stat: SellerStat, bonus: Decimal, top_products_limit: usize) -> Self {
        let top_products = stat.products_sold.top(top_products_limit);
        Self {
            seller_id: stat.id,
            name: stat.name,
            revenue: round_money(stat.revenue),
            profit: round_money(stat.profit),
            sales_count: stat.sales_count,
            top_products,
            bonus: round_money(bonus),
        }
    }
}
