use crate::error::AnalyticsError;
use crate::report::{ReportEntry, SellerStat};
use crate::strategy::{
    create_bonus_strategy, create_revenue_strategy, AnalysisOptions, BonusStrategy,
    BonusStrategyId, RevenueStrategy, RevenueStrategyId, StrategyOption,
};
use core_types::{Dataset, Product};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::ops::Deref;

/// A strategy that is either borrowed from the options or built from its name.
enum Resolved<'a, S: ?Sized> {
    Borrowed(&'a S),
    Owned(Box<S>),
}

impl<S: ?Sized> Deref for Resolved<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        match self {
            Resolved::Borrowed(strategy) => strategy,
            Resolved::Owned(strategy) => strategy,
        }
    }
}

/// The strategies of one run, checked and ready to call.
struct Strategies<'a> {
    revenue: Resolved<'a, dyn RevenueStrategy>,
    bonus: Resolved<'a, dyn BonusStrategy>,
}

/// A stateless calculator turning sellers, products and purchase records into
/// a per-seller sales report.
#[derive(Debug, Default)]
pub struct SalesAnalyzer {}

impl SalesAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for building the sales report.
    ///
    /// # Arguments
    ///
    /// * `data` - The sellers, products and purchase records to analyze.
    /// * `options` - The revenue and bonus strategies plus report shaping parameters.
    ///
    /// # Returns
    ///
    /// The report entries sorted by profit, highest first, or the first
    /// validation error encountered. No partial report is ever returned.
    #[tracing::instrument(name = "analyze_sales", skip_all)]
    pub fn analyze(
        &self,
        data: Option<&Dataset>,
        options: &AnalysisOptions,
    ) -> Result<Vec<ReportEntry>, AnalyticsError> {
        let dataset = validate_dataset(data)?;
        let strategies = resolve_options(options)?;
        self.run(dataset, &strategies, options.top_products_limit)
    }

    /// Like [`SalesAnalyzer::analyze`], but for a dataset that has not been typed yet,
    /// e.g. straight out of a JSON file.
    ///
    /// The structure of the document is checked before the options; the
    /// contents of the individual records are checked after them.
    #[tracing::instrument(name = "analyze_sales_value", skip_all)]
    pub fn analyze_value(
        &self,
        data: Option<&serde_json::Value>,
        options: &AnalysisOptions,
    ) -> Result<Vec<ReportEntry>, AnalyticsError> {
        validate_shape(data)?;
        let strategies = resolve_options(options)?;

        let value = data.cloned().unwrap_or_default();
        let dataset = Dataset::from_value(value)
            .map_err(|e| AnalyticsError::InvalidData(e.to_string()))?;

        self.run(&dataset, &strategies, options.top_products_limit)
    }

    fn run(
        &self,
        dataset: &Dataset,
        strategies: &Strategies<'_>,
        top_products_limit: usize,
    ) -> Result<Vec<ReportEntry>, AnalyticsError> {
        let stats = self.aggregate(dataset, &*strategies.revenue)?;
        let ranked = self.rank(stats);
        let report = self.finalize(ranked, &*strategies.bonus, top_products_limit)?;

        tracing::info!(
            sellers = report.len(),
            purchase_records = dataset.purchase_records.len(),
            "Sales report calculated."
        );
        Ok(report)
    }

    /// Folds every purchase record into its seller's running totals.
    ///
    /// Revenue is the record's own `total_amount`; profit is recomputed per line
    /// item through the revenue strategy. Each line item counts once towards its
    /// sku, whatever its quantity. Totals that leave the `Decimal` range fail
    /// the run with `AnalyticsError::Overflow`.
    fn aggregate(
        &self,
        dataset: &Dataset,
        revenue: &dyn RevenueStrategy,
    ) -> Result<Vec<SellerStat>, AnalyticsError> {
        let mut stats: Vec<SellerStat> = dataset.sellers.iter().map(SellerStat::new).collect();

        let seller_index: HashMap<&str, usize> = dataset
            .sellers
            .iter()
            .enumerate()
            .map(|(position, seller)| (seller.id.as_str(), position))
            .collect();
        let product_index: HashMap<&str, &Product> = dataset
            .products
            .iter()
            .map(|product| (product.sku.as_str(), product))
            .collect();

        for record in &dataset.purchase_records {
            let position = *seller_index
                .get(record.seller_id.as_str())
                .ok_or_else(|| AnalyticsError::UnknownSeller(record.seller_id.clone()))?;
            let seller = &mut stats[position];

            seller.sales_count += 1;
            seller.revenue = seller
                .revenue
                .checked_add(record.total_amount)
                .ok_or(AnalyticsError::Overflow("seller revenue"))?;

            for item in &record.items {
                let product = *product_index
                    .get(item.sku.as_str())
                    .ok_or_else(|| AnalyticsError::UnknownProduct(item.sku.clone()))?;

                let cost = product
                    .purchase_price
                    .checked_mul(Decimal::from(item.quantity))
                    .ok_or(AnalyticsError::Overflow("line item cost"))?;
                let line_revenue = revenue.calculate(item, product)?;
                seller.profit = line_revenue
                    .checked_sub(cost)
                    .and_then(|line_profit| seller.profit.checked_add(line_profit))
                    .ok_or(AnalyticsError::Overflow("seller profit"))?;
                seller.products_sold.record(&item.sku);
            }
        }

        tracing::debug!(
            sellers = stats.len(),
            products = product_index.len(),
            "Aggregated purchase records."
        );
        Ok(stats)
    }

    /// Orders sellers by profit, highest first. Equal profits keep input order.
    fn rank(&self, mut stats: Vec<SellerStat>) -> Vec<SellerStat> {
        stats.sort_by(|a, b| b.profit.cmp(&a.profit));
        stats
    }

    /// Assigns bonuses by rank and produces the rounded report rows.
    fn finalize(
        &self,
        ranked: Vec<SellerStat>,
        bonus: &dyn BonusStrategy,
        top_products_limit: usize,
    ) -> Result<Vec<ReportEntry>, AnalyticsError> {
        let total = ranked.len();
        ranked
            .into_iter()
            .enumerate()
            .map(|(rank, stat)| {
                let amount = bonus.calculate(rank, total, &stat)?;
                tracing::debug!(seller = %stat.id, rank, bonus = %amount, "Assigned bonus.");
                Ok(ReportEntry::from_stat(stat, amount, top_products_limit))
            })
            .collect()
    }
}

/// Checks the typed dataset is present and has no empty collection.
fn validate_dataset(data: Option<&Dataset>) -> Result<&Dataset, AnalyticsError> {
    let dataset = data.ok_or_else(|| AnalyticsError::InvalidData("dataset is missing".to_string()))?;

    for (field, is_empty) in [
        ("sellers", dataset.sellers.is_empty()),
        ("purchase_records", dataset.purchase_records.is_empty()),
        ("products", dataset.products.is_empty()),
    ] {
        if is_empty {
            return Err(AnalyticsError::InvalidData(format!("{field} must not be empty")));
        }
    }

    Ok(dataset)
}

/// Checks an untyped dataset is an object whose three collections are non-empty arrays.
fn validate_shape(data: Option<&serde_json::Value>) -> Result<(), AnalyticsError> {
    let value = match data {
        None | Some(serde_json::Value::Null) => {
            return Err(AnalyticsError::InvalidData("dataset is missing".to_string()));
        }
        Some(value) => value,
    };
    let collections =
        Dataset::collections(value).map_err(|e| AnalyticsError::InvalidData(e.to_string()))?;

    for (field, items) in Dataset::COLLECTIONS.into_iter().zip(collections) {
        if items.is_empty() {
            return Err(AnalyticsError::InvalidData(format!("{field} must not be empty")));
        }
    }

    Ok(())
}

/// Checks both strategies are supplied, then that each one can be invoked.
fn resolve_options(options: &AnalysisOptions) -> Result<Strategies<'_>, AnalyticsError> {
    let (Some(revenue), Some(bonus)) = (&options.calculate_revenue, &options.calculate_bonus)
    else {
        let missing = if options.calculate_revenue.is_none() {
            "calculate_revenue"
        } else {
            "calculate_bonus"
        };
        return Err(AnalyticsError::MissingOption(missing));
    };

    let revenue = match revenue {
        StrategyOption::Callable(strategy) => Resolved::Borrowed(&**strategy),
        StrategyOption::Named(name) => {
            let id: RevenueStrategyId = name
                .parse()
                .map_err(|_| AnalyticsError::InvalidOptionType("calculate_revenue", name.clone()))?;
            Resolved::Owned(create_revenue_strategy(id))
        }
    };

    let bonus = match bonus {
        StrategyOption::Callable(strategy) => Resolved::Borrowed(&**strategy),
        StrategyOption::Named(name) => {
            let id: BonusStrategyId = name
                .parse()
                .map_err(|_| AnalyticsError::InvalidOptionType("calculate_bonus", name.clone()))?;
            Resolved::Owned(create_bonus_strategy(id, &options.bonus_params))
        }
    };

    Ok(Strategies { revenue, bonus })
}
