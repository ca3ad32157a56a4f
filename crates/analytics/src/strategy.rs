use crate::error::AnalyticsError;
use crate::report::SellerStat;
use configuration::{BonusParams, Config};
use core_types::{LineItem, Product};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::str::FromStr;

/// Computes the revenue of a single line item.
///
/// Any `Fn(&LineItem, &Product) -> Result<Decimal, AnalyticsError>` closure or
/// function implements this trait, so ad-hoc calculations plug in without a
/// wrapper type.
pub trait RevenueStrategy: Send + Sync {
    fn calculate(&self, item: &LineItem, product: &Product) -> Result<Decimal, AnalyticsError>;
}

/// Computes a seller's bonus from their rank in the profit ordering.
///
/// # Arguments
///
/// * `rank` - 0-based position in the profit-sorted list; 0 is the top performer.
/// * `total` - Number of ranked sellers.
/// * `seller` - The seller's full-precision totals.
pub trait BonusStrategy: Send + Sync {
    fn calculate(
        &self,
        rank: usize,
        total: usize,
        seller: &SellerStat,
    ) -> Result<Decimal, AnalyticsError>;
}

impl<F> RevenueStrategy for F
where
    F: Fn(&LineItem, &Product) -> Result<Decimal, AnalyticsError> + Send + Sync,
{
    fn calculate(&self, item: &LineItem, product: &Product) -> Result<Decimal, AnalyticsError> {
        self(item, product)
    }
}

impl<F> BonusStrategy for F
where
    F: Fn(usize, usize, &SellerStat) -> Result<Decimal, AnalyticsError> + Send + Sync,
{
    fn calculate(
        &self,
        rank: usize,
        total: usize,
        seller: &SellerStat,
    ) -> Result<Decimal, AnalyticsError> {
        self(rank, total, seller)
    }
}

/// Revenue of a line item: `sale_price * quantity`, reduced by the item's discount percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRevenue;

impl RevenueStrategy for SimpleRevenue {
    fn calculate(&self, item: &LineItem, _product: &Product) -> Result<Decimal, AnalyticsError> {
        let overflow = || AnalyticsError::Overflow("line item revenue");
        let total = item
            .sale_price
            .checked_mul(Decimal::from(item.quantity))
            .ok_or_else(overflow)?;
        let share = item
            .discount
            .checked_div(dec!(100))
            .and_then(|discount| Decimal::ONE.checked_sub(discount))
            .ok_or_else(overflow)?;
        total.checked_mul(share).ok_or_else(overflow)
    }
}

/// Rank-banded share of profit.
///
/// | rank          | bonus                  |
/// |---------------|------------------------|
/// | 0             | `top_pct` of profit    |
/// | `total - 1`   | 0                      |
/// | 1, 2          | `runner_up_pct`        |
/// | anything else | `default_pct`          |
///
/// The bands are checked top-down: a lone seller is paid as the top performer
/// even though they are also last, and the last of three sellers gets nothing.
#[derive(Debug, Clone)]
pub struct BonusByProfit {
    params: BonusParams,
}

impl BonusByProfit {
    pub fn new(params: BonusParams) -> Self {
        Self { params }
    }
}

impl Default for BonusByProfit {
    fn default() -> Self {
        Self::new(BonusParams::default())
    }
}

impl BonusStrategy for BonusByProfit {
    fn calculate(
        &self,
        rank: usize,
        total: usize,
        seller: &SellerStat,
    ) -> Result<Decimal, AnalyticsError> {
        let pct = match rank {
            0 => self.params.top_pct,
            r if r + 1 == total => Decimal::ZERO,
            1 | 2 => self.params.runner_up_pct,
            _ => self.params.default_pct,
        };
        pct.checked_mul(seller.profit)
            .ok_or(AnalyticsError::Overflow("seller bonus"))
    }
}

/// Names under which the built-in revenue strategies can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueStrategyId {
    Simple,
}

/// Names under which the built-in bonus strategies can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusStrategyId {
    ByProfit,
}

impl FromStr for RevenueStrategyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            other => Err(format!("unknown revenue strategy '{other}'")),
        }
    }
}

impl FromStr for BonusStrategyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by_profit" => Ok(Self::ByProfit),
            other => Err(format!("unknown bonus strategy '{other}'")),
        }
    }
}

/// Creates a revenue strategy instance for the given ID.
pub fn create_revenue_strategy(id: RevenueStrategyId) -> Box<dyn RevenueStrategy> {
    match id {
        RevenueStrategyId::Simple => Box::new(SimpleRevenue),
    }
}

/// Creates a bonus strategy instance for the given ID, parameterised by the configured bands.
pub fn create_bonus_strategy(id: BonusStrategyId, params: &BonusParams) -> Box<dyn BonusStrategy> {
    match id {
        BonusStrategyId::ByProfit => Box::new(BonusByProfit::new(params.clone())),
    }
}

/// A strategy as handed to the analyzer: either something invocable, or the
/// name of a built-in strategy that still has to be looked up.
pub enum StrategyOption<S: ?Sized> {
    Callable(Box<S>),
    Named(String),
}

impl<S: ?Sized> fmt::Debug for StrategyOption<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyOption::Callable(_) => f.write_str("Callable(..)"),
            StrategyOption::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

/// The pluggable parts of an analysis run.
///
/// Both strategies are mandatory; they are `Option`s so that an incomplete
/// configuration can be reported as such instead of silently defaulted.
#[derive(Debug)]
pub struct AnalysisOptions {
    pub calculate_revenue: Option<StrategyOption<dyn RevenueStrategy>>,
    pub calculate_bonus: Option<StrategyOption<dyn BonusStrategy>>,
    /// Bands used when `calculate_bonus` is resolved by name.
    pub bonus_params: BonusParams,
    pub top_products_limit: usize,
}

impl AnalysisOptions {
    /// Options with no strategies set.
    pub fn new() -> Self {
        Self {
            calculate_revenue: None,
            calculate_bonus: None,
            bonus_params: BonusParams::default(),
            top_products_limit: 10,
        }
    }

    /// Simple revenue and the default profit bonus bands.
    pub fn defaults() -> Self {
        Self::new()
            .with_revenue(SimpleRevenue)
            .with_bonus(BonusByProfit::default())
    }

    /// Builds options from the `[strategies]`, `[bonus]` and `[report]` sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            calculate_revenue: config
                .strategies
                .calculate_revenue
                .clone()
                .map(StrategyOption::Named),
            calculate_bonus: config
                .strategies
                .calculate_bonus
                .clone()
                .map(StrategyOption::Named),
            bonus_params: config.bonus.clone(),
            top_products_limit: config.report.top_products_limit,
        }
    }

    pub fn with_revenue(mut self, strategy: impl RevenueStrategy + 'static) -> Self {
        let strategy: Box<dyn RevenueStrategy> = Box::new(strategy);
        self.calculate_revenue = Some(StrategyOption::Callable(strategy));
        self
    }

    pub fn with_bonus(mut self, strategy: impl BonusStrategy + 'static) -> Self {
        let strategy: Box<dyn BonusStrategy> = Box::new(strategy);
        self.calculate_bonus = Some(StrategyOption::Callable(strategy));
        self
    }

    pub fn with_revenue_named(mut self, name: impl Into<String>) -> Self {
        self.calculate_revenue = Some(StrategyOption::Named(name.into()));
        self
    }

    pub fn with_bonus_named(mut self, name: impl Into<String>) -> Self {
        self.calculate_bonus = Some(StrategyOption::Named(name.into()));
        self
    }

    pub fn with_top_products_limit(mut self, limit: usize) -> Self {
        self.top_products_limit = limit;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::defaults()
    }
}
