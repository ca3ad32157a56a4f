use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for a report run.
///
/// Every section is optional in `report.toml`; omitted sections fall back to
/// the reference behaviour (simple revenue, 15/10/5 bonus bands, top 10 products).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strategies: Strategies,
    #[serde(default)]
    pub bonus: BonusParams,
    #[serde(default)]
    pub report: ReportSettings,
}

/// Names of the revenue and bonus strategies to plug into the analyzer.
///
/// A name is resolved by the analytics crate; an absent name is reported as a
/// missing option rather than silently defaulted once the section is present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Strategies {
    pub calculate_revenue: Option<String>,
    pub calculate_bonus: Option<String>,
}

/// Percentages of profit paid out per rank band by the profit-based bonus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BonusParams {
    /// Paid to the seller ranked first (e.g. 0.15 for 15%).
    pub top_pct: Decimal,
    /// Paid to the sellers ranked second and third.
    pub runner_up_pct: Decimal,
    /// Paid to everyone else except the last-ranked seller, who gets nothing.
    pub default_pct: Decimal,
}

/// Contains parameters for shaping the final report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSettings {
    /// Maximum number of entries in each seller's `top_products` list.
    #[serde(default = "default_top_products_limit")]
    pub top_products_limit: usize,
    /// How the CLI renders the report.
    #[serde(default)]
    pub format: ReportFormat,
}

/// Output rendering for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

fn default_top_products_limit() -> usize {
    10
}

// --- Default Implementations ---

impl Default for Strategies {
    fn default() -> Self {
        Self {
            calculate_revenue: Some("simple".to_string()),
            calculate_bonus: Some("by_profit".to_string()),
        }
    }
}

impl Default for BonusParams {
    fn default() -> Self {
        Self {
            top_pct: dec!(0.15),
            runner_up_pct: dec!(0.10),
            default_pct: dec!(0.05),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_products_limit: default_top_products_limit(),
            format: ReportFormat::default(),
        }
    }
}
