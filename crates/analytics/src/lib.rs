//! # Sales Report Analytics
//!
//! This crate turns a batch of sellers, products and purchase records into a
//! per-seller performance report: revenue, profit, number of sales, most sold
//! products and a rank-based bonus.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It performs no I/O and depends
//!   only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** The `SalesAnalyzer` keeps no state between calls.
//!   All running totals live inside a single call and are discarded afterwards.
//! - **Pluggable Strategies:** Revenue per line item and bonus per rank are supplied
//!   through the `RevenueStrategy` and `BonusStrategy` traits, either as values
//!   (closures work) or by the name of a built-in strategy.
//!
//! ## Public API
//!
//! - `SalesAnalyzer`: validation, aggregation, ranking and finalization.
//! - `AnalysisOptions`: the strategies and report parameters of a run.
//! - `ReportEntry`: one row of the finished report.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod strategy;

// Re-export the key components to create a clean, public-facing API.
pub use engine::SalesAnalyzer;
pub use error::AnalyticsError;
pub use report::{ReportEntry, SellerStat, TopProduct};
pub use strategy::{
    AnalysisOptions, BonusByProfit, BonusStrategy, BonusStrategyId, RevenueStrategy,
    RevenueStrategyId, SimpleRevenue, StrategyOption,
};
