// Property-based tests for the sales report invariants.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use analytics::report::round_money;
use analytics::{AnalysisOptions, SalesAnalyzer};
use core_types::{Dataset, LineItem, Product, PurchaseRecord, Seller};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Money with two decimal places, 0.00 ..= 500.00.
fn arb_money() -> impl Strategy<Value = Decimal> {
    (0i64..=50_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_item(sku_count: usize) -> impl Strategy<Value = LineItem> {
    (0..sku_count, 1u32..=20, 0u32..=50, arb_money()).prop_map(
        |(sku, quantity, discount, sale_price)| LineItem {
            sku: format!("SKU_{sku:03}"),
            quantity,
            discount: Decimal::from(discount),
            sale_price,
        },
    )
}

/// A referentially consistent dataset: every record points at a known seller
/// and every line item at a known sku.
fn arb_dataset() -> impl Strategy<Value = Dataset> {
    (1usize..=8, 1usize..=25).prop_flat_map(|(seller_count, sku_count)| {
        let products = prop::collection::vec(arb_money(), sku_count).prop_map(|prices| {
            prices
                .into_iter()
                .enumerate()
                .map(|(i, purchase_price)| Product {
                    sku: format!("SKU_{i:03}"),
                    purchase_price,
                })
                .collect::<Vec<_>>()
        });
        let record = (
            0..seller_count,
            arb_money(),
            prop::collection::vec(arb_item(sku_count), 1..=15),
        )
            .prop_map(|(seller, total_amount, items)| PurchaseRecord {
                seller_id: format!("seller_{seller}"),
                total_amount,
                items,
            });
        let records = prop::collection::vec(record, 1..=40);

        (products, records).prop_map(move |(products, purchase_records)| Dataset {
            sellers: (0..seller_count)
                .map(|i| Seller {
                    id: format!("seller_{i}"),
                    first_name: format!("Name{i}"),
                    last_name: "Tester".to_string(),
                })
                .collect(),
            products,
            purchase_records,
        })
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_128())]

    #[test]
    fn sales_counts_add_up_to_record_count(dataset in arb_dataset()) {
        let report = SalesAnalyzer::new()
            .analyze(Some(&dataset), &AnalysisOptions::defaults())
            .unwrap();

        prop_assert_eq!(report.len(), dataset.sellers.len());
        let total: usize = report.iter().map(|e| e.sales_count).sum();
        prop_assert_eq!(total, dataset.purchase_records.len());
    }

    #[test]
    fn report_is_sorted_by_profit(dataset in arb_dataset()) {
        let report = SalesAnalyzer::new()
            .analyze(Some(&dataset), &AnalysisOptions::defaults())
            .unwrap();

        for pair in report.windows(2) {
            prop_assert!(pair[0].profit >= pair[1].profit);
        }
    }

    #[test]
    fn top_seller_earns_fifteen_percent(dataset in arb_dataset()) {
        let report = SalesAnalyzer::new()
            .analyze(Some(&dataset), &AnalysisOptions::defaults())
            .unwrap();

        // The bonus is taken from the unrounded profit, so allow one cent of drift.
        let expected = round_money(dec!(0.15) * report[0].profit);
        prop_assert!((report[0].bonus - expected).abs() <= dec!(0.01));
    }

    #[test]
    fn top_products_are_bounded_and_descending(dataset in arb_dataset()) {
        let report = SalesAnalyzer::new()
            .analyze(Some(&dataset), &AnalysisOptions::defaults())
            .unwrap();

        for entry in &report {
            prop_assert!(entry.top_products.len() <= 10);
            for pair in entry.top_products.windows(2) {
                prop_assert!(pair[0].quantity >= pair[1].quantity);
            }
        }
    }

    #[test]
    fn same_input_gives_same_report(dataset in arb_dataset()) {
        let analyzer = SalesAnalyzer::new();
        let first = analyzer.analyze(Some(&dataset), &AnalysisOptions::defaults()).unwrap();
        let second = analyzer.analyze(Some(&dataset), &AnalysisOptions::defaults()).unwrap();

        prop_assert_eq!(first, second);
    }
}
