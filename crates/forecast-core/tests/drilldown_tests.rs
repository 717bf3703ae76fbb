use chrono::Datelike;
use forecast_core::config::DrilldownConfig;
use forecast_core::drilldown::transactions::{
    drilldown_month, drilldown_series, drilldown_series_seeded, generate_transactions,
    TransactionCategory,
};
use forecast_core::{ForecastError, MonthlyForecastPoint};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;

fn months() -> Vec<MonthlyForecastPoint> {
    ["2024-01", "2024-02", "Mar 2024", "April 2024"]
        .iter()
        .map(|label| MonthlyForecastPoint {
            month: label.to_string(),
            inflows: dec!(120_000),
            outflows: dec!(95_000),
            balance: dec!(400_000),
            confidence: 70,
        })
        .collect()
}

#[test]
fn test_count_in_range_and_sorted_by_date() {
    let mut rng = StdRng::seed_from_u64(2024);
    let cfg = DrilldownConfig::default();
    for _ in 0..100 {
        for m in &months() {
            let txs = generate_transactions(m, &cfg, &mut rng).unwrap();
            assert!((5..=10).contains(&txs.len()), "count {}", txs.len());
            assert!(txs.windows(2).all(|w| w[0].date <= w[1].date));
        }
    }
}

#[test]
fn test_dates_fall_inside_the_month() {
    let mut rng = StdRng::seed_from_u64(17);
    let m = &months()[1];
    for _ in 0..50 {
        let d = drilldown_month(m, &DrilldownConfig::default(), &mut rng).unwrap();
        for t in &d.transactions {
            assert_eq!((t.date.year(), t.date.month()), (2024, 2));
        }
        assert_eq!(d.period_end.day(), 29);
    }
}

#[test]
fn test_income_share_roughly_sixty_percent() {
    let mut rng = StdRng::seed_from_u64(1);
    let cfg = DrilldownConfig::default();
    let (mut income, mut total) = (0usize, 0usize);
    for _ in 0..400 {
        let txs = generate_transactions(&months()[0], &cfg, &mut rng).unwrap();
        total += txs.len();
        income += txs
            .iter()
            .filter(|t| t.category == TransactionCategory::Income)
            .count();
    }
    let share = income as f64 / total as f64;
    assert!((0.55..0.65).contains(&share), "income share {share}");
}

#[test]
fn test_seeded_series_is_reproducible() {
    let cfg = DrilldownConfig::default();
    let a = drilldown_series_seeded(&months(), &cfg, Some(77)).unwrap();
    let b = drilldown_series_seeded(&months(), &cfg, Some(77)).unwrap();
    assert_eq!(a.result, b.result);
    assert_eq!(a.result.len(), 4);
    assert!(a.warnings.iter().any(|w| w.contains("do not reconcile")));
}

#[test]
fn test_fixed_count_configuration() {
    let cfg = DrilldownConfig {
        min_transactions: 7,
        max_transactions: 7,
        ..DrilldownConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(4);
    let out = drilldown_series(&months(), &cfg, &mut rng).unwrap();
    assert!(out.result.iter().all(|m| m.transaction_count == 7));
}

#[test]
fn test_bad_month_label_is_date_error() {
    let mut bad = months();
    bad[2].month = "Q3".to_string();
    let mut rng = StdRng::seed_from_u64(4);
    assert!(matches!(
        drilldown_series(&bad, &DrilldownConfig::default(), &mut rng),
        Err(ForecastError::DateError(_))
    ));
}
