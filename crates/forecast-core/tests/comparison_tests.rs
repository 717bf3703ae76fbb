use chrono::{Duration, NaiveDate};
use forecast_core::comparison::baseline::{HistoricalBaseline, SimulatedBaseline};
use forecast_core::comparison::summary::percent_change;
use forecast_core::comparison::synthesizer::{
    analyze_period_comparison, analyze_simulated_comparison, synthesize_comparison,
    ComparisonInput, Granularity, ValueKey,
};
use forecast_core::config::ComparisonConfig;
use forecast_core::{DailyForecastPoint, ForecastError};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn series_from(start: NaiveDate, n: usize) -> Vec<DailyForecastPoint> {
    (0..n)
        .map(|i| DailyForecastPoint {
            date: start + Duration::days(i as i64),
            balance: dec!(50_000) + Decimal::from(i as u64 * 250),
            inflows: dec!(3_000) + Decimal::from(i as u64 * 10),
            outflows: dec!(2_500),
            confidence: 85,
        })
        .collect()
}

fn input(granularity: Granularity) -> ComparisonInput {
    ComparisonInput {
        series: series_from(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), 30),
        granularity,
        primary_key: ValueKey::Inflows,
        secondary_key: Some(ValueKey::Outflows),
    }
}

// ---------------------------------------------------------------------------
// Simulated baseline
// ---------------------------------------------------------------------------

#[test]
fn test_seeded_comparison_is_reproducible() {
    let cfg = ComparisonConfig::default();
    let a = analyze_simulated_comparison(&input(Granularity::Month), &cfg, Some(2024)).unwrap();
    let b = analyze_simulated_comparison(&input(Granularity::Month), &cfg, Some(2024)).unwrap();
    assert_eq!(a.result, b.result);
    assert!(a.result.simulated);
    assert!(a.warnings.iter().any(|w| w.contains("simulated")));
}

#[test]
fn test_previous_values_within_configured_range() {
    let cfg = ComparisonConfig::default();
    let out = analyze_simulated_comparison(&input(Granularity::Quarter), &cfg, Some(7))
        .unwrap()
        .result;
    for p in &out.points {
        assert!(p.previous_value >= (p.current_value * dec!(0.7)).floor());
        assert!(p.previous_value <= (p.current_value * dec!(1.3)).ceil());
        let s = p.secondary.as_ref().unwrap();
        assert_eq!(s.current_value, dec!(2_500));
        assert!(s.previous_value >= dec!(1_750) && s.previous_value <= dec!(3_250));
    }
    assert!(out.secondary_summary.is_some());
}

#[test]
fn test_summary_matches_percent_change_formula() {
    let out = analyze_simulated_comparison(&input(Granularity::Year), &ComparisonConfig::default(), Some(99))
        .unwrap()
        .result;
    let current: Decimal = out.points.iter().map(|p| p.current_value).sum();
    let previous: Decimal = out.points.iter().map(|p| p.previous_value).sum();
    assert_eq!(out.summary.current_total, current);
    assert_eq!(out.summary.previous_total, previous);
    assert_eq!(
        out.summary.percent_change,
        (current - previous) / previous * dec!(100)
    );
    assert_eq!(out.summary.is_positive, out.summary.percent_change >= Decimal::ZERO);
}

#[test]
fn test_zero_previous_total_is_an_error() {
    let mut zero = input(Granularity::Month);
    for p in &mut zero.series {
        p.inflows = Decimal::ZERO;
    }
    zero.secondary_key = None;
    assert!(matches!(
        analyze_simulated_comparison(&zero, &ComparisonConfig::default(), Some(1)),
        Err(ForecastError::DivisionByZero { .. })
    ));
    assert!(percent_change(dec!(5), Decimal::ZERO).is_err());
}

#[test]
fn test_zero_secondary_previous_total_fails_whole_comparison() {
    let mut zero = input(Granularity::Month);
    for p in &mut zero.series {
        p.outflows = Decimal::ZERO;
    }
    assert!(matches!(
        analyze_simulated_comparison(&zero, &ComparisonConfig::default(), Some(1)),
        Err(ForecastError::DivisionByZero { .. })
    ));
    zero.secondary_key = None;
    assert!(analyze_simulated_comparison(&zero, &ComparisonConfig::default(), Some(1)).is_ok());
}

#[test]
fn test_narrow_factor_range_stays_within_bounds() {
    let cfg = ComparisonConfig {
        factor_min: dec!(1.0001),
        factor_max: dec!(1.0002),
        ..ComparisonConfig::default()
    };
    let mut flat = input(Granularity::Month);
    for p in &mut flat.series {
        p.inflows = dec!(1_000_000);
    }
    for seed in 0..20 {
        let out = analyze_simulated_comparison(&flat, &cfg, Some(seed)).unwrap().result;
        for p in &out.points {
            assert!(p.previous_value >= dec!(1_000_100) && p.previous_value <= dec!(1_000_200));
        }
    }

    let off_grid = ComparisonConfig {
        factor_min: dec!(1.00004),
        factor_max: dec!(1.0001),
        ..ComparisonConfig::default()
    };
    assert!(matches!(
        analyze_simulated_comparison(&flat, &off_grid, Some(1)),
        Err(ForecastError::InvalidInput { .. })
    ));
}

#[test]
fn test_empty_series_is_an_error() {
    let mut empty = input(Granularity::Month);
    empty.series.clear();
    assert!(matches!(
        analyze_simulated_comparison(&empty, &ComparisonConfig::default(), Some(1)),
        Err(ForecastError::EmptySeries { .. })
    ));
}

// ---------------------------------------------------------------------------
// Granularity switching
// ---------------------------------------------------------------------------

#[test]
fn test_switching_granularity_recomputes_labels_from_same_series() {
    let cfg = ComparisonConfig::default();
    let month = analyze_simulated_comparison(&input(Granularity::Month), &cfg, Some(5))
        .unwrap()
        .result;
    let year = analyze_simulated_comparison(&input(Granularity::Year), &cfg, Some(5))
        .unwrap()
        .result;

    assert_eq!(month.points.len(), year.points.len());
    for (m, y) in month.points.iter().zip(year.points.iter()) {
        assert_eq!(m.current_value, y.current_value);
        assert_eq!(m.display_date, y.display_date);
        // Same seed, same draw order: the simulated values match too.
        assert_eq!(m.previous_value, y.previous_value);
    }
    assert_eq!(month.points[0].display_date, "Apr 1, 2024");
    assert_eq!(month.points[0].previous_display_date, "Mar 1, 2024");
    assert_eq!(year.points[0].previous_display_date, "Apr 1, 2023");
}

// ---------------------------------------------------------------------------
// Historical baseline
// ---------------------------------------------------------------------------

#[test]
fn test_historical_baseline_is_deterministic_lookup() {
    let history = series_from(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 40);
    let mut source = HistoricalBaseline::new(&history);
    let current = ComparisonInput {
        series: series_from(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), 10),
        granularity: Granularity::Month,
        primary_key: ValueKey::Balance,
        secondary_key: None,
    };
    let out = analyze_period_comparison(&current, &ComparisonConfig::default(), &mut source)
        .unwrap();
    assert!(!out.result.simulated);
    assert!(out.warnings.is_empty());
    // Both series start at the same balance profile, so each point equals its prior-month twin.
    for p in &out.result.points {
        assert_eq!(p.current_value, p.previous_value);
    }
    assert_eq!(out.result.summary.percent_change, Decimal::ZERO);
}

#[test]
fn test_historical_baseline_missing_date() {
    let history = series_from(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), 5);
    let mut source = HistoricalBaseline::new(&history);
    let current = input(Granularity::Month);
    assert!(matches!(
        synthesize_comparison(&current, &ComparisonConfig::default(), &mut source),
        Err(ForecastError::InsufficientData(_))
    ));
}

#[test]
fn test_injected_rng_matches_seeded_helper() {
    let cfg = ComparisonConfig::default();
    let mut rng = StdRng::seed_from_u64(31);
    let mut source = SimulatedBaseline::new(&mut rng, &cfg).unwrap();
    let injected = analyze_period_comparison(&input(Granularity::Quarter), &cfg, &mut source)
        .unwrap()
        .result;
    let helper = analyze_simulated_comparison(&input(Granularity::Quarter), &cfg, Some(31))
        .unwrap()
        .result;
    assert_eq!(injected, helper);
}
