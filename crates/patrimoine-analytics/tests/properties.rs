//! Property-based tests for the analytics invariants.
//!
//! - CAGR inverts compound growth
//! - Maximum drawdown is never positive
//! - CVaR is at least as negative as VaR
//! - Monte Carlo percentiles are ordered at every year

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use patrimoine_analytics::monte_carlo::{AnnualEnsemble, MonteCarloSimulator};
use patrimoine_analytics::{DrawdownAnalyzer, PerformanceAnalyzer, RiskMetrics, DEFAULT_PERCENTILES};
use patrimoine_core::TimeSeries;

/// Generate a positive value path of 2..200 points
fn arb_value_path() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..10_000.0, 2..200)
}

/// Generate daily returns with at least two distinct values
fn arb_returns() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.2f64..0.2, 2..300)
        .prop_filter("needs two distinct values", |v| v.iter().any(|x| *x != v[0]))
}

/// Generate a ragged-free ensemble: sims x (years + 1)
fn arb_ensemble() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..8, 1usize..50).prop_flat_map(|(years, sims)| {
        prop::collection::vec(prop::collection::vec(0.0f64..1e6, years + 1), sims)
    })
}

fn dated(values: &[f64]) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    TimeSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (start + Duration::days(i as i64), *v))
            .collect(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn prop_cagr_round_trip(v0 in 1.0f64..1e6, r in -0.5f64..0.5, n in 1u32..40) {
        let v1 = v0 * (1.0 + r).powi(n as i32);
        let cagr = PerformanceAnalyzer::annualized_return(v0, v1, n as f64);
        prop_assert!((cagr - r * 100.0).abs() < 1e-6);
    }

    #[test]
    fn prop_max_drawdown_non_positive(values in arb_value_path()) {
        let series = dated(&values);
        let (mdd, episode) = DrawdownAnalyzer::max_drawdown(&series);
        prop_assert!(mdd <= 0.0);

        if let Some(episode) = episode {
            prop_assert!(episode.peak_date <= episode.trough_date);
            prop_assert!(episode.trough_value <= episode.peak_value);
        }
    }

    #[test]
    fn prop_non_decreasing_path_has_zero_drawdown(mut values in arb_value_path()) {
        values.sort_by(|a, b| a.total_cmp(b));
        let (mdd, episode) = DrawdownAnalyzer::max_drawdown(&dated(&values));
        prop_assert_eq!(mdd, 0.0);
        prop_assert!(episode.is_none());
    }

    #[test]
    fn prop_cvar_not_above_var(returns in arb_returns(), confidence in 0.8f64..0.995) {
        let var = RiskMetrics::value_at_risk(&returns, confidence);
        let cvar = RiskMetrics::conditional_var(&returns, confidence);
        prop_assert!(cvar <= var + 1e-9);
    }

    #[test]
    fn prop_percentiles_ordered(paths in arb_ensemble()) {
        let ensemble = AnnualEnsemble::from_paths(paths).unwrap();
        let p = MonteCarloSimulator::percentiles(&ensemble, &DEFAULT_PERCENTILES);

        for year in 0..=ensemble.years() {
            for pair in DEFAULT_PERCENTILES.windows(2) {
                prop_assert!(p[&pair[0]][year] <= p[&pair[1]][year]);
            }
        }
    }
}
