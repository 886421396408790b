//! Property-based integration tests for the forecasting pipeline.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use pocketplan_core::forecast::candidates::median3;
use pocketplan_core::forecast::{forecast_series, ForecastConfig, ForecastMethod};
use pocketplan_core::{Period, SeriesPoint, TimeSeries};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// Generates a random calendar month.
fn arb_period() -> impl Strategy<Value = Period> {
    (2000i32..2100, 1u32..=12).prop_map(|(year, month)| Period::new(year, month))
}

/// Generates a contiguous monthly series from random minor-unit amounts.
fn arb_series(
    amounts: impl Strategy<Value = Vec<i64>>,
) -> impl Strategy<Value = TimeSeries> {
    (amounts, arb_period()).prop_map(|(amounts, end)| {
        let window = end.window_ending_here(amounts.len());
        TimeSeries {
            points: window
                .into_iter()
                .zip(amounts)
                .map(|(period, amount_minor)| SeriesPoint {
                    period,
                    amount_minor,
                })
                .collect(),
        }
    })
}

fn arb_any_series(max_len: usize) -> impl Strategy<Value = TimeSeries> {
    arb_series(proptest::collection::vec(
        -1_000_000i64..1_000_000,
        0..=max_len,
    ))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Forecasted amounts are never negative, whatever the history looks
    /// like (including net-negative unclamped savings flows).
    #[test]
    fn prop_forecast_never_negative(
        series in arb_any_series(24),
        use_log in any::<bool>(),
    ) {
        let config = ForecastConfig::default();
        let target = series
            .points
            .last()
            .map(|p| p.period.next())
            .unwrap_or_else(|| Period::new(2025, 1));
        let forecast = forecast_series(&series, target, use_log, &config);
        prop_assert!(forecast.result.amount_minor >= 0);
    }

    /// Forecasted amounts always land on the configured rounding grid.
    #[test]
    fn prop_forecast_on_rounding_grid(
        series in arb_any_series(24),
        use_log in any::<bool>(),
    ) {
        let config = ForecastConfig::default();
        let target = Period::new(2030, 1);
        let forecast = forecast_series(&series, target, use_log, &config);
        prop_assert_eq!(
            forecast.result.amount_minor % config.rounding_unit_minor,
            0
        );
    }

    /// With a full trailing year of positive history, the forecast never
    /// exceeds the growth ceiling (1.2x the trailing-year maximum), modulo
    /// the rounding granularity.
    #[test]
    fn prop_forecast_respects_growth_ceiling(
        series in arb_series(proptest::collection::vec(1i64..1_000_000, 12..=24)),
        use_log in any::<bool>(),
    ) {
        let config = ForecastConfig::default();
        let n = series.len();
        let trailing_max = series.points[n - 12..]
            .iter()
            .map(|p| p.amount_minor)
            .max()
            .unwrap();
        let target = series.points[n - 1].period.next();
        let forecast = forecast_series(&series, target, use_log, &config);
        // Rounding to the nearest unit may push the capped value up by at
        // most half a unit.
        let bound = 1.2 * trailing_max as f64 + config.rounding_unit_minor as f64 / 2.0 + 1.0;
        prop_assert!(
            (forecast.result.amount_minor as f64) <= bound,
            "forecast {} exceeds ceiling bound {}",
            forecast.result.amount_minor,
            bound
        );
    }

    /// Series too short for backtesting take the deterministic fallback
    /// path and produce exactly the documented blend.
    #[test]
    fn prop_short_history_uses_exact_fallback(
        series in arb_series(proptest::collection::vec(-100_000i64..1_000_000, 1..=5)),
    ) {
        let config = ForecastConfig::default();
        let target = Period::new(2030, 1);
        let forecast = forecast_series(&series, target, false, &config);

        let values = series.values_major();
        let last = *values.last().unwrap();
        let expected_major = (0.7 * median3(&values) + 0.3 * last).max(0.0);
        let expected_raw = (expected_major * 100.0).round() as i64;
        let unit = config.rounding_unit_minor;
        let expected = ((expected_raw as f64 / unit as f64).round() as i64) * unit;

        prop_assert_eq!(forecast.result.method, ForecastMethod::Fallback);
        prop_assert!(!forecast.result.blended);
        prop_assert_eq!(forecast.result.amount_minor, expected);
    }

    /// The whole pipeline is deterministic: identical inputs always yield
    /// identical forecasts.
    #[test]
    fn prop_forecast_is_deterministic(
        series in arb_any_series(24),
        use_log in any::<bool>(),
    ) {
        let config = ForecastConfig::default();
        let target = Period::new(2030, 1);
        let a = forecast_series(&series, target, use_log, &config);
        let b = forecast_series(&series, target, use_log, &config);
        prop_assert_eq!(a.result, b.result);
        prop_assert_eq!(a.backtest_error, b.backtest_error);
    }
}
