//! Model selection and post-processing policies.
//!
//! For each series: score every candidate with the rolling-origin
//! backtester, pick the lowest error, blend the regression forecast into
//! the winner when their errors are close, then apply the monotone policy
//! chain (non-negativity, growth ceiling, rounding).

use log::debug;

use super::backtest::backtest;
use super::candidates::{median3, moving_average3, seasonal12};
use super::forecast_model::{CandidateScore, ForecastConfig, ForecastMethod, ForecastResult};
use super::regression::ArxRegression;
use crate::constants::{BLEND_TOLERANCE, EMA_MODEL_WEIGHT, GROWTH_CEILING_FACTOR};
use crate::history::{Period, TimeSeries};

/// A forecast together with the evidence behind it.
#[derive(Debug, Clone)]
pub struct SeriesForecast {
    pub result: ForecastResult,
    /// Scored candidates, empty on the short-history fallback path.
    pub candidates: Vec<CandidateScore>,
    /// Backtest error of the chosen candidate, `None` on the fallback path.
    pub backtest_error: Option<f64>,
}

/// Forecasts one series for `target`.
///
/// Series shorter than the configured minimum skip model comparison
/// entirely and return the deterministic fallback blend; everything else
/// runs the full candidate/backtest/selection/policy pipeline.
pub fn forecast_series(
    series: &TimeSeries,
    target: Period,
    use_log: bool,
    config: &ForecastConfig,
) -> SeriesForecast {
    let values = series.values_major();
    let n = values.len();
    let last = values.last().copied().unwrap_or(0.0);

    if n < config.min_backtest_points {
        // Too sparse for reliable model comparison.
        let value = ema_toward_last(median3(&values), last).max(0.0);
        return SeriesForecast {
            result: ForecastResult {
                period: target,
                amount_minor: round_major_to_unit(value, config.rounding_unit_minor),
                method: ForecastMethod::Fallback,
                blended: false,
            },
            candidates: Vec::new(),
            backtest_error: None,
        };
    }

    let mut candidates = vec![
        CandidateScore {
            method: ForecastMethod::Median3,
            backtest_error: backtest(&values, 3, median3),
            predicted: median3(&values),
        },
        CandidateScore {
            method: ForecastMethod::MovingAverage3,
            backtest_error: backtest(&values, 3, moving_average3),
            predicted: moving_average3(&values),
        },
        CandidateScore {
            method: ForecastMethod::Seasonal12,
            backtest_error: backtest(&values, 12.min(n - 1), seasonal12),
            predicted: seasonal12(&values),
        },
    ];

    // Declaration order breaks ties, keeping selection deterministic.
    let best_base = candidates
        .iter()
        .cloned()
        .min_by(|a, b| {
            a.backtest_error
                .partial_cmp(&b.backtest_error)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("baseline candidates are never empty");

    let start = series
        .points
        .first()
        .map(|p| p.period)
        .unwrap_or(target);
    let trainer = ArxRegression::new(
        use_log,
        config.regression_epochs,
        config.regression_learning_rate,
        config.regression_l2,
    );
    let regression = trainer.evaluate(&values, start).map(|outcome| {
        // Dampen single-step overreaction before comparison/blending.
        let smoothed = ema_toward_last(outcome.next, last);
        CandidateScore {
            method: ForecastMethod::RegressionArx,
            backtest_error: outcome.backtest_error,
            predicted: smoothed,
        }
    });
    if let Some(score) = &regression {
        candidates.push(score.clone());
    }

    let (value, method, blended, error) = match &regression {
        Some(reg)
            if reg.backtest_error.is_finite()
                && reg.backtest_error <= (1.0 + BLEND_TOLERANCE) * best_base.backtest_error =>
        {
            let method = if reg.backtest_error < best_base.backtest_error {
                ForecastMethod::RegressionArx
            } else {
                best_base.method
            };
            (
                0.5 * best_base.predicted + 0.5 * reg.predicted,
                method,
                true,
                reg.backtest_error.min(best_base.backtest_error),
            )
        }
        _ => (
            best_base.predicted,
            best_base.method,
            false,
            best_base.backtest_error,
        ),
    };

    let amount_minor = clamp_and_round(value, &values, config);
    debug!(
        "forecast {}: method={} blended={} error={:.4} amount_minor={}",
        target,
        method.as_str(),
        blended,
        error,
        amount_minor
    );

    SeriesForecast {
        result: ForecastResult {
            period: target,
            amount_minor,
            method,
            blended,
        },
        candidates,
        backtest_error: Some(error),
    }
}

/// Exponential smoothing toward the last actual:
/// `0.7 * model + 0.3 * last`.
pub(crate) fn ema_toward_last(model: f64, last: f64) -> f64 {
    EMA_MODEL_WEIGHT * model + (1.0 - EMA_MODEL_WEIGHT) * last
}

/// The policy chain, applied in order: non-negativity, growth ceiling
/// against the trailing year, rounding to the configured granularity.
pub(crate) fn clamp_and_round(value: f64, values: &[f64], config: &ForecastConfig) -> i64 {
    let mut value = value.max(0.0);
    let n = values.len();
    if n >= 12 {
        let trailing_max = values[n - 12..]
            .iter()
            .fold(0.0f64, |acc, &v| acc.max(v));
        if trailing_max > 0.0 {
            value = value.min(GROWTH_CEILING_FACTOR * trailing_max);
        }
    }
    round_major_to_unit(value, config.rounding_unit_minor)
}

/// Rounds a major-unit value to the nearest multiple of `unit_minor`,
/// returned in minor units.
pub(crate) fn round_major_to_unit(value: f64, unit_minor: i64) -> i64 {
    round_minor_to_unit((value * 100.0).round() as i64, unit_minor)
}

/// Rounds a minor-unit amount to the nearest multiple of `unit_minor`.
pub fn round_minor_to_unit(amount_minor: i64, unit_minor: i64) -> i64 {
    if unit_minor <= 1 {
        return amount_minor;
    }
    let unit = unit_minor as f64;
    ((amount_minor as f64 / unit).round() as i64) * unit_minor
}
