//! Forecasting configuration and result models.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOOKBACK_MONTHS, DEFAULT_ROUNDING_UNIT_MINOR, MIN_BACKTEST_POINTS,
};
use crate::history::Period;

/// Immutable configuration for one forecasting run.
///
/// Every knob the engine honors lives here with an explicit default; the
/// struct is cheap to clone and never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastConfig {
    /// Number of trailing months aggregated per series.
    pub months_back: usize,
    /// Granularity emitted amounts are rounded to, in minor units.
    pub rounding_unit_minor: i64,
    /// Floor monthly savings net flow at zero before forecasting.
    pub savings_clamp_zero: bool,
    /// Series shorter than this skip model selection entirely.
    pub min_backtest_points: usize,
    /// Gradient descent epochs for the regression candidate.
    pub regression_epochs: usize,
    /// Gradient descent step size.
    pub regression_learning_rate: f64,
    /// L2 regularization strength on the regression weights.
    pub regression_l2: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            months_back: DEFAULT_LOOKBACK_MONTHS,
            rounding_unit_minor: DEFAULT_ROUNDING_UNIT_MINOR,
            savings_clamp_zero: true,
            min_backtest_points: MIN_BACKTEST_POINTS,
            regression_epochs: 280,
            regression_learning_rate: 0.05,
            regression_l2: 1e-3,
        }
    }
}

/// Identifies which candidate produced a forecast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ForecastMethod {
    Median3,
    MovingAverage3,
    Seasonal12,
    RegressionArx,
    /// Deterministic short-history blend, no model comparison.
    Fallback,
    /// Literal last observed value (rent-style fixed cost override).
    LastValue,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Median3 => "median3",
            ForecastMethod::MovingAverage3 => "movingAverage3",
            ForecastMethod::Seasonal12 => "seasonal12",
            ForecastMethod::RegressionArx => "regressionArx",
            ForecastMethod::Fallback => "fallback",
            ForecastMethod::LastValue => "lastValue",
        }
    }
}

/// One candidate's backtest outcome for a series, in major units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScore {
    pub method: ForecastMethod,
    /// Accumulated sMAPE, non-negative, lower is better.
    pub backtest_error: f64,
    pub predicted: f64,
}

/// Final post-processed forecast for one series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub period: Period,
    /// Non-negative, rounded to the configured granularity.
    pub amount_minor: i64,
    pub method: ForecastMethod,
    pub blended: bool,
}
