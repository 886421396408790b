/// Default number of trailing months aggregated into each history series.
pub const DEFAULT_LOOKBACK_MONTHS: usize = 12;

/// Minimum number of historical points before candidate backtesting is
/// attempted; shorter series use the deterministic fallback blend.
pub const MIN_BACKTEST_POINTS: usize = 6;

/// Minimum history length before the regression candidate can train
/// (two lags plus at least two training rows).
pub const MIN_REGRESSION_POINTS: usize = 4;

/// Default rounding granularity for emitted amounts, in minor currency units.
pub const DEFAULT_ROUNDING_UNIT_MINOR: i64 = 100;

/// Ceiling applied to forecasts relative to the trailing-year maximum.
pub const GROWTH_CEILING_FACTOR: f64 = 1.2;

/// Weight of the model value in the exponential smoothing step against the
/// last actual (`smoothed = EMA_MODEL_WEIGHT * model + (1 - w) * last`).
pub const EMA_MODEL_WEIGHT: f64 = 0.7;

/// Relative tolerance for blending the regression forecast into the winning
/// baseline (regression error within 10% of the baseline error).
pub const BLEND_TOLERANCE: f64 = 0.10;

/// Number of day-to-day categories kept when none has nonzero activity.
pub const DTD_FALLBACK_TOP_N: usize = 8;
