//! Rolling-origin backtesting.
//!
//! Replays one-step-ahead forecasts across the history to estimate how a
//! candidate would have performed, scored with symmetric mean absolute
//! percentage error (sMAPE).

/// One sMAPE term with the divide-by-zero guard: when both the actual and
/// the forecast are zero the denominator degrades to 1, scoring the step
/// as a perfect hit.
pub fn smape_term(actual: f64, forecast: f64) -> f64 {
    let denom = actual.abs() + forecast.abs();
    let denom = if denom == 0.0 { 1.0 } else { denom };
    (actual - forecast).abs() / denom
}

/// Simulates one-step-ahead forecasting at every index from `min_start`
/// to the end of history, using only points `[0, k)` to predict point `k`,
/// and returns the mean sMAPE.
///
/// Returns `f64::INFINITY` when the history is too short to replay a
/// single step, so an untestable candidate can never win selection.
pub fn backtest<F>(values: &[f64], min_start: usize, predict: F) -> f64
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    if n <= min_start {
        return f64::INFINITY;
    }
    let mut total = 0.0;
    let mut steps = 0usize;
    for k in min_start..n {
        let forecast = predict(&values[..k]);
        total += smape_term(values[k], forecast);
        steps += 1;
    }
    if steps == 0 {
        f64::INFINITY
    } else {
        total / steps as f64
    }
}
