//! Trainable regression candidate.
//!
//! A linear model over trend, calendar season, and two lags (ARX), trained
//! by minimizing Huber loss with L2 regularization via plain gradient
//! descent. Weights are zero-initialized and the epoch count is fixed, so
//! training is deterministic for identical input. An optional `log1p`
//! transform stabilizes variance for heavy-tailed series such as event
//! spend.

use crate::constants::MIN_REGRESSION_POINTS;
use crate::forecast::backtest::smape_term;
use crate::history::Period;

const LAGS: usize = 2;
/// Standardized time index + 12-slot month one-hot + two lags.
const NUM_FEATURES: usize = 15;
/// Huber transition point, in standardized target units.
const HUBER_DELTA: f64 = 1.0;

/// Walk-forward error and next-value prediction for one series.
#[derive(Debug, Clone, Copy)]
pub struct RegressionOutcome {
    /// Mean sMAPE over the walk-forward retrains, `INFINITY` when the
    /// history allowed no evaluation step.
    pub backtest_error: f64,
    /// Prediction for the period immediately past the history, in major
    /// units (untransformed space). May be negative; callers clamp.
    pub next: f64,
}

/// Per-call trainer for the ARX candidate. No optimizer state survives
/// between series.
pub struct ArxRegression {
    use_log: bool,
    epochs: usize,
    learning_rate: f64,
    l2: f64,
}

impl ArxRegression {
    pub fn new(use_log: bool, epochs: usize, learning_rate: f64, l2: f64) -> Self {
        ArxRegression {
            use_log,
            epochs,
            learning_rate,
            l2,
        }
    }

    /// Walk-forward evaluation plus a final-period prediction.
    ///
    /// Each evaluation step retrains from scratch on `[0, k)` and predicts
    /// point `k`, scoring the same sMAPE metric the baseline backtester
    /// uses. Requires at least two lags plus two training rows; shorter
    /// histories yield `None`.
    pub fn evaluate(&self, values: &[f64], start: Period) -> Option<RegressionOutcome> {
        let n = values.len();
        if n < MIN_REGRESSION_POINTS {
            return None;
        }

        let mut total = 0.0;
        let mut steps = 0usize;
        for k in MIN_REGRESSION_POINTS..n {
            if let Some(pred) = self.fit_predict(&values[..k], start) {
                total += smape_term(values[k], pred);
                steps += 1;
            }
        }

        let next = self.fit_predict(values, start)?;
        let backtest_error = if steps == 0 {
            f64::INFINITY
        } else {
            total / steps as f64
        };
        Some(RegressionOutcome {
            backtest_error,
            next,
        })
    }

    /// Trains on `history` (whose first point falls in `start`) and
    /// predicts the value one step past it.
    fn fit_predict(&self, history: &[f64], start: Period) -> Option<f64> {
        let n = history.len();
        if n < MIN_REGRESSION_POINTS {
            return None;
        }

        let transformed = self.transform(history);
        let (v_mean, v_std) = mean_std(&transformed);
        let times: Vec<f64> = (LAGS..n).map(|t| t as f64).collect();
        let (t_mean, t_std) = mean_std(&times);

        let std_v = |v: f64| (v - v_mean) / v_std;
        let rows: Vec<([f64; NUM_FEATURES], f64)> = (LAGS..n)
            .map(|t| {
                let x = build_features(
                    t as f64,
                    month_slot(start, t),
                    std_v(transformed[t - 1]),
                    std_v(transformed[t - 2]),
                    t_mean,
                    t_std,
                );
                (x, std_v(transformed[t]))
            })
            .collect();

        let (weights, bias) = self.train(&rows);

        let x = build_features(
            n as f64,
            month_slot(start, n),
            std_v(transformed[n - 1]),
            std_v(transformed[n - 2]),
            t_mean,
            t_std,
        );
        let predicted_std = dot(&weights, &x) + bias;
        let predicted = predicted_std * v_std + v_mean;
        Some(if self.use_log {
            predicted.exp_m1()
        } else {
            predicted
        })
    }

    /// Full-batch gradient descent over a fixed epoch count. No early
    /// stopping, no randomness.
    fn train(&self, rows: &[([f64; NUM_FEATURES], f64)]) -> ([f64; NUM_FEATURES], f64) {
        let mut weights = [0.0f64; NUM_FEATURES];
        let mut bias = 0.0f64;
        let m = rows.len() as f64;

        for _ in 0..self.epochs {
            let mut grad_w = [0.0f64; NUM_FEATURES];
            let mut grad_b = 0.0f64;
            for (x, y) in rows {
                let residual = dot(&weights, x) + bias - y;
                let g = if residual.abs() <= HUBER_DELTA {
                    residual
                } else {
                    HUBER_DELTA * residual.signum()
                };
                for (gw, xi) in grad_w.iter_mut().zip(x.iter()) {
                    *gw += g * xi;
                }
                grad_b += g;
            }
            for (w, gw) in weights.iter_mut().zip(grad_w.iter()) {
                *w -= self.learning_rate * (gw / m + 2.0 * self.l2 * *w);
            }
            bias -= self.learning_rate * grad_b / m;
        }
        (weights, bias)
    }

    /// Clips the raw series at its 95th percentile to suppress outlier
    /// influence, then applies the optional `log1p` transform.
    fn transform(&self, values: &[f64]) -> Vec<f64> {
        let cap = percentile(values, 0.95);
        values
            .iter()
            .map(|&v| {
                let clipped = v.min(cap);
                if self.use_log {
                    clipped.max(0.0).ln_1p()
                } else {
                    clipped
                }
            })
            .collect()
    }
}

/// 0-based calendar-month slot of the period `offset` months after `start`.
fn month_slot(start: Period, offset: usize) -> usize {
    (Period::from_index(start.index() + offset as i64).month - 1) as usize
}

fn build_features(
    t: f64,
    month_slot: usize,
    lag1: f64,
    lag2: f64,
    t_mean: f64,
    t_std: f64,
) -> [f64; NUM_FEATURES] {
    let mut x = [0.0f64; NUM_FEATURES];
    x[0] = (t - t_mean) / t_std;
    x[1 + month_slot] = 1.0;
    x[13] = lag1;
    x[14] = lag2;
    x
}

fn dot(a: &[f64; NUM_FEATURES], b: &[f64; NUM_FEATURES]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Mean and standard deviation, with a unit-std fallback for degenerate
/// (constant or single-point) input so standardization never divides by
/// zero.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    (mean, if std > f64::EPSILON { std } else { 1.0 })
}

/// Linear-interpolated percentile of an unsorted slice; 0 on empty input.
pub(crate) fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = pos - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
