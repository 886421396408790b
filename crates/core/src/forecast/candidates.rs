//! Parameter-free baseline candidates.
//!
//! Each candidate is a pure function from a history of major-unit values
//! to a single next-value prediction. Short or empty input degrades to a
//! safe default instead of erroring.

/// Median of the last three points (fewer if the history is shorter).
pub fn median3(history: &[f64]) -> f64 {
    let tail_len = history.len().min(3);
    if tail_len == 0 {
        return 0.0;
    }
    let mut tail: Vec<f64> = history[history.len() - tail_len..].to_vec();
    tail.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = tail.len() / 2;
    if tail.len() % 2 == 1 {
        tail[mid]
    } else {
        (tail[mid - 1] + tail[mid]) / 2.0
    }
}

/// Arithmetic mean of the last three points (fewer if shorter).
pub fn moving_average3(history: &[f64]) -> f64 {
    let tail_len = history.len().min(3);
    if tail_len == 0 {
        return 0.0;
    }
    let tail = &history[history.len() - tail_len..];
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Value from 12 periods back when a full year exists, else the last
/// observed value.
pub fn seasonal12(history: &[f64]) -> f64 {
    let n = history.len();
    if n >= 12 {
        history[n - 12]
    } else {
        history.last().copied().unwrap_or(0.0)
    }
}
