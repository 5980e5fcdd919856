//! Centered moving-average smoothing.

/// Number of samples covered by a smoothing window of `duration_secs` at
/// the given sampling rate.
pub fn window_samples(duration_secs: f64, sampling_rate: f64) -> usize {
    (duration_secs * sampling_rate).round() as usize
}

/// Centered moving average with same-length convolution semantics.
///
/// Equivalent to convolving with a uniform kernel of `window` taps and
/// keeping the centered slice: output length equals input length, and
/// samples near the edges see an effectively shorter window.
pub fn moving_average(x: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || x.is_empty() {
        return x.to_vec();
    }

    let n = x.len();
    let half = (window - 1) / 2;
    let inv = 1.0 / window as f64;
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        // Center of the full-convolution window for output sample i.
        let k = i + half;
        let lo = k.saturating_sub(window - 1);
        let hi = k.min(n - 1);
        let sum: f64 = x[lo..=hi].iter().sum();
        out.push(sum * inv);
    }

    out
}
