//! Butterworth low-pass design and zero-phase application.
//!
//! The design path mirrors the classic analog-prototype route: place the
//! Butterworth poles on the unit circle, scale to the pre-warped cutoff,
//! and map to the z-domain with the bilinear transform. Zero-phase
//! filtering runs the filter forward and backward over the series with an
//! odd extension at both ends and steady-state initial conditions, so the
//! output has no phase lag and no startup transient.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use lift_core::{Error, Result};

/// Digital Butterworth low-pass filter as transfer-function coefficients.
#[derive(Debug, Clone)]
pub struct ButterworthFilter {
    order: usize,
    b: Vec<f64>,
    a: Vec<f64>,
}

impl ButterworthFilter {
    /// Design a low-pass filter from a cutoff in Hz.
    ///
    /// # Arguments
    /// * `order` - Filter order (2 and 4 are used in this pipeline)
    /// * `cutoff_hz` - Cutoff frequency in Hz
    /// * `sample_rate` - Sampling rate in Hz
    pub fn lowpass(order: usize, cutoff_hz: f64, sample_rate: f64) -> Result<Self> {
        Self::lowpass_normalized(order, cutoff_hz / (sample_rate / 2.0))
    }

    /// Design a low-pass filter from a cutoff expressed as a fraction of
    /// the Nyquist frequency, in (0, 1).
    pub fn lowpass_normalized(order: usize, cutoff: f64) -> Result<Self> {
        if order == 0 || order > 8 {
            return Err(Error::FilterDesign(format!(
                "unsupported filter order {order}"
            )));
        }
        if !(cutoff > 0.0 && cutoff < 1.0) {
            return Err(Error::FilterDesign(format!(
                "normalized cutoff {cutoff} outside (0, 1)"
            )));
        }

        let (b, a) = design_lowpass(order, cutoff);
        Ok(Self { order, b, a })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Numerator (feed-forward) coefficients.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Denominator (feedback) coefficients, `a[0] == 1`.
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Forward-backward (zero-phase) filtering.
    ///
    /// The series is extended at both ends by an odd reflection of
    /// `3 * order` samples before filtering, and both passes start from the
    /// filter's step-response steady state scaled to the first sample.
    /// Output length equals input length.
    pub fn zero_phase(&self, x: &[f64]) -> Result<Vec<f64>> {
        let pad = 3 * self.order;
        if x.len() <= pad {
            return Err(Error::InsufficientData {
                required: pad + 1,
                available: x.len(),
            });
        }

        let n = x.len();
        let mut ext = Vec::with_capacity(n + 2 * pad);
        for i in (1..=pad).rev() {
            ext.push(2.0 * x[0] - x[i]);
        }
        ext.extend_from_slice(x);
        for i in 1..=pad {
            ext.push(2.0 * x[n - 1] - x[n - 1 - i]);
        }

        let zi = self.steady_state()?;

        let scaled: Vec<f64> = zi.iter().map(|z| z * ext[0]).collect();
        let mut y = self.filter_with_state(&ext, &scaled);

        y.reverse();
        let scaled: Vec<f64> = zi.iter().map(|z| z * y[0]).collect();
        let mut y = self.filter_with_state(&y, &scaled);
        y.reverse();

        Ok(y[pad..pad + n].to_vec())
    }

    /// Single causal pass in direct form II transposed with the given
    /// initial state (length `order`).
    fn filter_with_state(&self, x: &[f64], zi: &[f64]) -> Vec<f64> {
        let ntaps = self.b.len();
        let mut z = zi.to_vec();
        let mut out = Vec::with_capacity(x.len());

        for &xi in x {
            let yi = self.b[0] * xi + z[0];
            for j in 0..z.len() - 1 {
                z[j] = self.b[j + 1] * xi + z[j + 1] - self.a[j + 1] * yi;
            }
            let last = z.len() - 1;
            z[last] = self.b[ntaps - 1] * xi - self.a[ntaps - 1] * yi;
            out.push(yi);
        }

        out
    }

    /// Initial filter state whose step response is already settled: the
    /// solution of `(I - Aᵀ) zi = B` for the companion form of `a`.
    fn steady_state(&self) -> Result<Vec<f64>> {
        let n = self.order;
        let mut m = DMatrix::<f64>::zeros(n, n);
        for i in 0..n {
            m[(i, 0)] += self.a[i + 1];
            m[(i, i)] += 1.0;
            if i + 1 < n {
                m[(i, i + 1)] -= 1.0;
            }
        }

        let rhs = DVector::from_fn(n, |i, _| self.b[i + 1] - self.a[i + 1] * self.b[0]);

        m.lu()
            .solve(&rhs)
            .map(|v| v.iter().copied().collect())
            .ok_or_else(|| Error::FilterDesign("singular steady-state system".into()))
    }
}

/// Butterworth low-pass coefficients via the bilinear transform.
///
/// `cutoff` is a fraction of Nyquist. Returns `(b, a)`, both of length
/// `order + 1`, with `a[0] == 1`.
fn design_lowpass(order: usize, cutoff: f64) -> (Vec<f64>, Vec<f64>) {
    let fs = 2.0;
    let warped = 2.0 * fs * (std::f64::consts::PI * cutoff / fs).tan();

    // Analog prototype poles, evenly spaced on the left half of the unit
    // circle, scaled to the warped cutoff.
    let poles: Vec<Complex64> = (0..order)
        .map(|k| {
            let theta =
                std::f64::consts::PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::from_polar(warped, theta)
        })
        .collect();

    let gain = warped.powi(order as i32);

    // Bilinear transform: s -> 2*fs*(z-1)/(z+1). Each analog pole maps to
    // (2fs + p)/(2fs - p); the transform contributes `order` zeros at -1.
    let fs2 = Complex64::new(2.0 * fs, 0.0);
    let z_poles: Vec<Complex64> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

    let denom: Complex64 = poles.iter().map(|&p| fs2 - p).product();
    let k_z = gain * (Complex64::new(1.0, 0.0) / denom).re;

    let minus_one = vec![Complex64::new(-1.0, 0.0); order];
    let b: Vec<f64> = poly_from_roots(&minus_one)
        .iter()
        .map(|c| k_z * c.re)
        .collect();
    let a: Vec<f64> = poly_from_roots(&z_poles).iter().map(|c| c.re).collect();

    (b, a)
}

/// Coefficients of the monic polynomial with the given roots.
fn poly_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= r * prev;
        }
    }
    coeffs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() < tol,
                "coefficient {i}: {a} vs expected {e}"
            );
        }
    }

    #[test]
    fn test_order2_coefficients() {
        let f = ButterworthFilter::lowpass_normalized(2, 0.2).unwrap();
        assert_close(
            f.b(),
            &[0.0674552738890719, 0.1349105477781438, 0.0674552738890719],
            1e-12,
        );
        assert_close(
            f.a(),
            &[1.0, -1.142980502539901, 0.41280159809618866],
            1e-12,
        );
    }

    #[test]
    fn test_order4_coefficients() {
        let f = ButterworthFilter::lowpass_normalized(4, 0.1).unwrap();
        assert_close(
            f.b(),
            &[
                0.00041659920440659937,
                0.0016663968176263975,
                0.002499595226439596,
                0.0016663968176263975,
                0.00041659920440659937,
            ],
            1e-12,
        );
        assert_close(
            f.a(),
            &[
                1.0,
                -3.180638548874719,
                3.8611943489942133,
                -2.1121553551109686,
                0.4382651422619798,
            ],
            1e-12,
        );
    }

    #[test]
    fn test_unity_dc_gain() {
        for order in [2usize, 4] {
            let f = ButterworthFilter::lowpass_normalized(order, 0.1).unwrap();
            let num: f64 = f.b().iter().sum();
            let den: f64 = f.a().iter().sum();
            assert!((num / den - 1.0).abs() < 1e-10, "order {order}");
        }
    }

    #[test]
    fn test_half_power_at_cutoff() {
        let f = ButterworthFilter::lowpass_normalized(4, 0.1).unwrap();
        let w = std::f64::consts::PI * 0.1;
        let z = Complex64::from_polar(1.0, -w);
        let eval = |c: &[f64]| -> Complex64 {
            c.iter()
                .enumerate()
                .map(|(k, &ck)| ck * z.powu(k as u32))
                .sum()
        };
        let mag = (eval(f.b()) / eval(f.a())).norm();
        assert!((mag - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_zero_phase_preserves_constant() {
        let f = ButterworthFilter::lowpass(2, 10.0, 100.0).unwrap();
        let x = vec![5.0; 30];
        let y = f.zero_phase(&x).unwrap();
        assert_eq!(y.len(), x.len());
        for v in y {
            assert!((v - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_phase_has_no_lag() {
        // A symmetric pulse must keep its peak at the same index.
        let f = ButterworthFilter::lowpass_normalized(4, 0.1).unwrap();
        let x: Vec<f64> = (0..101)
            .map(|i| (-((i as f64 - 50.0).powi(2)) / 50.0).exp())
            .collect();
        let y = f.zero_phase(&x).unwrap();
        let peak = y
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 50);
    }

    #[test]
    fn test_zero_phase_attenuates_high_frequency() {
        let f = ButterworthFilter::lowpass_normalized(2, 0.1).unwrap();
        // Alternating signal at Nyquist rides on a constant.
        let x: Vec<f64> = (0..200)
            .map(|i| 10.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let y = f.zero_phase(&x).unwrap();
        let ripple = y[50..150]
            .iter()
            .map(|v| (v - 10.0).abs())
            .fold(0.0, f64::max);
        assert!(ripple < 0.01, "residual ripple {ripple}");
    }

    #[test]
    fn test_zero_phase_rejects_short_input() {
        let f = ButterworthFilter::lowpass_normalized(4, 0.1).unwrap();
        let err = f.zero_phase(&[1.0; 12]).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientData {
                required: 13,
                available: 12
            }
        ));
    }

    #[test]
    fn test_invalid_design_parameters() {
        assert!(ButterworthFilter::lowpass_normalized(0, 0.1).is_err());
        assert!(ButterworthFilter::lowpass_normalized(2, 0.0).is_err());
        assert!(ButterworthFilter::lowpass_normalized(2, 1.0).is_err());
        // 10 Hz cutoff at 10 Hz sampling is past Nyquist.
        assert!(ButterworthFilter::lowpass(2, 10.0, 10.0).is_err());
    }
}
