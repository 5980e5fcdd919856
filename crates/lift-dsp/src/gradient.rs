//! Numerical gradient against a time coordinate.

use lift_core::{Error, Result};

/// Second-order accurate gradient of `f` with respect to `t`.
///
/// The time axis may be non-uniform (sample-range deletion leaves a jump
/// in the timestamps), so interior samples use the weighted central
/// difference for unequal spacing; the endpoints fall back to one-sided
/// differences.
pub fn gradient(f: &[f64], t: &[f64]) -> Result<Vec<f64>> {
    if f.len() != t.len() {
        return Err(Error::MisalignedCorrection(format!(
            "series length {} does not match time length {}",
            f.len(),
            t.len()
        )));
    }
    if f.len() < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            available: f.len(),
        });
    }

    let n = f.len();
    let mut out = vec![0.0; n];

    out[0] = (f[1] - f[0]) / (t[1] - t[0]);
    out[n - 1] = (f[n - 1] - f[n - 2]) / (t[n - 1] - t[n - 2]);

    for i in 1..n - 1 {
        let hm = t[i] - t[i - 1];
        let hp = t[i + 1] - t[i];
        out[i] = (hm * hm * f[i + 1] + (hp * hp - hm * hm) * f[i] - hp * hp * f[i - 1])
            / (hm * hp * (hm + hp));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_spacing() {
        // f = x², df/dx exact at interior points for a quadratic.
        let f = vec![0.0, 1.0, 4.0, 9.0, 16.0];
        let t = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let g = gradient(&f, &t).unwrap();
        assert_eq!(g, vec![1.0, 2.0, 4.0, 6.0, 7.0]);
    }

    #[test]
    fn test_nonuniform_spacing() {
        let f = vec![0.0, 1.0, 4.0, 9.0, 16.0];
        let t = vec![0.0, 1.0, 3.0, 4.0, 5.0];
        let g = gradient(&f, &t).unwrap();
        let expected = [1.0, 7.0 / 6.0, 23.0 / 6.0, 6.0, 7.0];
        for (a, e) in g.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_signal_has_constant_slope() {
        let t: Vec<f64> = (0..50).map(|i| i as f64 * 0.01).collect();
        let f: Vec<f64> = t.iter().map(|ti| 3.0 * ti - 1.0).collect();
        let g = gradient(&f, &t).unwrap();
        for v in g {
            assert!((v - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let err = gradient(&[1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::MisalignedCorrection(_)));
    }

    #[test]
    fn test_too_short() {
        assert!(gradient(&[1.0], &[0.0]).is_err());
    }
}
