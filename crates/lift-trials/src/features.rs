//! Per-trial scalar features.

use lift_core::{Error, Result, TrialFeatures};

use crate::trial::ProcessedTrial;

/// Signed spinal flexion amplitude of an angle series (degrees).
///
/// Magnitude is `max - min`; the sign encodes the ordering of the
/// extremes: NEGATIVE when the maximum occurs before the minimum
/// (flexion), POSITIVE otherwise (extension). For repeated extreme
/// values the maximum is taken at its first occurrence and the minimum
/// at its last.
pub fn spine_flex_amplitude(angle: &[f64]) -> f64 {
    if angle.is_empty() {
        return 0.0;
    }

    let mut max_val = angle[0];
    let mut max_idx = 0usize;
    let mut min_val = angle[0];
    let mut min_idx = 0usize;

    for (i, &v) in angle.iter().enumerate() {
        if v > max_val {
            max_val = v;
            max_idx = i;
        }
        if v <= min_val {
            min_val = v;
            min_idx = i;
        }
    }

    let delta = max_val - min_val;
    if max_idx < min_idx {
        -delta
    } else {
        delta
    }
}

/// Reduce a processed trial to its flat feature row.
///
/// Pure given its inputs: re-running on identical data yields an
/// identical row.
pub fn extract(trial: &ProcessedTrial, spine_angle: &str) -> Result<TrialFeatures> {
    let max_force = trial
        .force_cut
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let spine = trial
        .angles
        .get(spine_angle)
        .ok_or_else(|| Error::MissingChannel {
            channel: spine_angle.to_string(),
        })?;

    let delta_spine_flex = spine_flex_amplitude(spine);
    let speed_spine_flex = delta_spine_flex / trial.duration;

    Ok(TrialFeatures {
        subject: trial.key.subject.clone(),
        condition: trial.key.condition.clone(),
        max_force,
        time_to_peak: trial.time_to_peak,
        duration: trial.duration,
        delta_spine_flex,
        speed_spine_flex,
        body_weight_kg: trial.body_weight_kg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexion_is_negative() {
        // Max (10) at index 2 precedes the last minimum (0) at index 5.
        let angle = [0.0, 5.0, 10.0, 8.0, 3.0, 0.0];
        let delta = spine_flex_amplitude(&angle);
        assert!((delta + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_extension_is_positive() {
        // Min first, then max: the subject extends.
        let angle = [10.0, 4.0, 2.0, 7.0, 12.0];
        let delta = spine_flex_amplitude(&angle);
        assert!((delta - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_has_zero_amplitude() {
        let angle = [45.0; 8];
        assert_eq!(spine_flex_amplitude(&angle).abs(), 0.0);
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(spine_flex_amplitude(&[]), 0.0);
    }
}
