//! Force preprocessing: manual corrections, body-weight estimate,
//! reaction norm, smoothing.

use lift_core::{CorrectionSpec, Error, ForceVec, Result, ScalarSeries, STANDARD_GRAVITY};
use lift_dsp::{moving_average, window_samples};

/// Apply a trial's manual correction in place.
///
/// The offset is subtracted from the vertical component; the deletion
/// range is removed from BOTH the force and the time series so the two
/// stay index-aligned.
pub fn apply_correction(
    force: &mut Vec<ForceVec>,
    time: &mut ScalarSeries,
    spec: &CorrectionSpec,
) -> Result<()> {
    if force.len() != time.len() {
        return Err(Error::MisalignedCorrection(format!(
            "force has {} samples, time has {}",
            force.len(),
            time.len()
        )));
    }

    if let Some(offset) = spec.offset {
        for f in force.iter_mut() {
            f.fz -= offset;
        }
    }

    if let Some((start, end)) = spec.delete {
        if start > end || end >= force.len() {
            return Err(Error::MisalignedCorrection(format!(
                "deletion range {start}..={end} out of bounds for {} samples",
                force.len()
            )));
        }
        force.drain(start..=end);
        time.drain(start..=end);
    }

    Ok(())
}

/// Static body weight in kilograms, estimated from the quiescent tail.
///
/// Averages the vertical reaction over the final one-second window (the
/// last `round(rate)` samples) and divides by standard gravity. Assumes
/// the subject stands unloaded at the end of the recording.
pub fn body_weight_kg(force: &[ForceVec], sampling_rate: f64) -> Result<f64> {
    if force.is_empty() {
        return Err(Error::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    let tail = sampling_rate.round() as usize;
    let start = force.len().saturating_sub(tail);
    let window = &force[start..];

    let mean_vertical: f64 =
        window.iter().map(|f| f.vertical()).sum::<f64>() / window.len() as f64;

    Ok(mean_vertical / STANDARD_GRAVITY)
}

/// Per-sample Euclidean norm of the reaction force, minus the static
/// body-weight force, so the quiescent norm sits near zero.
pub fn reaction_norm(force: &[ForceVec], body_weight_force: f64) -> ScalarSeries {
    force.iter().map(|f| f.norm() - body_weight_force).collect()
}

/// Smooth the reaction norm with a centered moving average of
/// `window_secs` duration. Length-preserving.
pub fn smooth_norm(norm: &[f64], window_secs: f64, sampling_rate: f64) -> ScalarSeries {
    moving_average(norm, window_samples(window_secs, sampling_rate))
}
