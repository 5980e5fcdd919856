//! Movement onset/offset detection from force curvature.
//!
//! A barbell lift shows up in the ground-reaction force as two abrupt
//! jolts: one when the load starts moving and one when it is arrested.
//! Both appear as dominant positive peaks in the second derivative of the
//! smoothed force norm. The segmenter takes the two largest such peaks as
//! the movement window.
//!
//! This heuristic has no fallback for recordings with extra legitimate
//! jolts; a spurious larger peak silently wins. Fewer than two candidate
//! peaks is a hard fault.

use lift_core::{Error, Result, SegmentWindow};

use crate::filtering::ButterworthFilter;
use crate::gradient::gradient;
use crate::peaks::two_largest_peaks;

/// Filter order applied to the curvature series.
const CURVATURE_FILTER_ORDER: usize = 4;

/// Curvature filter cutoff as a fraction of Nyquist.
const CURVATURE_CUTOFF: f64 = 0.1;

/// Detect the movement window of a trial from its smoothed force norm.
///
/// Steps, in order: first and second derivative against the (possibly
/// non-uniform) time axis, zero-phase 4th-order Butterworth at 0.1 ×
/// Nyquist over the curvature, positive local maxima, the two largest
/// peaks reordered chronologically.
pub fn segment(smoothed_norm: &[f64], time: &[f64]) -> Result<SegmentWindow> {
    let d1 = gradient(smoothed_norm, time)?;
    let d2 = gradient(&d1, time)?;

    let filter = ButterworthFilter::lowpass_normalized(CURVATURE_FILTER_ORDER, CURVATURE_CUTOFF)?;
    let curvature = filter.zero_phase(&d2)?;

    match two_largest_peaks(&curvature) {
        Some((start, end)) => Ok(SegmentWindow::new(start, end)),
        None => {
            let found = crate::peaks::local_maxima(&curvature).len();
            Err(Error::InsufficientPeaks { found })
        }
    }
}
