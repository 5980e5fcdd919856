//! Fundamental types for the liftkin trial analysis pipeline.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Standard gravitational acceleration (m/s²), used to convert static
/// vertical force into body mass.
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Anonymized subject code, e.g. `"HUN"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectCode(pub String);

impl SubjectCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Experimental condition code, e.g. `"NB"`, `"LB"`, `"WB"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Condition(pub String);

impl Condition {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one recording session: a subject performing one condition.
///
/// Renders as `"{subject}_{condition}"`, which is also the study's file
/// naming scheme and the key of the correction table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrialKey {
    pub subject: SubjectCode,
    pub condition: Condition,
}

impl TrialKey {
    pub fn new(subject: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            subject: SubjectCode::new(subject),
            condition: Condition::new(condition),
        }
    }
}

impl fmt::Display for TrialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.subject, self.condition)
    }
}

/// 3D marker position in laboratory coordinates (meters after aggregation,
/// millimeters as loaded).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Direction vector from `self` to `other`.
    pub fn direction_to(&self, other: &Self) -> Vector3<f64> {
        Vector3::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }
}

/// Ground-reaction force sample in the plate's native frame (N).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceVec {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
}

impl ForceVec {
    pub fn new(fx: f64, fy: f64, fz: f64) -> Self {
        Self { fx, fy, fz }
    }

    /// Euclidean norm of the force vector.
    pub fn norm(&self) -> f64 {
        (self.fx * self.fx + self.fy * self.fy + self.fz * self.fz).sqrt()
    }

    /// Vertical (third) component, the one carrying body weight.
    pub fn vertical(&self) -> f64 {
        self.fz
    }
}

/// One scalar per timestamp; sampling rate is shared across all series of a
/// trial and assumed constant.
pub type ScalarSeries = Vec<f64>;

/// One 3D point per timestamp.
pub type PointSeries = Vec<Point3>;

/// Manual per-trial artifact correction, applied before any downstream
/// computation. At most one deletion range per trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSpec {
    /// Constant subtracted from the vertical force component (N).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,

    /// Inclusive sample index range removed from both the force and the
    /// time series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<(usize, usize)>,
}

impl CorrectionSpec {
    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.delete.is_none()
    }
}

/// Movement window into a trial's corrected series, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentWindow {
    pub start: usize,
    pub end: usize,
}

impl SegmentWindow {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    /// Number of samples in the window, inclusive bounds.
    pub fn samples(&self) -> usize {
        self.end - self.start + 1
    }

    /// Movement duration given the trial's sampling rate.
    pub fn duration_secs(&self, sampling_rate: f64) -> f64 {
        (self.end - self.start) as f64 / sampling_rate
    }
}

/// Flat per-trial feature row; immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialFeatures {
    pub subject: SubjectCode,
    pub condition: Condition,
    /// Maximum of the truncated, smoothed force norm (N).
    pub max_force: f64,
    /// Timestamp of the force maximum in the corrected (untruncated) time
    /// series (s).
    pub time_to_peak: f64,
    /// Movement duration (s).
    pub duration: f64,
    /// Signed spinal flexion amplitude (degrees); negative when the angle
    /// maximum precedes the minimum.
    pub delta_spine_flex: f64,
    /// Mean flexion speed over the movement (degrees/s).
    pub speed_spine_flex: f64,
    /// Estimated static body weight (kg).
    pub body_weight_kg: f64,
}
