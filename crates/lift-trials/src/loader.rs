//! The channel-loading collaborator.
//!
//! The study's recordings live in C3D containers; reading them is not this
//! crate's business. A [`ChannelSource`] hands over raw marker and analog
//! channel series plus the sampling rate, and the pipeline takes it from
//! there.

use std::collections::HashMap;

use lift_core::{Error, ForceVec, PointSeries, Result, ScalarSeries, TrialKey};

/// Raw analog channels of one recording, all at the same sampling rate.
#[derive(Debug, Clone)]
pub struct AnalogRecording {
    /// Channel name -> one scalar per sample.
    pub channels: HashMap<String, ScalarSeries>,

    /// Shared sampling rate (Hz).
    pub sampling_rate: f64,
}

/// Access to a study's raw recordings, one per trial.
pub trait ChannelSource {
    /// Raw marker trajectories (millimeters), keyed by marker name.
    fn load_markers(&self, key: &TrialKey) -> Result<HashMap<String, PointSeries>>;

    /// Raw analog channels and the trial's sampling rate.
    fn load_analogs(&self, key: &TrialKey) -> Result<AnalogRecording>;
}

/// Extract the ground-reaction force from a recording's plate channels.
///
/// The plate reports the action force; all three components are negated
/// to the reaction convention.
pub fn plate_force(recording: &AnalogRecording, plate: &str) -> Result<Vec<ForceVec>> {
    let component = |axis: &str| -> Result<&ScalarSeries> {
        let name = format!("{plate}_{axis}");
        recording
            .channels
            .get(&name)
            .ok_or(Error::MissingChannel { channel: name })
    };

    let fx = component("Fx")?;
    let fy = component("Fy")?;
    let fz = component("Fz")?;

    if fx.len() != fy.len() || fx.len() != fz.len() {
        return Err(Error::MisalignedCorrection(format!(
            "plate '{plate}' component lengths differ: {}/{}/{}",
            fx.len(),
            fy.len(),
            fz.len()
        )));
    }

    Ok(fx
        .iter()
        .zip(fy)
        .zip(fz)
        .map(|((&x, &y), &z)| ForceVec::new(-x, -y, -z))
        .collect())
}

/// In-memory [`ChannelSource`], used in tests and as the seam for format
/// adapters.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    markers: HashMap<TrialKey, HashMap<String, PointSeries>>,
    analogs: HashMap<TrialKey, AnalogRecording>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_markers(&mut self, key: TrialKey, markers: HashMap<String, PointSeries>) {
        self.markers.insert(key, markers);
    }

    pub fn insert_analogs(&mut self, key: TrialKey, recording: AnalogRecording) {
        self.analogs.insert(key, recording);
    }
}

impl ChannelSource for MemorySource {
    fn load_markers(&self, key: &TrialKey) -> Result<HashMap<String, PointSeries>> {
        self.markers
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Config(format!("no marker recording for trial {key}")))
    }

    fn load_analogs(&self, key: &TrialKey) -> Result<AnalogRecording> {
        self.analogs
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Config(format!("no analog recording for trial {key}")))
    }
}
