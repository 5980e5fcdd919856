//! The trial entity and batch orchestration.
//!
//! One trial is fully processed before the next begins; its intermediate
//! series live on the trial and are dropped once the feature row exists.
//! The sampling rate is stored per trial and used explicitly everywhere.

use std::collections::BTreeMap;

use tracing::{debug, info};

use lift_core::{
    Condition, PointSeries, Result, ScalarSeries, SegmentWindow, SubjectCode, TrialKey,
    STANDARD_GRAVITY,
};
use lift_dsp::segment;

use crate::angles::compute_angles;
use crate::config::StudyConfig;
use crate::export::FeatureTable;
use crate::features::extract;
use crate::force::{apply_correction, body_weight_kg, reaction_norm, smooth_norm};
use crate::loader::{plate_force, ChannelSource};
use crate::markers::aggregate;

/// A fully processed trial: everything downstream feature extraction
/// needs, nothing more.
#[derive(Debug, Clone)]
pub struct ProcessedTrial {
    pub key: TrialKey,
    pub sampling_rate: f64,

    /// Estimated static body weight (kg).
    pub body_weight_kg: f64,

    /// Movement window into the corrected series.
    pub window: SegmentWindow,

    /// Movement duration (s).
    pub duration: f64,

    /// Timestamp of the force peak in the corrected, untruncated time
    /// series (s).
    pub time_to_peak: f64,

    /// Smoothed reaction norm truncated to the movement window.
    pub force_cut: ScalarSeries,

    /// Corrected timestamps truncated to the movement window.
    pub time_cut: ScalarSeries,

    /// Aggregated marker groups truncated to the movement window.
    pub markers_cut: BTreeMap<String, PointSeries>,

    /// Filtered joint angle series over the movement window (degrees).
    pub angles: BTreeMap<String, ScalarSeries>,
}

/// Runs the per-trial stages against a [`ChannelSource`].
pub struct TrialPipeline<'a> {
    config: &'a StudyConfig,
}

impl<'a> TrialPipeline<'a> {
    pub fn new(config: &'a StudyConfig) -> Self {
        Self { config }
    }

    /// Process one trial end to end. Any fault comes back tagged with the
    /// trial identifier.
    pub fn process<S: ChannelSource>(&self, source: &S, key: &TrialKey) -> Result<ProcessedTrial> {
        self.process_inner(source, key).map_err(|e| e.for_trial(key))
    }

    fn process_inner<S: ChannelSource>(
        &self,
        source: &S,
        key: &TrialKey,
    ) -> Result<ProcessedTrial> {
        let recording = source.load_analogs(key)?;
        let rate = recording.sampling_rate;

        let raw_markers = source.load_markers(key)?;
        let markers = aggregate(
            &raw_markers,
            &self.config.marker_groups,
            rate,
            self.config.marker_cutoff_hz,
        )?;

        let mut force = plate_force(&recording, &self.config.force_plate)?;
        let mut time: ScalarSeries = (0..force.len()).map(|i| i as f64 / rate).collect();

        if let Some(spec) = self.config.corrections.get(&key.to_string()) {
            debug!(trial = %key, ?spec, "applying manual correction");
            apply_correction(&mut force, &mut time, spec)?;
        }

        let body_weight = body_weight_kg(&force, rate)?;
        let norm = reaction_norm(&force, body_weight * STANDARD_GRAVITY);
        let smoothed = smooth_norm(&norm, self.config.smoothing_window_secs, rate);

        let window = segment(&smoothed, &time)?;
        debug!(
            trial = %key,
            start = window.start,
            end = window.end,
            "movement window detected"
        );

        let force_cut = smoothed[window.start..=window.end].to_vec();
        let time_cut = time[window.start..=window.end].to_vec();
        let markers_cut: BTreeMap<String, PointSeries> = markers
            .into_iter()
            .map(|(name, series)| {
                let end = window.end.min(series.len().saturating_sub(1));
                (name, series[window.start.min(end)..=end].to_vec())
            })
            .collect();

        let angles = compute_angles(&markers_cut, &self.config.angles)?;

        let peak_offset = force_cut
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).expect("force norm is finite"))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let time_to_peak = time[window.start + peak_offset];

        Ok(ProcessedTrial {
            key: key.clone(),
            sampling_rate: rate,
            body_weight_kg: body_weight,
            window,
            duration: window.duration_secs(rate),
            time_to_peak,
            force_cut,
            time_cut,
            markers_cut,
            angles,
        })
    }
}

/// Processes every subject × condition combination and assembles the
/// feature table, subject-major / condition-minor.
pub struct BatchRunner {
    config: StudyConfig,
}

impl BatchRunner {
    pub fn new(config: StudyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Run the whole study. The first trial fault aborts the batch.
    pub fn run<S: ChannelSource>(&self, source: &S) -> Result<FeatureTable> {
        self.config.validate()?;

        let pipeline = TrialPipeline::new(&self.config);
        let mut table = FeatureTable::default();

        for subject in &self.config.subjects {
            for condition in &self.config.conditions {
                let key = TrialKey {
                    subject: SubjectCode::new(subject.clone()),
                    condition: Condition::new(condition.clone()),
                };

                info!(trial = %key, "processing trial");
                let trial = pipeline.process(source, &key)?;
                let row = extract(&trial, &self.config.spine_angle)
                    .map_err(|e| e.for_trial(&key))?;

                info!(
                    trial = %key,
                    duration_s = row.duration,
                    max_force_n = row.max_force,
                    body_weight_kg = row.body_weight_kg,
                    "trial complete"
                );
                table.push(row);
            }
        }

        Ok(table)
    }
}
