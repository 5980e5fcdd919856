//! Study configuration.
//!
//! Everything the pipeline needs to know about a study is injected here:
//! the subject and condition roster, the marker protocol, the angle
//! definitions, and the per-trial manual correction table. Nothing of
//! this is hard-coded in the processing stages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lift_core::{CorrectionSpec, Error, Result};

fn default_marker_cutoff() -> f64 {
    10.0
}

fn default_smoothing_window() -> f64 {
    0.3
}

fn default_spine_angle() -> String {
    "spine_angle".to_string()
}

/// One inter-segment angle: segment 1 runs p1 -> p2, segment 2 runs
/// p3 -> p4. All four name aggregated marker groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleDefinition {
    pub p1: String,
    pub p2: String,
    pub p3: String,
    pub p4: String,
}

impl AngleDefinition {
    pub fn new(
        p1: impl Into<String>,
        p2: impl Into<String>,
        p3: impl Into<String>,
        p4: impl Into<String>,
    ) -> Self {
        Self {
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
            p4: p4.into(),
        }
    }
}

/// Complete study configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Subject codes, in processing order.
    pub subjects: Vec<String>,

    /// Condition codes, in processing order.
    pub conditions: Vec<String>,

    /// Force-plate channel prefix; components are `<prefix>_Fx/_Fy/_Fz`.
    pub force_plate: String,

    /// Marker low-pass cutoff (Hz).
    #[serde(default = "default_marker_cutoff")]
    pub marker_cutoff_hz: f64,

    /// Force-norm smoothing window (s).
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window_secs: f64,

    /// Marker group name -> constituent marker channel names.
    pub marker_groups: BTreeMap<String, Vec<String>>,

    /// Angle name -> marker-group quadruple.
    pub angles: BTreeMap<String, AngleDefinition>,

    /// Which angle series feeds the spinal flexion features.
    #[serde(default = "default_spine_angle")]
    pub spine_angle: String,

    /// Manual per-trial corrections, keyed by `"{subject}_{condition}"`.
    #[serde(default)]
    pub corrections: BTreeMap<String, CorrectionSpec>,
}

impl Default for StudyConfig {
    /// The deadlift study protocol: marker groups and angle definitions
    /// as placed in the laboratory; roster and corrections are per-study
    /// data and start empty.
    fn default() -> Self {
        let mut marker_groups = BTreeMap::new();
        for (group, members) in [
            ("hip_l", vec!["LGD"]),
            ("hip_r", vec!["RGD"]),
            ("trunkBase", vec!["LGD", "RGD"]),
            ("T4", vec!["T4"]),
            ("T8", vec!["T8"]),
            ("C7", vec!["C7"]),
            ("JLS", vec!["JLS"]),
            ("trunkMid", vec!["STRN", "T8"]),
            ("sternum", vec!["STRN"]),
            ("knee_r", vec!["RKNE", "RKNI"]),
            ("knee_l", vec!["LKNE", "LKNI"]),
            ("ankle_r", vec!["RANE", "RANI"]),
            ("ankle_l", vec!["LANE", "LANI"]),
            ("shoulder_l", vec!["LSHO"]),
            ("shoulder_r", vec!["RSHO"]),
            ("elbow_r", vec!["RRAD", "RHUM"]),
            ("elbow_l", vec!["LRAD", "LHUM"]),
            ("wrist_r", vec!["RWRB", "RWRA"]),
            ("wrist_l", vec!["LWRB", "LWRA"]),
        ] {
            marker_groups.insert(
                group.to_string(),
                members.into_iter().map(String::from).collect(),
            );
        }

        let mut angles = BTreeMap::new();
        angles.insert(
            "hipr_angle".to_string(),
            AngleDefinition::new("trunkBase", "trunkMid", "hip_r", "knee_r"),
        );
        angles.insert(
            "hipl_angle".to_string(),
            AngleDefinition::new("trunkBase", "trunkMid", "hip_l", "knee_l"),
        );
        angles.insert(
            "kneel_angle".to_string(),
            AngleDefinition::new("knee_l", "ankle_l", "knee_l", "hip_l"),
        );
        angles.insert(
            "kneer_angle".to_string(),
            AngleDefinition::new("knee_r", "ankle_r", "knee_r", "hip_r"),
        );
        angles.insert(
            "spine_angle".to_string(),
            AngleDefinition::new("T8", "C7", "T8", "JLS"),
        );

        Self {
            subjects: Vec::new(),
            conditions: Vec::new(),
            force_plate: "Amti Gen 5 BP6001200-2K-CT_1".to_string(),
            marker_cutoff_hz: default_marker_cutoff(),
            smoothing_window_secs: default_smoothing_window(),
            marker_groups,
            angles,
            spine_angle: default_spine_angle(),
            corrections: BTreeMap::new(),
        }
    }
}

impl StudyConfig {
    /// Load configuration from a file, with `LIFT_*` environment
    /// variables taking precedence.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("LIFT"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("LIFT"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Basic sanity checks before a run.
    pub fn validate(&self) -> Result<()> {
        for (group, members) in &self.marker_groups {
            if members.is_empty() {
                return Err(Error::Config(format!(
                    "marker group '{group}' has no constituent markers"
                )));
            }
        }
        if !self.angles.contains_key(&self.spine_angle) {
            return Err(Error::Config(format!(
                "spine angle '{}' is not among the defined angles",
                self.spine_angle
            )));
        }
        Ok(())
    }
}
