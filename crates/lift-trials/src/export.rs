//! The trial feature table and its thin serialization adapters.

use serde::{Deserialize, Serialize};

use lift_core::{Result, SubjectCode, TrialFeatures};

/// Output column order of the study's feature table.
const COLUMNS: [&str; 8] = [
    "subject",
    "condition",
    "max_force",
    "TTP",
    "duration",
    "delta_spine_flex",
    "speed_spine_flex",
    "BW",
];

/// One row per trial, insertion order subject-major / condition-minor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub rows: Vec<TrialFeatures>,
}

impl FeatureTable {
    pub fn push(&mut self, row: TrialFeatures) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean body weight of one subject across their conditions.
    pub fn mean_body_weight(&self, subject: &SubjectCode) -> Option<f64> {
        let weights: Vec<f64> = self
            .rows
            .iter()
            .filter(|r| &r.subject == subject)
            .map(|r| r.body_weight_kg)
            .collect();

        if weights.is_empty() {
            return None;
        }
        Some(weights.iter().sum::<f64>() / weights.len() as f64)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Delimited text with the study's column names, one line per trial.
    pub fn to_delimited(&self, sep: char) -> String {
        let sep = sep.to_string();
        let mut out = String::new();
        out.push_str(&COLUMNS.join(sep.as_str()));
        out.push('\n');

        for r in &self.rows {
            let fields = [
                r.subject.to_string(),
                r.condition.to_string(),
                r.max_force.to_string(),
                r.time_to_peak.to_string(),
                r.duration.to_string(),
                r.delta_spine_flex.to_string(),
                r.speed_spine_flex.to_string(),
                r.body_weight_kg.to_string(),
            ];
            out.push_str(&fields.join(sep.as_str()));
            out.push('\n');
        }

        out
    }
}
