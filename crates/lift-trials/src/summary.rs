//! Per-subject aggregation against external subject metadata.
//!
//! The study supplies a separate table of subject records (code and
//! body-weight-normalized one-rep-max). Joining it with the mean body
//! weight measured on the plate yields the strength-to-body-weight ratio
//! reported for the cohort.

use serde::{Deserialize, Serialize};
use tracing::warn;

use lift_core::SubjectCode;

use crate::export::FeatureTable;

/// Externally supplied subject metadata row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Subject code matching the trial roster.
    pub code: String,

    /// Estimated one-rep-max (kg).
    pub e1rm: f64,
}

/// Per-subject summary after joining metadata with measured body weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub code: String,
    pub e1rm: f64,

    /// Mean body weight across the subject's conditions (kg).
    pub body_weight_kg: f64,

    /// Strength-to-body-weight ratio.
    pub ratio: f64,
}

/// Join subject records with the feature table. Records without any
/// processed trial are skipped.
pub fn summarize_subjects(table: &FeatureTable, records: &[SubjectRecord]) -> Vec<SubjectSummary> {
    records
        .iter()
        .filter_map(|record| {
            let subject = SubjectCode::new(record.code.clone());
            match table.mean_body_weight(&subject) {
                Some(body_weight_kg) => Some(SubjectSummary {
                    code: record.code.clone(),
                    e1rm: record.e1rm,
                    body_weight_kg,
                    ratio: record.e1rm / body_weight_kg,
                }),
                None => {
                    warn!(subject = %record.code, "no trials for subject, skipping summary");
                    None
                }
            }
        })
        .collect()
}

/// Cohort mean and sample standard deviation of the ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioStats {
    pub mean: f64,
    pub std: f64,
}

pub fn ratio_stats(summaries: &[SubjectSummary]) -> Option<RatioStats> {
    if summaries.is_empty() {
        return None;
    }

    let n = summaries.len() as f64;
    let mean = summaries.iter().map(|s| s.ratio).sum::<f64>() / n;

    let std = if summaries.len() < 2 {
        0.0
    } else {
        let var = summaries
            .iter()
            .map(|s| (s.ratio - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        var.sqrt()
    };

    Some(RatioStats { mean, std })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_core::{Condition, TrialFeatures};

    fn table_with(rows: &[(&str, &str, f64)]) -> FeatureTable {
        let mut table = FeatureTable::default();
        for (subject, condition, bw) in rows {
            table.push(TrialFeatures {
                subject: SubjectCode::new(*subject),
                condition: Condition::new(*condition),
                max_force: 0.0,
                time_to_peak: 0.0,
                duration: 1.0,
                delta_spine_flex: 0.0,
                speed_spine_flex: 0.0,
                body_weight_kg: *bw,
            });
        }
        table
    }

    #[test]
    fn test_join_computes_ratio_from_mean_body_weight() {
        let table = table_with(&[("HUN", "NB", 69.0), ("HUN", "LB", 71.0)]);
        let records = vec![SubjectRecord {
            code: "HUN".to_string(),
            e1rm: 140.0,
        }];

        let summaries = summarize_subjects(&table, &records);
        assert_eq!(summaries.len(), 1);
        assert!((summaries[0].body_weight_kg - 70.0).abs() < 1e-12);
        assert!((summaries[0].ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_subject_is_skipped() {
        let table = table_with(&[("HUN", "NB", 70.0)]);
        let records = vec![SubjectRecord {
            code: "ZZZ".to_string(),
            e1rm: 100.0,
        }];
        assert!(summarize_subjects(&table, &records).is_empty());
    }

    #[test]
    fn test_ratio_stats() {
        let summaries = vec![
            SubjectSummary {
                code: "A".into(),
                e1rm: 0.0,
                body_weight_kg: 1.0,
                ratio: 1.5,
            },
            SubjectSummary {
                code: "B".into(),
                e1rm: 0.0,
                body_weight_kg: 1.0,
                ratio: 2.5,
            },
        ];

        let stats = ratio_stats(&summaries).unwrap();
        assert!((stats.mean - 2.0).abs() < 1e-12);
        // Sample standard deviation with n - 1.
        assert!((stats.std - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary_has_no_stats() {
        assert!(ratio_stats(&[]).is_none());
    }
}
