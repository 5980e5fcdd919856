//! Error types for the liftkin trial analysis pipeline.

use thiserror::Error;

use crate::types::TrialKey;

#[derive(Error, Debug)]
pub enum Error {
    #[error("channel '{channel}' not found in recording")]
    MissingChannel { channel: String },

    #[error("segmentation found {found} curvature peak(s), need at least 2")]
    InsufficientPeaks { found: usize },

    #[error("zero-length direction vector at sample {sample}")]
    DegenerateVector { sample: usize },

    #[error("correction misaligned: {0}")]
    MisalignedCorrection(String),

    #[error("insufficient data: need {required} samples, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("filter design error: {0}")]
    FilterDesign(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("trial {key}: {source}")]
    Trial {
        key: TrialKey,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach the offending trial to a fault raised inside the pipeline.
    pub fn for_trial(self, key: &TrialKey) -> Self {
        match self {
            Error::Trial { .. } => self,
            other => Error::Trial {
                key: key.clone(),
                source: Box::new(other),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_context_is_not_nested_twice() {
        let key = TrialKey::new("HUN", "NB");
        let err = Error::InsufficientPeaks { found: 1 }
            .for_trial(&key)
            .for_trial(&key);

        match err {
            Error::Trial { source, .. } => {
                assert!(matches!(*source, Error::InsufficientPeaks { found: 1 }))
            }
            other => panic!("expected trial context, got {other}"),
        }
    }

    #[test]
    fn test_error_display_carries_trial_key() {
        let err = Error::MissingChannel {
            channel: "T8".into(),
        }
        .for_trial(&TrialKey::new("UAG", "LB"));

        assert!(err.to_string().contains("UAG_LB"));
    }
}
