//! # Lift-Trials
//!
//! Trial orchestration for the liftkin weightlifting biomechanics study:
//! marker aggregation, force preprocessing, movement segmentation, joint
//! angles, and per-trial feature extraction.
//!
//! ## Pipeline stages
//!
//! 1. **Loading**: marker and analog channels through the
//!    [`ChannelSource`] collaborator (the C3D reader lives behind it)
//! 2. **Marker aggregation**: low-pass filtering and group averaging
//! 3. **Force preprocessing**: manual corrections, body-weight estimate,
//!    reaction-norm, smoothing
//! 4. **Segmentation**: movement window from force curvature peaks
//! 5. **Angles**: inter-segment joint angles over the movement window
//! 6. **Features**: one flat [`lift_core::TrialFeatures`] row per trial
//!
//! Trials are processed strictly one at a time; each trial's intermediate
//! series are dropped once its feature row exists. A data-quality fault in
//! any trial aborts the whole batch, carrying the trial identifier.

pub mod angles;
pub mod config;
pub mod export;
pub mod features;
pub mod force;
pub mod loader;
pub mod markers;
pub mod summary;
pub mod trial;

pub use self::config::*;
pub use angles::*;
pub use export::*;
pub use features::*;
pub use force::*;
pub use loader::*;
pub use markers::*;
pub use summary::*;
pub use trial::*;
