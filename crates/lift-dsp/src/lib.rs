//! # Lift-DSP
//!
//! Offline signal-processing kernels for the liftkin weightlifting trial
//! pipeline.
//!
//! Unlike a streaming sensor front-end, everything here operates on full
//! in-memory series: the study is batch-processed and the zero-phase
//! filters are non-causal by construction.
//!
//! ## Kernels
//!
//! 1. **Filtering**: Butterworth low-pass design plus zero-phase
//!    forward-backward application
//! 2. **Smoothing**: centered moving average with same-length output
//! 3. **Gradient**: second-order numerical derivative against a possibly
//!    non-uniform time coordinate
//! 4. **Peaks**: local-maxima detection and largest-peak selection
//! 5. **Segmentation**: movement onset/offset from force curvature peaks

pub mod filtering;
pub mod gradient;
pub mod peaks;
pub mod segmentation;
pub mod smoothing;

pub use filtering::*;
pub use gradient::*;
pub use peaks::*;
pub use segmentation::*;
pub use smoothing::*;
