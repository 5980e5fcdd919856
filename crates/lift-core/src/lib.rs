//! # Lift-Core
//!
//! Core types and utilities for the liftkin weightlifting biomechanics
//! trial analysis pipeline.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
