//! MotionScreen Motion Model
//!
//! Defines the data contracts shared by the detection engine and its
//! collaborators:
//! - **Samples:** Per-frame wrist positions from the hand-tracking collaborator
//! - **Results:** Severity tiers, per-window classifications, session analyses
//! - **Report:** The flat, versioned record handed to the reporting collaborator
//!
//! Coordinates are in the tracking collaborator's units; the classifier's
//! normalization constant is calibrated against that scale.

pub mod report;
pub mod result;
pub mod sample;

pub use report::*;
pub use result::*;
pub use sample::*;
