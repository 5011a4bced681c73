//! MotionScreen Detection Core — the Repetitive Motion Detection Engine
//!
//! Turns a stream of wrist positions into a motion-severity signal:
//! - **Buffer:** Fixed-capacity sliding window of hand frames
//! - **Features:** Variance, range, and zero-crossing dominant frequency
//! - **Classification:** Score, severity tier, description, recommendations
//! - **Real-time:** Same pipeline over the trailing samples of one series
//! - **Session:** EMA-smoothed score with a worst-tier-observed summary
//!
//! This crate is pure computation — no I/O, no threads, no global state.
//! Each screening session owns one [`MotionEngine`].

pub mod buffer;
pub mod classify;
pub mod engine;
pub mod features;
pub mod realtime;
pub mod session;

pub use buffer::{BufferSnapshot, SampleBuffer, SlidingWindow};
pub use classify::Classifier;
pub use engine::{CycleResult, MotionEngine};
pub use features::{extract, LimbFeatures, WindowFeatures, MIN_SAMPLES};
pub use realtime::{analyze_real_time, RealTimeAnalyzer};
pub use session::SessionAggregator;
