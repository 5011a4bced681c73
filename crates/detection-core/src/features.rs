//! Window feature extraction.
//!
//! # Algorithm
//!
//! 1. **Gate** on sample count: non-finite values are discarded, and fewer
//!    than [`MIN_SAMPLES`] remaining values yield an insufficient result
//!    ("no opinion", not "no motion").
//! 2. **Statistics**: two-pass mean and population variance, std-dev, range.
//! 3. **Dominant frequency**: zero-crossing rate of `(value - mean)`.
//!    Each full oscillation crosses the mean twice, so the frequency is
//!    `crossings / 2 / span_secs`. O(n), and stable on the short noisy
//!    windows we get from hand tracking; only coarse periodicity matters.

use std::borrow::Cow;

use serde::Serialize;

use motionscreen_motion_model::sample::{Axis, Limb};

use crate::buffer::BufferSnapshot;

/// Minimum series length for an opinion.
pub const MIN_SAMPLES: usize = 20;

/// Statistics of one coordinate series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WindowFeatures {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub range: f64,
    pub dominant_frequency_hz: f64,
    pub sample_count: usize,
    pub sufficient: bool,
}

impl WindowFeatures {
    /// Zeroed features for a series too short to analyze.
    pub fn insufficient(sample_count: usize) -> Self {
        Self {
            sample_count,
            ..Self::default()
        }
    }
}

/// Extract features from a series sampled at `frame_rate_hz`.
pub fn extract(series: &[f64], frame_rate_hz: f64) -> WindowFeatures {
    let finite: Cow<'_, [f64]> = if series.iter().all(|v| v.is_finite()) {
        Cow::Borrowed(series)
    } else {
        Cow::Owned(series.iter().copied().filter(|v| v.is_finite()).collect())
    };
    let series = finite.as_ref();

    let n = series.len();
    if n < MIN_SAMPLES {
        return WindowFeatures::insufficient(n);
    }

    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    let mean = series.iter().sum::<f64>() / n as f64;

    // A constant series must come out exactly still; the rounded mean
    // would otherwise leave a residue of ~1e-30.
    if range == 0.0 {
        return WindowFeatures {
            mean,
            variance: 0.0,
            std_dev: 0.0,
            range: 0.0,
            dominant_frequency_hz: 0.0,
            sample_count: n,
            sufficient: true,
        };
    }

    let variance = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    // Coordinates near f64::MAX overflow the sums
    if !variance.is_finite() {
        return WindowFeatures::insufficient(n);
    }
    let dominant_frequency_hz = if variance > 0.0 {
        zero_crossing_frequency(series, mean, frame_rate_hz)
    } else {
        0.0
    };

    WindowFeatures {
        mean,
        variance,
        std_dev: variance.sqrt(),
        range,
        dominant_frequency_hz,
        sample_count: n,
        sufficient: true,
    }
}

/// Oscillation frequency from sign changes of `(value - mean)`.
///
/// Samples sitting exactly on the mean keep the previous sign.
fn zero_crossing_frequency(series: &[f64], mean: f64, frame_rate_hz: f64) -> f64 {
    if !(frame_rate_hz.is_finite() && frame_rate_hz > 0.0) || series.len() < 2 {
        return 0.0;
    }

    let mut crossings = 0usize;
    let mut previous_sign = 0i8;
    for value in series {
        let deviation = value - mean;
        let sign = if deviation > 0.0 {
            1
        } else if deviation < 0.0 {
            -1
        } else {
            continue;
        };
        if previous_sign != 0 && sign != previous_sign {
            crossings += 1;
        }
        previous_sign = sign;
    }

    let span_secs = (series.len() - 1) as f64 / frame_rate_hz;
    (crossings as f64 / 2.0) / span_secs
}

/// Per-axis features of one wrist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimbFeatures {
    pub limb: Limb,
    pub x: WindowFeatures,
    pub y: WindowFeatures,
    pub z: WindowFeatures,
}

impl LimbFeatures {
    pub fn new(limb: Limb, x: WindowFeatures, y: WindowFeatures, z: WindowFeatures) -> Self {
        Self { limb, x, y, z }
    }

    /// Features of a limb from a buffer snapshot.
    pub fn from_snapshot(snapshot: &BufferSnapshot, limb: Limb, min_confidence: f64) -> Self {
        let rate = snapshot.frame_rate_hz();
        let axis = |axis| extract(&snapshot.series(limb, axis, min_confidence), rate);
        Self::new(limb, axis(Axis::X), axis(Axis::Y), axis(Axis::Z))
    }

    /// Treat a single coordinate series as the whole limb.
    pub fn from_single_series(limb: Limb, features: WindowFeatures) -> Self {
        let absent = WindowFeatures::insufficient(0);
        Self::new(limb, features, absent, absent)
    }

    pub fn axis(&self, axis: Axis) -> &WindowFeatures {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn sufficient_axes(&self) -> impl Iterator<Item = &WindowFeatures> {
        [&self.x, &self.y, &self.z]
            .into_iter()
            .filter(|features| features.sufficient)
    }

    /// At least one axis carries enough samples.
    pub fn sufficient(&self) -> bool {
        self.sufficient_axes().next().is_some()
    }

    /// Total positional variance: sum over the sufficient axes.
    pub fn variance(&self) -> f64 {
        self.sufficient_axes().map(|f| f.variance).sum()
    }

    /// Frequency of the axis that moves the most (first wins on ties).
    pub fn dominant_frequency_hz(&self) -> f64 {
        self.sufficient_axes()
            .fold(None::<&WindowFeatures>, |best, f| match best {
                Some(b) if b.variance >= f.variance => Some(b),
                _ => Some(f),
            })
            .map(|f| f.dominant_frequency_hz)
            .unwrap_or(0.0)
    }

    pub fn sample_count(&self) -> usize {
        [&self.x, &self.y, &self.z]
            .iter()
            .map(|f| f.sample_count)
            .max()
            .unwrap_or(0)
    }
}
