//! One detection engine per screening session.
//!
//! The engine owns the frame buffer and the session aggregator. It never
//! schedules itself: the caller pushes frames and decides when to run an
//! analysis cycle (timer tick or manual request). Results reach the UI
//! through registered observers or by polling.

use motionscreen_common::config::EngineConfig;
use motionscreen_common::error::MotionResult;
use motionscreen_motion_model::report::SessionReport;
use motionscreen_motion_model::result::{
    ClassificationResult, DetectionStats, RealTimeScore, SessionAnalysis,
};
use motionscreen_motion_model::sample::{Axis, HandFrame, Limb, TimestampMs};
use serde::Serialize;

use crate::buffer::{BufferSnapshot, SampleBuffer};
use crate::classify::{insufficient_result, Classifier};
use crate::features::LimbFeatures;
use crate::realtime::RealTimeAnalyzer;
use crate::session::SessionAggregator;

/// Outcome of one analysis cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleResult {
    /// Classification of the buffered window.
    pub window: ClassificationResult,
    /// Session summary after recording the window.
    pub summary: ClassificationResult,
}

/// Callback invoked after every analysis cycle.
pub type ResultObserver = Box<dyn FnMut(&CycleResult) + Send>;

/// Handle returned by [`MotionEngine::on_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// The repetitive motion detection engine for one session.
pub struct MotionEngine {
    config: EngineConfig,
    buffer: SampleBuffer,
    classifier: Classifier,
    realtime: RealTimeAnalyzer,
    session: SessionAggregator,
    observers: Vec<(ObserverId, ResultObserver)>,
    next_observer: usize,
    latest: Option<CycleResult>,
}

impl MotionEngine {
    /// Create an engine; refuses to start on invalid configuration.
    pub fn new(config: EngineConfig) -> MotionResult<Self> {
        config.validate()?;

        let buffer = SampleBuffer::new(config.window_size, config.frame_rate_hz)?;
        let session = SessionAggregator::new(config.ema_alpha)?;
        let realtime = RealTimeAnalyzer::from_config(&config)?;
        let classifier = Classifier::new(config.classifier.clone());

        tracing::debug!(
            window_size = config.window_size,
            analysis_interval_ms = config.analysis_interval_ms,
            frame_rate_hz = config.frame_rate_hz,
            "Motion engine created"
        );

        Ok(Self {
            config,
            buffer,
            classifier,
            realtime,
            session,
            observers: Vec::new(),
            next_observer: 0,
            latest: None,
        })
    }

    /// Engine with the reference configuration.
    pub fn with_defaults() -> MotionResult<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Ingest one frame from the tracking collaborator.
    ///
    /// Invalid frames are dropped and counted; returns whether it was kept.
    pub fn push_frame(&mut self, frame: HandFrame) -> bool {
        let accepted = self.buffer.append(frame);
        if accepted {
            self.session.add_frames(1);
        }
        accepted
    }

    /// Classify the current buffer contents without touching session state.
    pub fn analyze_window(&self) -> ClassificationResult {
        self.analyze_snapshot(&self.buffer.snapshot())
    }

    /// Classify a frozen snapshot.
    pub fn analyze_snapshot(&self, snapshot: &BufferSnapshot) -> ClassificationResult {
        let timestamp_ms = snapshot.latest_timestamp_ms();
        if snapshot.is_empty() {
            return insufficient_result(timestamp_ms);
        }

        let limbs: Vec<LimbFeatures> = Limb::ALL
            .iter()
            .map(|limb| LimbFeatures::from_snapshot(snapshot, *limb, self.config.min_confidence))
            .collect();

        self.classifier.classify(&limbs, timestamp_ms)
    }

    /// Run one analysis cycle: snapshot, classify, record, notify.
    pub fn run_cycle(&mut self) -> CycleResult {
        let snapshot = self.buffer.snapshot();
        let window = self.analyze_snapshot(&snapshot);
        let summary = self.session.record(window.clone()).clone();

        tracing::debug!(
            frames = snapshot.len(),
            score = window.score,
            tier = %window.tier,
            sufficient = window.sufficient,
            session_tier = %summary.tier,
            "Analysis cycle complete"
        );

        let outcome = CycleResult { window, summary };
        for (_, observer) in self.observers.iter_mut() {
            observer(&outcome);
        }
        self.latest = Some(outcome.clone());
        outcome
    }

    /// Register a callback for every subsequent analysis cycle.
    pub fn on_result<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&CycleResult) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Unregister a callback. Returns false if the id is unknown.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Result of the most recent cycle, for polling consumers.
    pub fn latest_result(&self) -> Option<&CycleResult> {
        self.latest.as_ref()
    }

    pub fn session_analysis(&self) -> Option<SessionAnalysis> {
        self.session.analysis()
    }

    pub fn detection_stats(&self) -> DetectionStats {
        self.session.detection_stats()
    }

    /// Real-time score of one buffered series, independent of the session.
    pub fn real_time_score(&self, limb: Limb, axis: Axis) -> RealTimeScore {
        let series = self.buffer.series(limb, axis, self.config.min_confidence);
        self.realtime.analyze(&series, self.buffer.latest_timestamp_ms())
    }

    /// Real-time score of a caller-supplied series.
    pub fn analyze_real_time(&self, coordinates: &[f64], timestamp_ms: TimestampMs) -> RealTimeScore {
        self.realtime.analyze(coordinates, timestamp_ms)
    }

    /// Flat report of the session so far.
    pub fn report(&self) -> SessionReport {
        let stats = self.session.detection_stats();
        let summary = match self.session.summary() {
            Some(summary) => summary.clone(),
            None => insufficient_result(self.buffer.latest_timestamp_ms()),
        };
        SessionReport::new(&summary, &stats, self.buffer.dropped_frames())
    }

    /// Discard all buffered frames and session results. Observers stay
    /// registered; results already handed out are unaffected.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.session.reset();
        self.latest = None;
        tracing::info!("Motion engine reset");
    }
}

impl std::fmt::Debug for MotionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionEngine")
            .field("config", &self.config)
            .field("buffered_frames", &self.buffer.len())
            .field("windows", &self.session.window_count())
            .field("observers", &self.observers.len())
            .finish()
    }
}
