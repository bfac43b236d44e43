use crate::alignment::AlignmentEvaluator;
use crate::capture::PhotoCapture;
use crate::classifier::{classify, OverlayState};
use crate::config::EngineConfig;
use crate::orchestrator::CaptureOrchestrator;
use crate::tracker::SubjectTracker;
use crate::types::{DetectionObservation, Snapshot};
use crate::zoom::ZoomControl;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;
use tracing::{info, warn};

/// The frame dispatcher: one entry point per observation, components run in
/// a fixed order, results published as immutable snapshots.
///
/// Single writer: frames are processed one at a time in arrival order. The
/// runtime timer thread shares the engine behind a mutex and only calls
/// `poll_timers`, so no field is ever mutated from two frames at once.
pub struct Engine {
    config: EngineConfig,
    tracker: SubjectTracker,
    alignment: AlignmentEvaluator,
    orchestrator: CaptureOrchestrator,
    zoom: Box<dyn ZoomControl + Send>,
    capture: Box<dyn PhotoCapture + Send>,
    subscribers: Vec<Sender<Snapshot>>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        zoom: Box<dyn ZoomControl + Send>,
        capture: Box<dyn PhotoCapture + Send>,
    ) -> Self {
        let tracker = SubjectTracker::new(config.detection.face_timeout());
        let alignment = AlignmentEvaluator::new(
            config.alignment.target(),
            config.alignment.tolerance,
            config.alignment.steady_duration(),
        );
        let orchestrator = CaptureOrchestrator::new(config.capture.clone());
        Self {
            config,
            tracker,
            alignment,
            orchestrator,
            zoom,
            capture,
            subscribers: Vec::new(),
        }
    }

    /// Feed one frame through the pipeline: tracker update, timeout decay,
    /// alignment (only while a face is tracked), pending orchestrator
    /// timers, then snapshot publication.
    pub fn process_frame(&mut self, obs: &DetectionObservation) -> Snapshot {
        let now = obs.timestamp;

        self.tracker.ingest(obs);
        self.tracker.apply_timeouts(now);

        if self.tracker.face_tracked() {
            self.alignment
                .update(self.tracker.last_known_center(), now);
        }
        // No face: the evaluator is skipped entirely, freezing its state.

        self.run_timers(now);

        let snap = self.snapshot(now);
        self.publish(snap);
        snap
    }

    /// External trigger for the zoom/burst sequence. Only honored while the
    /// alignment is steady and no sequence is in flight.
    pub fn begin_sequence(&mut self, now: Instant) -> bool {
        if !self.alignment.is_steady() {
            warn!("trigger ignored; alignment not steady");
            return false;
        }
        let area = self.tracker.area();
        let accepted = self
            .orchestrator
            .begin_sequence(area, now, self.zoom.as_mut());
        if accepted {
            // Single-fire debounce: the same steady window cannot re-trigger.
            self.alignment.clear_steady();
            // The first burst shot is due at `now`; issue it with the
            // trigger instead of waiting for the next timer wakeup.
            self.run_timers(now);
            let snap = self.snapshot(now);
            self.publish(snap);
        }
        accepted
    }

    /// Fire any due orchestrator timers; called by the runtime thread so the
    /// burst/cooldown continue even when frames stop arriving. Publishes a
    /// snapshot when something changed.
    pub fn poll_timers(&mut self, now: Instant) {
        let before = (
            self.orchestrator.phase(),
            self.orchestrator.shots_taken(),
            self.orchestrator.overlay_enabled(),
        );
        self.run_timers(now);
        let after = (
            self.orchestrator.phase(),
            self.orchestrator.shots_taken(),
            self.orchestrator.overlay_enabled(),
        );
        if before != after {
            let snap = self.snapshot(now);
            self.publish(snap);
        }
    }

    fn run_timers(&mut self, now: Instant) {
        let entered_cooldown =
            self.orchestrator
                .poll(now, self.zoom.as_mut(), self.capture.as_mut());
        if entered_cooldown {
            self.alignment.reset_guide();
        }
    }

    /// Earliest pending orchestrator deadline, for the runtime thread.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.orchestrator.next_deadline()
    }

    /// Manual zoom nudge: one 0.1 step up from the current factor, rounded
    /// up to one decimal, clamped by the collaborator like any request.
    pub fn increment_zoom(&mut self) {
        // Step in f64: 1.1 widened from f32 sits just above 11/10, so the
        // ceil carries it to 1.2 and the step lands on 1.3.
        let current = self.zoom.current() as f64;
        let mut next = (current * 10.0).ceil() / 10.0 + 0.1;
        if next < 1.0 {
            next = 1.0;
        }
        match self.zoom.set_zoom(next as f32) {
            Ok(applied) => info!(applied, "manual zoom step"),
            Err(e) => warn!(error = %e, "manual zoom step dropped"),
        }
    }

    pub fn overlays(&self, now: Instant) -> OverlayState {
        classify(
            &self.tracker,
            self.zoom.current(),
            self.orchestrator.overlay_enabled(),
            self.config.detection.body_timeout(),
            now,
        )
    }

    pub fn snapshot(&self, now: Instant) -> Snapshot {
        let overlays = self.overlays(now);
        Snapshot {
            max_face_width: self.tracker.max_face_width(),
            max_body_height: self.tracker.max_body_height(),
            zoom_factor: self.zoom.current(),
            no_subject: overlays.no_subject,
            too_close: overlays.too_close,
            guide_visible: overlays.guide_visible,
            guide_color: self.alignment.guide_color(),
            is_steady: self.alignment.is_steady(),
            phase: self.orchestrator.phase(),
            shots_taken: self.orchestrator.shots_taken(),
        }
    }

    /// Subscribe to the ordered snapshot stream. Each subscriber gets every
    /// snapshot published after the call; disconnected receivers are pruned
    /// on the next publish.
    pub fn subscribe(&mut self) -> Receiver<Snapshot> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, snap: Snapshot) {
        self.subscribers.retain(|tx| tx.send(snap).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureLog;
    use crate::types::{CapturePhase, GuideColor, Rect};
    use crate::zoom::SimulatedZoom;
    use std::time::Duration;

    fn engine_with_collabs() -> (Engine, SimulatedZoom, CaptureLog) {
        let zoom = SimulatedZoom::new();
        let capture = CaptureLog::new();
        let engine = Engine::new(
            EngineConfig::default(),
            Box::new(zoom.clone()),
            Box::new(capture.clone()),
        );
        (engine, zoom, capture)
    }

    fn centered_obs(t: Instant) -> DetectionObservation {
        DetectionObservation {
            faces: vec![Rect::new(0.4, 0.4, 0.2, 0.2)],
            bodies: vec![Rect::new(0.3, 0.2, 0.4, 0.2)],
            timestamp: t,
        }
    }

    #[test]
    fn pipeline_order_produces_consistent_snapshot() {
        let t0 = Instant::now();
        let (mut engine, _zoom, _capture) = engine_with_collabs();

        let snap = engine.process_frame(&centered_obs(t0));
        assert!((snap.max_face_width - 0.2).abs() < 1e-6);
        assert!((snap.max_body_height - 0.2).abs() < 1e-6);
        assert!(!snap.no_subject);
        assert!(!snap.too_close);
        assert!(snap.guide_visible);
        assert!(!snap.is_steady);
        assert_eq!(snap.phase, CapturePhase::Idle);
    }

    #[test]
    fn trigger_refused_when_not_steady() {
        let t0 = Instant::now();
        let (mut engine, zoom, capture) = engine_with_collabs();
        engine.process_frame(&centered_obs(t0));

        assert!(!engine.begin_sequence(t0));
        assert!(zoom.requests().is_empty());
        assert_eq!(capture.shots_issued(), 0);
    }

    #[test]
    fn trigger_issues_first_shot_immediately() {
        let t0 = Instant::now();
        let (mut engine, zoom, capture) = engine_with_collabs();
        for i in 0..=20u64 {
            engine.process_frame(&centered_obs(t0 + Duration::from_millis(100 * i)));
        }

        // Ramp and first shot both happen inside the trigger call; no timer
        // wakeup is needed to get shot 1 out.
        assert!(engine.begin_sequence(t0 + Duration::from_secs(2)));
        assert_eq!(zoom.requests(), vec![1.5]);
        assert_eq!(capture.shots_issued(), 1);
    }

    #[test]
    fn subscribers_see_snapshots_in_order() {
        let t0 = Instant::now();
        let (mut engine, _zoom, _capture) = engine_with_collabs();
        let rx = engine.subscribe();

        engine.process_frame(&centered_obs(t0));
        engine.process_frame(&centered_obs(t0 + Duration::from_millis(100)));

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert!(!first.no_subject);
        assert_eq!(first.guide_color, GuideColor::Neutral);
        assert!(!second.no_subject);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscriber_is_pruned() {
        let t0 = Instant::now();
        let (mut engine, _zoom, _capture) = engine_with_collabs();
        let rx = engine.subscribe();
        drop(rx);
        engine.process_frame(&centered_obs(t0));
        assert!(engine.subscribers.is_empty());
    }

    #[test]
    fn increment_zoom_steps_by_tenths() {
        let (mut engine, zoom, _capture) = engine_with_collabs();
        engine.increment_zoom();
        assert!((zoom.current() - 1.1).abs() < 1e-5);
        // 1.1 stored as f32 sits just above 11/10, so the round-up-to-tenths
        // formula skips to 1.3 rather than 1.2 on the next step.
        engine.increment_zoom();
        assert!((zoom.current() - 1.3).abs() < 1e-4);
    }

    #[test]
    fn poll_timers_without_pending_work_publishes_nothing() {
        let t0 = Instant::now();
        let (mut engine, _zoom, _capture) = engine_with_collabs();
        let rx = engine.subscribe();
        engine.poll_timers(t0);
        assert!(rx.try_recv().is_err());
    }
}
