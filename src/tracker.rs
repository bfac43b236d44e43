use crate::types::DetectionObservation;
use std::time::{Duration, Instant};

/// Rolling subject state derived from per-frame detections.
///
/// Single writer: the frame-processing path calls `ingest` then
/// `apply_timeouts` once per observation, in arrival order.
pub struct SubjectTracker {
    max_face_width: f32,
    max_body_height: f32,
    last_face_seen: Option<Instant>,
    last_body_seen: Option<Instant>,
    last_known_center: (f32, f32),
    face_timeout: Duration,
}

impl SubjectTracker {
    pub fn new(face_timeout: Duration) -> Self {
        Self {
            max_face_width: 0.0,
            max_body_height: 0.0,
            last_face_seen: None,
            last_body_seen: None,
            last_known_center: (0.0, 0.0),
            face_timeout,
        }
    }

    /// Fold one frame's detections into the tracked state.
    ///
    /// The detector may return several candidate faces/bodies; we keep the
    /// widest face and the tallest body. A frame with no boxes leaves state
    /// untouched; decay happens in `apply_timeouts`, not on a single miss.
    pub fn ingest(&mut self, obs: &DetectionObservation) {
        if let Some(widest) = obs
            .faces
            .iter()
            .max_by(|a, b| a.width.total_cmp(&b.width))
        {
            self.max_face_width = widest.width;
            self.last_known_center = widest.center();
            self.last_face_seen = Some(obs.timestamp);
        }

        if let Some(tallest) = obs
            .bodies
            .iter()
            .max_by(|a, b| a.height.total_cmp(&b.height))
        {
            self.max_body_height = tallest.height;
            self.last_body_seen = Some(obs.timestamp);
        }
    }

    /// Decay the tracked face once it has been stale longer than the timeout.
    /// Body extent is deliberately not reset here; only the "no subject"
    /// overlay keys off body staleness.
    pub fn apply_timeouts(&mut self, now: Instant) {
        let stale = match self.last_face_seen {
            Some(seen) => now.saturating_duration_since(seen) > self.face_timeout,
            None => true,
        };
        if stale {
            self.max_face_width = 0.0;
        }
    }

    pub fn face_tracked(&self) -> bool {
        self.max_face_width > 0.0
    }

    /// Normalized subject area driving the zoom table and the too-close check.
    pub fn area(&self) -> f32 {
        self.max_face_width * self.max_body_height
    }

    pub fn max_face_width(&self) -> f32 {
        self.max_face_width
    }

    pub fn max_body_height(&self) -> f32 {
        self.max_body_height
    }

    pub fn last_body_seen(&self) -> Option<Instant> {
        self.last_body_seen
    }

    pub fn last_known_center(&self) -> (f32, f32) {
        self.last_known_center
    }
}
