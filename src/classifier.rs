use crate::thresholds::TOO_CLOSE_AREA;
use crate::tracker::SubjectTracker;
use std::time::{Duration, Instant};

/// The three overlay signals, derived from tracker state alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayState {
    pub no_subject: bool,
    pub too_close: bool,
    pub guide_visible: bool,
}

/// Full-screen banner to show, when any. A missing subject wins over
/// a too-close subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    NoSubject,
    TooClose,
}

impl OverlayState {
    pub fn banner(&self) -> Option<Banner> {
        if self.no_subject {
            Some(Banner::NoSubject)
        } else if self.too_close {
            Some(Banner::TooClose)
        } else {
            None
        }
    }
}

/// Pure function of tracker state and `now`; owns no state of its own.
///
/// `overlay_enabled` is the transient flag the orchestrator drops during the
/// post-burst blackout. The guide only shows at 1x zoom: once zoomed in, the
/// framing guide no longer matches what the sensor sees.
pub fn classify(
    tracker: &SubjectTracker,
    zoom_factor: f32,
    overlay_enabled: bool,
    body_timeout: Duration,
    now: Instant,
) -> OverlayState {
    let no_subject = match tracker.last_body_seen() {
        Some(seen) => now.saturating_duration_since(seen) > body_timeout,
        None => true,
    };

    // Only meaningful while a face is tracked; a stale face forces it off.
    let too_close = tracker.face_tracked() && tracker.area() >= TOO_CLOSE_AREA;

    let guide_visible = zoom_factor == 1.0 && !too_close && !no_subject && overlay_enabled;

    OverlayState {
        no_subject,
        too_close,
        guide_visible,
    }
}
