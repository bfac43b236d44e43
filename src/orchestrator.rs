use crate::capture::PhotoCapture;
use crate::config::CaptureConfig;
use crate::thresholds::recommend_zoom;
use crate::types::CapturePhase;
use crate::zoom::ZoomControl;
use std::time::Instant;
use tracing::{info, warn};

/// Drives the zoom/burst/cooldown cycle as an explicit state machine.
///
/// `Idle → Ramping → Bursting → Cooldown → Idle`. The delayed actions (shot
/// spacing, zoom-reset delay, blackout) are kept as explicit deadlines and
/// fired from `poll`, so timers run off whatever cadence the caller has
/// (frame arrivals plus the runtime timer thread) without nested callbacks.
pub struct CaptureOrchestrator {
    config: CaptureConfig,
    phase: CapturePhase,
    shots_taken: u32,
    overlay_enabled: bool,
    next_shot_due: Option<Instant>,
    zoom_reset_due: Option<Instant>,
    idle_due: Option<Instant>,
}

impl CaptureOrchestrator {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            phase: CapturePhase::Idle,
            shots_taken: 0,
            overlay_enabled: true,
            next_shot_due: None,
            zoom_reset_due: None,
            idle_due: None,
        }
    }

    /// Accept or reject a trigger. Rejected (and logged) unless Idle; never
    /// queued. On acceptance the zoom ramp happens synchronously, the first
    /// shot is due immediately, and the zoom-reset deadline starts counting
    /// from `now` so the cooldown overlaps the burst.
    pub fn begin_sequence(
        &mut self,
        area: f32,
        now: Instant,
        zoom: &mut dyn ZoomControl,
    ) -> bool {
        if self.phase != CapturePhase::Idle {
            warn!(phase = ?self.phase, "trigger rejected; sequence already in flight");
            return false;
        }

        self.phase = CapturePhase::Ramping;

        match recommend_zoom(area) {
            Some(recommended) if recommended > zoom.current() => {
                match zoom.set_zoom(recommended) {
                    Ok(applied) => info!(area, recommended, applied, "zoom ramp"),
                    // Dropped, not retried; the rest of the sequence proceeds.
                    Err(e) => warn!(area, recommended, error = %e, "zoom ramp dropped"),
                }
            }
            Some(recommended) => {
                info!(area, recommended, current = zoom.current(), "zoom already sufficient");
            }
            None => {
                info!(area, "no zoom recommendation for this area");
            }
        }

        self.phase = CapturePhase::Bursting;
        self.shots_taken = 0;
        self.next_shot_due = Some(now);
        self.zoom_reset_due = Some(now + self.config.zoom_reset_delay());
        true
    }

    /// Fire any deadlines that have come due. Returns true when the cooldown
    /// just started, so the caller can reset the guide color.
    pub fn poll(
        &mut self,
        now: Instant,
        zoom: &mut dyn ZoomControl,
        capture: &mut dyn PhotoCapture,
    ) -> bool {
        while let Some(due) = self.next_shot_due {
            if now < due {
                break;
            }
            if let Err(e) = capture.capture_one() {
                // Per-shot failure: report and keep the remaining shots.
                warn!(shot = self.shots_taken + 1, error = %e, "capture request failed");
            }
            self.shots_taken += 1;
            self.next_shot_due = if self.shots_taken < self.config.total_shots {
                Some(due + self.config.shot_spacing())
            } else {
                info!(shots = self.shots_taken, "burst complete");
                None
            };
        }

        let mut entered_cooldown = false;
        if let Some(due) = self.zoom_reset_due {
            if now >= due {
                self.zoom_reset_due = None;
                if let Err(e) = zoom.set_zoom(1.0) {
                    warn!(error = %e, "zoom reset dropped");
                }
                self.phase = CapturePhase::Cooldown;
                self.overlay_enabled = false;
                self.idle_due = Some(due + self.config.blackout());
                entered_cooldown = true;
            }
        }

        if let Some(due) = self.idle_due {
            if now >= due {
                self.idle_due = None;
                self.overlay_enabled = true;
                self.phase = CapturePhase::Idle;
            }
        }

        entered_cooldown
    }

    /// Earliest pending deadline, for the runtime thread's sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.next_shot_due, self.zoom_reset_due, self.idle_due]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn shots_taken(&self) -> u32 {
        self.shots_taken
    }

    pub fn overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }
}
