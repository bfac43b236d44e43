use std::time::Instant;

/// Axis-aligned bounding box in normalized image coordinates ([0,1] on both axes).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One frame's detection result from the vision collaborator.
/// Consumed immediately by the engine, never stored.
#[derive(Debug, Clone)]
pub struct DetectionObservation {
    pub faces: Vec<Rect>,
    pub bodies: Vec<Rect>,
    pub timestamp: Instant,
}

impl DetectionObservation {
    pub fn empty(timestamp: Instant) -> Self {
        Self {
            faces: Vec::new(),
            bodies: Vec::new(),
            timestamp,
        }
    }
}

/// Color of the framing guide: Neutral while dwelling, Confirmed once steady.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuideColor {
    #[default]
    Neutral,
    Confirmed,
}

/// Phase of the zoom/burst/cooldown cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePhase {
    #[default]
    Idle,
    Ramping,
    Bursting,
    Cooldown,
}

/// Immutable state snapshot published to the UI layer after every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub max_face_width: f32,
    pub max_body_height: f32,
    pub zoom_factor: f32,
    pub no_subject: bool,
    pub too_close: bool,
    pub guide_visible: bool,
    pub guide_color: GuideColor,
    pub is_steady: bool,
    pub phase: CapturePhase,
    pub shots_taken: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_center() {
        let r = Rect::new(0.4, 0.4, 0.2, 0.2);
        let (cx, cy) = r.center();
        assert!((cx - 0.5).abs() < 1e-6);
        assert!((cy - 0.5).abs() < 1e-6);
    }
}
