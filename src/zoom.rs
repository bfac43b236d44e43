use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Hard zoom range for this application, regardless of what the device offers.
pub const ZOOM_FLOOR: f32 = 1.0;
pub const ZOOM_CEILING: f32 = 3.0;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no zoom-capable device available")]
    Unavailable,
    #[error("zoom command rejected: {0}")]
    Rejected(String),
}

/// The zoom-control collaborator: a single logical device, commanded
/// sequentially. `set_zoom` is a request, not a guarantee; the collaborator
/// clamps into `[1, 3] ∩ [min_available, max_available]` and reports the
/// factor actually applied.
pub trait ZoomControl {
    fn set_zoom(&mut self, factor: f32) -> Result<f32, DeviceError>;
    fn current(&self) -> f32;
    /// Device-reported (min_available, max_available); may be narrower than [1, 3].
    fn limits(&self) -> (f32, f32);
}

/// Clamp a requested factor into the app range intersected with device limits.
pub fn clamp_zoom(factor: f32, limits: (f32, f32)) -> f32 {
    let low = limits.0.max(ZOOM_FLOOR);
    let high = limits.1.min(ZOOM_CEILING);
    factor.max(low).min(high)
}

/// In-process stand-in for a real lens: clamps like hardware would and keeps
/// a request log so tests and the demo binary can inspect what was asked.
/// Clones share the same device, matching the single-logical-device model.
#[derive(Clone)]
pub struct SimulatedZoom {
    inner: Arc<Mutex<ZoomInner>>,
}

struct ZoomInner {
    factor: f32,
    limits: (f32, f32),
    requests: Vec<f32>,
}

impl SimulatedZoom {
    pub fn new() -> Self {
        Self::with_limits((1.0, 3.0))
    }

    pub fn with_limits(limits: (f32, f32)) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ZoomInner {
                factor: 1.0,
                limits,
                requests: Vec::new(),
            })),
        }
    }

    /// Every factor ever requested, pre-clamp, in order.
    pub fn requests(&self) -> Vec<f32> {
        match self.inner.lock() {
            Ok(inner) => inner.requests.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for SimulatedZoom {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomControl for SimulatedZoom {
    fn set_zoom(&mut self, factor: f32) -> Result<f32, DeviceError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| DeviceError::Rejected("zoom device state poisoned".into()))?;
        inner.requests.push(factor);
        let applied = clamp_zoom(factor, inner.limits);
        inner.factor = applied;
        debug!(requested = factor, applied, "zoom adjusted");
        Ok(applied)
    }

    fn current(&self) -> f32 {
        match self.inner.lock() {
            Ok(inner) => inner.factor,
            Err(_) => 1.0,
        }
    }

    fn limits(&self) -> (f32, f32) {
        match self.inner.lock() {
            Ok(inner) => inner.limits,
            Err(_) => (ZOOM_FLOOR, ZOOM_CEILING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_app_range() {
        assert_eq!(clamp_zoom(0.5, (1.0, 3.0)), 1.0);
        assert_eq!(clamp_zoom(2.0, (1.0, 3.0)), 2.0);
        assert_eq!(clamp_zoom(5.0, (1.0, 3.0)), 3.0);
    }

    #[test]
    fn device_limits_narrow_the_range() {
        // Device can only do 1.0..2.0 even though the app allows up to 3.0.
        assert_eq!(clamp_zoom(2.5, (1.0, 2.0)), 2.0);
        // Device minimum above 1.0 raises the floor.
        assert_eq!(clamp_zoom(1.0, (1.2, 3.0)), 1.2);
        // Device range wider than the app range does not widen it.
        assert_eq!(clamp_zoom(4.0, (0.5, 10.0)), 3.0);
    }

    #[test]
    fn simulated_zoom_reports_applied_factor() {
        let mut zoom = SimulatedZoom::with_limits((1.0, 2.0));
        let applied = zoom.set_zoom(2.5).unwrap();
        assert_eq!(applied, 2.0);
        assert_eq!(zoom.current(), 2.0);
        assert_eq!(zoom.requests(), vec![2.5]);
    }

    #[test]
    fn clones_share_the_device() {
        let zoom = SimulatedZoom::new();
        let mut handle = zoom.clone();
        handle.set_zoom(1.5).unwrap();
        assert_eq!(zoom.current(), 1.5);
    }
}
