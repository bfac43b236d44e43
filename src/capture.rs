use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture command rejected: {0}")]
    Rejected(String),
}

/// The single-photo capture collaborator. One command per shot; the burst
/// does not wait for capture completion callbacks.
pub trait PhotoCapture {
    fn capture_one(&mut self) -> Result<(), CaptureError>;
}

/// Counting capture sink for the demo binary and tests. Clones share the
/// counter, so a handle kept outside the engine sees every shot issued.
#[derive(Clone, Default)]
pub struct CaptureLog {
    shots: Arc<AtomicUsize>,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shots_issued(&self) -> usize {
        self.shots.load(Ordering::SeqCst)
    }
}

impl PhotoCapture for CaptureLog {
    fn capture_one(&mut self) -> Result<(), CaptureError> {
        let n = self.shots.fetch_add(1, Ordering::SeqCst) + 1;
        info!(shot = n, "capture requested");
        Ok(())
    }
}
