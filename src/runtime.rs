use crate::engine::Engine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Idle tick when no deadline is pending; also bounds how long a stop
/// request can go unnoticed.
const IDLE_TICK: Duration = Duration::from_millis(50);

/// Owns the engine behind a mutex and runs a timer thread that fires
/// orchestrator deadlines on wall-clock time, independent of frame cadence.
/// The frame-processing path locks the same engine to call `process_frame`,
/// so all mutation stays serialized.
pub struct EngineRuntime {
    engine: Arc<Mutex<Engine>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EngineRuntime {
    pub fn spawn(engine: Engine) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_engine = Arc::clone(&engine);
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                let next = {
                    let mut eng = match thread_engine.lock() {
                        Ok(guard) => guard,
                        Err(_) => break,
                    };
                    eng.poll_timers(Instant::now());
                    eng.next_deadline()
                };

                let sleep = match next {
                    Some(deadline) => deadline
                        .saturating_duration_since(Instant::now())
                        .min(IDLE_TICK),
                    None => IDLE_TICK,
                };
                if !sleep.is_zero() {
                    thread::sleep(sleep);
                }
            }
        });

        Self {
            engine,
            stop,
            handle: Some(handle),
        }
    }

    /// Shared handle for the frame-processing path.
    pub fn engine(&self) -> Arc<Mutex<Engine>> {
        Arc::clone(&self.engine)
    }
}

impl Drop for EngineRuntime {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureLog;
    use crate::config::EngineConfig;
    use crate::types::{DetectionObservation, Rect};
    use crate::zoom::{SimulatedZoom, ZoomControl};

    #[test]
    fn burst_completes_without_further_frames() {
        let zoom = SimulatedZoom::new();
        let capture = CaptureLog::new();
        let mut config = EngineConfig::default();
        // Short timings so the test runs quickly.
        config.alignment.steady_duration_secs = 0.05;
        config.capture.shot_spacing_secs = 0.01;
        config.capture.zoom_reset_delay_secs = 0.1;
        config.capture.blackout_secs = 0.02;

        let engine = Engine::new(config, Box::new(zoom.clone()), Box::new(capture.clone()));
        let runtime = EngineRuntime::spawn(engine);
        let shared = runtime.engine();

        // Feed centered frames until steady, then trigger and stop feeding.
        let start = Instant::now();
        loop {
            let now = Instant::now();
            let obs = DetectionObservation {
                faces: vec![Rect::new(0.4, 0.4, 0.2, 0.2)],
                bodies: vec![Rect::new(0.3, 0.2, 0.4, 0.2)],
                timestamp: now,
            };
            let snap = shared.lock().unwrap().process_frame(&obs);
            if snap.is_steady {
                assert!(shared.lock().unwrap().begin_sequence(now));
                break;
            }
            assert!(start.elapsed() < Duration::from_secs(2), "never became steady");
            thread::sleep(Duration::from_millis(10));
        }

        // No more frames: the timer thread alone must finish the cycle.
        let deadline = Instant::now() + Duration::from_secs(1);
        while Instant::now() < deadline {
            if capture.shots_issued() == 5 && zoom.current() == 1.0 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(capture.shots_issued(), 5);
        assert_eq!(zoom.current(), 1.0);
    }
}
