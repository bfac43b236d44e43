//! Decision core for a camera-assist application.
//!
//! Consumes per-frame face/body detections, classifies framing overlays,
//! detects steady subject alignment, and orchestrates an automatic
//! zoom + burst-capture + cooldown sequence. Frame acquisition, the
//! detection model, lens control, and photo capture are external
//! collaborators behind the traits in [`zoom`] and [`capture`].

pub mod alignment;
pub mod capture;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod orchestrator;
pub mod runtime;
pub mod thresholds;
pub mod tracker;
pub mod types;
pub mod zoom;

pub use engine::Engine;
pub use runtime::EngineRuntime;
pub use types::{CapturePhase, DetectionObservation, GuideColor, Rect, Snapshot};
