use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub detection: DetectionConfig,
    pub alignment: AlignmentConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Seconds without a face detection before the tracked face width decays to 0.
    pub face_timeout_secs: f64,
    /// Seconds without a body detection before the "no subject" overlay shows.
    pub body_timeout_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Target point for the subject center. (0.5, 0.66) would give rule-of-thirds.
    pub target_x: f32,
    pub target_y: f32,
    /// Per-axis tolerance around the target (L-infinity, not euclidean).
    pub tolerance: f32,
    /// Continuous in-tolerance time required before alignment counts as steady.
    pub steady_duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub total_shots: u32,
    pub shot_spacing_secs: f64,
    /// Delay from trigger acceptance until zoom resets to 1x (overlaps the burst).
    pub zoom_reset_delay_secs: f64,
    /// Guide overlay blackout after the zoom reset, before returning to Idle.
    pub blackout_secs: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            face_timeout_secs: 1.0,
            body_timeout_secs: 1.0,
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            target_x: 0.5,
            target_y: 0.5,
            tolerance: 0.05,
            steady_duration_secs: 2.0,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            total_shots: 5,
            shot_spacing_secs: 0.2,
            zoom_reset_delay_secs: 2.0,
            blackout_secs: 0.25,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            alignment: AlignmentConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

impl DetectionConfig {
    pub fn face_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.face_timeout_secs)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.body_timeout_secs)
    }
}

impl AlignmentConfig {
    pub fn target(&self) -> (f32, f32) {
        (self.target_x, self.target_y)
    }

    pub fn steady_duration(&self) -> Duration {
        Duration::from_secs_f64(self.steady_duration_secs)
    }
}

impl CaptureConfig {
    pub fn shot_spacing(&self) -> Duration {
        Duration::from_secs_f64(self.shot_spacing_secs)
    }

    pub fn zoom_reset_delay(&self) -> Duration {
        Duration::from_secs_f64(self.zoom_reset_delay_secs)
    }

    pub fn blackout(&self) -> Duration {
        Duration::from_secs_f64(self.blackout_secs)
    }
}

impl EngineConfig {
    const PATH: &'static str = "config.json";

    pub fn load() -> Result<Self> {
        let config = if Path::new(Self::PATH).exists() {
            let content = fs::read_to_string(Self::PATH)?;
            // Missing fields fall back to defaults via #[serde(default)]
            match serde_json::from_str::<EngineConfig>(&content) {
                Ok(c) => {
                    println!("Loaded configuration from {}", Self::PATH);
                    c
                }
                Err(e) => {
                    println!("Error parsing config: {}. Loading defaults.", e);
                    Self::default()
                }
            }
        } else {
            println!("Configuration file not found. Creating default at {}", Self::PATH);
            Self::default()
        };

        // Save back so new fields are populated in the file
        config.save()?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::PATH, content)?;
        Ok(())
    }
}
