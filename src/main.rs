use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::{Duration, Instant};

use autoframe::capture::CaptureLog;
use autoframe::classifier::Banner;
use autoframe::config::EngineConfig;
use autoframe::zoom::SimulatedZoom;
use autoframe::{CapturePhase, DetectionObservation, Engine, EngineRuntime, Rect, Snapshot};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulated camera frame rate
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// How long to run the simulation
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Narrow the simulated device zoom range (max available factor)
    #[arg(long, default_value_t = 3.0)]
    max_zoom: f32,
}

/// Scripted subject: walks into frame, drifts to center, then holds still.
fn synth_observation(t: f32, now: Instant) -> DetectionObservation {
    let mut obs = DetectionObservation::empty(now);

    // Body is visible from the start.
    obs.bodies.push(Rect::new(0.3, 0.2, 0.4, 0.2));

    // Face shows up after a second, off-center, and drifts in over the next.
    if t >= 1.0 {
        let progress = ((t - 1.0) / 1.0).min(1.0);
        let cx = 0.35 + 0.15 * progress;
        let cy = 0.35 + 0.15 * progress;
        obs.faces.push(Rect::new(cx - 0.1, cy - 0.1, 0.2, 0.2));
    }

    obs
}

fn describe(snap: &Snapshot) -> String {
    let banner = match (snap.no_subject, snap.too_close) {
        (true, _) => Some(Banner::NoSubject),
        (false, true) => Some(Banner::TooClose),
        _ => None,
    };
    let overlay = match banner {
        Some(Banner::NoSubject) => "NO SUBJECT".red().to_string(),
        Some(Banner::TooClose) => "BACK UP".yellow().to_string(),
        None if snap.guide_visible => "guide".normal().to_string(),
        None => "-".normal().to_string(),
    };
    let steady = if snap.is_steady {
        "steady".blue().bold().to_string()
    } else {
        "seeking".normal().to_string()
    };
    format!(
        "{:?} | zoom {:.1}x | {} | {} | shots {}",
        snap.phase, snap.zoom_factor, overlay, steady, snap.shots_taken
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = EngineConfig::load()?;

    let zoom = SimulatedZoom::with_limits((1.0, args.max_zoom));
    let capture = CaptureLog::new();
    let engine = Engine::new(config, Box::new(zoom.clone()), Box::new(capture.clone()));
    let runtime = EngineRuntime::spawn(engine);
    let shared = runtime.engine();

    println!("{}", "autoframe demo (scripted subject)".green().bold());
    let frame_budget = Duration::from_millis(1000 / args.fps.max(1) as u64);
    let start = Instant::now();
    let mut triggered = false;
    let mut last_line = String::new();

    while start.elapsed().as_secs_f32() < args.seconds {
        let cycle_start = Instant::now();
        let t = start.elapsed().as_secs_f32();
        let obs = synth_observation(t, cycle_start);

        let snap = {
            let mut eng = shared
                .lock()
                .map_err(|_| anyhow::anyhow!("engine lock poisoned"))?;
            let snap = eng.process_frame(&obs);
            if snap.is_steady && !triggered {
                println!("{}", "steady alignment; firing zoom & burst".blue());
                eng.begin_sequence(cycle_start);
                triggered = true;
            }
            snap
        };

        let line = describe(&snap);
        if line != last_line {
            println!("[{:5.2}s] {}", t, line);
            last_line = line;
        }

        if triggered && snap.phase == CapturePhase::Idle && snap.shots_taken > 0 {
            println!(
                "{}",
                format!("cycle complete: {} shots issued", capture.shots_issued()).green()
            );
            break;
        }

        let elapsed = cycle_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    Ok(())
}
