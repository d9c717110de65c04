//! Lane Runner entry point
//!
//! Headless native driver: runs the seeded autopilot through a course at a
//! simulated 60 Hz display rate and reports how the run ended.
//!
//! Usage: `lane-runner [tuning.json] [layout.json]`

use std::error::Error;

use lane_runner::audio::AudioManager;
use lane_runner::platform::Session;
use lane_runner::platform::headless::{Autopilot, HeadlessRenderer};
use lane_runner::{SpawnLayout, Tuning};

/// Display frame length fed to the session
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many simulated seconds
const MAX_RUN_SECS: f32 = 180.0;
const AUTOPILOT_SEED: u64 = 0x5EED;

fn load_tuning(path: Option<&str>) -> Result<Tuning, Box<dyn Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let tuning = Tuning::from_json(&json)?;
            log::info!("Loaded tuning from {}", path);
            Ok(tuning)
        }
        None => Ok(Tuning::default()),
    }
}

fn load_layout(path: Option<&str>, tuning: &Tuning) -> Result<SpawnLayout, Box<dyn Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let layout = SpawnLayout::from_json(&json)?;
            log::info!("Loaded {} spawns from {}", layout.len(), path);
            Ok(layout)
        }
        None => Ok(SpawnLayout::default_course(&tuning.lanes)),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Lane Runner (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = load_tuning(args.first().map(String::as_str))?;
    let layout = load_layout(args.get(1).map(String::as_str), &tuning)?;

    let mut session = Session::new(
        tuning,
        layout,
        HeadlessRenderer::new(2),
        AudioManager::new(),
        Autopilot::new(AUTOPILOT_SEED),
    );

    let max_frames = (MAX_RUN_SECS / FRAME_DT) as u32;
    for _ in 0..max_frames {
        session.frame(FRAME_DT);
        if session.is_over() {
            break;
        }
    }

    let state = session.state();
    let outcome = session
        .audio()
        .game_over_text()
        .unwrap_or("Time limit reached, still running");
    println!("{}", outcome);
    println!(
        "{} after {:.1}s ({} frames rendered)",
        session.audio().score_text(),
        state.run.elapsed,
        session.renderer().frames()
    );
    Ok(())
}
