//! Math Slice entry point
//!
//! Runs a headless session: opens the game screen, feeds it frames until the
//! frame budget runs out (autopilot plays when `idle_mode` is on), and logs
//! what happened. Pass a settings JSON path as the first argument.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use math_slice::{Settings, consts::FRAME_MS, sim::GameEvent, ui::App};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Math Slice (headless) starting...");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("math-slice.json"));
    let settings = Settings::load_or_default(&path);

    let seed = if settings.seed != 0 {
        settings.seed
    } else {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    };
    let max_frames = settings.max_frames;

    let mut app = App::new(settings);
    app.start_game(seed);
    log::info!("Game initialized with seed: {}", seed);

    let mut best = 0;
    let mut games = 1;
    for _ in 0..max_frames {
        for event in app.frame(Vec::new(), FRAME_MS) {
            match event {
                GameEvent::GameOver { score } => {
                    log::info!("Game {} over, score {}", games, score);
                    best = best.max(score);
                    games += 1;
                    app.play_again();
                }
                GameEvent::Sliced { slot, correct } => {
                    log::debug!("Slice slot {} ({})", slot, if correct { "hit" } else { "miss" });
                }
                _ => {}
            }
        }
    }

    if let Some(frame) = app.snapshot() {
        best = best.max(frame.hud.score);
        println!(
            "Played {} frames over {} game(s): score {}, lives {}, best {}",
            max_frames, games, frame.hud.score, frame.hud.lives, best
        );
        match serde_json::to_string_pretty(&frame) {
            Ok(json) => log::debug!("Final frame:\n{}", json),
            Err(e) => log::warn!("Could not encode final frame: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives `ui::App` directly; nothing to run here
}
