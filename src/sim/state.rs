//! Session state and wave bookkeeping
//!
//! Everything the session mutates lives in [`GameState`]: score, lives, the
//! current wave, bubble slots, fragments, the swipe trail, pending tasks and
//! the seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Bubble, Fragment, FragmentSide, slot_positions, split_label};
use super::geometry::Rect;
use super::schedule::Scheduler;
use super::swipe::SwipeTracker;
use super::wave::{Wave, generate_wave};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bubbles are flying and swipes count
    Playing,
    /// Out of lives; waiting for restart
    GameOver,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted { wave_id: u64 },
    Sliced { slot: usize, correct: bool },
    BubbleFell { slot: usize },
    LifeLost { lives: u8 },
    GameOver { score: u32 },
    Restarted,
    FragmentDone { id: u32 },
}

/// Bubble rect lookup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureError {
    /// The bubble has not been simulated since its wave started
    NotMeasured { slot: usize },
    /// No such slot
    OutOfRange { slot: usize },
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotMeasured { slot } => write!(f, "bubble {} has not been measured yet", slot),
            Self::OutOfRange { slot } => write!(f, "bubble slot {} does not exist", slot),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Logical screen the simulation runs in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub screen: Screen,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u8,
    /// Current problem
    pub wave: Wave,
    /// One bubble per candidate answer
    pub bubbles: [Bubble; BUBBLE_SLOTS],
    /// Rects measured by the last simulation step, by slot
    pub(crate) rects: [Option<Rect>; BUBBLE_SLOTS],
    /// Bubbles of the current wave that fell unsliced
    pub fallen_count: usize,
    /// Latched once the current wave has triggered its advance (or game over)
    pub round_resolved: bool,
    /// Live fragments (sorted by id)
    pub fragments: Vec<Fragment>,
    pub swipe: SwipeTracker,
    pub(crate) scheduler: Scheduler,
    /// Session clock (ms), advanced by tick input
    pub clock_ms: f64,
    /// Cached even-spaced slot x positions
    slot_x: [f32; BUBBLE_SLOTS],
    next_wave_id: u64,
    next_fragment_id: u32,
}

impl GameState {
    /// Create a session on the default screen
    pub fn new(seed: u64) -> Self {
        Self::with_screen(seed, Screen::default())
    }

    /// Create a session and build its first wave
    pub fn with_screen(seed: u64, screen: Screen) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let slot_x = slot_positions(screen.width);
        let wave = generate_wave(&mut rng, 0);
        let bubbles = launch_bubbles(&mut rng, &wave, &slot_x, screen.height);

        log::info!(
            "Session started (seed {}): {} + {}",
            seed,
            wave.operand_a,
            wave.operand_b
        );

        Self {
            seed,
            rng,
            screen,
            phase: GamePhase::Playing,
            score: 0,
            lives: START_LIVES,
            wave,
            bubbles,
            rects: [None; BUBBLE_SLOTS],
            fallen_count: 0,
            round_resolved: false,
            fragments: Vec::new(),
            swipe: SwipeTracker::new(),
            scheduler: Scheduler::new(),
            clock_ms: 0.0,
            slot_x,
            next_wave_id: 1,
            next_fragment_id: 1,
        }
    }

    /// Replace the current wave and relaunch every bubble slot
    pub fn start_wave(&mut self) -> u64 {
        let id = self.next_wave_id;
        self.next_wave_id += 1;

        self.wave = generate_wave(&mut self.rng, id);
        self.bubbles = launch_bubbles(&mut self.rng, &self.wave, &self.slot_x, self.screen.height);
        self.rects = [None; BUBBLE_SLOTS];
        self.fallen_count = 0;
        self.round_resolved = false;

        log::info!(
            "Wave {}: {} + {} (answers {:?})",
            id,
            self.wave.operand_a,
            self.wave.operand_b,
            self.wave.candidates
        );
        id
    }

    /// Back to a fresh session: score 0, full lives, new wave.
    /// Fragments already in flight keep falling.
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.phase = GamePhase::Playing;
        self.swipe.end();
        self.start_wave();
        log::info!("Session restarted");
    }

    /// Rect of a bubble as measured by the last simulation step
    pub fn bubble_rect(&self, slot: usize) -> Result<Rect, MeasureError> {
        match self.rects.get(slot) {
            Some(Some(rect)) => Ok(*rect),
            Some(None) => Err(MeasureError::NotMeasured { slot }),
            None => Err(MeasureError::OutOfRange { slot }),
        }
    }

    /// Record every bubble's current rect
    pub(crate) fn measure_bubbles(&mut self) {
        for (rect, bubble) in self.rects.iter_mut().zip(&self.bubbles) {
            *rect = Some(bubble.rect());
        }
    }

    /// Hide a sliced bubble and throw its two halves
    pub(crate) fn spawn_fragments(&mut self, slot: usize) {
        let bubble = &mut self.bubbles[slot];
        bubble.hidden = true;
        let center = bubble.rect().center();
        let (left, right) = split_label(&bubble.label);

        for (side, text) in [(FragmentSide::Left, left), (FragmentSide::Right, right)] {
            let id = self.next_fragment_id;
            self.next_fragment_id += 1;
            let fragment = Fragment::spawn(&mut self.rng, id, side, center, text);
            self.fragments.push(fragment);
        }
    }

    /// Take a life; returns true if that was the last one
    pub(crate) fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            for bubble in &mut self.bubbles {
                bubble.hidden = true;
            }
            log::info!("Game over with score {}", self.score);
            true
        } else {
            false
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Number of delayed tasks waiting to fire
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Ensure fragments are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.fragments.sort_by_key(|f| f.id);
    }
}

fn launch_bubbles(
    rng: &mut Pcg32,
    wave: &Wave,
    slot_x: &[f32; BUBBLE_SLOTS],
    screen_height: f32,
) -> [Bubble; BUBBLE_SLOTS] {
    let labels = wave.labels();
    std::array::from_fn(|slot| {
        Bubble::launch(&mut *rng, slot_x[slot], screen_height, labels[slot].clone())
    })
}
