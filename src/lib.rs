//! Math Slice - swipe-to-slice arithmetic arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubbles, fragments, swipes, session state)
//! - `ui`: Headless presentation (navigation stack, frame snapshots)
//! - `settings`: Data-driven configuration

pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Number of answer bubbles per wave
    pub const BUBBLE_SLOTS: usize = 3;
    /// Lives at the start of a session
    pub const START_LIVES: u8 = 3;

    /// Default logical screen size (portrait phone)
    pub const SCREEN_WIDTH: f32 = 390.0;
    pub const SCREEN_HEIGHT: f32 = 844.0;

    /// Bubble rectangle size
    pub const BUBBLE_WIDTH: f32 = 90.0;
    pub const BUBBLE_HEIGHT: f32 = 56.0;
    /// Bubbles spawn this far above the bottom edge
    pub const BUBBLE_SPAWN_INSET: f32 = 80.0;
    /// Launch velocity range (units/frame, negative is upward)
    pub const BUBBLE_LAUNCH_MIN: f32 = -15.0;
    pub const BUBBLE_LAUNCH_MAX: f32 = -11.0;
    /// Bubbles stop rising above this fraction of the screen height
    pub const BUBBLE_CEILING_FRACTION: f32 = 0.1;
    /// A bubble counts as fallen once below screen_height + this
    pub const BUBBLE_FALL_MARGIN: f32 = 120.0;

    /// Gravity (units/frame²)
    pub const GRAVITY: f32 = 0.2;

    /// Fragment launch ranges (units/frame)
    pub const FRAGMENT_SPEED_X_MIN: f32 = 2.0;
    pub const FRAGMENT_SPEED_X_MAX: f32 = 5.0;
    pub const FRAGMENT_SPEED_Y_MIN: f32 = -7.0;
    pub const FRAGMENT_SPEED_Y_MAX: f32 = -4.0;
    /// Fragment spin (degrees/frame)
    pub const FRAGMENT_SPIN: f32 = 2.0;
    /// A fragment is done once below screen_height + this
    pub const FRAGMENT_DONE_MARGIN: f32 = 200.0;

    /// Padding added around each bubble rect for hit-testing
    pub const HIT_PADDING: f32 = 12.0;

    /// Maximum swipe segments kept in the trail
    pub const TRAIL_CAPACITY: usize = 16;

    /// Delay before the next wave after a slice (ms)
    pub const SLICE_ADVANCE_DELAY_MS: f64 = 200.0;
    /// Delay before the next wave after every bubble fell (ms)
    pub const FALL_ADVANCE_DELAY_MS: f64 = 250.0;

    /// Nominal host frame time (ms), used by the headless driver
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
