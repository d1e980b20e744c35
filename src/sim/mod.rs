//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time advances only through tick input
//! - Stable iteration order (by slot index and fragment ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod geometry;
pub mod schedule;
pub mod state;
pub mod swipe;
pub mod tick;
pub mod wave;

pub use body::{BodyEvent, Bubble, Fragment, FragmentSide, slot_positions, split_label};
pub use geometry::{Rect, segment_intersects_rect, segments_intersect};
pub use schedule::{Scheduler, Task};
pub use state::{GameEvent, GamePhase, GameState, MeasureError, Screen};
pub use swipe::{Gesture, SwipeTracker, TrailSegment};
pub use tick::{TickInput, autopilot_swipe, find_sliced_bubble, tick};
pub use wave::{Wave, generate_wave};
