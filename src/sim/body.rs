//! Falling bodies: answer bubbles and sliced fragments
//!
//! Motion is per frame, not per second. The host calls `step` once for every
//! animation frame it renders, whatever its frame rate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Something a body reports once during its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEvent {
    /// Bubble dropped below the screen without being sliced
    Fell,
    /// Fragment scrolled far enough below the screen to be removed
    Done,
}

/// An answer bubble occupying one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    /// Top-left corner of the bubble rect
    pub pos: Vec2,
    /// Vertical velocity (units/frame, negative is upward)
    pub vy: f32,
    pub label: String,
    /// Sliced, or the round it belongs to has ended
    pub hidden: bool,
    /// Latched once the bubble crosses the fall line
    pub fallen: bool,
}

impl Bubble {
    /// Launch a fresh bubble from the bottom of the screen
    pub fn launch<R: Rng>(rng: &mut R, x: f32, screen_height: f32, label: String) -> Self {
        Self {
            pos: Vec2::new(x, screen_height - BUBBLE_SPAWN_INSET),
            vy: rng.random_range(BUBBLE_LAUNCH_MIN..=BUBBLE_LAUNCH_MAX),
            label,
            hidden: false,
            fallen: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BUBBLE_WIDTH, BUBBLE_HEIGHT)
    }

    /// Advance one frame. Returns `Fell` the first time the bubble drops
    /// below `screen_height + BUBBLE_FALL_MARGIN`.
    pub fn step(&mut self, screen_height: f32) -> Option<BodyEvent> {
        self.pos.y += self.vy;
        self.vy += GRAVITY;

        // Cap the apex without clamping position
        if self.pos.y < screen_height * BUBBLE_CEILING_FRACTION && self.vy < 0.0 {
            self.vy = 0.0;
        }

        if !self.fallen && self.pos.y > screen_height + BUBBLE_FALL_MARGIN {
            self.fallen = true;
            return Some(BodyEvent::Fell);
        }
        None
    }
}

/// Which half of a sliced label a fragment carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentSide {
    Left,
    Right,
}

/// One half of a sliced bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub id: u32,
    pub side: FragmentSide,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    pub text: String,
    pub done: bool,
}

impl Fragment {
    /// Spawn a fragment at `center`, flung outward toward its side and upward
    pub fn spawn<R: Rng>(
        rng: &mut R,
        id: u32,
        side: FragmentSide,
        center: Vec2,
        text: String,
    ) -> Self {
        let speed_x = rng.random_range(FRAGMENT_SPEED_X_MIN..=FRAGMENT_SPEED_X_MAX);
        let vx = match side {
            FragmentSide::Left => -speed_x,
            FragmentSide::Right => speed_x,
        };
        let vy = rng.random_range(FRAGMENT_SPEED_Y_MIN..=FRAGMENT_SPEED_Y_MAX);
        Self {
            id,
            side,
            pos: center,
            vel: Vec2::new(vx, vy),
            rotation: 0.0,
            text,
            done: false,
        }
    }

    /// Advance one frame. Returns `Done` exactly once, the first time the
    /// fragment drops below `screen_height + FRAGMENT_DONE_MARGIN`.
    pub fn step(&mut self, screen_height: f32) -> Option<BodyEvent> {
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
        self.vel.y += GRAVITY;
        self.rotation += FRAGMENT_SPIN;

        if !self.done && self.pos.y > screen_height + FRAGMENT_DONE_MARGIN {
            self.done = true;
            return Some(BodyEvent::Done);
        }
        None
    }
}

/// Split a bubble label at "=" into trimmed left and right halves.
///
/// A label without "=" keeps its whole text on the left.
pub fn split_label(label: &str) -> (String, String) {
    match label.split_once('=') {
        Some((left, right)) => (left.trim().to_string(), right.trim().to_string()),
        None => (label.trim().to_string(), String::new()),
    }
}

/// Evenly spaced x positions (rect left edges) for the bubble slots
pub fn slot_positions(screen_width: f32) -> [f32; BUBBLE_SLOTS] {
    let spacing = screen_width / (BUBBLE_SLOTS as f32 + 1.0);
    std::array::from_fn(|i| spacing * (i as f32 + 1.0) - BUBBLE_WIDTH / 2.0)
}
