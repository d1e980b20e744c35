//! Render snapshot of the game screen
//!
//! Plain data the host draws: HUD counters, visible bubbles, fragments, the
//! fading trail and the game-over overlay.

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{GameState, Rect};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleView {
    pub slot: usize,
    pub rect: Rect,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentView {
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailView {
    pub start: Vec2,
    pub end: Vec2,
    /// 0 (transparent) to 1 (newest segment)
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOverOverlay {
    pub final_score: u32,
    pub action: &'static str,
}

/// Everything needed to draw one frame of the game screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub hud: Hud,
    pub bubbles: Vec<BubbleView>,
    pub fragments: Vec<FragmentView>,
    pub trail: Vec<TrailView>,
    pub game_over: Option<GameOverOverlay>,
}

impl Frame {
    pub fn capture(state: &GameState, settings: &Settings) -> Self {
        let bubbles = state
            .bubbles
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.hidden)
            .map(|(slot, b)| BubbleView {
                slot,
                rect: b.rect(),
                label: b.label.clone(),
            })
            .collect();

        let fragments = if settings.fragments {
            state
                .fragments
                .iter()
                .map(|f| FragmentView {
                    pos: f.pos,
                    rotation: f.rotation,
                    text: f.text.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        // Newest segments only; fade keeps its full-trail ranking
        let keep = settings.trail_segments();
        let faded: Vec<_> = state.swipe.faded().collect();
        let skip = faded.len().saturating_sub(keep);
        let trail = faded
            .into_iter()
            .skip(skip)
            .map(|(seg, opacity)| TrailView {
                start: seg.start,
                end: seg.end,
                opacity,
            })
            .collect();

        let game_over = state.is_game_over().then(|| GameOverOverlay {
            final_score: state.score,
            action: "Play again",
        });

        Self {
            hud: Hud {
                score: state.score,
                lives: state.lives,
            },
            bubbles,
            fragments,
            trail,
            game_over,
        }
    }
}
