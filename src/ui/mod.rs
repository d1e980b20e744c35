//! Headless presentation layer
//!
//! A two-route navigation stack (home, game) wrapped around a session, and
//! the frame snapshots a host renders from.

pub mod frame;

pub use frame::{BubbleView, Frame, FragmentView, GameOverOverlay, Hud, TrailView};

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Gesture, TickInput, tick};

/// Navigation destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Home,
    Game,
}

/// Navigation stack; never empty, Home at the bottom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Route::Home],
        }
    }
}

impl Navigator {
    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Home)
    }

    pub fn push(&mut self, route: Route) {
        if self.current() != route {
            self.stack.push(route);
        }
    }

    /// Pop one route; the root stays
    pub fn back(&mut self) -> Route {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// The whole app: navigation plus the running session, if any
pub struct App {
    pub settings: Settings,
    pub nav: Navigator,
    session: Option<GameState>,
    restart_requested: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            nav: Navigator::default(),
            session: None,
            restart_requested: false,
        }
    }

    /// Home screen's "start game": open the game screen with a fresh session
    pub fn start_game(&mut self, seed: u64) {
        self.session = Some(GameState::with_screen(seed, self.settings.screen()));
        self.restart_requested = false;
        self.nav.push(Route::Game);
    }

    /// Game-over overlay's "play again"; takes effect on the next frame
    pub fn play_again(&mut self) {
        if self.session.is_some() {
            self.restart_requested = true;
        }
    }

    /// Leave the game screen and drop the session
    pub fn back(&mut self) -> Route {
        let route = self.nav.back();
        if route == Route::Home {
            self.session = None;
        }
        route
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    /// Run one host frame. Does nothing outside the game screen.
    pub fn frame(&mut self, gestures: Vec<Gesture>, elapsed_ms: f64) -> Vec<GameEvent> {
        if self.nav.current() != Route::Game {
            return Vec::new();
        }
        let Some(state) = self.session.as_mut() else {
            return Vec::new();
        };

        let input = TickInput {
            gestures,
            restart: std::mem::take(&mut self.restart_requested),
            elapsed_ms,
            idle_mode: self.settings.idle_mode,
        };
        tick(state, &input)
    }

    /// Snapshot of the game screen, if it is showing
    pub fn snapshot(&self) -> Option<Frame> {
        if self.nav.current() != Route::Game {
            return None;
        }
        self.session
            .as_ref()
            .map(|state| Frame::capture(state, &self.settings))
    }
}
