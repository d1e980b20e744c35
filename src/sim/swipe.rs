//! Swipe tracking
//!
//! Turns a stream of pointer samples into short segments. Every segment is
//! both a hit-test probe and a piece of the fading trail drawn behind the
//! finger.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TRAIL_CAPACITY;

/// One piece of the swipe trail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSegment {
    pub id: u64,
    pub start: Vec2,
    pub end: Vec2,
}

/// Pointer gesture phases, as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    Begin(Vec2),
    Move(Vec2),
    End,
}

/// Bounded trail of the current swipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeTracker {
    last_point: Option<Vec2>,
    /// Oldest first
    trail: VecDeque<TrailSegment>,
    next_id: u64,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finger down: remember the start point and drop the old trail
    pub fn begin(&mut self, point: Vec2) {
        self.last_point = Some(point);
        self.trail.clear();
    }

    /// Finger moved: append the segment from the previous sample.
    ///
    /// A move without a preceding `begin` only records the point.
    pub fn update(&mut self, point: Vec2) -> Option<TrailSegment> {
        let start = self.last_point.replace(point)?;

        let segment = TrailSegment {
            id: self.next_id,
            start,
            end: point,
        };
        self.next_id += 1;

        self.trail.push_back(segment);
        while self.trail.len() > TRAIL_CAPACITY {
            self.trail.pop_front();
        }
        Some(segment)
    }

    /// Finger up
    pub fn end(&mut self) {
        self.last_point = None;
        self.trail.clear();
    }

    pub fn is_active(&self) -> bool {
        self.last_point.is_some()
    }

    /// Segments oldest first
    pub fn segments(&self) -> impl Iterator<Item = &TrailSegment> {
        self.trail.iter()
    }

    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    /// Segments oldest first with an opacity in (0, 1]; the newest is fully
    /// opaque and each older one fades by 1/len.
    pub fn faded(&self) -> impl Iterator<Item = (TrailSegment, f32)> + '_ {
        let len = self.trail.len() as f32;
        self.trail
            .iter()
            .enumerate()
            .map(move |(i, seg)| (*seg, (i as f32 + 1.0) / len))
    }
}
