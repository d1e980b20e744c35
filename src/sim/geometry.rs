//! Segment and rectangle intersection for slice detection
//!
//! A swipe is a polyline of short segments. A bubble is sliced when any
//! segment crosses one of the edges of its padded bounding rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::HIT_PADDING;

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Grow the rect by `pad` on every side
    pub fn expanded(&self, pad: f32) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + pad * 2.0,
            h: self.h + pad * 2.0,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// The four edges as (start, end) pairs: top, right, bottom, left
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.x, self.y);
        let tr = Vec2::new(self.x + self.w, self.y);
        let br = Vec2::new(self.x + self.w, self.y + self.h);
        let bl = Vec2::new(self.x, self.y + self.h);
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// Parametric intersection of segments p1-p2 and p3-p4.
///
/// Parallel segments (zero determinant) never intersect, collinear overlap
/// included. Touching at an endpoint (t or u of exactly 0 or 1) counts.
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.perp_dot(d2);
    if denom == 0.0 {
        return false;
    }

    let offset = p3 - p1;
    let t = offset.perp_dot(d2) / denom;
    let u = offset.perp_dot(d1) / denom;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Whether segment p1-p2 crosses any edge of `rect` padded by [`HIT_PADDING`]
pub fn segment_intersects_rect(p1: Vec2, p2: Vec2, rect: &Rect) -> bool {
    rect.expanded(HIT_PADDING)
        .edges()
        .iter()
        .any(|&(a, b)| segments_intersect(p1, p2, a, b))
}
