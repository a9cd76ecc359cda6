//! Canvas Geometry
//!
//! Fixed 420x420 canvas. Every primitive is placed relative to the center.

use serde::{Deserialize, Serialize};

/// Canvas edge length in user units (and in exported pixels).
pub const CANVAS_SIZE: u32 = 420;

/// Radius of the outer ring.
pub const OUTER_RADIUS: f64 = 140.0;

/// Inner ring radius as a fraction of the outer radius.
pub const INNER_RATIO: f64 = 0.6;

pub const CENTER: Point = Point { x: 210.0, y: 210.0 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn inner_radius() -> f64 {
    OUTER_RADIUS * INNER_RATIO
}

/// Point at `angle_deg` degrees and distance `r` from the canvas center.
///
/// Angles grow clockwise on screen because the y axis points down.
pub fn polar(angle_deg: f64, r: f64) -> Point {
    let rad = angle_deg * std::f64::consts::PI / 180.0;
    Point {
        x: CENTER.x + r * rad.cos(),
        y: CENTER.y + r * rad.sin(),
    }
}

/// Twice the signed area of triangle `abc`.
pub fn doubled_area(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}
