use derive_more::{Add, Mul, Sub};
use serde::{Deserialize, Serialize};

/// 2D point with f32 coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Add, Sub, Mul, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Linear interpolation towards `target`, `factor` being the share of the target
    pub fn lerp(self, target: Self, factor: f32) -> Self {
        target * factor + self * (1.0 - factor)
    }
}
