//! Immutable line-segment obstacles

use crate::error::{ensure_finite, Result, SimError};
use glam::DVec2;
use serde::Serialize;

/// Undirected segment `(x1, y1) - (x2, y2)`.
///
/// Fields are private so a wall can only exist in validated form.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Wall {
    start: DVec2,
    end: DVec2,
}

impl Wall {
    /// Build a wall, rejecting non-finite coordinates and zero-length segments.
    ///
    /// A zero-length wall has no direction, which would make the reflection
    /// angle undefined.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        let start = DVec2::new(ensure_finite("x1", x1)?, ensure_finite("y1", y1)?);
        let end = DVec2::new(ensure_finite("x2", x2)?, ensure_finite("y2", y2)?);
        if start == end {
            return Err(SimError::invalid(format!(
                "wall endpoints coincide at ({x1}, {y1})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DVec2 {
        self.start
    }

    pub fn end(&self) -> DVec2 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}
