//! Particle entity and its single-step integrator

use crate::error::{ensure_finite, Result, SimError};
use crate::geometry::{normalize_degrees, reflect_heading, segments_intersect};
use crate::wall::Wall;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Rectangular domain `[0, width] x [0, height]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point moving at constant speed; only bounces change its heading.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Particle {
    position: DVec2,
    /// Degrees, 0 along +x.
    heading: f64,
    /// Pixels per tick.
    speed: f64,
}

impl Particle {
    /// Validated constructor; the only way a particle enters a world.
    pub fn new(x: f64, y: f64, heading: f64, speed: f64) -> Result<Self> {
        let position = DVec2::new(ensure_finite("x", x)?, ensure_finite("y", y)?);
        let heading = ensure_finite("heading", heading)?;
        let speed = ensure_finite("speed", speed)?;
        if speed < 0.0 {
            return Err(SimError::invalid(format!(
                "speed must be non-negative, got {speed}"
            )));
        }
        Ok(Self {
            position,
            heading,
            speed,
        })
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Heading folded into `[0, 360)`.
    pub fn heading_normalized(&self) -> f64 {
        normalize_degrees(self.heading)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Displacement for one tick at the current heading.
    pub fn step_vector(&self) -> DVec2 {
        let radians = self.heading.to_radians();
        DVec2::new(self.speed * radians.cos(), self.speed * radians.sin())
    }

    /// Advance one tick.
    ///
    /// The particle always moves the full pre-bounce step. Boundary checks run
    /// on the tentative position and may both fire; the position is not
    /// clamped, so a particle can sit outside the bounds until the next step
    /// carries it back. At most one wall bounce applies, to the first wall in
    /// list order whose segment the step crosses.
    pub fn update(&mut self, bounds: Bounds, walls: &[Wall]) {
        let step = self.step_vector();
        let from = self.position;
        let to = from + step;

        if to.x < 0.0 || to.x > bounds.width {
            self.heading = 180.0 - self.heading;
        }
        if to.y < 0.0 || to.y > bounds.height {
            self.heading = -self.heading;
        }

        if let Some(wall) = walls
            .iter()
            .find(|wall| segments_intersect(from, to, wall.start(), wall.end()))
        {
            self.heading = reflect_heading(step.x, step.y, wall);
        }

        self.position = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 100.0,
        height: 80.0,
    };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_free_flight_keeps_heading() {
        let mut p = Particle::new(10.0, 10.0, 0.0, 2.0).unwrap();
        p.update(BOUNDS, &[]);
        assert_eq!(p.position(), DVec2::new(12.0, 10.0));
        assert_eq!(p.heading(), 0.0);
    }

    #[test]
    fn test_x_boundary_flips_heading_without_clamping() {
        let mut p = Particle::new(BOUNDS.width, BOUNDS.height / 2.0, 0.0, 1.0).unwrap();
        p.update(BOUNDS, &[]);

        assert_eq!(p.heading(), 180.0);
        // Left outside for one tick
        assert_eq!(p.position(), DVec2::new(BOUNDS.width + 1.0, BOUNDS.height / 2.0));

        p.update(BOUNDS, &[]);
        assert!(approx(p.position().x, BOUNDS.width));
    }

    #[test]
    fn test_particle_already_outside_keeps_moving_outward_for_one_step() {
        // Starting past the edge still commits the full step before turning
        let mut p = Particle::new(BOUNDS.width + 1.0, BOUNDS.height / 2.0, 0.0, 1.0).unwrap();
        p.update(BOUNDS, &[]);

        assert_eq!(p.heading(), 180.0);
        assert_eq!(p.position(), DVec2::new(BOUNDS.width + 2.0, BOUNDS.height / 2.0));
    }

    #[test]
    fn test_y_boundary_negates_heading() {
        let mut p = Particle::new(50.0, BOUNDS.height + 1.0, 90.0, 1.0).unwrap();
        p.update(BOUNDS, &[]);
        assert_eq!(p.heading(), -90.0);
        assert!(approx(p.position().y, BOUNDS.height + 2.0));
    }

    #[test]
    fn test_corner_fires_both_axes() {
        let mut p = Particle::new(99.5, 79.5, 45.0, 1.0).unwrap();
        p.update(BOUNDS, &[]);
        // 180 - 45 = 135, then negated
        assert_eq!(p.heading(), -135.0);
        assert!(approx(p.heading_normalized(), 225.0));
    }

    #[test]
    fn test_wall_bounce_keeps_pre_bounce_position() {
        let wall = Wall::new(0.0, 0.0, 10.0, 0.0).unwrap();
        let mut p = Particle::new(5.0, -0.5, 135.0, 1.0).unwrap();
        let expected = p.position() + p.step_vector();

        p.update(BOUNDS, &[wall]);

        assert!(approx(p.heading(), -135.0), "heading = {}", p.heading());
        assert_eq!(p.position(), expected);
    }

    #[test]
    fn test_first_wall_in_list_wins() {
        let horizontal = Wall::new(0.0, 5.0, 20.0, 5.0).unwrap();
        let diagonal = Wall::new(0.0, 0.0, 20.0, 20.0).unwrap();
        let start = || Particle::new(4.0, 3.0, 90.0, 3.0).unwrap();

        // Step (4, 3) -> (4, 6) crosses both walls
        let mut a = start();
        a.update(BOUNDS, &[horizontal, diagonal]);
        let mut b = start();
        b.update(BOUNDS, &[diagonal, horizontal]);

        assert!(approx(a.heading(), -90.0), "heading = {}", a.heading());
        assert!(approx(b.heading(), 0.0), "heading = {}", b.heading());
    }

    #[test]
    fn test_path_along_wall_passes_through() {
        let wall = Wall::new(0.0, 10.0, 50.0, 10.0).unwrap();
        let mut p = Particle::new(5.0, 10.0, 0.0, 3.0).unwrap();
        p.update(BOUNDS, &[wall]);
        assert_eq!(p.heading(), 0.0);
        assert_eq!(p.position(), DVec2::new(8.0, 10.0));
    }

    #[test]
    fn test_speed_is_conserved_through_bounces() {
        let walls = [
            Wall::new(20.0, 0.0, 30.0, 80.0).unwrap(),
            Wall::new(60.0, 10.0, 40.0, 70.0).unwrap(),
        ];
        let mut p = Particle::new(25.0, 40.0, 33.0, 7.5).unwrap();
        for _ in 0..500 {
            p.update(BOUNDS, &walls);
            let step = p.step_vector();
            assert!((step.length() - 7.5).abs() < 1e-9);
            assert_eq!(p.speed(), 7.5);
        }
    }

    #[test]
    fn test_constructor_rejects_bad_input() {
        assert!(Particle::new(f64::NAN, 0.0, 0.0, 1.0).is_err());
        assert!(Particle::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
        assert!(Particle::new(0.0, 0.0, 0.0, f64::NAN).is_err());
        assert!(matches!(
            Particle::new(0.0, 0.0, 0.0, -1.0),
            Err(SimError::InvalidParameter(_))
        ));
    }
}
