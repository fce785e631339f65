//! Batch particle generators
//!
//! Each generator spreads `count` particles evenly between two inclusive
//! endpoints, so it needs at least two particles to define a step.

use crate::error::{ensure_finite, Result, SimError};
use crate::geometry::normalize_degrees;
use crate::particle::Particle;
use serde::{Deserialize, Serialize};

/// A parameterised group of particles, built in one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticleBatch {
    /// Evenly spaced along a segment, all heading along it.
    AlongSegment {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        speed: f64,
        count: usize,
    },
    /// One origin, headings swept from `angle1` to `angle2`.
    AngleSweep {
        x: f64,
        y: f64,
        speed: f64,
        angle1: f64,
        angle2: f64,
        count: usize,
    },
    /// One origin and heading, speeds ramped from `speed1` to `speed2`.
    SpeedRamp {
        x: f64,
        y: f64,
        heading: f64,
        speed1: f64,
        speed2: f64,
        count: usize,
    },
}

impl ParticleBatch {
    pub fn count(&self) -> usize {
        match *self {
            Self::AlongSegment { count, .. }
            | Self::AngleSweep { count, .. }
            | Self::SpeedRamp { count, .. } => count,
        }
    }

    /// Expand into validated particles; nothing is produced on error.
    pub fn generate(&self) -> Result<Vec<Particle>> {
        let count = self.count();
        if count < 2 {
            return Err(SimError::invalid(format!(
                "batch needs at least 2 particles, got {count}"
            )));
        }
        let steps = (count - 1) as f64;

        match *self {
            Self::AlongSegment {
                x1,
                y1,
                x2,
                y2,
                speed,
                ..
            } => {
                let dx = ensure_finite("x2", x2)? - ensure_finite("x1", x1)?;
                let dy = ensure_finite("y2", y2)? - ensure_finite("y1", y1)?;
                let angle = normalize_degrees(dy.atan2(dx).to_degrees());
                let (dist_x, dist_y) = (dx / steps, dy / steps);
                (0..count)
                    .map(|i| {
                        let i = i as f64;
                        Particle::new(x1 + i * dist_x, y1 + i * dist_y, angle, speed)
                    })
                    .collect()
            }
            Self::AngleSweep {
                x,
                y,
                speed,
                angle1,
                angle2,
                ..
            } => {
                let angle_step =
                    (ensure_finite("angle2", angle2)? - ensure_finite("angle1", angle1)?) / steps;
                (0..count)
                    .map(|i| Particle::new(x, y, angle1 + i as f64 * angle_step, speed))
                    .collect()
            }
            Self::SpeedRamp {
                x,
                y,
                heading,
                speed1,
                speed2,
                ..
            } => {
                let speed_step =
                    (ensure_finite("speed2", speed2)? - ensure_finite("speed1", speed1)?) / steps;
                (0..count)
                    .map(|i| Particle::new(x, y, heading, speed1 + i as f64 * speed_step))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_along_segment_includes_both_endpoints() {
        let batch = ParticleBatch::AlongSegment {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 0.0,
            speed: 1.5,
            count: 5,
        };
        let particles = batch.generate().unwrap();

        let xs: Vec<f64> = particles.iter().map(|p| p.position().x).collect();
        assert_eq!(xs, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert!(particles.iter().all(|p| p.heading() == 0.0 && p.speed() == 1.5));
        assert!(particles.iter().all(|p| p.position().y == 0.0));
    }

    #[test]
    fn test_along_segment_heading_is_normalized() {
        let batch = ParticleBatch::AlongSegment {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: -10.0,
            speed: 1.0,
            count: 3,
        };
        let particles = batch.generate().unwrap();
        assert!(particles.iter().all(|p| (p.heading() - 270.0).abs() < 1e-9));
        assert_eq!(particles[1].position().y, -5.0);
    }

    #[test]
    fn test_angle_sweep() {
        let batch = ParticleBatch::AngleSweep {
            x: 50.0,
            y: 60.0,
            speed: 2.0,
            angle1: 0.0,
            angle2: 90.0,
            count: 4,
        };
        let headings: Vec<f64> = batch.generate().unwrap().iter().map(|p| p.heading()).collect();
        assert_eq!(headings, vec![0.0, 30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_speed_ramp() {
        let batch = ParticleBatch::SpeedRamp {
            x: 1.0,
            y: 2.0,
            heading: 45.0,
            speed1: 1.0,
            speed2: 3.0,
            count: 3,
        };
        let particles = batch.generate().unwrap();
        let speeds: Vec<f64> = particles.iter().map(|p| p.speed()).collect();
        assert_eq!(speeds, vec![1.0, 2.0, 3.0]);
        assert!(particles.iter().all(|p| p.heading() == 45.0));
    }

    #[test]
    fn test_degenerate_counts_rejected() {
        for count in [0, 1] {
            let batch = ParticleBatch::SpeedRamp {
                x: 0.0,
                y: 0.0,
                heading: 0.0,
                speed1: 1.0,
                speed2: 2.0,
                count,
            };
            assert!(matches!(batch.generate(), Err(SimError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_invalid_member_rejects_whole_batch() {
        // Ramp crosses into negative speeds
        let batch = ParticleBatch::SpeedRamp {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            speed1: 1.0,
            speed2: -1.0,
            count: 3,
        };
        assert!(batch.generate().is_err());

        let batch = ParticleBatch::AngleSweep {
            x: f64::NAN,
            y: 0.0,
            speed: 1.0,
            angle1: 0.0,
            angle2: 10.0,
            count: 2,
        };
        assert!(batch.generate().is_err());
    }

    #[test]
    fn test_batch_from_json() {
        let batch: ParticleBatch = serde_json::from_str(
            r#"{ "kind": "angle_sweep", "x": 1, "y": 1, "speed": 2, "angle1": 0, "angle2": 180, "count": 7 }"#,
        )
        .unwrap();
        assert_eq!(batch.count(), 7);
        assert_eq!(batch.generate().unwrap().len(), 7);
    }
}
