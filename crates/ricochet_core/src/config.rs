//! Simulation configuration

use crate::error::{Result, SimError};
use crate::particle::Bounds;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TICK_RATE_HZ: u32 = 60;
/// Highest accepted tick rate; keeps the tick interval at a millisecond or more.
pub const MAX_TICK_RATE_HZ: u32 = 1_000;
pub const DEFAULT_CANVAS_WIDTH: f64 = 1280.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 720.0;

/// Scheduler and domain settings.
///
/// Missing JSON fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub tick_rate_hz: u32,
    pub worker_count: usize,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            worker_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_hz == 0 || self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(SimError::invalid(format!(
                "tick_rate_hz must be between 1 and {MAX_TICK_RATE_HZ}, got {}",
                self.tick_rate_hz
            )));
        }
        if self.worker_count == 0 {
            return Err(SimError::invalid("worker_count must be at least 1"));
        }
        for (name, value) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::invalid(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Fixed wall-clock period between tick deadlines.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate_hz.max(1)))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert_eq!(config.tick_rate_hz, 60);
        assert!(config.worker_count >= 1);
        assert_eq!(config.bounds(), Bounds::new(1280.0, 720.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json_str(r#"{ "tick_rate_hz": 120, "worker_count": 4 }"#).unwrap();
        assert_eq!(config.tick_rate_hz, 120);
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.canvas_width, DEFAULT_CANVAS_WIDTH);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{ "tick_rate_hz": 0 }"#,
            r#"{ "worker_count": 0 }"#,
            r#"{ "canvas_width": -5.0 }"#,
            r#"{ "canvas_height": 0.0 }"#,
        ] {
            assert!(
                matches!(SimConfig::from_json_str(json), Err(SimError::InvalidParameter(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_oversize_tick_rate_rejected() {
        let config = SimConfig {
            tick_rate_hz: u32::MAX,
            worker_count: 1,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidParameter(_))));
        assert!(matches!(
            crate::Simulation::new(config),
            Err(SimError::InvalidParameter(_))
        ));

        let fastest = SimConfig {
            tick_rate_hz: MAX_TICK_RATE_HZ,
            ..SimConfig::default()
        };
        assert!(fastest.validate().is_ok());
        assert_eq!(fastest.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            SimConfig::from_json_str(r#"{ "tick_rate": 60 }"#),
            Err(SimError::Config(_))
        ));
        assert!(matches!(SimConfig::from_json_str("not json"), Err(SimError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SimConfig::load("/nonexistent/ricochet.json"),
            Err(SimError::Io(_))
        ));
    }

    #[test]
    fn test_tick_interval() {
        let config = SimConfig {
            tick_rate_hz: 60,
            ..SimConfig::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_nanos(16_666_666));
    }
}
