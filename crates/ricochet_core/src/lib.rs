//! Ricochet Core
//!
//! Contains the fundamental simulation systems:
//! - Geometry kernel (orientation, segment intersection, reflection)
//! - Particle integrator with boundary and wall bounces
//! - World store and batch generators
//! - Fixed-rate tick scheduler with a parallel worker pool
//! - Snapshot read path

pub mod batch;
pub mod config;
pub mod error;
pub mod geometry;
pub mod particle;
pub mod scheduler;
pub mod simulation;
pub mod snapshot;
pub mod time;
pub mod wall;
pub mod world;

pub use glam;

pub use batch::ParticleBatch;
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use particle::{Bounds, Particle};
pub use scheduler::{SchedulerHandle, TickScheduler};
pub use simulation::{Simulation, TickReport, TickState};
pub use snapshot::Snapshot;
pub use wall::Wall;
pub use world::World;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
