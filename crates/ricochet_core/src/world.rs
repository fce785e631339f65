// world.rs - particle and wall storage

use crate::batch::ParticleBatch;
use crate::error::Result;
use crate::particle::{Bounds, Particle};
use crate::wall::Wall;
use tracing::debug;

/// Owns every particle and wall in the simulation.
///
/// Structural changes need `&mut World`, so they can never overlap a tick
/// that is borrowing the particle slots. Walls are append-only.
pub struct World {
    bounds: Bounds,
    particles: Vec<Particle>,
    walls: Vec<Wall>,
}

impl World {
    /// Create an empty world over `[0, width] x [0, height]`.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            particles: Vec::new(),
            walls: Vec::new(),
        }
    }

    /// Validate and insert one particle.
    pub fn add_particle(&mut self, x: f64, y: f64, heading: f64, speed: f64) -> Result<()> {
        let particle = Particle::new(x, y, heading, speed)?;
        self.insert_particle(particle);
        Ok(())
    }

    /// Validate and insert one wall. It takes part in the next tick.
    pub fn add_wall(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let wall = Wall::new(x1, y1, x2, y2)?;
        self.insert_wall(wall);
        Ok(())
    }

    /// Generate a batch and insert it whole, or insert nothing.
    pub fn add_batch(&mut self, batch: &ParticleBatch) -> Result<usize> {
        let particles = batch.generate()?;
        let added = particles.len();
        self.insert_particles(particles);
        Ok(added)
    }

    /// Insert an already-validated particle.
    pub fn insert_particle(&mut self, particle: Particle) {
        debug!(
            x = particle.position().x,
            y = particle.position().y,
            heading = particle.heading(),
            speed = particle.speed(),
            "particle added"
        );
        self.particles.push(particle);
    }

    pub fn insert_particles(&mut self, particles: Vec<Particle>) {
        debug!(count = particles.len(), "particles added");
        self.particles.extend(particles);
    }

    pub fn insert_wall(&mut self, wall: Wall) {
        debug!(start = ?wall.start(), end = ?wall.end(), "wall added");
        self.walls.push(wall);
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Particles in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Walls in insertion order, which is also bounce priority.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Borrow the state a tick needs: every particle slot mutably, walls shared.
    pub(crate) fn split_for_tick(&mut self) -> (&mut [Particle], &[Wall], Bounds) {
        (&mut self.particles, &self.walls, self.bounds)
    }
}
