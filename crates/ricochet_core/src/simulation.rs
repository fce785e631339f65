//! Synchronous tick execution
//!
//! A [`Simulation`] owns the world, the bounded worker pool and the tick
//! counter. `step` fans one update per particle out across the pool and
//! returns only after every update has finished.

use crate::config::SimConfig;
use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::time::SimulationTime;
use crate::world::World;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Phase of the tick state machine.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickState {
    /// Between ticks; structural changes and snapshot reads happen here.
    Idle = 0,
    /// Particle updates are running on the pool.
    Dispatching = 1,
    /// Every update has joined; the tick is being committed.
    Barrier = 2,
    /// Driver has quiesced; no further ticks.
    Stopped = 3,
}

impl TickState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Dispatching,
            2 => Self::Barrier,
            _ => Self::Stopped,
        }
    }
}

/// Shareable view of the current [`TickState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: TickState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn get(&self) -> TickState {
        TickState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: TickState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Outcome of one completed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub particles: usize,
    pub elapsed: Duration,
}

pub struct Simulation {
    config: SimConfig,
    world: World,
    pool: ThreadPool,
    time: SimulationTime,
    state: Arc<StateCell>,
}

impl Simulation {
    /// Validate `config` and build a worker pool of exactly `worker_count` threads.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|index| format!("ricochet-worker-{index}"))
            .build()?;

        Ok(Self {
            world: World::new(config.bounds()),
            config,
            pool,
            time: SimulationTime::new(),
            state: Arc::new(StateCell::new(TickState::Idle)),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Structural access. Holding `&mut self` rules out an in-flight tick.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tick(&self) -> u64 {
        self.time.tick_count()
    }

    pub fn state(&self) -> TickState {
        self.state.get()
    }

    pub(crate) fn state_cell(&self) -> Arc<StateCell> {
        Arc::clone(&self.state)
    }

    /// Run one tick to completion.
    ///
    /// Every particle is updated exactly once against the walls as they stood
    /// when the tick began. `par_iter_mut` inside `install` fans the slots out
    /// over the pool and joins them before returning; that join is the
    /// barrier. `Barrier` is entered once the join has released, while the
    /// tick is committed.
    pub fn step(&mut self) -> TickReport {
        let started = Instant::now();
        let state: &StateCell = &self.state;
        let (particles, walls, bounds) = self.world.split_for_tick();
        let count = particles.len();

        state.set(TickState::Dispatching);
        self.pool.install(|| {
            particles
                .par_iter_mut()
                .for_each(|particle| particle.update(bounds, walls));
        });
        state.set(TickState::Barrier);

        self.time.advance_tick();
        state.set(TickState::Idle);

        let report = TickReport {
            tick: self.time.tick_count(),
            particles: count,
            elapsed: started.elapsed(),
        };
        trace!(
            tick = report.tick,
            particles = report.particles,
            elapsed_us = report.elapsed.as_micros() as u64,
            "tick complete"
        );
        report
    }

    /// Fully settled copy of the world.
    ///
    /// Takes `&self`, so it cannot run while `step` holds the world.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time.tick_count(),
            particles: self.world.particles().to_vec(),
            walls: self.world.walls().to_vec(),
            tick_rate: 0.0,
        }
    }

    pub(crate) fn mark_stopped(&self) {
        self.state.set(TickState::Stopped);
    }
}
