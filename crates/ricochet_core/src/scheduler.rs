//! Fixed-rate tick scheduler
//!
//! A driver thread owns the [`Simulation`] and cycles
//! `Idle -> Dispatching -> Barrier -> Idle` at the configured rate. Other
//! threads talk to it through a [`SchedulerHandle`]: structural changes are
//! queued as commands and applied only while the driver is idle, and reads
//! go through the snapshot published after each barrier.
//!
//! ```ignore
//! let handle = TickScheduler::spawn(Simulation::new(SimConfig::default())?)?;
//! handle.add_wall(0.0, 360.0, 1280.0, 400.0)?;
//! handle.add_particle(640.0, 100.0, 90.0, 4.0)?;
//! let snapshot = handle.wait_for_tick(60, Duration::from_secs(2));
//! let simulation = handle.stop()?;
//! ```

use crate::batch::ParticleBatch;
use crate::error::{Result, SimError};
use crate::particle::Particle;
use crate::simulation::{Simulation, StateCell, TickState};
use crate::snapshot::{Snapshot, SnapshotSlot};
use crate::time::TickClock;
use crate::wall::Wall;
use ricochet_metrics::TickTimer;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Upper bound on ticks kept in the rolling telemetry window.
const MAX_TELEMETRY_WINDOW: usize = 240;

enum Command {
    AddParticle(Particle),
    AddParticles(Vec<Particle>),
    AddWall(Wall),
    Stop,
}

/// Starts driver threads.
pub struct TickScheduler;

impl TickScheduler {
    /// Move `simulation` onto a new driver thread and start ticking.
    ///
    /// The first tick fires one interval from now.
    pub fn spawn(simulation: Simulation) -> Result<SchedulerHandle> {
        let (commands, receiver) = mpsc::channel();
        let slot = Arc::new(SnapshotSlot::new(simulation.snapshot()));
        let state = simulation.state_cell();

        let driver = {
            let slot = Arc::clone(&slot);
            thread::Builder::new()
                .name("ricochet-driver".to_string())
                .spawn(move || Driver::new(simulation, receiver, slot).run())?
        };

        Ok(SchedulerHandle {
            commands,
            slot,
            state,
            driver: Some(driver),
        })
    }
}

/// Command and read interface to a running scheduler.
///
/// Dropping the handle stops the driver and waits for it.
pub struct SchedulerHandle {
    commands: Sender<Command>,
    slot: Arc<SnapshotSlot>,
    state: Arc<StateCell>,
    driver: Option<JoinHandle<Simulation>>,
}

impl SchedulerHandle {
    /// Validate and queue one particle; it moves from the next tick on.
    pub fn add_particle(&self, x: f64, y: f64, heading: f64, speed: f64) -> Result<()> {
        let particle = Particle::new(x, y, heading, speed)?;
        self.send(Command::AddParticle(particle))
    }

    /// Validate and queue one wall; particles see it from the next tick on.
    pub fn add_wall(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let wall = Wall::new(x1, y1, x2, y2)?;
        self.send(Command::AddWall(wall))
    }

    /// Generate a batch and queue it as one unit.
    pub fn add_batch(&self, batch: &ParticleBatch) -> Result<usize> {
        let particles = batch.generate()?;
        let count = particles.len();
        self.send(Command::AddParticles(particles))?;
        Ok(count)
    }

    /// Latest fully settled snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.slot.latest()
    }

    /// Block until `tick` has completed, or give up after `timeout`.
    pub fn wait_for_tick(&self, tick: u64, timeout: Duration) -> Option<Arc<Snapshot>> {
        self.slot.wait_for_tick(tick, timeout)
    }

    pub fn state(&self) -> TickState {
        self.state.get()
    }

    /// Stop ticking and hand back the simulation.
    ///
    /// An idle wait is interrupted at once; a tick already dispatching runs
    /// to its barrier first.
    pub fn stop(mut self) -> Result<Simulation> {
        self.shutdown().ok_or(SimError::SchedulerStopped)?
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| SimError::SchedulerStopped)
    }

    fn shutdown(&mut self) -> Option<Result<Simulation>> {
        let driver = self.driver.take()?;
        // Fails only if the driver already exited, which join reports below
        let _ = self.commands.send(Command::Stop);
        Some(driver.join().map_err(|_| SimError::DriverPanicked))
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(Err(err)) = self.shutdown() {
            warn!(%err, "scheduler did not shut down cleanly");
        }
    }
}

/// One second of ticks, capped.
fn telemetry_window(tick_rate_hz: u32) -> usize {
    (tick_rate_hz as usize).clamp(1, MAX_TELEMETRY_WINDOW)
}

struct Driver {
    simulation: Simulation,
    commands: Receiver<Command>,
    slot: Arc<SnapshotSlot>,
    clock: TickClock,
    timer: TickTimer,
    behind: bool,
}

impl Driver {
    fn new(simulation: Simulation, commands: Receiver<Command>, slot: Arc<SnapshotSlot>) -> Self {
        let config = simulation.config();
        let clock = TickClock::new(config.tick_interval());
        let timer = TickTimer::new(telemetry_window(config.tick_rate_hz));
        Self {
            simulation,
            commands,
            slot,
            clock,
            timer,
            behind: false,
        }
    }

    fn run(mut self) -> Simulation {
        let config = self.simulation.config();
        info!(
            tick_rate_hz = config.tick_rate_hz,
            worker_count = config.worker_count,
            width = config.canvas_width,
            height = config.canvas_height,
            "scheduler started"
        );

        while self.idle() {
            self.check_pace();
            self.clock.advance();

            self.timer.begin();
            let report = self.simulation.step();
            self.timer.end();

            let mut snapshot = self.simulation.snapshot();
            snapshot.tick_rate = self.timer.rate();
            self.slot.publish(snapshot);
            trace!(tick = report.tick, "snapshot published");

            ricochet_metrics::metrics! {
                if report.tick % u64::from(self.simulation.config().tick_rate_hz) == 0 {
                    let (min_ms, max_ms) = self.timer.work_time_range_ms();
                    debug!(
                        tick = report.tick,
                        rate = self.timer.rate(),
                        work_ms = self.timer.work_time_ms(),
                        min_ms,
                        max_ms,
                        "tick telemetry"
                    );
                }
            }
        }

        self.simulation.mark_stopped();
        self.slot.close();
        info!(tick = self.simulation.tick(), "scheduler stopped");
        self.simulation
    }

    /// Apply queued commands until the next deadline.
    ///
    /// Returns `false` once a stop was requested or every handle is gone.
    fn idle(&mut self) -> bool {
        loop {
            let remaining = self.clock.remaining(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.commands.recv_timeout(remaining) {
                Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => return false,
                Ok(command) => self.apply(command),
                Err(RecvTimeoutError::Timeout) => break,
            }
        }

        // Commands that raced the deadline still land before dispatch
        loop {
            match self.commands.try_recv() {
                Ok(Command::Stop) | Err(TryRecvError::Disconnected) => return false,
                Ok(command) => self.apply(command),
                Err(TryRecvError::Empty) => return true,
            }
        }
    }

    fn apply(&mut self, command: Command) {
        let world = self.simulation.world_mut();
        match command {
            Command::AddParticle(particle) => world.insert_particle(particle),
            Command::AddParticles(particles) => world.insert_particles(particles),
            Command::AddWall(wall) => world.insert_wall(wall),
            Command::Stop => {}
        }
    }

    fn check_pace(&mut self) {
        let lag = self.clock.lag(Instant::now());
        let behind = lag >= self.clock.interval();
        if behind && !self.behind {
            warn!(
                lag_ms = lag.as_secs_f64() * 1000.0,
                work_ms = self.timer.work_time_ms(),
                "ticks are falling behind schedule"
            );
        } else if !behind && self.behind {
            debug!("tick schedule caught up");
        }
        self.behind = behind;
    }
}
