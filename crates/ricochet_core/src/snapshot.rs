//! Read path for renderers and telemetry

use crate::particle::Particle;
use crate::wall::Wall;
use glam::DVec2;
use serde::Serialize;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// World state as of the end of `tick`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub particles: Vec<Particle>,
    pub walls: Vec<Wall>,
    /// Measured ticks per second; zero when unknown.
    pub tick_rate: f64,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            tick: 0,
            particles: Vec::new(),
            walls: Vec::new(),
            tick_rate: 0.0,
        }
    }

    /// Particle positions in world order.
    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.particles.iter().map(Particle::position)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

struct SlotState {
    latest: Arc<Snapshot>,
    closed: bool,
}

/// Single-writer publication point for snapshots.
///
/// The driver replaces the snapshot only after a tick's barrier, so any
/// reader sees either the previous tick or the new one, never a mix.
pub(crate) struct SnapshotSlot {
    state: Mutex<SlotState>,
    published: Condvar,
}

impl SnapshotSlot {
    pub(crate) fn new(initial: Snapshot) -> Self {
        Self {
            state: Mutex::new(SlotState {
                latest: Arc::new(initial),
                closed: false,
            }),
            published: Condvar::new(),
        }
    }

    // A panicking reader cannot leave the slot half-written, so poison is ignored.
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn publish(&self, snapshot: Snapshot) {
        self.lock().latest = Arc::new(snapshot);
        self.published.notify_all();
    }

    /// Wake every waiter; no further snapshots will arrive.
    pub(crate) fn close(&self) {
        self.lock().closed = true;
        self.published.notify_all();
    }

    pub(crate) fn latest(&self) -> Arc<Snapshot> {
        Arc::clone(&self.lock().latest)
    }

    /// Block until a snapshot at or past `tick` is published.
    ///
    /// Returns `None` on timeout, or when the slot closes short of `tick`.
    pub(crate) fn wait_for_tick(&self, tick: u64, timeout: Duration) -> Option<Arc<Snapshot>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.latest.tick < tick && !state.closed {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            state = self
                .published
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        (state.latest.tick >= tick).then(|| Arc::clone(&state.latest))
    }
}
