//! Ricochet Runtime
//!
//! Headless driver: loads settings, seeds a scene and runs the scheduler.
//!
//! Usage: `ricochet [config.json] [seconds]`

use anyhow::{Context, Result};
use ricochet_core::{ParticleBatch, SchedulerHandle, SimConfig, Simulation, TickScheduler};
use std::time::{Duration, Instant};

const DEFAULT_RUN_SECONDS: u64 = 5;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Ricochet v{}", ricochet_core::VERSION);

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => SimConfig::default(),
    };
    let run_for = match args.next() {
        Some(raw) => {
            let seconds = raw
                .parse()
                .with_context(|| format!("invalid duration '{raw}'"))?;
            Duration::from_secs(seconds)
        }
        None => Duration::from_secs(DEFAULT_RUN_SECONDS),
    };

    let handle = TickScheduler::spawn(Simulation::new(config.clone())?)?;
    seed_scene(&handle, &config)?;

    let started = Instant::now();
    let mut next_tick = u64::from(config.tick_rate_hz);
    while started.elapsed() < run_for {
        let Some(snapshot) = handle.wait_for_tick(next_tick, Duration::from_secs(2)) else {
            tracing::warn!(waiting_for = next_tick, "no snapshot within two seconds");
            continue;
        };
        tracing::info!(
            tick = snapshot.tick,
            particles = snapshot.particle_count(),
            walls = snapshot.walls.len(),
            tps = snapshot.tick_rate,
            "running"
        );
        next_tick = snapshot.tick + u64::from(config.tick_rate_hz);
    }

    let simulation = handle.stop()?;
    tracing::info!(ticks = simulation.tick(), "Simulation finished");

    Ok(())
}

/// A framed canvas with two baffles and one of each batch shape.
fn seed_scene(handle: &SchedulerHandle, config: &SimConfig) -> Result<()> {
    let (w, h) = (config.canvas_width, config.canvas_height);

    handle.add_wall(w * 0.3, h * 0.1, w * 0.35, h * 0.6)?;
    handle.add_wall(w * 0.7, h * 0.9, w * 0.6, h * 0.4)?;

    let batches = [
        ParticleBatch::AlongSegment {
            x1: w * 0.1,
            y1: h * 0.8,
            x2: w * 0.25,
            y2: h * 0.2,
            speed: 3.0,
            count: 50,
        },
        ParticleBatch::AngleSweep {
            x: w * 0.5,
            y: h * 0.5,
            speed: 2.5,
            angle1: 0.0,
            angle2: 350.0,
            count: 36,
        },
        ParticleBatch::SpeedRamp {
            x: w * 0.8,
            y: h * 0.2,
            heading: 200.0,
            speed1: 1.0,
            speed2: 6.0,
            count: 20,
        },
    ];
    for batch in &batches {
        let added = handle.add_batch(batch)?;
        tracing::debug!(added, "batch queued");
    }

    handle.add_particle(w * 0.5, h * 0.1, 90.0, 4.0)?;
    Ok(())
}
