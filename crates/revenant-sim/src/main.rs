//! # Revenant Sim
//!
//! Headless driver for the Revenant behavior core. Builds a demo arena,
//! spawns one enemy, and runs the fixed-timestep loop until the
//! configured duration elapses, logging every behavior event. The
//! calming item is delivered at a configured simulation time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod arena;
mod config;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use revenant_ai::roster::EnemyRoster;

use crate::arena::Arena;
use crate::config::SimConfig;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("revenant_ai=debug".parse()?)
                .add_directive("revenant_sim=info".parse()?),
        )
        .init();

    info!("Revenant sim starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = SimConfig::load();
    config.validate();

    run(&config)?;

    info!("Revenant sim finished");
    Ok(())
}

/// Runs one simulation from the given config.
fn run(config: &SimConfig) -> Result<()> {
    let mut arena = Arena::new(config);
    let mut roster = EnemyRoster::new();
    let enemy = roster.spawn(config.enemy.clone());

    let dt = config.tick_dt;
    let ticks = (config.duration / dt).ceil() as u64;
    let mut calm_delivered = false;
    let mut event_count = 0_usize;

    for tick in 0..ticks {
        let now = tick as f32 * dt;

        if !calm_delivered && config.calm_at >= 0.0 && now >= config.calm_at {
            calm_delivered = true;
            if roster.calm(enemy)? {
                info!(t = now, "calming item delivered");
            } else {
                info!(t = now, "calming item delivered while patrolling, ignored");
            }
        }

        roster.update(dt, &mut arena);
        arena.step(dt);

        for event in roster.drain_events() {
            event_count += 1;
            info!(t = now, ?event, "behavior event");
        }
    }

    let final_state = roster.get(enemy).map(revenant_ai::controller::EnemyController::state);
    info!(
        ?final_state,
        event_count,
        enemy_position = ?arena.enemy_position(),
        target_position = ?arena.target_position(),
        "run complete"
    );
    Ok(())
}
