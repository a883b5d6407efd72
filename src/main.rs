//! Orbit Defense headless runner
//!
//! Plays a seeded run with a simple autopilot (aim at the closest enemy, fire
//! on a fixed cadence) and logs progress. Useful for balance smoke tests:
//!
//! ```text
//! RUST_LOG=info orbit-defense [seed] [tuning.json]
//! ```

use glam::Vec2;
use orbit_defense::sim::{GameEvent, Simulation, SimulationSnapshot};
use orbit_defense::{Tuning, angle_between, consts::REFERENCE_FRAME_MS};

/// Give up after ten simulated minutes
const MAX_TICKS: u64 = 10 * 60 * 60;
/// Ticks between autopilot shots
const FIRE_EVERY: u64 = 12;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 42,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_path(path)?,
        None => Tuning::default(),
    };

    log::info!("Orbit Defense (headless) starting with seed {}", seed);
    let mut sim = Simulation::with_tuning(seed, tuning)?;

    let mut snapshot = sim.snapshot();
    let mut kills = 0u32;
    while !snapshot.ended && snapshot.tick < MAX_TICKS {
        if let Some(angle) = closest_enemy_angle(&snapshot, sim.world().target.center) {
            sim.set_aim_angle(angle);
            if snapshot.tick % FIRE_EVERY == 0 {
                sim.fire();
            }
        }
        snapshot = sim.tick(REFERENCE_FRAME_MS);
        for event in &snapshot.events {
            match event {
                GameEvent::EnemyDestroyed { .. } => kills += 1,
                GameEvent::TargetHit { lives_left, .. } => {
                    log::info!("Target hit, {} lives left", lives_left)
                }
                _ => {}
            }
        }
    }

    println!(
        "seed {}: wave {}, score {}, lives {}, {} kills in {} ticks{}",
        seed,
        snapshot.wave,
        snapshot.score,
        snapshot.lives,
        kills,
        snapshot.tick,
        if snapshot.ended { " (game over)" } else { "" }
    );
    Ok(())
}

fn closest_enemy_angle(snapshot: &SimulationSnapshot, center: Vec2) -> Option<f32> {
    snapshot
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance(center)
                .partial_cmp(&b.pos.distance(center))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| angle_between(center, e.pos))
}
