//! Spawn scheduler
//!
//! Decides when the next enemy appears, which kind it is and where. Enemies
//! always enter on a ring just outside the visible play area so they never
//! pop into view.

use glam::Vec2;
use rand::Rng;

use super::state::{EnemyKind, GameEvent, WavePhase, World};
use crate::radial_position;
use crate::tuning::Tuning;

/// Spawn interval for `wave`: shrinks per wave down to the configured floor
pub fn spawn_interval_ms(tuning: &Tuning, wave: u32) -> f32 {
    (tuning.base_spawn_interval_ms - wave as f32 * tuning.spawn_interval_decay_ms)
        .max(tuning.min_spawn_interval_ms)
}

/// Enemy speed multiplier for `wave`
pub fn speed_scale(tuning: &Tuning, wave: u32) -> f32 {
    1.0 + tuning.enemy_speed_growth * wave.saturating_sub(1) as f32
}

/// Spawn point for a given angle around `center`
pub fn spawn_position(tuning: &Tuning, center: Vec2, angle: f32) -> Vec2 {
    radial_position(center, angle, tuning.spawn_radius())
}

/// Pick a kind uniformly from those unlocked by `wave`
pub fn pick_kind<R: Rng>(rng: &mut R, wave: u32) -> EnemyKind {
    let unlocked = EnemyKind::unlocked(wave);
    unlocked[rng.random_range(0..unlocked.len())]
}

/// Emit one enemy at a random angle and reset the spawn timer
pub fn spawn_enemy<R: Rng>(
    world: &mut World,
    tuning: &Tuning,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let wave = world.wave.wave;
    let kind = pick_kind(rng, wave);
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let pos = spawn_position(tuning, world.target.center, angle);

    let id = world.spawn_enemy(kind, pos, speed_scale(tuning, wave));
    world.wave.since_last_spawn_ms = 0.0;
    world.wave.spawned_this_wave += 1;

    log::debug!("Wave {}: spawned {:?} #{} at angle {:.2}", wave, kind, id, angle);
    events.push(GameEvent::EnemySpawned { id, kind });
    id
}

/// Advance the spawn timer by `dt_ms` and emit an enemy when one is due.
///
/// Only the `Spawning` phase emits. An `Advancing` wave resumes spawning here,
/// one tick after it advanced.
pub fn run<R: Rng>(
    world: &mut World,
    tuning: &Tuning,
    rng: &mut R,
    dt_ms: f32,
    events: &mut Vec<GameEvent>,
) -> Option<u32> {
    match world.wave.phase {
        WavePhase::Ended => return None,
        WavePhase::Advancing => world.wave.phase = WavePhase::Spawning,
        WavePhase::Spawning | WavePhase::Clearing => {}
    }

    world.wave.since_last_spawn_ms += dt_ms;

    if world.wave.phase != WavePhase::Spawning {
        return None;
    }
    if let Some(quota) = tuning.wave_quota(world.wave.wave) {
        if world.wave.spawned_this_wave >= quota {
            return None;
        }
    }
    if world.wave.since_last_spawn_ms < spawn_interval_ms(tuning, world.wave.wave) {
        return None;
    }

    Some(spawn_enemy(world, tuning, rng, events))
}
