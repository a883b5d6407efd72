//! Wave progression
//!
//! `Spawning -> Clearing -> Advancing -> Spawning ...` until the last life is
//! lost, which ends the run from any phase.
//!
//! Waves are uncapped unless the tuning sets a quota. An uncapped wave leaves
//! `Spawning` only when the clear guard holds, then spends one tick in
//! `Clearing` before it advances.

use super::state::{GameEvent, WavePhase, World};
use crate::tuning::Tuning;

/// True once the field has been empty, and no enemy has been emitted, for
/// longer than the clear window
pub fn wave_cleared(world: &World, tuning: &Tuning) -> bool {
    world.enemies.is_empty()
        && world.wave.since_last_spawn_ms > tuning.clear_delay_ms
        && world.wave.empty_for_ms >= tuning.clear_delay_ms
}

/// Update clear timers and move the phase machine forward.
///
/// Runs after collisions and before compaction, so an enemy destroyed this
/// tick still counts as present.
pub fn update(world: &mut World, tuning: &Tuning, dt_ms: f32, events: &mut Vec<GameEvent>) {
    if world.wave.phase == WavePhase::Ended {
        return;
    }
    if world.target.lives == 0 {
        end_run(world, events);
        return;
    }

    if world.enemies.is_empty() {
        world.wave.empty_for_ms += dt_ms;
    } else {
        world.wave.empty_for_ms = 0.0;
    }

    match world.wave.phase {
        WavePhase::Spawning => {
            let done = match tuning.wave_quota(world.wave.wave) {
                Some(quota) => world.wave.spawned_this_wave >= quota,
                None => wave_cleared(world, tuning),
            };
            if done {
                log::debug!("Wave {} done spawning, clearing", world.wave.wave);
                world.wave.phase = WavePhase::Clearing;
            }
        }
        WavePhase::Clearing => {
            if wave_cleared(world, tuning) {
                advance(world, events);
            }
        }
        WavePhase::Advancing | WavePhase::Ended => {}
    }
}

/// Move to the next wave
pub fn advance(world: &mut World, events: &mut Vec<GameEvent>) {
    world.wave.wave += 1;
    world.wave.phase = WavePhase::Advancing;
    world.wave.spawned_this_wave = 0;
    world.wave.since_last_spawn_ms = 0.0;
    world.wave.empty_for_ms = 0.0;
    world.enemies.clear();

    log::info!("Wave {} begins (score {})", world.wave.wave, world.wave.score);
    events.push(GameEvent::WaveAdvanced {
        wave: world.wave.wave,
    });
}

fn end_run(world: &mut World, events: &mut Vec<GameEvent>) {
    world.wave.phase = WavePhase::Ended;
    log::info!(
        "Game over on wave {} with score {}",
        world.wave.wave,
        world.wave.score
    );
    events.push(GameEvent::GameOver {
        score: world.wave.score,
        wave: world.wave.wave,
    });
}
