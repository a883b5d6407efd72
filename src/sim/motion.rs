//! Motion integrator
//!
//! Enemies home on the target, projectiles fly straight, explosions stay put
//! and count down. Movement is scaled by `dt / reference_frame_ms` so speeds
//! hold regardless of frame rate; the explosion countdown is per tick.

use super::state::World;
use crate::tuning::Tuning;

/// Frame-rate normalisation factor for a tick of `dt_ms`
#[inline]
pub fn step_scale(tuning: &Tuning, dt_ms: f32) -> f32 {
    dt_ms / tuning.reference_frame_ms
}

/// Advance every live entity by one tick
pub fn run(world: &mut World, tuning: &Tuning, dt_ms: f32) {
    advance(world, tuning, dt_ms);
    decay_explosions(world);
}

/// Move enemies and projectiles through `dt_ms`, which may be a slice of a tick
pub fn advance(world: &mut World, tuning: &Tuning, dt_ms: f32) {
    let scale = step_scale(tuning, dt_ms);
    let center = world.target.center;

    for enemy in world.enemies.iter_mut().filter(|e| e.is_alive()) {
        enemy.home_toward(center, scale);
    }

    for projectile in &mut world.projectiles {
        projectile.advance(scale, tuning.projectile_max_range);
    }
}

/// One countdown step per tick, however the tick is sliced
pub fn decay_explosions(world: &mut World) {
    for explosion in &mut world.explosions {
        explosion.decay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance;
    use crate::sim::state::{EnemyKind, ProjectileKind};
    use glam::Vec2;

    #[test]
    fn test_motion_scales_with_delta() {
        let tuning = Tuning::default();
        let mut a = World::new(3);
        let mut b = World::new(3);
        a.spawn_enemy(EnemyKind::Asteroid, Vec2::new(300.0, 0.0), 1.0);
        b.spawn_enemy(EnemyKind::Asteroid, Vec2::new(300.0, 0.0), 1.0);

        // One 32ms tick covers the same ground as two 16ms ticks
        run(&mut a, &tuning, 32.0);
        run(&mut b, &tuning, 16.0);
        run(&mut b, &tuning, 16.0);

        assert!((a.enemies[0].pos.x - 298.0).abs() < 1e-4);
        assert!((a.enemies[0].pos - b.enemies[0].pos).length() < 1e-4);
    }

    #[test]
    fn test_enemies_close_distance_every_tick() {
        let tuning = Tuning::default();
        let mut world = World::new(3);
        world.spawn_enemy(EnemyKind::Ship, Vec2::new(-250.0, 180.0), 1.0);
        world.spawn_enemy(EnemyKind::Bomber, Vec2::new(10.0, -420.0), 1.0);

        let mut last: Vec<f32> = world
            .enemies
            .iter()
            .map(|e| distance(e.pos, world.target.center))
            .collect();
        for dt in [16.0, 5.0, 40.0, 16.0, 250.0, 0.0] {
            run(&mut world, &tuning, dt);
            for (enemy, prev) in world.enemies.iter().zip(last.iter_mut()) {
                let d = distance(enemy.pos, world.target.center);
                assert!(d <= *prev + 1e-4);
                *prev = d;
            }
        }
    }

    #[test]
    fn test_projectile_keeps_heading() {
        let tuning = Tuning::default();
        let mut world = World::new(3);
        let angle = 1.1;
        world.spawn_projectile(ProjectileKind::Bolt, angle);

        for _ in 0..10 {
            run(&mut world, &tuning, 16.0);
        }
        let p = &world.projectiles[0];
        assert_eq!(p.angle, angle);
        assert!((p.pos.y.atan2(p.pos.x) - angle).abs() < 1e-4);
        assert!((p.traveled() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_explosion_counts_ticks_not_time() {
        let tuning = Tuning::default();
        let mut world = World::new(3);
        world.spawn_explosion(Vec2::new(5.0, 5.0), 20.0, 3);

        run(&mut world, &tuning, 1000.0);
        assert_eq!(world.explosions[0].frames_left, 2);
        run(&mut world, &tuning, 0.0);
        run(&mut world, &tuning, 1.0);
        assert!(world.explosions[0].is_finished());
        assert_eq!(world.explosions[0].pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_dead_enemies_do_not_move() {
        let tuning = Tuning::default();
        let mut world = World::new(3);
        world.spawn_enemy(EnemyKind::Asteroid, Vec2::new(100.0, 0.0), 1.0);
        world.enemies[0].health = 0;
        run(&mut world, &tuning, 16.0);
        assert_eq!(world.enemies[0].pos, Vec2::new(100.0, 0.0));
    }
}
