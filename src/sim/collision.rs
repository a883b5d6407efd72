//! Collision detection and resolution
//!
//! Runs once per tick in a fixed order:
//! 1. Target contact: enemies inside the contact radius land, costing a life.
//! 2. Projectile impact: each remaining enemy takes at most one projectile,
//!    the first unconsumed one in range in pool order. A projectile hits once.
//! 3. Destruction: enemies at or below zero health score and explode.
//!
//! [`detect`] only reads the pools and returns a [`CollisionReport`];
//! [`apply`] writes the report back. Removal itself happens in
//! [`World::compact`] at the end of the tick.

use std::collections::HashSet;

use glam::Vec2;
use serde::Serialize;

use super::state::{EnemyKind, World};
use crate::distance;
use crate::tuning::Tuning;

/// An enemy that reached the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetContact {
    pub enemy_id: u32,
    pub pos: Vec2,
    /// Lives remaining after this contact (filled in by [`apply`])
    pub lives_left: u8,
}

/// A projectile consumed against an enemy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileHit {
    pub projectile_id: u32,
    pub enemy_id: u32,
    pub damage: i32,
}

/// An enemy brought to zero health by projectiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destruction {
    pub enemy_id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplosionRequest {
    pub pos: Vec2,
    pub size: f32,
}

/// Everything one collision pass decided. Lives only for the tick that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollisionReport {
    pub contacts: Vec<TargetContact>,
    pub hits: Vec<ProjectileHit>,
    pub destroyed: Vec<Destruction>,
    pub explosions: Vec<ExplosionRequest>,
}

impl CollisionReport {
    /// Whether `enemy_id` already took a projectile hit in this report
    pub fn struck(&self, enemy_id: u32) -> bool {
        self.hits.iter().any(|h| h.enemy_id == enemy_id)
    }

    /// Fold a later pass from the same tick into this one
    pub fn merge(&mut self, later: CollisionReport) {
        self.contacts.extend(later.contacts);
        self.hits.extend(later.hits);
        self.destroyed.extend(later.destroyed);
        self.explosions.extend(later.explosions);
    }

    pub fn score_gained(&self) -> u64 {
        self.destroyed.iter().map(|d| d.score).sum()
    }
}

/// Whether a projectile at `projectile` strikes an enemy of `size` at `enemy`
#[inline]
pub fn in_hit_range(enemy: Vec2, size: f32, projectile: Vec2, padding: f32) -> bool {
    distance(enemy, projectile) < size + padding
}

/// Whether an enemy at `pos` has reached the target
#[inline]
pub fn in_contact(pos: Vec2, center: Vec2, contact_radius: f32) -> bool {
    distance(pos, center) < contact_radius
}

/// Decide this tick's collisions without mutating anything
pub fn detect(world: &World, tuning: &Tuning) -> CollisionReport {
    detect_after(world, tuning, &CollisionReport::default())
}

/// Like [`detect`], but enemies struck by an `earlier` pass of the same tick
/// take no further projectile hits
pub fn detect_after(world: &World, tuning: &Tuning, earlier: &CollisionReport) -> CollisionReport {
    let mut report = CollisionReport::default();
    let center = world.target.center;
    let enemies = &world.enemies;
    let projectiles = &world.projectiles;

    // Step 1: target contact takes priority over projectile impact
    let mut landed = vec![false; enemies.len()];
    for (i, enemy) in enemies.iter().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        if in_contact(enemy.pos, center, tuning.contact_radius) {
            landed[i] = true;
            report.contacts.push(TargetContact {
                enemy_id: enemy.id,
                pos: enemy.pos,
                lives_left: world.target.lives,
            });
            report.explosions.push(ExplosionRequest {
                pos: enemy.pos,
                size: enemy.size * 2.0,
            });
        }
    }

    // Step 2: first unconsumed projectile in range wins, one per enemy
    let mut consumed: Vec<bool> = projectiles.iter().map(|p| p.spent).collect();
    let mut health: Vec<i32> = enemies.iter().map(|e| e.health).collect();
    let mut struck = Vec::new();
    for (i, enemy) in enemies.iter().enumerate() {
        if landed[i] || !enemy.is_alive() || earlier.struck(enemy.id) {
            continue;
        }
        let hit = projectiles.iter().enumerate().find(|(j, p)| {
            !consumed[*j] && in_hit_range(enemy.pos, enemy.size, p.pos, tuning.hit_padding)
        });
        if let Some((j, projectile)) = hit {
            consumed[j] = true;
            health[i] -= projectile.damage;
            struck.push(i);
            log::trace!("Projectile #{} hit enemy #{}", projectile.id, enemy.id);
            report.hits.push(ProjectileHit {
                projectile_id: projectile.id,
                enemy_id: enemy.id,
                damage: projectile.damage,
            });
        }
    }

    // Step 3: destruction
    for i in struck {
        if health[i] > 0 {
            continue;
        }
        let enemy = &enemies[i];
        report.destroyed.push(Destruction {
            enemy_id: enemy.id,
            kind: enemy.kind,
            pos: enemy.pos,
            score: enemy.kind.score_value(),
        });
        report.explosions.push(ExplosionRequest {
            pos: enemy.pos,
            size: enemy.size * 2.0,
        });
    }

    report
}

/// Write a report back into the world: land enemies, cost lives, spend
/// projectiles, apply damage, add score and create explosions
pub fn apply(world: &mut World, report: &mut CollisionReport, tuning: &Tuning) {
    for contact in &mut report.contacts {
        if let Some(enemy) = find_enemy(world, contact.enemy_id) {
            debug_assert!(enemy.is_alive(), "enemy {} landed twice", enemy.id);
            enemy.landed = true;
        }
        // Further contacts in the tick the last life goes still land, at no cost
        if let Some(lives) = world.target.lives.checked_sub(1) {
            world.target.lives = lives;
        }
        contact.lives_left = world.target.lives;
    }

    let mut struck = HashSet::with_capacity(report.hits.len());
    for hit in &report.hits {
        let first = struck.insert(hit.enemy_id);
        debug_assert!(first, "enemy {} hit twice in one tick", hit.enemy_id);

        if let Ok(idx) = world
            .projectiles
            .binary_search_by_key(&hit.projectile_id, |p| p.id)
        {
            let projectile = &mut world.projectiles[idx];
            debug_assert!(!projectile.spent, "projectile {} resolved twice", projectile.id);
            projectile.spent = true;
        }
        if let Some(enemy) = find_enemy(world, hit.enemy_id) {
            enemy.take_damage(hit.damage);
        }
    }

    for destroyed in &report.destroyed {
        debug_assert!(
            world
                .enemies
                .iter()
                .any(|e| e.id == destroyed.enemy_id && e.health <= 0),
            "enemy {} scored while alive",
            destroyed.enemy_id
        );
        world.wave.score += destroyed.score;
    }

    for request in &report.explosions {
        world.spawn_explosion(request.pos, request.size, tuning.explosion_frames);
    }
}

/// Detect and apply in one step
pub fn resolve(world: &mut World, tuning: &Tuning) -> CollisionReport {
    let mut report = detect(world, tuning);
    apply(world, &mut report, tuning);
    report
}

/// Run one more pass for a substepped tick and fold it into `tick_report`
pub fn resolve_into(world: &mut World, tuning: &Tuning, tick_report: &mut CollisionReport) {
    let mut report = detect_after(world, tuning, tick_report);
    apply(world, &mut report, tuning);
    tick_report.merge(report);
}

fn find_enemy(world: &mut World, id: u32) -> Option<&mut super::state::Enemy> {
    world
        .enemies
        .binary_search_by_key(&id, |e| e.id)
        .ok()
        .map(|idx| &mut world.enemies[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ProjectileKind;

    fn world_with_enemy(kind: EnemyKind, pos: Vec2) -> World {
        let mut world = World::new(3);
        world.spawn_enemy(kind, pos, 1.0);
        world
    }

    fn place_projectile(world: &mut World, kind: ProjectileKind, pos: Vec2) -> u32 {
        let id = world.spawn_projectile(kind, 0.0);
        let p = world.projectiles.last_mut().unwrap();
        p.pos = pos;
        id
    }

    #[test]
    fn test_contact_costs_life_without_score() {
        let tuning = Tuning::default();
        let mut world = world_with_enemy(EnemyKind::Asteroid, Vec2::new(30.0, 0.0));

        let report = resolve(&mut world, &tuning);

        assert_eq!(report.contacts.len(), 1);
        assert_eq!(report.contacts[0].lives_left, 2);
        assert_eq!(world.target.lives, 2);
        assert_eq!(world.wave.score, 0);
        assert!(!world.enemies[0].is_alive());
        assert_eq!(world.explosions.len(), 1);
    }

    #[test]
    fn test_contact_beats_projectile_in_range() {
        let tuning = Tuning::default();
        let mut world = world_with_enemy(EnemyKind::Asteroid, Vec2::new(35.0, 0.0));
        let pid = place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(36.0, 0.0));

        let report = resolve(&mut world, &tuning);

        assert_eq!(report.contacts.len(), 1);
        assert!(report.hits.is_empty());
        assert!(report.destroyed.is_empty());
        assert_eq!(world.wave.score, 0);
        // The projectile was never consumed and survives compaction
        world.compact();
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].id, pid);
    }

    #[test]
    fn test_first_projectile_in_pool_order_wins() {
        let tuning = Tuning::default();
        let mut world = world_with_enemy(EnemyKind::Bomber, Vec2::new(200.0, 0.0));
        let first = place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(210.0, 0.0));
        let second = place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(200.0, 0.0));

        let report = resolve(&mut world, &tuning);

        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].projectile_id, first);
        assert_eq!(world.enemies[0].health, 2);
        let second_p = world.projectiles.iter().find(|p| p.id == second).unwrap();
        assert!(!second_p.spent);
    }

    #[test]
    fn test_projectile_hits_only_one_enemy() {
        let tuning = Tuning::default();
        let mut world = World::new(3);
        world.spawn_enemy(EnemyKind::Asteroid, Vec2::new(200.0, 0.0), 1.0);
        world.spawn_enemy(EnemyKind::Asteroid, Vec2::new(205.0, 0.0), 1.0);
        place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(202.0, 0.0));

        let report = resolve(&mut world, &tuning);

        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].enemy_id, world.enemies[0].id);
        assert!(world.enemies[1].is_alive());
        assert_eq!(world.wave.score, 100);
    }

    #[test]
    fn test_hit_range_uses_size_plus_padding() {
        let tuning = Tuning::default();
        // Asteroid size 15 + padding 5 = 20
        let mut world = world_with_enemy(EnemyKind::Asteroid, Vec2::new(200.0, 0.0));
        place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(220.0, 0.0));
        assert!(detect(&world, &tuning).hits.is_empty());

        world.projectiles[0].pos = Vec2::new(219.9, 0.0);
        assert_eq!(detect(&world, &tuning).hits.len(), 1);
    }

    #[test]
    fn test_destruction_scores_by_kind() {
        let tuning = Tuning::default();
        let mut world = world_with_enemy(EnemyKind::Ship, Vec2::new(0.0, 150.0));
        place_projectile(&mut world, ProjectileKind::Heavy, Vec2::new(0.0, 150.0));

        let report = resolve(&mut world, &tuning);

        assert_eq!(report.destroyed.len(), 1);
        assert_eq!(report.score_gained(), 200);
        assert_eq!(world.wave.score, 200);
        assert_eq!(world.explosions.len(), 1);
        assert_eq!(world.explosions[0].frames_left, tuning.explosion_frames as i32);
    }

    #[test]
    fn test_damaged_enemy_survives() {
        let tuning = Tuning::default();
        let mut world = world_with_enemy(EnemyKind::Bomber, Vec2::new(0.0, -150.0));
        place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(0.0, -150.0));

        let report = resolve(&mut world, &tuning);

        assert_eq!(report.hits.len(), 1);
        assert!(report.destroyed.is_empty());
        assert_eq!(world.enemies[0].health, 2);
        assert!(world.explosions.is_empty());
    }

    #[test]
    fn test_spent_projectiles_are_ignored() {
        let tuning = Tuning::default();
        let mut world = world_with_enemy(EnemyKind::Asteroid, Vec2::new(200.0, 0.0));
        place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(200.0, 0.0));
        world.projectiles[0].spent = true;

        let report = detect(&world, &tuning);
        assert!(report.hits.is_empty());
        assert!(report.destroyed.is_empty());
    }

    #[test]
    fn test_lives_never_underflow() {
        let tuning = Tuning::default();
        let mut world = World::new(1);
        world.spawn_enemy(EnemyKind::Asteroid, Vec2::new(10.0, 0.0), 1.0);
        world.spawn_enemy(EnemyKind::Asteroid, Vec2::new(-10.0, 0.0), 1.0);

        let report = resolve(&mut world, &tuning);

        assert_eq!(report.contacts.len(), 2);
        assert_eq!(world.target.lives, 0);
        assert!(world.enemies.iter().all(|e| !e.is_alive()));
    }

    #[test]
    fn test_later_pass_skips_enemy_struck_earlier() {
        let tuning = Tuning::default();
        let mut world = world_with_enemy(EnemyKind::Bomber, Vec2::new(200.0, 0.0));
        place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(195.0, 0.0));

        let mut tick_report = resolve(&mut world, &tuning);
        assert_eq!(world.enemies[0].health, 2);

        let second = place_projectile(&mut world, ProjectileKind::Bolt, Vec2::new(200.0, 0.0));
        resolve_into(&mut world, &tuning, &mut tick_report);

        assert_eq!(world.enemies[0].health, 2);
        assert_eq!(tick_report.hits.len(), 1);
        let idx = world.projectiles.iter().position(|p| p.id == second).unwrap();
        assert!(!world.projectiles[idx].spent);
    }
}
