//! Simulation state and entity types
//!
//! The three entity pools, the defended target and the wave bookkeeping all
//! live in [`World`]. Pools are plain vectors kept sorted by entity id; nothing
//! in one pool refers to anything in another.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{angle_between, distance, unit_vector};

/// Closed set of enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Asteroid,
    Ship,
    Bomber,
}

impl EnemyKind {
    /// All kinds in unlock order
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Asteroid, EnemyKind::Ship, EnemyKind::Bomber];

    pub fn health(self) -> i32 {
        match self {
            EnemyKind::Asteroid => 1,
            EnemyKind::Ship => 2,
            EnemyKind::Bomber => 3,
        }
    }

    /// Collision radius
    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Asteroid => 15.0,
            EnemyKind::Ship => 20.0,
            EnemyKind::Bomber => 25.0,
        }
    }

    /// Base speed in world units per reference frame
    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Asteroid => 1.0,
            EnemyKind::Ship => 1.5,
            EnemyKind::Bomber => 0.8,
        }
    }

    /// Points awarded when destroyed by a projectile
    pub fn score_value(self) -> u64 {
        match self {
            EnemyKind::Asteroid => 100,
            EnemyKind::Ship => 200,
            EnemyKind::Bomber => 300,
        }
    }

    /// Kinds available from `wave` onward (one more per wave until all are in play)
    pub fn unlocked(wave: u32) -> &'static [EnemyKind] {
        let count = (wave.max(1) as usize).min(Self::ALL.len());
        &Self::ALL[..count]
    }
}

/// An enemy homing on the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Heading in radians, re-aimed at the target every tick
    pub angle: f32,
    pub speed: f32,
    pub health: i32,
    pub size: f32,
    /// Reached the target this tick; removed at compaction without scoring
    #[serde(default)]
    pub landed: bool,
}

impl Enemy {
    /// Create an enemy of `kind` at `pos`, heading toward `target`
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, target: Vec2, speed_scale: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            angle: angle_between(pos, target),
            speed: kind.speed() * speed_scale,
            health: kind.health(),
            size: kind.size(),
            landed: false,
        }
    }

    /// Still taking part in the simulation
    pub fn is_alive(&self) -> bool {
        self.health > 0 && !self.landed
    }

    /// Re-aim at `target` and move `speed * scale` toward it, never past it
    pub fn home_toward(&mut self, target: Vec2, scale: f32) {
        let remaining = distance(self.pos, target);
        if remaining <= f32::EPSILON {
            return;
        }
        self.angle = angle_between(self.pos, target);
        let step = (self.speed * scale).min(remaining);
        if step >= remaining {
            self.pos = target;
        } else {
            self.pos += unit_vector(self.angle) * step;
        }
    }

    /// Apply projectile damage
    pub fn take_damage(&mut self, damage: i32) {
        debug_assert!(self.is_alive(), "enemy {} damaged after removal", self.id);
        self.health -= damage;
    }
}

/// Weapon the player fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Bolt,
    Heavy,
}

impl ProjectileKind {
    /// World units per reference frame
    pub fn speed(self) -> f32 {
        match self {
            ProjectileKind::Bolt => 8.0,
            ProjectileKind::Heavy => 5.0,
        }
    }

    pub fn damage(self) -> i32 {
        match self {
            ProjectileKind::Bolt => 1,
            ProjectileKind::Heavy => 2,
        }
    }
}

/// A projectile flying in a straight line from where it was fired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    /// Firing point; range is measured from here
    pub origin: Vec2,
    /// Fixed at creation
    pub angle: f32,
    pub speed: f32,
    pub damage: i32,
    /// Out of range or already hit something; removed at compaction
    #[serde(default)]
    pub spent: bool,
}

impl Projectile {
    pub fn new(id: u32, kind: ProjectileKind, origin: Vec2, angle: f32) -> Self {
        Self {
            id,
            kind,
            pos: origin,
            origin,
            angle,
            speed: kind.speed(),
            damage: kind.damage(),
            spent: false,
        }
    }

    pub fn traveled(&self) -> f32 {
        distance(self.pos, self.origin)
    }

    /// Advance along the firing angle, marking the projectile spent past `max_range`
    pub fn advance(&mut self, scale: f32, max_range: f32) {
        if self.spent {
            return;
        }
        self.pos += unit_vector(self.angle) * self.speed * scale;
        if self.traveled() > max_range {
            self.spent = true;
        }
    }
}

/// Cosmetic blast left behind by a destroyed enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Ticks remaining (counted per tick, not per millisecond)
    pub frames_left: i32,
}

impl Explosion {
    pub fn decay(&mut self) {
        self.frames_left -= 1;
    }

    pub fn is_finished(&self) -> bool {
        self.frames_left <= 0
    }
}

/// The defended point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub center: Vec2,
    pub lives: u8,
}

/// Progression phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Scheduler is emitting enemies
    Spawning,
    /// Emission over; waiting for the field to stay clear. Capped waves enter
    /// once the quota is out, uncapped waves once the clear guard first holds.
    Clearing,
    /// Wave just advanced; spawning resumes next tick
    Advancing,
    /// Lives exhausted. Terminal.
    Ended,
}

/// Wave number, score and clear bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    /// 1-based, never decreases
    pub wave: u32,
    pub score: u64,
    pub phase: WavePhase,
    /// Time since the scheduler last emitted an enemy (or since the wave began)
    pub since_last_spawn_ms: f32,
    /// Time the enemy pool has been continuously empty
    pub empty_for_ms: f32,
    pub spawned_this_wave: u32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            wave: 1,
            score: 0,
            phase: WavePhase::Spawning,
            since_last_spawn_ms: 0.0,
            empty_for_ms: 0.0,
            spawned_this_wave: 0,
        }
    }
}

/// Everything the simulation mutates during a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub target: Target,
    pub wave: WaveState,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Active projectiles (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    /// Active explosions (sorted by id for determinism)
    pub explosions: Vec<Explosion>,
    next_id: u32,
}

impl World {
    /// Fresh world with the target at the origin
    pub fn new(lives: u8) -> Self {
        Self {
            target: Target {
                center: Vec2::ZERO,
                lives,
            },
            wave: WaveState::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an enemy of `kind` at `pos`; returns its id
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2, speed_scale: f32) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, self.target.center, speed_scale);
        self.enemies.push(enemy);
        id
    }

    /// Insert a projectile fired from the target center; returns its id
    pub fn spawn_projectile(&mut self, kind: ProjectileKind, angle: f32) -> u32 {
        let id = self.next_entity_id();
        let projectile = Projectile::new(id, kind, self.target.center, angle);
        self.projectiles.push(projectile);
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, size: f32, frames: u32) -> u32 {
        let id = self.next_entity_id();
        self.explosions.push(Explosion {
            id,
            pos,
            size,
            frames_left: frames.min(i32::MAX as u32) as i32,
        });
        id
    }

    pub fn is_ended(&self) -> bool {
        self.wave.phase == WavePhase::Ended
    }

    /// Drop destroyed/landed enemies, spent projectiles and finished explosions
    pub fn compact(&mut self) {
        self.enemies.retain(|e| e.is_alive());
        self.projectiles.retain(|p| !p.spent);
        self.explosions.retain(|x| !x.is_finished());
        self.normalize_order();
    }

    /// Ensure pools are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.explosions.sort_by_key(|x| x.id);
    }
}

/// Something that happened during a tick, for renderer/audio collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemyKind },
    ProjectileFired { id: u32, kind: ProjectileKind, angle: f32 },
    EnemyDestroyed { id: u32, kind: EnemyKind, score: u64 },
    TargetHit { enemy_id: u32, lives_left: u8 },
    WaveAdvanced { wave: u32 },
    GameOver { score: u64, wave: u32 },
}
