//! Per-frame simulation driver
//!
//! [`Simulation::tick`] runs the fixed sequence
//! `commands -> spawn -> integrate -> collisions -> wave -> compact -> snapshot`.
//! Aim and fire commands submitted between ticks are applied at the start of
//! the next one. Long ticks integrate and collide in slices of at most
//! `max_substep_ms` so fast projectiles cannot skip over an enemy.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{self, CollisionReport};
use super::state::{
    Enemy, Explosion, GameEvent, Projectile, ProjectileKind, WavePhase, World,
};
use super::{motion, spawn, wave};
use crate::normalize_angle;
use crate::tuning::{Tuning, TuningError};

/// State published to the renderer after each tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub score: u64,
    pub lives: u8,
    pub wave: u32,
    pub phase: WavePhase,
    pub ended: bool,
    pub paused: bool,
    pub aim_angle: f32,
    /// What happened during the tick that produced this snapshot
    pub events: Vec<GameEvent>,
}

impl SimulationSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The simulation core: owns the world, the random source and pending commands
pub struct Simulation<R = Pcg32> {
    tuning: Tuning,
    world: World,
    rng: R,
    aim_angle: f32,
    weapon: ProjectileKind,
    pending_shots: Vec<(f32, ProjectileKind)>,
    paused: bool,
    time_ticks: u64,
    events: Vec<GameEvent>,
}

impl Simulation<Pcg32> {
    /// New run with default tuning and a seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::from_parts(Tuning::default(), Pcg32::seed_from_u64(seed))
    }

    /// New run with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// New run drawing spawn randomness from `rng`
    pub fn with_rng(tuning: Tuning, rng: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_parts(tuning, rng))
    }

    fn from_parts(tuning: Tuning, rng: R) -> Self {
        let world = World::new(tuning.starting_lives);
        Self {
            tuning,
            world,
            rng,
            aim_angle: 0.0,
            weapon: ProjectileKind::default(),
            pending_shots: Vec::new(),
            paused: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Advance the simulation by one frame of `delta_ms` milliseconds
    pub fn tick(&mut self, delta_ms: f32) -> SimulationSnapshot {
        self.events.clear();

        if self.world.is_ended() || self.paused {
            return self.snapshot();
        }

        let dt = self.sanitize_delta(delta_ms);
        self.time_ticks += 1;

        self.apply_commands();
        self.spawn(dt);
        let report = self.integrate_and_collide(dt);
        self.publish_collisions(&report);
        self.advance_wave_if_cleared(dt);
        self.compact();

        self.snapshot()
    }

    /// Queue a projectile along `angle` and aim there. Ignored once ended,
    /// while paused, or for a non-finite angle.
    pub fn fire_projectile(&mut self, angle: f32) {
        if self.world.is_ended() || self.paused {
            return;
        }
        if !angle.is_finite() {
            log::warn!("Ignoring fire command with non-finite angle {}", angle);
            return;
        }
        self.aim_angle = normalize_angle(angle);
        self.pending_shots.push((self.aim_angle, self.weapon));
    }

    /// Queue a projectile along the current aim
    pub fn fire(&mut self) {
        self.fire_projectile(self.aim_angle);
    }

    /// Update the aim used by [`Simulation::fire`]
    pub fn set_aim_angle(&mut self, angle: f32) {
        if !angle.is_finite() {
            log::warn!("Ignoring non-finite aim angle {}", angle);
            return;
        }
        self.aim_angle = normalize_angle(angle);
    }

    /// Choose the projectile kind for subsequent fire commands
    pub fn select_weapon(&mut self, kind: ProjectileKind) {
        self.weapon = kind;
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("Simulation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Start over: empty pools, full lives, wave 1, score 0
    pub fn reset(&mut self) {
        self.world = World::new(self.tuning.starting_lives);
        self.aim_angle = 0.0;
        self.weapon = ProjectileKind::default();
        self.pending_shots.clear();
        self.paused = false;
        self.time_ticks = 0;
        self.events.clear();
        log::info!("Simulation reset");
    }

    /// Current state without advancing
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: self.time_ticks,
            enemies: self.world.enemies.clone(),
            projectiles: self.world.projectiles.clone(),
            explosions: self.world.explosions.clone(),
            score: self.world.wave.score,
            lives: self.world.target.lives,
            wave: self.world.wave.wave,
            phase: self.world.wave.phase,
            ended: self.world.is_ended(),
            paused: self.paused,
            aim_angle: self.aim_angle,
            events: self.events.clone(),
        }
    }

    pub fn is_ended(&self) -> bool {
        self.world.is_ended()
    }

    pub fn aim_angle(&self) -> f32 {
        self.aim_angle
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct pool access for scripted setups
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn sanitize_delta(&self, delta_ms: f32) -> f32 {
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            log::warn!("Treating invalid delta {} as 0", delta_ms);
            return 0.0;
        }
        delta_ms.min(self.tuning.max_delta_ms)
    }

    fn apply_commands(&mut self) {
        for (angle, kind) in self.pending_shots.drain(..) {
            let id = self.world.spawn_projectile(kind, angle);
            log::debug!("Fired {:?} #{} at {:.2}", kind, id, angle);
            self.events.push(GameEvent::ProjectileFired { id, kind, angle });
        }
    }

    fn spawn(&mut self, dt: f32) {
        spawn::run(
            &mut self.world,
            &self.tuning,
            &mut self.rng,
            dt,
            &mut self.events,
        );
    }

    fn integrate_and_collide(&mut self, dt: f32) -> CollisionReport {
        motion::decay_explosions(&mut self.world);

        let steps = self.tuning.substeps(dt);
        let slice = dt / steps as f32;
        let mut report = CollisionReport::default();
        for _ in 0..steps {
            motion::advance(&mut self.world, &self.tuning, slice);
            collision::resolve_into(&mut self.world, &self.tuning, &mut report);
            if self.world.target.lives == 0 {
                break;
            }
        }
        report
    }

    fn publish_collisions(&mut self, report: &CollisionReport) {
        for contact in &report.contacts {
            self.events.push(GameEvent::TargetHit {
                enemy_id: contact.enemy_id,
                lives_left: contact.lives_left,
            });
        }
        for destroyed in &report.destroyed {
            self.events.push(GameEvent::EnemyDestroyed {
                id: destroyed.enemy_id,
                kind: destroyed.kind,
                score: destroyed.score,
            });
        }
    }

    fn advance_wave_if_cleared(&mut self, dt: f32) {
        wave::update(&mut self.world, &self.tuning, dt, &mut self.events);
    }

    fn compact(&mut self) {
        self.world.compact();
    }
}

impl<R: Rng + SeedableRng> Simulation<R> {
    /// Reset and reseed the random source
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
        self.reset();
    }
}
