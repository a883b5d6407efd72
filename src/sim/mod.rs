//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the delta passed to `tick`
//! - Seeded/injected RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{CollisionReport, Destruction, ExplosionRequest, ProjectileHit, TargetContact};
pub use state::{
    Enemy, EnemyKind, Explosion, GameEvent, Projectile, ProjectileKind, Target, WavePhase,
    WaveState, World,
};
pub use tick::{Simulation, SimulationSnapshot};
