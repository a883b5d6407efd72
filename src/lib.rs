//! Orbit Defense - a wave-based arcade defense simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, waves)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input capture and persistence live outside this crate. A
//! renderer reads [`sim::SimulationSnapshot`]s; input handlers submit aim and
//! fire commands to [`sim::Simulation`].

pub mod sim;
pub mod tuning;

pub use sim::{Simulation, SimulationSnapshot};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Reference constants shared by the simulation and its defaults
pub mod consts {
    /// Frame length that enemy/projectile speeds are expressed against (ms)
    pub const REFERENCE_FRAME_MS: f32 = 16.0;

    /// Default play area
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Enemies appear this far past half the larger viewport dimension
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Spawn pacing (ms)
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 2000.0;
    pub const SPAWN_INTERVAL_DECAY_MS: f32 = 150.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 500.0;

    /// Distance from the target center below which an enemy has landed
    pub const CONTACT_RADIUS: f32 = 40.0;
    /// Added to enemy size when testing projectile hits
    pub const HIT_PADDING: f32 = 5.0;
    /// Projectiles are culled past this distance from where they were fired
    pub const PROJECTILE_MAX_RANGE: f32 = 600.0;

    /// Wave clear window (ms)
    pub const CLEAR_DELAY_MS: f32 = 3000.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Explosion lifetime in ticks (not time-scaled)
    pub const EXPLOSION_FRAMES: u32 = 30;
    /// Largest delta a single tick will integrate (ms)
    pub const MAX_DELTA_MS: f32 = 250.0;
    /// Longest slice integrated between collision passes (ms)
    pub const MAX_SUBSTEP_MS: f32 = 32.0;
    /// Maximum integration slices per tick
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector pointing along `theta`
#[inline]
pub fn unit_vector(theta: f32) -> Vec2 {
    Vec2::from_angle(theta)
}

/// Heading (radians) from `from` toward `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Point at `radius` from `center` along `theta`
#[inline]
pub fn radial_position(center: Vec2, theta: f32, radius: f32) -> Vec2 {
    center + polar_to_cartesian(radius, theta)
}
