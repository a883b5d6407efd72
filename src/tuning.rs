//! Data-driven game balance
//!
//! Every pacing and geometry constant the simulation uses lives here so a
//! JSON file can rebalance a run without touching code. Missing fields fall
//! back to [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the simulation cannot run with
    #[error("invalid tuning field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Simulation balance and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Spawn ring sits this far past half the larger viewport dimension
    pub spawn_margin: f32,

    // === Spawn pacing (ms) ===
    pub base_spawn_interval_ms: f32,
    pub spawn_interval_decay_ms: f32,
    pub min_spawn_interval_ms: f32,
    /// Enemies per wave: base + growth * (wave - 1). A base of 0 (the default)
    /// leaves waves uncapped, so only the clear guard ends them.
    pub wave_quota_base: u32,
    pub wave_quota_growth: u32,
    /// Fractional enemy speed increase per wave after the first
    pub enemy_speed_growth: f32,

    // === Motion ===
    pub reference_frame_ms: f32,
    pub max_delta_ms: f32,
    /// Longest slice of a tick integrated between collision passes
    pub max_substep_ms: f32,

    // === Collision ===
    pub contact_radius: f32,
    pub hit_padding: f32,
    pub projectile_max_range: f32,

    // === Progression ===
    pub clear_delay_ms: f32,
    pub starting_lives: u8,

    // === Cosmetic ===
    pub explosion_frames: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            spawn_margin: SPAWN_MARGIN,

            base_spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            spawn_interval_decay_ms: SPAWN_INTERVAL_DECAY_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            wave_quota_base: 0,
            wave_quota_growth: 2,
            enemy_speed_growth: 0.05,

            reference_frame_ms: REFERENCE_FRAME_MS,
            max_delta_ms: MAX_DELTA_MS,
            max_substep_ms: MAX_SUBSTEP_MS,

            contact_radius: CONTACT_RADIUS,
            hit_padding: HIT_PADDING,
            projectile_max_range: PROJECTILE_MAX_RANGE,

            clear_delay_ms: CLEAR_DELAY_MS,
            starting_lives: STARTING_LIVES,

            explosion_frames: EXPLOSION_FRAMES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every field is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("viewport_width", self.viewport_width)?;
        positive("viewport_height", self.viewport_height)?;
        non_negative("spawn_margin", self.spawn_margin)?;
        positive("base_spawn_interval_ms", self.base_spawn_interval_ms)?;
        non_negative("spawn_interval_decay_ms", self.spawn_interval_decay_ms)?;
        positive("min_spawn_interval_ms", self.min_spawn_interval_ms)?;
        if self.min_spawn_interval_ms > self.base_spawn_interval_ms {
            return Err(TuningError::Invalid {
                field: "min_spawn_interval_ms",
                reason: "must not exceed base_spawn_interval_ms",
            });
        }
        non_negative("enemy_speed_growth", self.enemy_speed_growth)?;
        positive("reference_frame_ms", self.reference_frame_ms)?;
        positive("max_delta_ms", self.max_delta_ms)?;
        positive("max_substep_ms", self.max_substep_ms)?;
        positive("contact_radius", self.contact_radius)?;
        non_negative("hit_padding", self.hit_padding)?;
        positive("projectile_max_range", self.projectile_max_range)?;
        non_negative("clear_delay_ms", self.clear_delay_ms)?;
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Distance from the target center at which enemies appear
    pub fn spawn_radius(&self) -> f32 {
        self.viewport_width.max(self.viewport_height) / 2.0 + self.spawn_margin
    }

    /// Number of equal slices a tick of `dt_ms` is integrated in
    pub fn substeps(&self, dt_ms: f32) -> u32 {
        let steps = (dt_ms / self.max_substep_ms).ceil();
        if steps.is_finite() && steps > 1.0 {
            (steps as u32).min(MAX_SUBSTEPS)
        } else {
            1
        }
    }

    /// Enemies the scheduler emits in `wave`, or `None` when waves are uncapped
    pub fn wave_quota(&self, wave: u32) -> Option<u32> {
        if self.wave_quota_base == 0 {
            return None;
        }
        Some(self.wave_quota_base + self.wave_quota_growth * wave.saturating_sub(1))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: "must be finite and greater than zero",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: "must be finite and not negative",
        })
    }
}
