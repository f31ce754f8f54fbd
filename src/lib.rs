//! Quackshot - a duck-shooting arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (duck AI, rounds, power-ups, difficulty)
//! - `gesture`: Camera-frame hand-gesture classification pipeline
//! - `input`: Mouse + gesture unification into one per-tick action set
//! - `persistence`: JSON snapshot load/save
//! - `stats`: Session history, aggregate stats, leaderboards
//! - `achievements`: Unlock tracking

pub mod achievements;
pub mod assets;
pub mod config;
pub mod gesture;
pub mod input;
pub mod persistence;
pub mod sim;
pub mod stats;

pub use config::Config;
pub use gesture::{GestureController, GestureLabel, GestureSample};
pub use input::{Actions, InputUnifier};
pub use sim::{AdaptiveAi, GameMode, Phase, Round};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz, matching the original cadence)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_W: f32 = 640.0;
    pub const SCREEN_H: f32 = 480.0;

    /// Camera capture dimensions
    pub const CAMERA_W: u32 = 640;
    pub const CAMERA_H: u32 = 480;

    /// Duck defaults
    pub const DUCK_BASE_SPEED: f32 = 100.0;
    /// Speed bonus per AI level (px/s)
    pub const DUCK_SPEED_PER_LEVEL: f32 = 15.0;
    /// Point bonus per AI level
    pub const DUCK_POINTS_PER_LEVEL: u32 = 10;
    /// Death animation duration before despawn (ms)
    pub const DUCK_DIE_DURATION_MS: f32 = 1000.0;
    /// Downward speed of a dying duck (px/s)
    pub const DUCK_FALL_SPEED: f32 = 200.0;
    /// Duck hitbox dimensions
    pub const DUCK_W: f32 = 36.0;
    pub const DUCK_H: f32 = 32.0;

    /// Concurrent duck population cap
    pub const MAX_DUCKS: usize = 5;
    /// Spawn delay never ramps below this (ms)
    pub const SPAWN_DELAY_FLOOR_MS: f32 = 1000.0;

    /// Behavior state duration range (ms)
    pub const STATE_DURATION_MIN_MS: f32 = 3000.0;
    pub const STATE_DURATION_MAX_MS: f32 = 8000.0;
    /// Post-evasion cooldown (ms)
    pub const EVASION_COOLDOWN_MS: f32 = 1000.0;
    /// How far ahead Hunting extrapolates the cursor (seconds)
    pub const PREDICTION_HORIZON_SECS: f32 = 2.0;

    /// AI level clamp
    pub const AI_LEVEL_MIN: u8 = 1;
    pub const AI_LEVEL_MAX: u8 = 10;
    /// Rolling performance history cap
    pub const PERFORMANCE_HISTORY_CAP: usize = 10;

    /// Power-up spawn cadence
    pub const POWERUP_SPAWN_INTERVAL_MS: f32 = 15000.0;
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.3;
    /// Falling collectible speed (px/s) and square size
    pub const POWERUP_FALL_SPEED: f32 = 50.0;
    pub const POWERUP_SIZE: f32 = 32.0;

    /// Gesture confidence required for discrete actions / cursor movement
    pub const GESTURE_ACTION_CONFIDENCE: f32 = 0.5;
    pub const GESTURE_MOVE_CONFIDENCE: f32 = 0.3;
    /// Cooldown after a gesture-triggered discrete action (ms)
    pub const GESTURE_COOLDOWN_MS: f32 = 500.0;

    /// Smallest contour area accepted as a hand (px^2)
    pub const MIN_HAND_AREA: f32 = 3000.0;
    /// Convexity defect depth threshold, in 8.8 fixed-point pixel units
    pub const MIN_DEFECT_DEPTH: u32 = 10000;

    /// Animation frame hold time (seconds) and frames per clip
    pub const ANIM_FRAME_SECS: f32 = 0.2;
    pub const ANIM_CLIP_FRAMES: usize = 3;
}

/// Clamp a point to the playfield rectangle
#[inline]
pub fn clamp_to_playfield(p: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(0.0, consts::SCREEN_W),
        p.y.clamp(0.0, consts::SCREEN_H),
    )
}
