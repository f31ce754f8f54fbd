//! Game mode catalog
//!
//! Each mode overrides round duration, spawn pacing, starting AI level and a
//! handful of special rules the round controller applies per frame.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Available game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    Survival,
    TimeAttack,
    Precision,
    BossRush,
    Infinite,
    Challenge,
}

impl GameMode {
    pub const ALL: [GameMode; 7] = [
        GameMode::Classic,
        GameMode::Survival,
        GameMode::TimeAttack,
        GameMode::Precision,
        GameMode::BossRush,
        GameMode::Infinite,
        GameMode::Challenge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Survival => "Survival",
            GameMode::TimeAttack => "Time Attack",
            GameMode::Precision => "Precision",
            GameMode::BossRush => "Boss Rush",
            GameMode::Infinite => "Infinite",
            GameMode::Challenge => "Challenge",
        }
    }

    pub fn config(self) -> ModeConfig {
        match self {
            GameMode::Classic => ModeConfig {
                duration_ms: 60_000.0,
                spawn_delay_ms: 2000.0,
                ai_start_level: 1,
                max_shots: None,
                duck_hp: 1,
                spawn_ramp_ms_per_sec: 0.0,
            },
            GameMode::Survival => ModeConfig {
                duration_ms: 0.0,
                spawn_delay_ms: 1500.0,
                ai_start_level: 3,
                max_shots: None,
                duck_hp: 1,
                spawn_ramp_ms_per_sec: 10.0,
            },
            GameMode::TimeAttack => ModeConfig {
                duration_ms: 30_000.0,
                spawn_delay_ms: 1000.0,
                ai_start_level: 2,
                max_shots: None,
                duck_hp: 1,
                spawn_ramp_ms_per_sec: 0.0,
            },
            GameMode::Precision => ModeConfig {
                duration_ms: 0.0,
                spawn_delay_ms: 3000.0,
                ai_start_level: 1,
                max_shots: Some(10),
                duck_hp: 1,
                spawn_ramp_ms_per_sec: 0.0,
            },
            GameMode::BossRush => ModeConfig {
                duration_ms: 120_000.0,
                spawn_delay_ms: 5000.0,
                ai_start_level: 5,
                max_shots: None,
                duck_hp: 3,
                spawn_ramp_ms_per_sec: 0.0,
            },
            GameMode::Infinite => ModeConfig {
                duration_ms: 0.0,
                spawn_delay_ms: 2500.0,
                ai_start_level: 1,
                max_shots: None,
                duck_hp: 1,
                spawn_ramp_ms_per_sec: 0.0,
            },
            GameMode::Challenge => ModeConfig {
                duration_ms: 90_000.0,
                spawn_delay_ms: 2000.0,
                ai_start_level: 4,
                max_shots: None,
                duck_hp: 1,
                spawn_ramp_ms_per_sec: 0.0,
            },
        }
    }
}

/// Per-mode rule overrides
#[derive(Debug, Clone, Copy)]
pub struct ModeConfig {
    /// Round duration in ms, 0 for untimed
    pub duration_ms: f32,
    pub spawn_delay_ms: f32,
    pub ai_start_level: u8,
    /// Shot budget for limited-ammo modes
    pub max_shots: Option<u32>,
    /// Hits a duck takes before dying
    pub duck_hp: u8,
    /// How fast the spawn delay shrinks over a round (never below the floor)
    pub spawn_ramp_ms_per_sec: f32,
}

/// Rotating Challenge-mode rule, re-rolled every 15 seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeRule {
    /// Ducks spawn 50% faster
    FastDucks,
    /// Spawn delay halved
    RapidSpawn,
    /// Ammo capped at 5 shots until the next re-roll
    LimitedAmmo,
}

impl ChallengeRule {
    pub fn roll(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..3) {
            0 => ChallengeRule::FastDucks,
            1 => ChallengeRule::RapidSpawn,
            _ => ChallengeRule::LimitedAmmo,
        }
    }

    /// Multiplier applied to the speed of ducks spawned under this rule
    pub fn duck_speed_factor(self) -> f32 {
        match self {
            ChallengeRule::FastDucks => 1.5,
            _ => 1.0,
        }
    }

    /// Multiplier applied to the effective spawn delay
    pub fn spawn_delay_factor(self) -> f32 {
        match self {
            ChallengeRule::RapidSpawn => 0.5,
            _ => 1.0,
        }
    }
}
