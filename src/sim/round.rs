//! Round and session state machine
//!
//! Owns the duck set, scoring, spawn scheduling and the phase transitions.
//! All mutation happens on the single simulation thread; the round is
//! deterministic given its seed and the per-tick action stream.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::duck::{Duck, Tier};
use super::modes::{ChallengeRule, GameMode, ModeConfig};
use super::powerup::{EffectKind, PowerUpEngine};
use crate::consts::*;
use crate::input::Actions;

/// Current screen / phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    ModeSelect,
    Playing,
    Paused,
    GameOver,
    Stats,
    Achievements,
}

/// One-shot notifications for the shell (sound triggers, HUD flashes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEvent {
    ShotFired,
    DuckHit { duck_id: u32, points: u32 },
    PowerUpCollected(EffectKind),
    RoundOver,
}

/// End-of-round digest consumed by the difficulty controller, statistics and
/// achievement checks
#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub mode: GameMode,
    pub score: u32,
    pub ducks_hit: u32,
    pub shots_fired: u32,
    pub total_ducks_spawned: u32,
    /// In [0, 100]
    pub accuracy_pct: f32,
    pub elapsed_ms: f32,
    /// Configured round duration, 0 for untimed modes
    pub duration_ms: f32,
    pub ai_level: u8,
}

/// The round controller
#[derive(Debug)]
pub struct Round {
    pub phase: Phase,
    pub mode: GameMode,
    config: ModeConfig,

    pub score: u32,
    pub shots_fired: u32,
    pub ducks_hit: u32,
    pub total_ducks_spawned: u32,
    pub shots_remaining: Option<u32>,
    pub ai_level: u8,
    /// Adaptive seed level applied when a start action launches from the menu
    pub base_level: u8,
    pub elapsed_ms: f32,

    pub cursor: IVec2,
    pub ducks: Vec<Duck>,
    pub powerups: PowerUpEngine,
    /// Drained by the shell each tick
    pub events: Vec<RoundEvent>,

    spawn_timer_ms: f32,
    spawn_delay_ms: f32,
    survival_timer_ms: f32,
    challenge_timer_ms: f32,
    challenge_rule: Option<ChallengeRule>,

    rng: Pcg32,
    next_duck_id: u32,
    summary: Option<RoundSummary>,
}

impl Round {
    pub fn new(seed: u64) -> Self {
        let config = GameMode::Classic.config();
        Self {
            phase: Phase::Menu,
            mode: GameMode::Classic,
            config,
            score: 0,
            shots_fired: 0,
            ducks_hit: 0,
            total_ducks_spawned: 0,
            shots_remaining: None,
            ai_level: AI_LEVEL_MIN,
            base_level: AI_LEVEL_MIN,
            elapsed_ms: 0.0,
            cursor: IVec2::new(SCREEN_W as i32 / 2, SCREEN_H as i32 / 2),
            ducks: Vec::new(),
            powerups: PowerUpEngine::new(),
            events: Vec::new(),
            spawn_timer_ms: 0.0,
            spawn_delay_ms: config.spawn_delay_ms,
            survival_timer_ms: 0.0,
            challenge_timer_ms: 0.0,
            challenge_rule: None,
            rng: Pcg32::seed_from_u64(seed),
            next_duck_id: 0,
            summary: None,
        }
    }

    /// Begin a round. `seed_level` is the adaptive controller's persisted
    /// level; the mode's starting level acts as a floor on top of it.
    pub fn start(&mut self, mode: GameMode, seed_level: u8) {
        self.mode = mode;
        self.config = mode.config();
        self.phase = Phase::Playing;
        self.score = 0;
        self.shots_fired = 0;
        self.ducks_hit = 0;
        self.total_ducks_spawned = 0;
        self.elapsed_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.spawn_delay_ms = self.config.spawn_delay_ms;
        self.shots_remaining = self.config.max_shots;
        self.base_level = seed_level;
        self.ai_level = seed_level
            .max(self.config.ai_start_level)
            .clamp(AI_LEVEL_MIN, AI_LEVEL_MAX);
        self.survival_timer_ms = 0.0;
        self.challenge_timer_ms = 0.0;
        self.challenge_rule = if mode == GameMode::Challenge {
            Some(ChallengeRule::roll(&mut self.rng))
        } else {
            None
        };
        self.ducks.clear();
        self.powerups.reset();
        self.events.clear();
        self.summary = None;
        log::info!("round started: {} (AI level {})", mode.name(), self.ai_level);
    }

    /// Return to the menu, reinitializing session-scoped fields only.
    /// Persistent state (adaptive AI, statistics) lives outside the round and
    /// is untouched.
    pub fn reset(&mut self) {
        self.phase = Phase::Menu;
        self.score = 0;
        self.shots_fired = 0;
        self.ducks_hit = 0;
        self.total_ducks_spawned = 0;
        self.shots_remaining = None;
        self.elapsed_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.ducks.clear();
        self.powerups.reset();
        self.events.clear();
        self.summary = None;
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Playing,
            _ => {}
        }
    }

    /// Navigation for the non-gameplay screens
    pub fn show(&mut self, phase: Phase) {
        if matches!(
            phase,
            Phase::Menu | Phase::ModeSelect | Phase::Stats | Phase::Achievements
        ) {
            self.phase = phase;
        }
    }

    /// Running accuracy as a percentage in [0, 100]
    pub fn accuracy_pct(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.ducks_hit as f32 / self.shots_fired as f32 * 100.0
        }
    }

    /// The GameOver digest, produced exactly once per completed round
    pub fn take_summary(&mut self) -> Option<RoundSummary> {
        self.summary.take()
    }

    /// Advance the round by one fixed timestep
    pub fn tick(&mut self, actions: &Actions, dt: f32) {
        self.cursor = actions.cursor;

        if actions.start && matches!(self.phase, Phase::Menu | Phase::ModeSelect) {
            self.start(self.mode, self.base_level);
        }
        if actions.pause {
            self.toggle_pause();
        }
        if actions.reset && self.phase == Phase::GameOver {
            self.reset();
        }
        if self.phase != Phase::Playing {
            return;
        }

        // Wall-clock round timer; slow motion only dilates duck updates
        self.elapsed_ms += dt * 1000.0;

        if actions.shoot {
            self.shoot(actions.cursor);
        }

        self.update_mode_rules(dt);
        self.update_spawning(dt);

        let expired = self.powerups.update(dt, &mut self.rng);
        if expired.contains(&EffectKind::Freeze) {
            let rng = &mut self.rng;
            for duck in &mut self.ducks {
                duck.unfreeze(rng);
            }
        }

        let dt_ducks = dt * self.powerups.time_scale();
        let accuracy = self.accuracy_pct() / 100.0;
        let cursor = self.cursor;
        let rng = &mut self.rng;
        for duck in &mut self.ducks {
            duck.update(cursor, accuracy, dt_ducks, rng);
        }
        self.ducks.retain(|d| !d.finished());

        // End conditions. Each can only fire while still Playing, so the
        // Playing -> GameOver transition happens exactly once.
        let timed_out = self.config.duration_ms > 0.0 && self.elapsed_ms >= self.config.duration_ms;
        let out_of_ammo = self.shots_remaining == Some(0);
        if timed_out || out_of_ammo {
            self.finish();
        }
    }

    /// Resolve one shot at `pos`: power-up pickups first, then at most one
    /// duck hit. Rejected outright when the ammo budget is exhausted.
    pub fn shoot(&mut self, pos: IVec2) {
        if self.shots_remaining == Some(0) {
            return;
        }
        self.shots_fired += 1;
        if let Some(n) = &mut self.shots_remaining {
            *n -= 1;
        }
        self.events.push(RoundEvent::ShotFired);

        if let Some(kind) = self.powerups.try_collect(pos) {
            if kind == EffectKind::Freeze {
                for duck in &mut self.ducks {
                    duck.freeze();
                }
            }
            self.events.push(RoundEvent::PowerUpCollected(kind));
            return;
        }

        // Single hit per shot, first match in iteration order
        for duck in &mut self.ducks {
            if duck.alive && duck.contains(pos) {
                if duck.hit(pos) {
                    let points = duck.points * self.powerups.points_multiplier();
                    self.score += points;
                    self.ducks_hit += 1;
                    self.events.push(RoundEvent::DuckHit {
                        duck_id: duck.id,
                        points,
                    });
                }
                break;
            }
        }
    }

    fn update_mode_rules(&mut self, dt: f32) {
        match self.mode {
            GameMode::Survival => {
                self.survival_timer_ms += dt * 1000.0;
                if self.survival_timer_ms >= 30_000.0 {
                    self.survival_timer_ms = 0.0;
                    self.ai_level = (self.ai_level + 1).min(AI_LEVEL_MAX);
                    for duck in &mut self.ducks {
                        duck.speed *= 1.1;
                    }
                    log::debug!("survival escalation: AI level {}", self.ai_level);
                }
            }
            GameMode::Challenge => {
                self.challenge_timer_ms += dt * 1000.0;
                if self.challenge_timer_ms >= 15_000.0 {
                    self.challenge_timer_ms = 0.0;
                    let rule = ChallengeRule::roll(&mut self.rng);
                    // The ammo cap lasts only while its rule is the active one
                    self.shots_remaining = if rule == ChallengeRule::LimitedAmmo {
                        Some(5)
                    } else {
                        self.config.max_shots
                    };
                    self.challenge_rule = Some(rule);
                    log::debug!("challenge rule: {rule:?}");
                }
            }
            _ => {}
        }
    }

    fn update_spawning(&mut self, dt: f32) {
        // Difficulty ramp shrinks the delay but never below the floor
        if self.config.spawn_ramp_ms_per_sec > 0.0 {
            self.spawn_delay_ms = (self.spawn_delay_ms - self.config.spawn_ramp_ms_per_sec * dt)
                .max(SPAWN_DELAY_FLOOR_MS);
        }
        let delay = (self.spawn_delay_ms
            * self
                .challenge_rule
                .map_or(1.0, ChallengeRule::spawn_delay_factor))
        .max(SPAWN_DELAY_FLOOR_MS);

        self.spawn_timer_ms += dt * 1000.0;
        if self.spawn_timer_ms >= delay {
            // The population cap suppresses the spawn but keeps the timer
            // armed so one fires as soon as a slot frees up
            if self.ducks.len() < MAX_DUCKS {
                self.spawn_timer_ms = 0.0;
                self.spawn_duck();
            }
        }
    }

    fn spawn_duck(&mut self) {
        self.next_duck_id += 1;
        let tier = Tier::draw(&mut self.rng);
        let mut duck = Duck::spawn(
            self.next_duck_id,
            tier,
            self.ai_level,
            self.config.duck_hp,
            &mut self.rng,
        );
        if let Some(rule) = self.challenge_rule {
            duck.speed *= rule.duck_speed_factor();
        }
        self.ducks.push(duck);
        self.total_ducks_spawned += 1;
    }

    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        self.summary = Some(RoundSummary {
            mode: self.mode,
            score: self.score,
            ducks_hit: self.ducks_hit,
            shots_fired: self.shots_fired,
            total_ducks_spawned: self.total_ducks_spawned,
            accuracy_pct: self.accuracy_pct(),
            elapsed_ms: self.elapsed_ms,
            duration_ms: self.config.duration_ms,
            ai_level: self.ai_level,
        });
        self.events.push(RoundEvent::RoundOver);
        log::info!(
            "round over: score {} ({}/{} shots, accuracy {:.1}%)",
            self.score,
            self.ducks_hit,
            self.shots_fired,
            self.accuracy_pct()
        );
    }
}
