//! Quackshot entry point
//!
//! Runs a headless demo round with a scripted shooter, then folds the result
//! into the persisted difficulty, statistics and achievement state. Frontends
//! drive the same `Round` API from their own event loops.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use glam::IVec2;

use quackshot::achievements::Unlocks;
use quackshot::assets::{AssetProvider, PlaceholderAssets, Sound};
use quackshot::consts::*;
use quackshot::input::{KeyState, MouseState};
use quackshot::persistence;
use quackshot::sim::RoundEvent;
use quackshot::stats::{GameSession, PlayerStats};
use quackshot::{AdaptiveAi, Config, GameMode, InputUnifier, Phase, Round};

/// Scripted demo shooter: tracks the nearest live duck and fires on a fixed
/// cadence once the aim is over it
struct DemoShooter {
    shot_cooldown_ms: f32,
}

impl DemoShooter {
    fn new() -> Self {
        Self {
            shot_cooldown_ms: 0.0,
        }
    }

    fn drive(&mut self, round: &Round, dt: f32) -> MouseState {
        self.shot_cooldown_ms = (self.shot_cooldown_ms - dt * 1000.0).max(0.0);

        let target = round
            .ducks
            .iter()
            .filter(|d| d.alive)
            .min_by(|a, b| {
                let cursor = round.cursor.as_vec2();
                a.pos.distance(cursor).total_cmp(&b.pos.distance(cursor))
            });
        let Some(duck) = target else {
            return MouseState::default();
        };

        let aim = IVec2::new(duck.pos.x as i32, duck.pos.y as i32);
        let on_target = duck.contains(aim);
        let clicked = on_target && self.shot_cooldown_ms == 0.0;
        if clicked {
            self.shot_cooldown_ms = 600.0;
        }
        MouseState {
            pos: Some(aim),
            clicked,
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(Path::new("quackshot.json"));
    let mut ai: AdaptiveAi = persistence::load_or_init(&config.ai_path());
    let mut stats: PlayerStats = persistence::load_or_init(&config.stats_path());
    let mut unlocks: Unlocks = persistence::load_or_init(&config.achievements_path());
    log::info!(
        "loaded: AI level {}, {} rounds on record",
        ai.ai_level,
        stats.games_played
    );

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let assets = PlaceholderAssets;
    let mut round = Round::new(seed);
    let mut unifier = InputUnifier::new();
    let mut shooter = DemoShooter::new();

    round.start(GameMode::Classic, ai.ai_level);
    while round.phase == Phase::Playing {
        let mouse = shooter.drive(&round, SIM_DT);
        let actions = unifier.unify(&KeyState::default(), &mouse, None, SIM_DT);
        round.tick(&actions, SIM_DT);

        for event in std::mem::take(&mut round.events) {
            match event {
                RoundEvent::ShotFired => assets.play(Sound::Shot),
                RoundEvent::DuckHit { duck_id, points } => {
                    log::debug!("hit duck {duck_id} for {points}");
                    assets.play(Sound::DuckHit);
                }
                RoundEvent::PowerUpCollected(kind) => {
                    log::info!("collected {kind:?}");
                    assets.play(Sound::PowerUpCollect);
                }
                RoundEvent::RoundOver => assets.play(Sound::GameOver),
            }
        }
    }

    let summary = round
        .take_summary()
        .context("round ended without a summary")?;
    log::info!(
        "demo round: {} points, {}/{} shots ({:.1}%)",
        summary.score,
        summary.ducks_hit,
        summary.shots_fired,
        summary.accuracy_pct
    );

    // Difficulty first, then the session record, then achievements
    let perf = AdaptiveAi::performance_score(
        summary.ducks_hit,
        summary.shots_fired,
        summary.elapsed_ms,
        summary.duration_ms,
    );
    ai.record_round(perf);

    let timestamp = unix_now();
    stats.record(GameSession::from_summary(&summary, timestamp));
    for def in unlocks.check_round(&summary, &stats, timestamp) {
        log::info!("unlocked: {} - {}", def.name, def.description);
    }

    persistence::save(&config.ai_path(), &ai).context("saving AI state")?;
    persistence::save(&config.stats_path(), &stats).context("saving stats")?;
    persistence::save(&config.achievements_path(), &unlocks).context("saving achievements")?;
    Ok(())
}
