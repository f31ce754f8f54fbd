//! Power-up effect engine
//!
//! Collectibles fall from the top of the playfield on a probabilistic timer.
//! Shooting one applies a timed effect; at most one effect per kind is active
//! and re-collection replaces the timer rather than stacking it.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Timed gameplay modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    RapidFire,
    DoublePoints,
    SlowMotion,
    MultiShot,
    Shield,
    Magnet,
    Freeze,
}

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        EffectKind::RapidFire,
        EffectKind::DoublePoints,
        EffectKind::SlowMotion,
        EffectKind::MultiShot,
        EffectKind::Shield,
        EffectKind::Magnet,
        EffectKind::Freeze,
    ];

    pub fn duration_ms(self) -> f32 {
        match self {
            EffectKind::RapidFire => 10_000.0,
            EffectKind::DoublePoints => 15_000.0,
            EffectKind::SlowMotion => 8_000.0,
            EffectKind::MultiShot => 12_000.0,
            EffectKind::Shield => 10_000.0,
            EffectKind::Magnet => 12_000.0,
            EffectKind::Freeze => 6_000.0,
        }
    }

    /// Gameplay multiplier while the effect is active
    pub fn multiplier(self) -> f32 {
        match self {
            EffectKind::RapidFire => 3.0,
            EffectKind::DoublePoints => 2.0,
            EffectKind::SlowMotion => 0.5,
            _ => 1.0,
        }
    }
}

/// A falling collectible
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub kind: EffectKind,
    pub pos: Vec2,
}

impl PowerUp {
    pub fn contains(&self, point: IVec2) -> bool {
        let p = Vec2::new(point.x as f32, point.y as f32);
        (p.x - self.pos.x).abs() <= POWERUP_SIZE / 2.0
            && (p.y - self.pos.y).abs() <= POWERUP_SIZE / 2.0
    }
}

/// An active timed effect
#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub duration_ms: f32,
    pub remaining_ms: f32,
}

impl Effect {
    pub fn remaining_fraction(&self) -> f32 {
        (self.remaining_ms / self.duration_ms).max(0.0)
    }
}

/// Owns falling collectibles and active effects
#[derive(Debug, Default)]
pub struct PowerUpEngine {
    pub collectibles: Vec<PowerUp>,
    pub effects: Vec<Effect>,
    spawn_timer_ms: f32,
    next_id: u32,
}

impl PowerUpEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance timers, cull off-screen collectibles, and spawn new ones.
    /// Returns the kinds whose effects expired this tick so the round can
    /// revert their side effects (e.g. unfreezing ducks).
    pub fn update(&mut self, dt: f32, rng: &mut Pcg32) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            effect.remaining_ms -= dt * 1000.0;
            if effect.remaining_ms <= 0.0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining_ms > 0.0);

        for p in &mut self.collectibles {
            p.pos.y += POWERUP_FALL_SPEED * dt;
        }
        self.collectibles
            .retain(|p| p.pos.y - POWERUP_SIZE / 2.0 <= SCREEN_H);

        self.spawn_timer_ms += dt * 1000.0;
        if self.spawn_timer_ms >= POWERUP_SPAWN_INTERVAL_MS {
            self.spawn_timer_ms = 0.0;
            if rng.random::<f32>() < POWERUP_SPAWN_CHANCE {
                self.spawn(rng);
            }
        }

        expired
    }

    fn spawn(&mut self, rng: &mut Pcg32) {
        let kind = EffectKind::ALL[rng.random_range(0..EffectKind::ALL.len())];
        let x = rng.random_range(50.0..SCREEN_W - 50.0);
        self.next_id += 1;
        self.collectibles.push(PowerUp {
            id: self.next_id,
            kind,
            pos: Vec2::new(x, -POWERUP_SIZE),
        });
        log::debug!("power-up spawned: {kind:?}");
    }

    /// Collect the first collectible under `point`, if any, and apply its
    /// effect. Returns the collected kind.
    pub fn try_collect(&mut self, point: IVec2) -> Option<EffectKind> {
        let idx = self.collectibles.iter().position(|p| p.contains(point))?;
        let kind = self.collectibles.remove(idx).kind;
        self.apply(kind);
        Some(kind)
    }

    /// Start (or restart) an effect. Same-kind application replaces the
    /// remaining time with the full duration, it never stacks.
    pub fn apply(&mut self, kind: EffectKind) {
        self.effects.retain(|e| e.kind != kind);
        self.effects.push(Effect {
            kind,
            duration_ms: kind.duration_ms(),
            remaining_ms: kind.duration_ms(),
        });
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn multiplier(&self, kind: EffectKind) -> f32 {
        if self.has_effect(kind) {
            kind.multiplier()
        } else {
            1.0
        }
    }

    /// Frame-delta scale fed into duck updates (slow motion), not wall-clock
    pub fn time_scale(&self) -> f32 {
        self.multiplier(EffectKind::SlowMotion)
    }

    pub fn points_multiplier(&self) -> u32 {
        if self.has_effect(EffectKind::DoublePoints) {
            2
        } else {
            1
        }
    }

    pub fn reset(&mut self) {
        self.collectibles.clear();
        self.effects.clear();
        self.spawn_timer_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_duplicate_collection_resets_timer_not_stacks() {
        let mut engine = PowerUpEngine::new();
        let mut rng = Pcg32::seed_from_u64(7);

        engine.apply(EffectKind::DoublePoints);
        // Burn half the duration
        for _ in 0..((EffectKind::DoublePoints.duration_ms() / 2.0 / (SIM_DT * 1000.0)) as u32) {
            engine.update(SIM_DT, &mut rng);
        }
        let half = engine.effects[0].remaining_ms;
        assert!(half < EffectKind::DoublePoints.duration_ms());

        engine.apply(EffectKind::DoublePoints);
        assert_eq!(engine.effects.len(), 1);
        assert_eq!(
            engine.effects[0].remaining_ms,
            EffectKind::DoublePoints.duration_ms()
        );
    }

    #[test]
    fn test_different_kinds_stack_concurrently() {
        let mut engine = PowerUpEngine::new();
        engine.apply(EffectKind::SlowMotion);
        engine.apply(EffectKind::DoublePoints);
        assert!(engine.has_effect(EffectKind::SlowMotion));
        assert!(engine.has_effect(EffectKind::DoublePoints));
        assert_eq!(engine.time_scale(), 0.5);
        assert_eq!(engine.points_multiplier(), 2);
    }

    #[test]
    fn test_expiry_reports_kind_and_clears_effect() {
        let mut engine = PowerUpEngine::new();
        let mut rng = Pcg32::seed_from_u64(7);
        engine.apply(EffectKind::Freeze);

        let mut expired = Vec::new();
        let mut elapsed = 0.0;
        while expired.is_empty() && elapsed < 10.0 {
            expired = engine.update(SIM_DT, &mut rng);
            elapsed += SIM_DT;
        }
        assert_eq!(expired, vec![EffectKind::Freeze]);
        assert!(!engine.has_effect(EffectKind::Freeze));
    }

    #[test]
    fn test_collectibles_fall_and_cull_offscreen() {
        let mut engine = PowerUpEngine::new();
        let mut rng = Pcg32::seed_from_u64(7);
        engine.collectibles.push(PowerUp {
            id: 1,
            kind: EffectKind::Shield,
            pos: Vec2::new(100.0, SCREEN_H - 1.0),
        });
        for _ in 0..100 {
            engine.update(SIM_DT, &mut rng);
        }
        assert!(engine.collectibles.is_empty());
    }

    #[test]
    fn test_try_collect_hits_within_square() {
        let mut engine = PowerUpEngine::new();
        engine.collectibles.push(PowerUp {
            id: 1,
            kind: EffectKind::RapidFire,
            pos: Vec2::new(100.0, 100.0),
        });
        assert_eq!(engine.try_collect(IVec2::new(400, 400)), None);
        assert_eq!(
            engine.try_collect(IVec2::new(110, 95)),
            Some(EffectKind::RapidFire)
        );
        assert!(engine.collectibles.is_empty());
        assert_eq!(engine.multiplier(EffectKind::RapidFire), 3.0);
    }
}
