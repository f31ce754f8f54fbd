//! Duck entity and AI behavior state machine
//!
//! Each duck owns its behavior state, personality traits, and a small memory
//! of recent cursor observations. All randomness comes from the round's seeded
//! RNG so duck behavior is reproducible tick-for-tick.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::clamp_to_playfield;
use crate::consts::*;

/// Duck color category. Determines base point value and spawn weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low,
    Mid,
    High,
}

impl Tier {
    pub fn base_points(self) -> u32 {
        match self {
            Tier::Low => 25,
            Tier::Mid => 50,
            Tier::High => 75,
        }
    }

    /// Weighted draw: 50% low, 30% mid, 20% high
    pub fn draw(rng: &mut Pcg32) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.5 {
            Tier::Low
        } else if roll < 0.8 {
            Tier::Mid
        } else {
            Tier::High
        }
    }
}

/// AI movement modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Normal,
    Evasive,
    Aggressive,
    Patrol,
    Hunting,
    Retreating,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 6] = [
        BehaviorState::Normal,
        BehaviorState::Evasive,
        BehaviorState::Aggressive,
        BehaviorState::Patrol,
        BehaviorState::Hunting,
        BehaviorState::Retreating,
    ];
}

/// Named animation clips the asset provider serves frames for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    FlyRight,
    FlyLeft,
    Die,
}

impl Clip {
    pub fn frame_count(self) -> usize {
        ANIM_CLIP_FRAMES
    }

    pub fn name(self) -> &'static str {
        match self {
            Clip::FlyRight => "fly_right",
            Clip::FlyLeft => "fly_left",
            Clip::Die => "die",
        }
    }
}

/// Animation playback cursor. Loops while flying, holds the last frame while
/// dying.
#[derive(Debug, Clone)]
pub struct AnimCursor {
    pub clip: Clip,
    pub frame: usize,
    timer: f32,
}

impl AnimCursor {
    fn new(clip: Clip) -> Self {
        Self {
            clip,
            frame: 0,
            timer: 0.0,
        }
    }

    fn set_clip(&mut self, clip: Clip) {
        if self.clip != clip {
            self.clip = clip;
            self.frame = 0;
            self.timer = 0.0;
        }
    }

    fn advance(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer < ANIM_FRAME_SECS {
            return;
        }
        self.timer = 0.0;
        let last = self.clip.frame_count() - 1;
        if self.clip == Clip::Die {
            self.frame = (self.frame + 1).min(last);
        } else {
            self.frame = (self.frame + 1) % self.clip.frame_count();
        }
    }
}

/// Bounded per-duck memory of what the player has been doing
#[derive(Debug, Clone, Default)]
pub struct AiMemory {
    /// Recent cursor positions, newest last (cap 10)
    pub cursor_history: VecDeque<Vec2>,
    /// Cursor positions this duck successfully evaded from (cap 5)
    pub successful_evasions: VecDeque<Vec2>,
    /// Where the cursor was when this duck got hit
    pub last_hit_position: Option<IVec2>,
    /// Estimated cursor speed (px/s) from the last two samples
    pub cursor_speed: f32,
    /// Player accuracy observed by the round, in [0, 1]
    pub observed_accuracy: f32,
}

const CURSOR_HISTORY_CAP: usize = 10;
const EVASION_MEMORY_CAP: usize = 5;

impl AiMemory {
    fn record_cursor(&mut self, pos: Vec2, dt: f32) {
        if let Some(&prev) = self.cursor_history.back() {
            if dt > 0.0 {
                self.cursor_speed = prev.distance(pos) / dt;
            }
        }
        self.cursor_history.push_back(pos);
        if self.cursor_history.len() > CURSOR_HISTORY_CAP {
            self.cursor_history.pop_front();
        }
    }

    fn record_evasion(&mut self, cursor: Vec2) {
        self.successful_evasions.push_back(cursor);
        if self.successful_evasions.len() > EVASION_MEMORY_CAP {
            self.successful_evasions.pop_front();
        }
    }

    /// Linear cursor extrapolation from the last three samples, or None if
    /// there is not enough history yet.
    fn predict_cursor(&self, horizon_secs: f32) -> Option<Vec2> {
        if self.cursor_history.len() < 3 {
            return None;
        }
        let n = self.cursor_history.len();
        let last = self.cursor_history[n - 1];
        let third_last = self.cursor_history[n - 3];
        let vel = (last - third_last) / 2.0;
        Some(clamp_to_playfield(last + vel * horizon_secs))
    }
}

/// A duck entity
#[derive(Debug, Clone)]
pub struct Duck {
    pub id: u32,
    pub tier: Tier,
    pub ai_level: u8,
    pub points: u32,
    /// Remaining hits before the duck dies (Boss Rush ducks take several)
    pub hp: u8,

    /// Center position
    pub pos: Vec2,
    /// Horizontal heading, -1.0 or 1.0
    pub direction: f32,
    pub speed: f32,
    pub vertical_speed: f32,
    frozen: bool,

    pub alive: bool,
    pub dying: bool,
    die_timer_ms: f32,

    pub behavior: BehaviorState,
    state_timer_ms: f32,
    state_duration_ms: f32,
    /// Current threat assessment in [0, 1]
    pub threat: f32,
    evasion_cooldown_ms: f32,
    waypoints: Vec<Vec2>,

    /// Personality, fixed at spawn
    pub courage: f32,
    pub intelligence: f32,
    pub agility: f32,

    pub memory: AiMemory,
    pub anim: AnimCursor,
}

impl Duck {
    pub fn spawn(id: u32, tier: Tier, ai_level: u8, hp: u8, rng: &mut Pcg32) -> Self {
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let x = if direction > 0.0 {
            -DUCK_W / 2.0
        } else {
            SCREEN_W + DUCK_W / 2.0
        };
        let y = rng.random_range(50.0..SCREEN_H / 2.0);
        Self {
            id,
            tier,
            ai_level,
            points: tier.base_points() + DUCK_POINTS_PER_LEVEL * ai_level as u32,
            hp,
            pos: Vec2::new(x, y),
            direction,
            speed: DUCK_BASE_SPEED + DUCK_SPEED_PER_LEVEL * ai_level as f32,
            vertical_speed: rng.random_range(-40.0..40.0),
            frozen: false,
            alive: true,
            dying: false,
            die_timer_ms: 0.0,
            behavior: BehaviorState::Normal,
            state_timer_ms: 0.0,
            state_duration_ms: rng.random_range(STATE_DURATION_MIN_MS..STATE_DURATION_MAX_MS),
            threat: 0.0,
            evasion_cooldown_ms: 0.0,
            waypoints: Vec::new(),
            courage: rng.random_range(0.3..0.8),
            intelligence: rng.random_range(0.5..1.0),
            agility: rng.random_range(0.6..1.0),
            memory: AiMemory::default(),
            anim: AnimCursor::new(if direction > 0.0 {
                Clip::FlyRight
            } else {
                Clip::FlyLeft
            }),
        }
    }

    /// Advance the duck by one tick. `cursor` is the current aim point and
    /// `accuracy` the round's running hit rate in [0, 1].
    pub fn update(&mut self, cursor: IVec2, accuracy: f32, dt: f32, rng: &mut Pcg32) {
        if self.alive && !self.frozen {
            self.update_behavior(cursor, accuracy, dt, rng);
        } else if self.dying {
            self.update_dying(dt);
        }
        self.anim.advance(dt);
    }

    fn update_behavior(&mut self, cursor: IVec2, accuracy: f32, dt: f32, rng: &mut Pcg32) {
        let cursor_f = Vec2::new(cursor.x as f32, cursor.y as f32);

        self.state_timer_ms += dt * 1000.0;
        self.evasion_cooldown_ms = (self.evasion_cooldown_ms - dt * 1000.0).max(0.0);

        self.memory.observed_accuracy = accuracy;
        self.memory.record_cursor(cursor_f, dt);
        self.assess_threat(cursor_f);

        if self.state_timer_ms > self.state_duration_ms {
            self.change_state(rng);
        }

        match self.behavior {
            BehaviorState::Normal => self.normal_behavior(rng),
            BehaviorState::Evasive => self.evasive_behavior(cursor_f, dt),
            BehaviorState::Aggressive => self.aggressive_behavior(cursor_f, dt),
            BehaviorState::Patrol => self.patrol_behavior(dt, rng),
            BehaviorState::Hunting => self.hunting_behavior(dt),
            BehaviorState::Retreating => self.retreating_behavior(dt),
        }

        // Uniform integration and edge bounce, applied for every state
        self.pos.x += self.direction * self.speed * dt;
        self.pos.y += self.vertical_speed * dt;
        self.handle_bounds();
    }

    /// Weighted combination of proximity, observed accuracy, and cursor speed
    fn assess_threat(&mut self, cursor: Vec2) {
        let distance = self.pos.distance(cursor);
        let distance_threat = (1.0 - distance / 300.0).max(0.0);
        let accuracy_threat = self.memory.observed_accuracy.clamp(0.0, 1.0);
        let speed_threat = (self.memory.cursor_speed / 500.0).min(1.0);
        self.threat = distance_threat * 0.4 + accuracy_threat * 0.4 + speed_threat * 0.2;
    }

    fn change_state(&mut self, rng: &mut Pcg32) {
        let candidate = if self.threat > 0.7 && self.courage < 0.6 {
            BehaviorState::Evasive
        } else if self.threat < 0.3 && self.courage > 0.7 {
            BehaviorState::Aggressive
        } else if self.threat > 0.5 {
            BehaviorState::Patrol
        } else {
            BehaviorState::ALL[rng.random_range(0..BehaviorState::ALL.len())]
        };

        // Never re-enter the current state: re-roll among the other five
        let next = if candidate == self.behavior {
            let others: Vec<BehaviorState> = BehaviorState::ALL
                .into_iter()
                .filter(|&s| s != self.behavior)
                .collect();
            others[rng.random_range(0..others.len())]
        } else {
            candidate
        };

        self.behavior = next;
        self.state_timer_ms = 0.0;
        self.state_duration_ms = rng.random_range(STATE_DURATION_MIN_MS..STATE_DURATION_MAX_MS);
    }

    fn normal_behavior(&mut self, rng: &mut Pcg32) {
        // Occasional vertical drift
        if rng.random::<f32>() < 0.01 {
            self.vertical_speed += rng.random_range(-20.0..20.0);
            self.vertical_speed = self.vertical_speed.clamp(-60.0, 60.0);
        }
    }

    fn evasive_behavior(&mut self, cursor: Vec2, dt: f32) {
        if self.evasion_cooldown_ms > 0.0 {
            return;
        }
        let away = self.pos - cursor;
        let distance = away.length();
        if distance <= 0.0 {
            return;
        }
        let escape = away / distance * self.speed * 1.5;
        self.pos += escape * dt;
        self.direction = if escape.x > 0.0 { 1.0 } else { -1.0 };
        self.evasion_cooldown_ms = EVASION_COOLDOWN_MS;
        self.memory.record_evasion(cursor);
    }

    fn aggressive_behavior(&mut self, cursor: Vec2, dt: f32) {
        if self.courage <= 0.6 {
            return;
        }
        let dx = cursor.x - self.pos.x;
        let dy = cursor.y - self.pos.y;
        if dx.abs() > 20.0 {
            self.direction = if dx > 0.0 { 1.0 } else { -1.0 };
            self.pos.x += self.direction * self.speed * 0.8 * dt;
        }
        if dy.abs() > 20.0 {
            self.vertical_speed = if dy > 0.0 { 40.0 } else { -40.0 };
        }
    }

    fn patrol_behavior(&mut self, dt: f32, rng: &mut Pcg32) {
        if self.waypoints.is_empty() {
            let count = rng.random_range(3..=6);
            for _ in 0..count {
                self.waypoints.push(Vec2::new(
                    rng.random_range(100.0..540.0),
                    rng.random_range(50.0..300.0),
                ));
            }
        }
        let target = self.waypoints[0];
        let dx = target.x - self.pos.x;
        let dy = target.y - self.pos.y;
        if dx.abs() > 10.0 {
            self.direction = if dx > 0.0 { 1.0 } else { -1.0 };
            self.pos.x += self.direction * self.speed * 0.6 * dt;
        }
        if dy.abs() > 10.0 {
            self.vertical_speed = if dy > 0.0 { 30.0 } else { -30.0 };
        }
        if dx.abs() < 20.0 && dy.abs() < 20.0 {
            self.waypoints.remove(0);
        }
    }

    fn hunting_behavior(&mut self, dt: f32) {
        let Some(predicted) = self.memory.predict_cursor(PREDICTION_HORIZON_SECS) else {
            return;
        };
        let dx = predicted.x - self.pos.x;
        let dy = predicted.y - self.pos.y;
        if dx.abs() > 15.0 {
            self.direction = if dx > 0.0 { 1.0 } else { -1.0 };
            self.pos.x += self.direction * self.speed * 0.7 * dt;
        }
        if dy.abs() > 15.0 {
            self.vertical_speed = if dy > 0.0 { 35.0 } else { -35.0 };
        }
    }

    fn retreating_behavior(&mut self, dt: f32) {
        // Head for whichever screen half is farther away, climbing
        self.direction = if self.pos.x < SCREEN_W / 2.0 { 1.0 } else { -1.0 };
        self.pos.x += self.direction * self.speed * 1.2 * dt;
        self.vertical_speed = -50.0;
    }

    fn handle_bounds(&mut self) {
        let half_w = DUCK_W / 2.0;
        let half_h = DUCK_H / 2.0;
        if self.pos.x < -half_w || self.pos.x > SCREEN_W + half_w {
            self.direction = -self.direction;
            self.pos.x = self.pos.x.clamp(-half_w, SCREEN_W + half_w);
        }
        if self.pos.y - half_h < 0.0 || self.pos.y + half_h > SCREEN_H {
            self.vertical_speed = -self.vertical_speed;
            self.pos.y = self.pos.y.clamp(half_h, SCREEN_H - half_h);
        }
        self.anim.set_clip(if self.direction > 0.0 {
            Clip::FlyRight
        } else {
            Clip::FlyLeft
        });
    }

    fn update_dying(&mut self, dt: f32) {
        self.die_timer_ms += dt * 1000.0;
        self.anim.set_clip(Clip::Die);
        self.pos.y += DUCK_FALL_SPEED * dt;
    }

    /// Dead ducks despawn once the death animation ran out or they fell past
    /// the bottom edge, whichever happens first.
    pub fn finished(&self) -> bool {
        self.dying && (self.die_timer_ms > DUCK_DIE_DURATION_MS || self.pos.y - DUCK_H / 2.0 > SCREEN_H)
    }

    /// Register a hit at `cursor`. Returns true when this hit killed the duck.
    /// A no-op on ducks that are already dying or dead.
    pub fn hit(&mut self, cursor: IVec2) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = self.hp.saturating_sub(1);
        if self.hp > 0 {
            return false;
        }
        self.alive = false;
        self.dying = true;
        self.die_timer_ms = 0.0;
        self.speed = 0.0;
        self.memory.last_hit_position = Some(cursor);
        true
    }

    /// Zero all motion. Idempotent: freezing a frozen duck changes nothing.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        self.speed = 0.0;
        self.vertical_speed = 0.0;
    }

    /// Restore speed to the base-plus-level-bonus formula, never to whatever
    /// value happened to exist before freezing.
    pub fn unfreeze(&mut self, rng: &mut Pcg32) {
        if !self.frozen {
            return;
        }
        self.frozen = false;
        self.speed = DUCK_BASE_SPEED + DUCK_SPEED_PER_LEVEL * self.ai_level as f32;
        self.vertical_speed = rng.random_range(-40.0..40.0);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Point-in-hitbox test against the duck's bounding rectangle
    pub fn contains(&self, point: IVec2) -> bool {
        let p = Vec2::new(point.x as f32, point.y as f32);
        (p.x - self.pos.x).abs() <= DUCK_W / 2.0 && (p.y - self.pos.y).abs() <= DUCK_H / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn spawn_duck(rng: &mut Pcg32) -> Duck {
        Duck::spawn(1, Tier::Mid, 3, 1, rng)
    }

    #[test]
    fn test_spawn_speed_and_points_scale_with_level() {
        let mut rng = test_rng();
        let duck = Duck::spawn(1, Tier::Mid, 3, 1, &mut rng);
        assert_eq!(duck.points, 50 + 3 * DUCK_POINTS_PER_LEVEL);
        assert!((duck.speed - (DUCK_BASE_SPEED + 3.0 * DUCK_SPEED_PER_LEVEL)).abs() < f32::EPSILON);
        assert!(duck.courage >= 0.3 && duck.courage < 0.8);
    }

    #[test]
    fn test_hit_while_dying_is_noop() {
        let mut rng = test_rng();
        let mut duck = spawn_duck(&mut rng);
        assert!(duck.hit(IVec2::new(10, 10)));
        assert!(!duck.alive);
        assert!(duck.dying);

        // Second hit must change nothing and award nothing
        assert!(!duck.hit(IVec2::new(10, 10)));
        assert!(!duck.alive);
        assert!(duck.dying);
    }

    #[test]
    fn test_hit_records_cursor_position() {
        let mut rng = test_rng();
        let mut duck = spawn_duck(&mut rng);
        duck.hit(IVec2::new(123, 45));
        assert_eq!(duck.memory.last_hit_position, Some(IVec2::new(123, 45)));
        assert_eq!(duck.speed, 0.0);
    }

    #[test]
    fn test_boss_duck_requires_multiple_hits() {
        let mut rng = test_rng();
        let mut duck = Duck::spawn(1, Tier::High, 5, 3, &mut rng);
        assert!(!duck.hit(IVec2::ZERO));
        assert!(duck.alive);
        assert!(!duck.hit(IVec2::ZERO));
        assert!(duck.alive);
        assert!(duck.hit(IVec2::ZERO));
        assert!(!duck.alive);
    }

    #[test]
    fn test_freeze_is_idempotent_and_unfreeze_restores_formula() {
        let mut rng = test_rng();
        let mut duck = spawn_duck(&mut rng);
        duck.freeze();
        assert_eq!(duck.speed, 0.0);
        duck.freeze(); // no-op
        assert_eq!(duck.speed, 0.0);

        duck.unfreeze(&mut rng);
        let expected = DUCK_BASE_SPEED + DUCK_SPEED_PER_LEVEL * duck.ai_level as f32;
        assert!((duck.speed - expected).abs() < f32::EPSILON);
        assert!(duck.vertical_speed >= -40.0 && duck.vertical_speed <= 40.0);
    }

    #[test]
    fn test_evasive_cooldown_suppresses_escape_vector() {
        let mut rng = test_rng();
        let mut duck = spawn_duck(&mut rng);
        duck.pos = Vec2::new(320.0, 240.0);
        duck.behavior = BehaviorState::Evasive;
        duck.vertical_speed = 0.0;

        let cursor = Vec2::new(310.0, 240.0);

        // First evasion fires and sets the cooldown
        let before = duck.pos;
        duck.evasive_behavior(cursor, SIM_DT);
        assert!(duck.pos.distance(before) > 0.0);
        assert!(duck.evasion_cooldown_ms > 0.0);
        assert_eq!(duck.memory.successful_evasions.len(), 1);

        // With the cooldown armed, the escape vector is not recomputed
        let before = duck.pos;
        duck.evasive_behavior(cursor, SIM_DT);
        assert_eq!(duck.pos, before);
        assert_eq!(duck.memory.successful_evasions.len(), 1);
    }

    #[test]
    fn test_bounce_applies_in_every_state() {
        let mut rng = test_rng();
        for state in BehaviorState::ALL {
            let mut duck = spawn_duck(&mut rng);
            duck.behavior = state;
            duck.state_timer_ms = 0.0;
            duck.state_duration_ms = f32::MAX; // pin the state
            duck.pos = Vec2::new(320.0, 5.0);
            duck.vertical_speed = -60.0;
            duck.update(IVec2::new(320, 400), 0.0, SIM_DT, &mut rng);
            assert!(
                duck.vertical_speed > 0.0 || duck.pos.y >= DUCK_H / 2.0,
                "state {state:?} skipped the bounce step"
            );
        }
    }

    #[test]
    fn test_state_change_never_self_transitions() {
        let mut rng = test_rng();
        for _ in 0..200 {
            let mut duck = spawn_duck(&mut rng);
            duck.threat = rng.random();
            let before = duck.behavior;
            duck.change_state(&mut rng);
            assert_ne!(duck.behavior, before);
        }
    }

    #[test]
    fn test_cursor_memory_is_bounded() {
        let mut memory = AiMemory::default();
        for i in 0..50 {
            memory.record_cursor(Vec2::new(i as f32, 0.0), SIM_DT);
        }
        assert_eq!(memory.cursor_history.len(), 10);
        // Speed estimate comes from the last two samples: 1 px per tick
        assert!((memory.cursor_speed - 1.0 / SIM_DT).abs() < 0.01);
    }

    #[test]
    fn test_hunting_prediction_clamped_to_playfield() {
        let mut memory = AiMemory::default();
        memory.record_cursor(Vec2::new(600.0, 100.0), SIM_DT);
        memory.record_cursor(Vec2::new(620.0, 100.0), SIM_DT);
        memory.record_cursor(Vec2::new(640.0, 100.0), SIM_DT);
        let predicted = memory.predict_cursor(PREDICTION_HORIZON_SECS).unwrap();
        assert!(predicted.x <= SCREEN_W);
    }

    #[test]
    fn test_dying_duck_despawns_after_duration_or_floor() {
        let mut rng = test_rng();
        let mut duck = spawn_duck(&mut rng);
        duck.pos = Vec2::new(320.0, 240.0);
        duck.hit(IVec2::new(320, 240));
        assert!(!duck.finished());

        // Falls and times out
        let mut elapsed = 0.0;
        while !duck.finished() && elapsed < 5.0 {
            duck.update(IVec2::ZERO, 0.0, SIM_DT, &mut rng);
            elapsed += SIM_DT;
        }
        assert!(duck.finished());
        assert_eq!(duck.anim.clip, Clip::Die);
    }

    #[test]
    fn test_die_clip_holds_last_frame() {
        let mut anim = AnimCursor::new(Clip::Die);
        for _ in 0..100 {
            anim.advance(SIM_DT);
        }
        assert_eq!(anim.frame, Clip::Die.frame_count() - 1);
    }
}
