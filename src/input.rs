//! Input unification
//!
//! Folds mouse state and the latest gesture classification into one action
//! set per tick. Mouse input is always authoritative and immediate; gestures
//! are confidence-gated, edge-triggered and rate-limited so a held hand pose
//! fires its action once rather than every tick.

use glam::IVec2;

use crate::consts::*;
use crate::gesture::{GestureLabel, GestureSample};

/// Everything the simulation reads from the player for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actions {
    pub quit: bool,
    pub start: bool,
    pub pause: bool,
    pub reset: bool,
    pub shoot: bool,
    pub cursor: IVec2,
}

/// Key events for one tick, already edge-triggered by the window layer
/// (escape quits, return starts, and the pause/reset bindings)
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub quit: bool,
    pub start: bool,
    pub pause: bool,
    pub reset: bool,
}

/// Mouse snapshot for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    /// Present when the pointer moved this tick
    pub pos: Option<IVec2>,
    pub clicked: bool,
}

/// Merges mouse and gesture streams into [`Actions`]
#[derive(Debug)]
pub struct InputUnifier {
    cursor: IVec2,
    gesture_cooldown_ms: f32,
    /// Label that fired last, for edge triggering
    armed: Option<GestureLabel>,
}

impl Default for InputUnifier {
    fn default() -> Self {
        Self::new()
    }
}

impl InputUnifier {
    pub fn new() -> Self {
        Self {
            cursor: IVec2::new(SCREEN_W as i32 / 2, SCREEN_H as i32 / 2),
            gesture_cooldown_ms: 0.0,
            armed: None,
        }
    }

    /// Produce this tick's action set. `gesture` is the most recent
    /// classification from the camera thread, if any. Keys and mouse are
    /// authoritative; gestures only add to them.
    pub fn unify(
        &mut self,
        keys: &KeyState,
        mouse: &MouseState,
        gesture: Option<&GestureSample>,
        dt: f32,
    ) -> Actions {
        self.gesture_cooldown_ms = (self.gesture_cooldown_ms - dt * 1000.0).max(0.0);

        let mut actions = Actions {
            quit: keys.quit,
            start: keys.start,
            pause: keys.pause,
            reset: keys.reset,
            ..Actions::default()
        };

        if let Some(sample) = gesture {
            self.apply_gesture(sample, &mut actions);
        } else {
            self.armed = None;
        }

        // Mouse wins: position overrides the gesture cursor and a click is
        // never subject to the gesture cooldown
        if let Some(pos) = mouse.pos {
            self.cursor = pos;
        }
        if mouse.clicked {
            actions.shoot = true;
        }

        actions.cursor = self.cursor;
        actions
    }

    fn apply_gesture(&mut self, sample: &GestureSample, actions: &mut Actions) {
        if sample.confidence >= GESTURE_MOVE_CONFIDENCE {
            if let Some(centroid) = sample.centroid {
                self.cursor = camera_to_screen(centroid);
            }
        }

        if sample.confidence < GESTURE_ACTION_CONFIDENCE {
            self.armed = None;
            return;
        }

        // Edge trigger: a held pose fires once, and only after the cooldown
        let rising = self.armed != Some(sample.label);
        self.armed = Some(sample.label);
        if !rising || self.gesture_cooldown_ms > 0.0 {
            return;
        }

        match sample.label {
            GestureLabel::ClosedFist => actions.shoot = true,
            GestureLabel::Pointing => actions.pause = true,
            GestureLabel::Peace => actions.reset = true,
            // Open hand moves the cursor only
            GestureLabel::OpenHand | GestureLabel::Unknown => return,
        }
        self.gesture_cooldown_ms = GESTURE_COOLDOWN_MS;
    }
}

/// Map a camera-space centroid onto the playfield, clamped to its bounds
fn camera_to_screen(centroid: IVec2) -> IVec2 {
    let x = centroid.x as f32 * SCREEN_W / CAMERA_W as f32;
    let y = centroid.y as f32 * SCREEN_H / CAMERA_H as f32;
    IVec2::new(
        (x as i32).clamp(0, SCREEN_W as i32),
        (y as i32).clamp(0, SCREEN_H as i32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: GestureLabel, confidence: f32) -> GestureSample {
        GestureSample {
            label,
            confidence,
            centroid: Some(IVec2::new(320, 240)),
        }
    }

    #[test]
    fn test_mouse_cursor_and_click_pass_through() {
        let mut unifier = InputUnifier::new();
        let mouse = MouseState {
            pos: Some(IVec2::new(123, 45)),
            clicked: true,
        };
        let actions = unifier.unify(&KeyState::default(), &mouse, None, SIM_DT);
        assert_eq!(actions.cursor, IVec2::new(123, 45));
        assert!(actions.shoot);
    }

    #[test]
    fn test_key_events_pass_through() {
        let mut unifier = InputUnifier::new();
        let keys = KeyState {
            quit: true,
            start: true,
            pause: false,
            reset: false,
        };
        let actions = unifier.unify(&keys, &MouseState::default(), None, SIM_DT);
        assert!(actions.quit && actions.start);
        assert!(!actions.pause && !actions.reset && !actions.shoot);
    }

    #[test]
    fn test_keys_combine_with_gesture_actions() {
        let mut unifier = InputUnifier::new();
        let keys = KeyState {
            pause: true,
            ..Default::default()
        };
        let fist = sample(GestureLabel::ClosedFist, 0.8);
        let actions = unifier.unify(&keys, &MouseState::default(), Some(&fist), SIM_DT);
        assert!(actions.pause && actions.shoot);
    }

    #[test]
    fn test_held_fist_fires_once() {
        let mut unifier = InputUnifier::new();
        let fist = sample(GestureLabel::ClosedFist, 0.8);

        let first = unifier.unify(&KeyState::default(), &MouseState::default(), Some(&fist), SIM_DT);
        assert!(first.shoot);

        // Held across subsequent ticks: no retrigger
        for _ in 0..10 {
            let held = unifier.unify(&KeyState::default(), &MouseState::default(), Some(&fist), SIM_DT);
            assert!(!held.shoot);
        }
    }

    #[test]
    fn test_gesture_cooldown_blocks_rapid_retrigger() {
        let mut unifier = InputUnifier::new();
        let fist = sample(GestureLabel::ClosedFist, 0.8);
        let open = sample(GestureLabel::OpenHand, 0.8);

        assert!(unifier.unify(&KeyState::default(), &MouseState::default(), Some(&fist), SIM_DT).shoot);
        // Release (open hand) then re-fist within the cooldown window
        unifier.unify(&KeyState::default(), &MouseState::default(), Some(&open), SIM_DT);
        let again = unifier.unify(&KeyState::default(), &MouseState::default(), Some(&fist), SIM_DT);
        assert!(!again.shoot);

        // After the cooldown elapses the same sequence fires
        for _ in 0..((GESTURE_COOLDOWN_MS / (SIM_DT * 1000.0)) as u32 + 1) {
            unifier.unify(&KeyState::default(), &MouseState::default(), Some(&open), SIM_DT);
        }
        let after = unifier.unify(&KeyState::default(), &MouseState::default(), Some(&fist), SIM_DT);
        assert!(after.shoot);
    }

    #[test]
    fn test_mouse_click_ignores_gesture_cooldown() {
        let mut unifier = InputUnifier::new();
        let fist = sample(GestureLabel::ClosedFist, 0.8);
        assert!(unifier.unify(&KeyState::default(), &MouseState::default(), Some(&fist), SIM_DT).shoot);

        let mouse = MouseState {
            pos: None,
            clicked: true,
        };
        let actions = unifier.unify(&KeyState::default(), &mouse, Some(&fist), SIM_DT);
        assert!(actions.shoot);
    }

    #[test]
    fn test_mid_confidence_moves_cursor_without_action() {
        let mut unifier = InputUnifier::new();
        let fist = sample(GestureLabel::ClosedFist, 0.4);
        let actions = unifier.unify(&KeyState::default(), &MouseState::default(), Some(&fist), SIM_DT);
        assert!(!actions.shoot);
        assert_eq!(actions.cursor, IVec2::new(320, 240));
    }

    #[test]
    fn test_low_confidence_is_ignored_entirely() {
        let mut unifier = InputUnifier::new();
        let before = unifier.cursor;
        let weak = sample(GestureLabel::OpenHand, 0.1);
        let actions = unifier.unify(&KeyState::default(), &MouseState::default(), Some(&weak), SIM_DT);
        assert!(!actions.shoot && !actions.pause && !actions.reset);
        assert_eq!(actions.cursor, before);
    }

    #[test]
    fn test_gesture_bindings() {
        let mut unifier = InputUnifier::new();
        let none = MouseState::default();

        let pause = unifier.unify(&KeyState::default(), &none, Some(&sample(GestureLabel::Pointing, 0.9)), SIM_DT);
        assert!(pause.pause && !pause.shoot && !pause.reset);

        let mut unifier = InputUnifier::new();
        let reset = unifier.unify(&KeyState::default(), &none, Some(&sample(GestureLabel::Peace, 0.9)), SIM_DT);
        assert!(reset.reset && !reset.shoot && !reset.pause);

        let mut unifier = InputUnifier::new();
        let open = unifier.unify(&KeyState::default(), &none, Some(&sample(GestureLabel::OpenHand, 0.9)), SIM_DT);
        assert!(!open.shoot && !open.pause && !open.reset);
    }

    #[test]
    fn test_camera_centroid_scales_and_clamps() {
        assert_eq!(
            camera_to_screen(IVec2::new(320, 240)),
            IVec2::new(320, 240)
        );
        let clamped = camera_to_screen(IVec2::new(10_000, -5));
        assert_eq!(clamped, IVec2::new(SCREEN_W as i32, 0));
    }
}
