//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, camera or platform dependencies

pub mod difficulty;
pub mod duck;
pub mod modes;
pub mod powerup;
pub mod round;

pub use difficulty::AdaptiveAi;
pub use duck::{AiMemory, AnimCursor, BehaviorState, Clip, Duck, Tier};
pub use modes::{ChallengeRule, GameMode, ModeConfig};
pub use powerup::{Effect, EffectKind, PowerUp, PowerUpEngine};
pub use round::{Phase, Round, RoundEvent, RoundSummary};
