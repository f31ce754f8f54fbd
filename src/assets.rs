//! Asset provider seam
//!
//! The simulation names sprites and sounds; how they are produced is the
//! frontend's business. The placeholder implementation keeps the core
//! runnable headless and in tests.

use crate::sim::{Clip, Tier};

/// Sound effect triggers raised by round events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Shot,
    DuckHit,
    PowerUpCollect,
    GameOver,
}

/// A reference to one animation frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrame {
    /// e.g. "duck_mid/fly_left_1"
    pub key: String,
    pub width: u32,
    pub height: u32,
}

pub trait AssetProvider {
    /// Frame `index` of a duck clip; index is taken modulo the clip length
    fn duck_frame(&self, tier: Tier, clip: Clip, index: usize) -> SpriteFrame;
    fn play(&self, sound: Sound);
}

fn tier_key(tier: Tier) -> &'static str {
    match tier {
        Tier::Low => "duck_low",
        Tier::Mid => "duck_mid",
        Tier::High => "duck_high",
    }
}

/// Flat-colored stand-in sprites and logged sound cues
#[derive(Debug, Default)]
pub struct PlaceholderAssets;

impl AssetProvider for PlaceholderAssets {
    fn duck_frame(&self, tier: Tier, clip: Clip, index: usize) -> SpriteFrame {
        let frame = index % clip.frame_count();
        SpriteFrame {
            key: format!("{}/{}_{frame}", tier_key(tier), clip.name()),
            width: crate::consts::DUCK_W as u32,
            height: crate::consts::DUCK_H as u32,
        }
    }

    fn play(&self, sound: Sound) {
        log::trace!("sound: {sound:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_keys_are_stable_and_wrap() {
        let assets = PlaceholderAssets;
        let a = assets.duck_frame(Tier::Mid, Clip::FlyLeft, 1);
        assert_eq!(a.key, "duck_mid/fly_left_1");
        // Index wraps modulo the clip length
        let b = assets.duck_frame(Tier::Mid, Clip::FlyLeft, 1 + Clip::FlyLeft.frame_count());
        assert_eq!(a, b);
    }
}
