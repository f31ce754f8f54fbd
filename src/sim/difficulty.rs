//! Adaptive difficulty controller
//!
//! Persisted across sessions. Feeds the starting duck AI level from a rolling
//! window of per-round performance scores; mutated exactly once per completed
//! round.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Cross-session difficulty state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveAi {
    pub ai_level: u8,
    pub games_played: u32,
    /// Last 10 per-round performance scores in [0, 1], oldest first
    pub performance_history: VecDeque<f32>,
}

impl Default for AdaptiveAi {
    fn default() -> Self {
        Self {
            ai_level: AI_LEVEL_MIN,
            games_played: 0,
            performance_history: VecDeque::new(),
        }
    }
}

impl AdaptiveAi {
    /// Scalar round performance: 0.5 accuracy + 0.3 volume + 0.2 pace.
    /// Zero shots score zero; untimed rounds contribute no pace term.
    pub fn performance_score(
        ducks_hit: u32,
        shots_fired: u32,
        elapsed_ms: f32,
        total_ms: f32,
    ) -> f32 {
        if shots_fired == 0 {
            return 0.0;
        }
        let accuracy = ducks_hit as f32 / shots_fired as f32;
        let volume = (ducks_hit as f32 / 10.0).min(1.0);
        let pace = if total_ms > 0.0 {
            (elapsed_ms / total_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };
        accuracy * 0.5 + volume * 0.3 + pace * 0.2
    }

    /// Fold one completed round into the history and adjust the level.
    /// History mean above 0.7 raises the level, below 0.3 lowers it; the
    /// level always stays within [1, 10].
    pub fn record_round(&mut self, score: f32) {
        self.games_played += 1;
        self.performance_history.push_back(score.clamp(0.0, 1.0));
        if self.performance_history.len() > PERFORMANCE_HISTORY_CAP {
            self.performance_history.pop_front();
        }

        let mean: f32 = self.performance_history.iter().sum::<f32>()
            / self.performance_history.len() as f32;
        let before = self.ai_level;
        if mean > 0.7 {
            self.ai_level = (self.ai_level + 1).min(AI_LEVEL_MAX);
        } else if mean < 0.3 {
            self.ai_level = self.ai_level.saturating_sub(1).max(AI_LEVEL_MIN);
        }
        if self.ai_level != before {
            log::info!(
                "AI level {} -> {} (mean performance {:.2})",
                before,
                self.ai_level,
                mean
            );
        }
    }
}
