//! Player statistics and leaderboards
//!
//! One [`GameSession`] is recorded per completed round; aggregates, bests and
//! per-mode leaderboards derive from that stream and persist as a single
//! snapshot.

use serde::{Deserialize, Serialize};

use crate::sim::{GameMode, RoundSummary};

/// Maximum leaderboard entries kept per mode
pub const MAX_LEADERBOARD_ENTRIES: usize = 100;

/// One completed round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub mode: GameMode,
    pub score: u32,
    pub ducks_hit: u32,
    pub shots_fired: u32,
    /// In [0, 100]
    pub accuracy_pct: f32,
    pub ai_level: u8,
    pub duration_ms: f32,
    /// Unix timestamp (seconds) when the round ended
    pub timestamp: u64,
}

impl GameSession {
    pub fn from_summary(summary: &RoundSummary, timestamp: u64) -> Self {
        Self {
            mode: summary.mode,
            score: summary.score,
            ducks_hit: summary.ducks_hit,
            shots_fired: summary.shots_fired,
            accuracy_pct: summary.accuracy_pct,
            ai_level: summary.ai_level,
            duration_ms: summary.elapsed_ms,
            timestamp,
        }
    }
}

/// Everything tracked across the player's lifetime
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub total_score: u64,
    pub total_ducks_hit: u32,
    pub total_shots_fired: u32,

    pub best_score: u32,
    pub best_accuracy_pct: f32,
    /// Consecutive rounds with at least one duck hit
    pub current_streak: u32,
    pub best_streak: u32,

    /// Rounds played per mode, parallel to [`GameMode::ALL`]
    pub mode_counts: [u32; 7],
    /// Per-mode leaderboards, parallel to [`GameMode::ALL`], each sorted
    /// descending by (score, accuracy)
    pub leaderboards: [Vec<GameSession>; 7],

    pub history: Vec<GameSession>,
}

fn mode_index(mode: GameMode) -> usize {
    GameMode::ALL
        .iter()
        .position(|&m| m == mode)
        .unwrap_or_default()
}

impl PlayerStats {
    /// Fold a finished round in. Returns the leaderboard rank achieved
    /// (1-indexed) when the session made the board.
    pub fn record(&mut self, session: GameSession) -> Option<usize> {
        self.games_played += 1;
        self.total_score += session.score as u64;
        self.total_ducks_hit += session.ducks_hit;
        self.total_shots_fired += session.shots_fired;
        self.best_score = self.best_score.max(session.score);
        self.best_accuracy_pct = self.best_accuracy_pct.max(session.accuracy_pct);

        if session.ducks_hit > 0 {
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }

        let idx = mode_index(session.mode);
        self.mode_counts[idx] += 1;
        let rank = Self::insert_ranked(&mut self.leaderboards[idx], session.clone());
        self.history.push(session);
        if let Some(rank) = rank {
            log::info!("leaderboard rank {rank}");
        }
        rank
    }

    fn insert_ranked(board: &mut Vec<GameSession>, session: GameSession) -> Option<usize> {
        if session.score == 0 {
            return None;
        }
        let pos = board
            .iter()
            .position(|e| {
                (session.score, session.accuracy_pct) > (e.score, e.accuracy_pct)
            })
            .unwrap_or(board.len());
        if pos >= MAX_LEADERBOARD_ENTRIES {
            return None;
        }
        board.insert(pos, session);
        board.truncate(MAX_LEADERBOARD_ENTRIES);
        Some(pos + 1)
    }

    /// Lifetime accuracy as a percentage in [0, 100]
    pub fn lifetime_accuracy_pct(&self) -> f32 {
        if self.total_shots_fired == 0 {
            0.0
        } else {
            self.total_ducks_hit as f32 / self.total_shots_fired as f32 * 100.0
        }
    }

    /// The most-played mode, ties broken by mode order
    pub fn favorite_mode(&self) -> Option<GameMode> {
        let (idx, &count) = self
            .mode_counts
            .iter()
            .enumerate()
            .max_by_key(|&(i, &c)| (c, std::cmp::Reverse(i)))?;
        if count == 0 {
            None
        } else {
            Some(GameMode::ALL[idx])
        }
    }

    pub fn leaderboard(&self, mode: GameMode) -> &[GameSession] {
        &self.leaderboards[mode_index(mode)]
    }
}
