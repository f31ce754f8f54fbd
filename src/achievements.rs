//! Achievement definitions and unlock tracking
//!
//! The definition table is fixed; only the unlock set persists. Checks run
//! once per completed round against the round's summary and the lifetime
//! stats, and an unlocked achievement never re-triggers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::RoundSummary;
use crate::stats::PlayerStats;

/// What an achievement measures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Round accuracy at or above this percentage (with at least one shot)
    RoundAccuracy(f32),
    /// Round score at or above this value
    RoundScore(u32),
    /// Ducks hit in a single round
    RoundDucks(u32),
    /// Finished a round at or above this AI level
    AiLevel(u8),
    /// Lifetime rounds played
    GamesPlayed(u32),
    /// Consecutive rounds with at least one hit
    Streak(u32),
    /// Round score reached within a time limit
    ScoreWithin { score: u32, within_ms: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct Definition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: Condition,
    /// Meta-score awarded on unlock
    pub points: u32,
}

/// Every achievement in the game
pub const DEFINITIONS: &[Definition] = &[
    Definition {
        id: "sharpshooter",
        name: "Sharpshooter",
        description: "Finish a round at 90% accuracy or better",
        condition: Condition::RoundAccuracy(90.0),
        points: 25,
    },
    Definition {
        id: "deadeye",
        name: "Deadeye",
        description: "Finish a round at 95% accuracy or better",
        condition: Condition::RoundAccuracy(95.0),
        points: 50,
    },
    Definition {
        id: "perfect_round",
        name: "Perfect Round",
        description: "Finish a round without a single miss",
        condition: Condition::RoundAccuracy(100.0),
        points: 100,
    },
    Definition {
        id: "point_collector",
        name: "Point Collector",
        description: "Score 1,000 points in one round",
        condition: Condition::RoundScore(1000),
        points: 25,
    },
    Definition {
        id: "high_roller",
        name: "High Roller",
        description: "Score 2,000 points in one round",
        condition: Condition::RoundScore(2000),
        points: 50,
    },
    Definition {
        id: "duck_tycoon",
        name: "Duck Tycoon",
        description: "Score 5,000 points in one round",
        condition: Condition::RoundScore(5000),
        points: 100,
    },
    Definition {
        id: "first_blood",
        name: "First Blood",
        description: "Hit your first duck",
        condition: Condition::RoundDucks(1),
        points: 10,
    },
    Definition {
        id: "flock_buster",
        name: "Flock Buster",
        description: "Hit 10 ducks in one round",
        condition: Condition::RoundDucks(10),
        points: 25,
    },
    Definition {
        id: "exterminator",
        name: "Exterminator",
        description: "Hit 20 ducks in one round",
        condition: Condition::RoundDucks(20),
        points: 50,
    },
    Definition {
        id: "worthy_opponent",
        name: "Worthy Opponent",
        description: "Finish a round at AI level 5",
        condition: Condition::AiLevel(5),
        points: 50,
    },
    Definition {
        id: "apex_predator",
        name: "Apex Predator",
        description: "Finish a round at AI level 10",
        condition: Condition::AiLevel(10),
        points: 100,
    },
    Definition {
        id: "regular",
        name: "Regular",
        description: "Play 10 rounds",
        condition: Condition::GamesPlayed(10),
        points: 25,
    },
    Definition {
        id: "veteran",
        name: "Veteran",
        description: "Play 50 rounds",
        condition: Condition::GamesPlayed(50),
        points: 75,
    },
    Definition {
        id: "on_a_roll",
        name: "On a Roll",
        description: "Hit at least one duck in 5 rounds in a row",
        condition: Condition::Streak(5),
        points: 50,
    },
    Definition {
        id: "quick_draw",
        name: "Quick Draw",
        description: "Score 500 points within the first 30 seconds",
        condition: Condition::ScoreWithin {
            score: 500,
            within_ms: 30_000.0,
        },
        points: 75,
    },
];

/// Persisted unlock state: achievement id to unlock timestamp (unix seconds)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Unlocks {
    pub unlocked: BTreeMap<String, u64>,
}

impl Unlocks {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains_key(id)
    }

    /// Check every definition against a finished round. Returns the
    /// definitions newly unlocked by it.
    pub fn check_round(
        &mut self,
        summary: &RoundSummary,
        stats: &PlayerStats,
        timestamp: u64,
    ) -> Vec<&'static Definition> {
        let mut newly = Vec::new();
        for def in DEFINITIONS {
            if self.is_unlocked(def.id) {
                continue;
            }
            let met = match def.condition {
                Condition::RoundAccuracy(pct) => {
                    summary.shots_fired > 0 && summary.accuracy_pct >= pct
                }
                Condition::RoundScore(score) => summary.score >= score,
                Condition::RoundDucks(n) => summary.ducks_hit >= n,
                Condition::AiLevel(level) => summary.ai_level >= level,
                Condition::GamesPlayed(n) => stats.games_played >= n,
                Condition::Streak(n) => stats.current_streak >= n,
                Condition::ScoreWithin { score, within_ms } => {
                    summary.score >= score && summary.elapsed_ms <= within_ms
                }
            };
            if met {
                self.unlocked.insert(def.id.to_string(), timestamp);
                log::info!("achievement unlocked: {}", def.name);
                newly.push(def);
            }
        }
        newly
    }

    /// Total meta-score across unlocked achievements
    pub fn total_points(&self) -> u32 {
        DEFINITIONS
            .iter()
            .filter(|d| self.is_unlocked(d.id))
            .map(|d| d.points)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameMode;

    fn summary(score: u32, hit: u32, fired: u32, ai_level: u8) -> RoundSummary {
        RoundSummary {
            mode: GameMode::Classic,
            score,
            ducks_hit: hit,
            shots_fired: fired,
            total_ducks_spawned: hit,
            accuracy_pct: if fired == 0 {
                0.0
            } else {
                hit as f32 / fired as f32 * 100.0
            },
            elapsed_ms: 60_000.0,
            duration_ms: 60_000.0,
            ai_level,
        }
    }

    #[test]
    fn test_definition_ids_are_unique() {
        let mut ids: Vec<&str> = DEFINITIONS.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DEFINITIONS.len());
    }

    #[test]
    fn test_perfect_round_unlocks_accuracy_tiers_together() {
        let mut unlocks = Unlocks::default();
        let stats = PlayerStats::default();
        let newly = unlocks.check_round(&summary(250, 5, 5, 1), &stats, 1000);
        let ids: Vec<&str> = newly.iter().map(|d| d.id).collect();
        assert!(ids.contains(&"sharpshooter"));
        assert!(ids.contains(&"deadeye"));
        assert!(ids.contains(&"perfect_round"));
        assert_eq!(unlocks.unlocked["perfect_round"], 1000);
    }

    #[test]
    fn test_zero_shot_round_is_not_perfect() {
        let mut unlocks = Unlocks::default();
        let stats = PlayerStats::default();
        let newly = unlocks.check_round(&summary(0, 0, 0, 1), &stats, 0);
        assert!(newly.is_empty());
    }

    #[test]
    fn test_unlocked_achievement_never_retriggers() {
        let mut unlocks = Unlocks::default();
        let stats = PlayerStats::default();
        let first = unlocks.check_round(&summary(50, 1, 1, 1), &stats, 100);
        assert!(first.iter().any(|d| d.id == "first_blood"));

        let again = unlocks.check_round(&summary(50, 1, 1, 1), &stats, 200);
        assert!(again.iter().all(|d| d.id != "first_blood"));
        // Original timestamp preserved
        assert_eq!(unlocks.unlocked["first_blood"], 100);
    }

    #[test]
    fn test_quick_draw_requires_both_score_and_pace() {
        let mut unlocks = Unlocks::default();
        let stats = PlayerStats::default();
        let mut fast = summary(600, 12, 12, 1);
        fast.elapsed_ms = 25_000.0;
        let newly = unlocks.check_round(&fast, &stats, 0);
        assert!(newly.iter().any(|d| d.id == "quick_draw"));

        let mut unlocks = Unlocks::default();
        let slow = summary(600, 12, 12, 1); // 60 s elapsed
        let newly = unlocks.check_round(&slow, &stats, 0);
        assert!(newly.iter().all(|d| d.id != "quick_draw"));
    }

    #[test]
    fn test_total_points_sums_unlocked_only() {
        let mut unlocks = Unlocks::default();
        assert_eq!(unlocks.total_points(), 0);
        let stats = PlayerStats::default();
        unlocks.check_round(&summary(50, 1, 1, 1), &stats, 0);
        // first_blood (10) + the three accuracy tiers (25 + 50 + 100)
        assert_eq!(unlocks.total_points(), 185);
    }

    #[test]
    fn test_lifetime_conditions_read_stats() {
        let mut unlocks = Unlocks::default();
        let mut stats = PlayerStats::default();
        stats.games_played = 10;
        stats.current_streak = 5;
        let newly = unlocks.check_round(&summary(0, 0, 3, 1), &stats, 0);
        let ids: Vec<&str> = newly.iter().map(|d| d.id).collect();
        assert!(ids.contains(&"regular"));
        assert!(ids.contains(&"on_a_roll"));
    }
}
