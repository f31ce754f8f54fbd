//! Runtime configuration
//!
//! Everything a player might reasonably tune per machine: camera selection,
//! skin thresholds, data locations. Gameplay constants stay in
//! [`crate::consts`]; they are balance, not configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gesture::SkinRange;
use crate::persistence;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OS camera device index
    pub camera_index: u32,
    pub camera_width: u32,
    pub camera_height: u32,
    /// Disable to run mouse-only
    pub gesture_enabled: bool,
    /// HSV window for skin segmentation; lighting-dependent
    pub skin_range: SkinRange,
    /// Directory for saved snapshots (stats, achievements, AI state)
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            camera_width: crate::consts::CAMERA_W,
            camera_height: crate::consts::CAMERA_H,
            gesture_enabled: true,
            skin_range: SkinRange::default(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Config {
    /// Load from a JSON file, writing defaults there on first run
    pub fn load(path: &Path) -> Self {
        persistence::load_or_init(path)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join("stats.json")
    }

    pub fn achievements_path(&self) -> PathBuf {
        self.data_dir.join("achievements.json")
    }

    pub fn ai_path(&self) -> PathBuf {
        self.data_dir.join("ai_state.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"camera_index": 2}"#).unwrap();
        assert_eq!(config.camera_index, 2);
        assert!(config.gesture_enabled);
        assert_eq!(config.camera_width, crate::consts::CAMERA_W);
    }

    #[test]
    fn test_data_paths_share_the_data_dir() {
        let config = Config::default();
        assert_eq!(config.stats_path(), PathBuf::from("data/stats.json"));
        assert_eq!(config.ai_path(), PathBuf::from("data/ai_state.json"));
    }
}
