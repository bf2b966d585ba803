use std::path::PathBuf;

use crate::game::constants::round;

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Score lead that ends the match (1-8)
    pub points_to_win: i32,
    /// Ships per team at even strength
    pub team_size: i32,
    /// Local player seats in use (0-2)
    pub human_players: u8,
    /// Use colorblind-friendly team markings in snapshots
    pub colorblind: bool,
    /// Directory for persisted control bindings
    pub config_dir: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            points_to_win: 3,
            team_size: round::TEAM_SIZE,
            human_players: 0,
            colorblind: false,
            config_dir: default_config_dir(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".pulsefire"),
        Err(_) => PathBuf::from(".pulsefire"),
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(points) = std::env::var("POINTS_TO_WIN") {
            if let Ok(parsed) = points.parse::<i32>() {
                if (1..=8).contains(&parsed) {
                    config.points_to_win = parsed;
                } else {
                    tracing::warn!("POINTS_TO_WIN must be 1-8, using default");
                }
            } else {
                tracing::warn!("Invalid POINTS_TO_WIN '{}', using default", points);
            }
        }

        if let Ok(size) = std::env::var("TEAM_SIZE") {
            if let Ok(parsed) = size.parse::<i32>() {
                if (1..=64).contains(&parsed) {
                    config.team_size = parsed;
                } else {
                    tracing::warn!("TEAM_SIZE must be 1-64, using default");
                }
            } else {
                tracing::warn!("Invalid TEAM_SIZE '{}', using default", size);
            }
        }

        if let Ok(players) = std::env::var("HUMAN_PLAYERS") {
            if let Ok(parsed) = players.parse::<u8>() {
                if parsed <= 2 {
                    config.human_players = parsed;
                } else {
                    tracing::warn!("HUMAN_PLAYERS must be 0-2, using default");
                }
            } else {
                tracing::warn!("Invalid HUMAN_PLAYERS '{}', using default", players);
            }
        }

        if let Ok(colorblind) = std::env::var("COLORBLIND") {
            match colorblind.as_str() {
                "1" | "true" => config.colorblind = true,
                "0" | "false" => config.colorblind = false,
                other => tracing::warn!("Invalid COLORBLIND '{}', using default", other),
            }
        }

        if let Ok(dir) = std::env::var("CONFIG_DIR") {
            config.config_dir = PathBuf::from(dir);
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=8).contains(&self.points_to_win) {
            return Err("points_to_win must be 1-8".to_string());
        }
        if self.team_size < 1 {
            return Err("team_size must be at least 1".to_string());
        }
        if self.human_players > 2 {
            return Err("human_players cannot exceed 2".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.points_to_win, 3);
        assert_eq!(config.team_size, round::TEAM_SIZE);
        assert_eq!(config.human_players, 0);
        assert!(!config.colorblind);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SimConfig::default();
        config.points_to_win = 0;
        assert!(config.validate().is_err());
        config.points_to_win = 3;
        config.team_size = 0;
        assert!(config.validate().is_err());
    }
}
