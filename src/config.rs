/// Gameplay tuning.
///
/// Every constant the simulation reads lives in `GameConfig`.  Defaults are
/// the classic values; a TOML file may override any subset of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest broad-phase cell, in pixels.
pub const MIN_CELL_SIZE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f64,
    pub screen_height: f64,

    pub player_width: f64,
    pub player_height: f64,
    /// Horizontal pixels per frame while a direction is held.
    pub player_speed: f64,
    /// Distance from the player's top edge to the bottom of the screen.
    pub player_bottom_margin: f64,

    pub bullet_width: f64,
    pub bullet_height: f64,
    pub bullet_speed: f64,

    pub enemy_width: f64,
    pub enemy_height: f64,
    /// Slowest enemy descent, pixels per frame.
    pub enemy_speed: f64,
    /// Extra speed per random step.
    pub enemy_speed_step: f64,
    /// Number of distinct speeds; the increment is `k * enemy_speed_step`
    /// for `k` in `0..enemy_speed_steps`.
    pub enemy_speed_steps: u32,

    /// Frames between enemy spawns.
    pub spawn_every: u64,
    /// Minimum frames between two shots.
    pub shoot_cooldown: u64,

    pub starting_lives: i32,
    pub score_per_kill: u32,

    pub background_scroll_speed: f64,
    pub broadphase_cell_size: f64,
    pub tick_millis: u64,

    pub background_image: Option<PathBuf>,
    pub music_track: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 480.0,
            screen_height: 640.0,
            player_width: 32.0,
            player_height: 20.0,
            player_speed: 4.0,
            player_bottom_margin: 80.0,
            bullet_width: 4.0,
            bullet_height: 8.0,
            bullet_speed: 8.0,
            enemy_width: 28.0,
            enemy_height: 18.0,
            enemy_speed: 2.0,
            enemy_speed_step: 0.5,
            enemy_speed_steps: 3,
            spawn_every: 30,
            shoot_cooldown: 8,
            starting_lives: 5,
            score_per_kill: 10,
            background_scroll_speed: 1.0,
            broadphase_cell_size: 64.0,
            tick_millis: 16,
            background_image: Some(PathBuf::from("spacefield_a-000.png")),
            music_track: None,
        }
    }
}

impl GameConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("broadphase_cell_size", self.broadphase_cell_size),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let speeds = [
            ("player_speed", self.player_speed),
            ("bullet_speed", self.bullet_speed),
            ("enemy_speed", self.enemy_speed),
        ];
        for (name, value) in speeds {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.enemy_speed_step.is_finite() && self.enemy_speed_step >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "enemy_speed_step must be zero or more, got {}",
                self.enemy_speed_step
            )));
        }
        if self.broadphase_cell_size < MIN_CELL_SIZE {
            return Err(ConfigError::Invalid(format!(
                "broadphase_cell_size must be at least {MIN_CELL_SIZE}, got {}",
                self.broadphase_cell_size
            )));
        }
        if self.spawn_every == 0 {
            return Err(ConfigError::Invalid("spawn_every must be at least 1".into()));
        }
        if self.enemy_speed_steps == 0 {
            return Err(ConfigError::Invalid("enemy_speed_steps must be at least 1".into()));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::Invalid("tick_millis must be at least 1".into()));
        }
        // Spawn x is drawn from [0, screen_width - enemy_width), which must be non-empty.
        if self.enemy_width >= self.screen_width || self.player_width > self.screen_width {
            return Err(ConfigError::Invalid(
                "screen_width must exceed player_width and enemy_width".into(),
            ));
        }
        if self.starting_lives <= 0 {
            return Err(ConfigError::Invalid("starting_lives must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml("spawn_every = 12\nstarting_lives = 2\n").unwrap();
        assert_eq!(config.spawn_every, 12);
        assert_eq!(config.starting_lives, 2);
        assert_eq!(config.screen_width, 480.0);
        assert_eq!(config.shoot_cooldown, 8);
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let err = GameConfig::from_toml("spawn_every = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn enemy_wider_than_screen_is_rejected() {
        let err = GameConfig::from_toml("screen_width = 20.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn tiny_cell_size_is_rejected() {
        let err = GameConfig::from_toml("broadphase_cell_size = 0.0001\nspawn_every = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(GameConfig::from_toml("broadphase_cell_size = 1.0").is_ok());
    }

    #[test]
    fn non_positive_speeds_are_rejected() {
        for field in ["player_speed", "bullet_speed", "enemy_speed"] {
            for value in ["0.0", "-3.0", "nan", "inf"] {
                let err = GameConfig::from_toml(&format!("{field} = {value}")).unwrap_err();
                assert!(
                    matches!(err, ConfigError::Invalid(_)),
                    "{field} = {value} was accepted"
                );
            }
        }
    }

    #[test]
    fn negative_speed_step_is_rejected() {
        for value in ["-0.5", "nan", "inf"] {
            let err = GameConfig::from_toml(&format!("enemy_speed_step = {value}")).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{value} was accepted");
        }
        assert!(GameConfig::from_toml("enemy_speed_step = 0.0").is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GameConfig::from_toml("spawn_every = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load("/definitely/not/here/shooter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn round_trips_through_toml_file() {
        let mut config = GameConfig::default();
        config.score_per_kill = 25;
        config.music_track = Some(PathBuf::from("theme.ogg"));
        let path = std::env::temp_dir().join(format!("scroll_shooter_cfg_{}.toml", std::process::id()));
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
