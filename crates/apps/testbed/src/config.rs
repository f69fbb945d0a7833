//! Scene configuration loaded from TOML
//!
//! Every section is optional; missing values fall back to the stock game
//! settings.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use slope_physics::{PhysicsConfig, PlayerConfig, SnowboardConfig, TerrainConfig};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable naming the default config file
pub const CONFIG_ENV: &str = "SLOPE_CONFIG";

/// Complete testbed configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub snowboard: SnowboardConfig,
    pub terrain: TerrainConfig,
}

impl SimConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config named by `SLOPE_CONFIG`, or defaults when it is unset
    pub fn from_env() -> anyhow::Result<Self> {
        match env::var(CONFIG_ENV) {
            Ok(path) => Self::load(&PathBuf::from(path)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let physics = &self.physics;
        anyhow::ensure!(physics.gravity.is_finite(), "gravity must be finite");
        anyhow::ensure!(physics.timestep > 0.0, "timestep must be > 0");
        anyhow::ensure!(physics.friction >= 0.0, "friction must be >= 0");
        anyhow::ensure!(
            (0.0..=1.0).contains(&physics.restitution),
            "restitution must be within [0, 1]"
        );
        anyhow::ensure!(
            physics.max_velocity > physics.min_velocity,
            "max velocity must exceed min velocity"
        );
        anyhow::ensure!(self.player.mass > 0.0, "player mass must be > 0");
        anyhow::ensure!(self.snowboard.mass > 0.0, "snowboard mass must be > 0");
        anyhow::ensure!(
            self.terrain.width > 0.0 && self.terrain.depth > 0.0,
            "terrain extents must be > 0"
        );
        anyhow::ensure!(
            (0.0..90.0).contains(&self.terrain.slope_angle_degrees),
            "slope angle must be within [0, 90) degrees"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player.mass, 70.0);
        assert_eq!(config.terrain.width, 1000.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[terrain]\nslope_angle_degrees = 25.0\n\n[physics]\ngravity = 3.7").unwrap();

        let config = SimConfig::load(file.path()).unwrap();

        assert_eq!(config.terrain.slope_angle_degrees, 25.0);
        assert_eq!(config.terrain.depth, 1000.0);
        assert_eq!(config.physics.gravity, 3.7);
        assert_eq!(config.physics.friction, 0.8);
    }

    #[test]
    fn test_invalid_slope_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[terrain]\nslope_angle_degrees = 95.0").unwrap();

        let err = SimConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("slope angle"));
    }

    #[test]
    fn test_toml_round_trip_of_modified_config() {
        let mut config = SimConfig::default();
        config.snowboard.mass = 7.5;

        let parsed: SimConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
