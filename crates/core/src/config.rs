//! Application configuration backed by `~/.config/hauler/config.toml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Directory under the user's config dir holding the config file and saves.
pub const CONFIG_DIR: &str = "hauler";
/// File name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Highest accepted difficulty; more would exhaust the planet name pool.
pub const MAX_DIFFICULTY: u32 = 10;

const DEFAULT_CONFIG: &str = r#"# Cargo Hauler configuration.
# Every key is optional; environment variables prefixed with HAULER_ override them.

# Universe size is 5 + 2 * difficulty planets.
difficulty = 2

# Directory containing commodities.json, quests.json, technologies.json and planets.json.
data_dir = "data"

# Credits the player starts a new game with.
starting_credits = 10000.0

# Delay per revealed character in the message log, in milliseconds. 0 disables the effect.
text_speed_ms = 15

# Uncomment to make universes and events reproducible.
# seed = 42

# Uncomment to keep saves somewhere other than the config directory.
# save_dir = "/path/to/saves"
"#;

/// Runtime settings for a game session and the front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Universe size knob; planet count is `5 + 2 * difficulty`.
    pub difficulty: u32,
    /// Location of the static content files.
    pub data_dir: PathBuf,
    /// Location of save files.
    pub save_dir: PathBuf,
    /// Credits granted to a fresh player.
    pub starting_credits: f64,
    /// Fixed RNG seed, when reproducible play is wanted.
    pub seed: Option<u64>,
    /// Typewriter delay per character in the message log.
    pub text_speed_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            data_dir: PathBuf::from("data"),
            save_dir: default_root().join("saves"),
            starting_credits: 10_000.0,
            seed: None,
            text_speed_ms: 15,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location plus `HAULER_*` overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from an explicit file (which may be absent).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("HAULER").separator("__"))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            bail!(
                "difficulty {} exceeds the maximum of {MAX_DIFFICULTY}",
                self.difficulty
            );
        }
        if !self.starting_credits.is_finite() || self.starting_credits < 0.0 {
            bail!(
                "starting_credits must be a non-negative number (got {})",
                self.starting_credits
            );
        }
        Ok(())
    }
}

/// Root directory for hauler files under the user's config directory.
pub fn default_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

/// Path of the configuration file.
pub fn config_path() -> PathBuf {
    default_root().join(CONFIG_FILE)
}

/// Write the commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_parses_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        write_default_config(path.clone())?;
        assert!(path.exists());

        let config = AppConfig::load_from(&path)?;
        let defaults = AppConfig::default();
        assert_eq!(config.difficulty, defaults.difficulty);
        assert_eq!(config.data_dir, defaults.data_dir);
        assert_eq!(config.starting_credits, defaults.starting_credits);
        assert_eq!(config.text_speed_ms, defaults.text_speed_ms);
        assert_eq!(config.seed, None);
        Ok(())
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.difficulty, 2);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "difficulty = 4\nseed = 7\nstarting_credits = 500.0\n")?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.difficulty, 4);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.starting_credits, 500.0);
        Ok(())
    }

    #[test]
    fn rejects_excessive_difficulty() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "difficulty = 40\n")?;
        assert!(AppConfig::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn existing_config_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "difficulty = 1\n")?;
        write_default_config(path.clone())?;
        assert_eq!(fs::read_to_string(&path)?, "difficulty = 1\n");
        Ok(())
    }
}
