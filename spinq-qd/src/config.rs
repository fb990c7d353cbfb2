//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority, env fallbacks handled by clap)
//! 2. TOML config file (`~/.config/spinq/config.toml`, then `/etc/spinq/config.toml`)
//! 3. Compiled default

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Maximum track duration accepted anywhere in the pipeline.
///
/// One authoritative threshold: metadata resolution and preload validation
/// both enforce this same value.
pub const DEFAULT_MAX_TRACK_SECONDS: u64 = 10_950;

/// Progress report cadence while a track is playing.
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u64 = 2;

/// Resolved daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache directory for `<id>.track` payloads and `<id>.complete` markers
    pub music_dir: PathBuf,

    /// Queue snapshot path
    pub state_file: PathBuf,

    /// Base URL of the media provider service
    pub provider_url: String,

    /// Maximum accepted track duration
    pub max_track_seconds: u64,

    /// Progress reporter tick interval
    pub progress_interval_secs: u64,

    /// Start with autoplay fallback enabled
    pub autoplay: bool,
}

/// Values supplied on the command line (or via environment, through clap)
#[derive(Debug, Default)]
pub struct Overrides {
    pub music_dir: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub provider_url: Option<String>,
    pub max_track_seconds: Option<u64>,
    pub autoplay: Option<bool>,
}

/// On-disk TOML config file shape; every key optional
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigFile {
    music_dir: Option<PathBuf>,
    state_file: Option<PathBuf>,
    provider_url: Option<String>,
    max_track_seconds: Option<u64>,
    progress_interval_secs: Option<u64>,
    autoplay: Option<bool>,
}

impl Config {
    /// Resolve the full configuration from overrides, config file, and defaults.
    pub fn resolve(overrides: Overrides) -> Result<Config> {
        let file = match find_config_file() {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("could not read {}: {}", path.display(), e))
                })?;
                toml::from_str::<ConfigFile>(&content).map_err(|e| {
                    Error::Config(format!("could not parse {}: {}", path.display(), e))
                })?
            }
            None => ConfigFile::default(),
        };

        Ok(Self::from_sources(overrides, file))
    }

    /// Merge priority: overrides > config file > compiled default.
    pub(crate) fn from_sources(overrides: Overrides, file: ConfigFile) -> Config {
        let data_dir = default_data_dir();

        Config {
            music_dir: overrides
                .music_dir
                .or(file.music_dir)
                .unwrap_or_else(|| data_dir.join("music")),
            state_file: overrides
                .state_file
                .or(file.state_file)
                .unwrap_or_else(|| data_dir.join("data.json")),
            provider_url: overrides
                .provider_url
                .or(file.provider_url)
                .unwrap_or_else(|| "http://127.0.0.1:9280".to_string()),
            max_track_seconds: overrides
                .max_track_seconds
                .or(file.max_track_seconds)
                .unwrap_or(DEFAULT_MAX_TRACK_SECONDS),
            progress_interval_secs: file
                .progress_interval_secs
                .unwrap_or(DEFAULT_PROGRESS_INTERVAL_SECS),
            autoplay: overrides.autoplay.or(file.autoplay).unwrap_or(false),
        }
    }
}

/// Locate the config file for the platform, if one exists.
fn find_config_file() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("spinq").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/spinq/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("spinq"))
        .unwrap_or_else(|| PathBuf::from("./spinq_data"))
}
