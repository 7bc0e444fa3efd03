//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where textures are searched for.
    pub input: InputConfig,
    /// Where and how atlases are written.
    pub output: OutputConfig,
    /// Image repair settings.
    pub processing: ProcessingConfig,
    /// Logging settings.
    pub debug: DebugConfig,
}

/// Input discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Texture directories, searched in order. Earlier ones win duplicates.
    pub directories: Vec<PathBuf>,
    /// Resolve legacy texture names as well as current ones.
    pub alternate_names: bool,
    /// Directory names never descended into.
    pub skip_directories: Vec<String>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the atlases are written to.
    pub directory: PathBuf,
    /// Atlas file stem; `_n`, `_m`, `_e` and `_r` are appended per channel.
    pub name: String,
    /// Forced tile size in pixels (power of two). `None` uses the largest input.
    pub tile_size: Option<u32>,
    /// Existing color atlas to start from.
    pub base_image: Option<PathBuf>,
}

/// Image processing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Frame taken from animation strips (0-based). `None` takes the first.
    pub chosen_frame: Option<u32>,
    /// Slope scale for height fields converted to normal maps.
    pub height_slope_scale: f32,
    /// Renormalize normal maps.
    pub clean_normals: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Report every placed file.
    pub verbose: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            alternate_names: true,
            skip_directories: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            name: "terrainExt".to_string(),
            tile_size: None,
            base_image: None,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chosen_frame: None,
            height_slope_scale: 0.5,
            clean_normals: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Validate ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })?;
        Ok(())
    }

    /// Checks values serde cannot rule out.
    ///
    /// Tile size rules belong to the atlas builder and are not checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.directories.is_empty() {
            return Err(ConfigError::Invalid {
                field: "input.directories",
                reason: "no input directory given".to_string(),
            });
        }
        if self.output.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.name",
                reason: "must not be empty".to_string(),
            });
        }
        let slope = self.processing.height_slope_scale;
        if !slope.is_finite() || slope <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "processing.height_slope_scale",
                reason: format!("{slope} is not a positive number"),
            });
        }
        Ok(())
    }
}
