//! Configuration module for the video organizer tool
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\video_organizer_tool\config.toml
//! - Linux/macOS: ~/.config/video_organizer_tool/config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "video_organizer_tool";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the standard configuration directory for the application.
///
/// Returns:
/// - Windows: %APPDATA%\video_organizer_tool
/// - Linux/macOS: ~/.config/video_organizer_tool
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
///
/// Creates the directory and all parent directories if they don't exist.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// Creates the config directory and copies the default config template.
/// Returns the path to the config file.
pub fn init_config() -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        let default_config = Config::generate_default_config();
        fs::write(&config_path, default_config)
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Open the configuration file in the default application.
pub fn open_config_in_editor() -> Result<PathBuf, ConfigError> {
    // Ensure config exists first
    let config_path = init_config()?;

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", config_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Collection settings
    pub collection: CollectionConfig,

    /// Catalog settings
    pub catalog: CatalogConfig,

    /// Hashing settings
    pub hashing: HashingConfig,

    /// Duplicate detection settings
    pub duplicates: DuplicatesConfig,

    /// Rename settings
    pub rename: RenameConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Root directory of the video collection
    pub root: PathBuf,

    /// File extensions considered video files (lowercase, without dot)
    pub include_extensions: Vec<String>,

    /// Scan the collection root recursively (include subdirectories)
    pub recursive: bool,

    /// Whether to follow symbolic links while scanning
    pub follow_symlinks: bool,

    /// Name of the persisted hash index file, stored in the collection root
    pub index_filename: String,
}

/// Catalog configuration
///
/// The catalog document is supplied by an external collaborator (e.g. a
/// downloader or a manual copy); this tool only ever reads the local path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the catalog document (JSON)
    pub path: PathBuf,
}

/// Hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Number of parallel hashing workers (minimum 1)
    pub workers: usize,

    /// Compute perceptual hashes in addition to content hashes
    pub perceptual_enabled: bool,

    /// Seconds between sampled frames for perceptual hashing
    pub frame_interval_secs: f64,
}

/// Duplicate detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicatesConfig {
    /// Maximum bit-distance between perceptual fingerprints for two files
    /// to be considered duplicates (strictly-less-than comparison)
    pub distance_threshold: u32,
}

/// Rename configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Ask for confirmation before renaming files
    pub confirm: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include_extensions: default_video_extensions(),
            recursive: true,
            follow_symlinks: false,
            index_filename: ".video_index.json".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./catalog.json"),
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            perceptual_enabled: true,
            frame_interval_secs: 0.5,
        }
    }
}

impl Default for DuplicatesConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 8,
        }
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self { confirm: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./video_organizer.log"),
        }
    }
}

/// Default set of file extensions treated as video files
fn default_video_extensions() -> Vec<String> {
    ["mp4", "mkv", "avi", "mov", "flv", "wmv", "webm", "m4v"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./config.toml (current directory - for development/override)
    /// 2. ./video_organizer.toml (current directory - alternative name)
    /// 3. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./video_organizer.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return Self::load(path);
            }
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Get the path where the config file is (or would be) located.
    ///
    /// Returns the first existing config file path, or the standard location if none exists.
    pub fn get_active_config_path() -> PathBuf {
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./video_organizer.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return path.clone();
            }
        }

        get_config_path().unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Save configuration to a TOML file
    #[allow(dead_code)]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    /// This uses the example config file to ensure it stays up to date
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }

    /// Full path of the persisted hash index document
    pub fn index_path(&self) -> PathBuf {
        self.collection.root.join(&self.collection.index_filename)
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// Failed to open config file in editor
    OpenError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::OpenError(path, err) => {
                write!(
                    f,
                    "Failed to open config file '{}': {}",
                    path.display(),
                    err
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.collection.root, PathBuf::from("."));
        assert_eq!(config.collection.index_filename, ".video_index.json");
        assert!(config.collection.recursive);
        assert!(config.collection.include_extensions.contains(&"mkv".to_string()));
        assert_eq!(config.hashing.workers, 4);
        assert!(config.hashing.perceptual_enabled);
        assert_eq!(config.duplicates.distance_threshold, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        // Only a few keys set; everything else falls back to defaults
        fs::write(
            &path,
            r#"
[collection]
root = "/videos"

[hashing]
workers = 8
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.collection.root, PathBuf::from("/videos"));
        assert_eq!(config.collection.index_filename, ".video_index.json");
        assert_eq!(config.hashing.workers, 8);
        assert!((config.hashing.frame_interval_secs - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_config() {
        let result = Config::load("/nonexistent/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "this is { not valid toml").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_, _))));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.collection.root = PathBuf::from("/data/videos");
        config.duplicates.distance_threshold = 12;
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.collection.root, PathBuf::from("/data/videos"));
        assert_eq!(reloaded.duplicates.distance_threshold, 12);
    }

    #[test]
    fn test_index_path() {
        let mut config = Config::default();
        config.collection.root = PathBuf::from("/videos");
        assert_eq!(
            config.index_path(),
            PathBuf::from("/videos/.video_index.json")
        );
    }
}
