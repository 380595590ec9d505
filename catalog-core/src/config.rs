use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "MEDIA_CATALOG_CONFIG";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MEDIA_CATALOG_DIR";

/// User configuration, stored as YAML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding the store files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl CatalogConfig {
    /// Loads the config from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// Loads the config, writing a default file first when none exists
    ///
    /// A default file that cannot be written is not fatal: the defaults are
    /// used for this run.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            if let Err(e) = Self::create_default(&path) {
                warn!("Could not create default config: {:#}", e);
                return Ok(Self::default());
            }
            debug!("Created default config at {:?}", path.as_ref());
        }
        Self::load(path)
    }

    /// Save the config to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&self)?;

        // Ensure parent directories exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Creates a default config file if it doesn't exist
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        if path.as_ref().exists() {
            return Ok(());
        }
        Self::default().save(path)
    }
}

/// Gets the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    // Default to ~/.media-catalog.config
    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

    Ok(home_dir.join(".media-catalog.config"))
}

/// Determines the data directory from the command line, the environment and
/// the config file, in that order; defaults to the current directory
pub fn determine_data_dir(cli_dir: Option<&Path>, config: &CatalogConfig) -> PathBuf {
    let env_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    choose_data_dir(cli_dir, env_dir, config)
}

fn choose_data_dir(
    cli_dir: Option<&Path>,
    env_dir: Option<PathBuf>,
    config: &CatalogConfig,
) -> PathBuf {
    cli_dir
        .map(Path::to_path_buf)
        .or(env_dir)
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Locations of every store file inside the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub authors: PathBuf,
    pub genres: PathBuf,
    pub labels: PathBuf,
    pub books: PathBuf,
    pub music_albums: PathBuf,
    pub games: PathBuf,
    pub movies: PathBuf,
}

impl StorePaths {
    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let dir = data_dir.as_ref();
        Self {
            authors: dir.join("authors.json"),
            genres: dir.join("genres.json"),
            labels: dir.join("labels.json"),
            books: dir.join("books.json"),
            music_albums: dir.join("music_albums.json"),
            games: dir.join("games.json"),
            movies: dir.join("movies.json"),
        }
    }
}
