use std::env;
use std::path::PathBuf;

/// Fixed key under which the roadmap collection is persisted.
pub const ROADMAPS_KEY: &str = "jalan.roadmaps";

/// Fixed key under which the active roadmap id is persisted.
pub const ACTIVE_ROADMAP_KEY: &str = "jalan.active_roadmap";

/// Fixed key under which the signed-in user identity is persisted.
pub const USER_KEY: &str = "jalan.user";

/// Storage configuration.
///
/// Reads from the `JALAN_DATA_PATH` environment variable, falling back to a
/// `jalan/storage.json` file under the platform data directory.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the single-file JSON key-value store.
    pub data_path: PathBuf,
}

impl StorageConfig {
    /// File name used under the default data directory.
    pub const DEFAULT_FILE: &str = "storage.json";

    /// Build a config from the environment.
    ///
    /// Priority: `JALAN_DATA_PATH` env var, then the platform default.
    pub fn from_env() -> Self {
        let data_path = env::var("JALAN_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self { data_path }
    }

    /// Build a config from an explicit path (useful for tests).
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jalan")
            .join(Self::DEFAULT_FILE)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
