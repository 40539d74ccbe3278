use super::files::{atomic_write, backup_file, data_file};
use crate::domain::{TaskTree, Timeline};
use crate::ui::theme::DEFAULT_THEME;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SCHEMA_VERSION: &str = "1.0.0";
pub const DEFAULT_DATE_FORMAT: &str = "January 2, 2006";
pub const DEFAULT_TIME_FORMAT: &str = "12h";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize data")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Write(#[from] anyhow::Error),

    #[error("could not determine a data directory")]
    NoDataDir,
}

/// User preferences stored alongside the data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: String,
    pub date_format: String,
    pub time_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_version: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            skipped_version: None,
        }
    }
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Everything persisted in the data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub tasks: TaskTree,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            version: default_version(),
            tasks: TaskTree::default(),
            timeline: Timeline::default(),
            settings: Settings::default(),
        }
    }
}

impl Schema {
    pub fn new(tasks: TaskTree, timeline: Timeline, settings: Settings) -> Self {
        Self {
            version: default_version(),
            tasks,
            timeline,
            settings,
        }
    }
}

/// Single JSON file holding the whole model
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the resolved data file location
    pub fn open(explicit: Option<&Path>) -> Result<Self, StoreError> {
        let path = data_file(explicit).map_err(|_| StoreError::NoDataDir)?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Schema, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()))
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Load, treating a missing or unreadable file as an empty model.
    /// A file that fails to parse is copied aside first so the next save can't lose it.
    pub fn load_or_default(&self) -> Schema {
        match self.load() {
            Ok(schema) => {
                info!("Loaded data from {}", self.path.display());
                schema
            }
            Err(StoreError::NotFound(path)) => {
                info!("No data file at {}, starting empty", path.display());
                Schema::default()
            }
            Err(StoreError::Parse { path, source }) => {
                warn!("Could not parse {}, starting empty: {}", path.display(), source);
                match backup_file(&path) {
                    Ok(backup) => warn!("Kept unreadable data file as {}", backup.display()),
                    Err(backup_err) => warn!("Could not back up unreadable data file: {:#}", backup_err),
                }
                Schema::default()
            }
            Err(err) => {
                warn!("{:#}, starting empty", anyhow::Error::from(err));
                Schema::default()
            }
        }
    }

    pub fn save(&self, schema: &Schema) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(schema).map_err(StoreError::Serialize)?;
        atomic_write(&self.path, &content)?;
        Ok(())
    }
}
