use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Environment variable that overrides the data file location
pub const DATA_FILE_ENV: &str = "TASKLOG_DATA_FILE";

const APP_DIR: &str = "tasklog";
const DATA_FILE_NAME: &str = "data.json";
const EXPORT_DIR: &str = "tasklog-exports";

/// Per-user application directory, e.g. ~/.local/share/tasklog
pub fn app_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine data directory")?;
    Ok(base.join(APP_DIR))
}

/// Resolve the data file: explicit path, then $TASKLOG_DATA_FILE, then the app directory
pub fn data_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(DATA_FILE_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(app_dir()?.join(DATA_FILE_NAME))
}

/// Directory exports are written to (Documents, falling back to home)
pub fn export_dir() -> Result<PathBuf> {
    let base = dirs::document_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine documents directory")?;
    Ok(base.join(EXPORT_DIR))
}

/// Create a directory (and parents) if it does not exist yet
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    // Create temp file in the same directory so the rename stays on one filesystem
    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Copy a file aside with a timestamp suffix, e.g. data.json -> data.bak.20240601_093000.json
pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("json");
    let backup_path = path.with_extension(format!("bak.{}.{}", timestamp, extension));

    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to backup file: {}", path.display()))?;

    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_file_explicit_wins() {
        let explicit = Path::new("/tmp/somewhere/tasks.json");
        assert_eq!(data_file(Some(explicit)).unwrap(), explicit);
    }

    #[test]
    fn test_app_dir_name() {
        let dir = app_dir().unwrap();
        assert!(dir.ends_with("tasklog"));
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "{}").unwrap();
        assert_eq!(fs::read_to_string(&test_file).unwrap(), "{}");

        // Overwrite replaces the whole file
        atomic_write(&test_file, "[1]").unwrap();
        assert_eq!(fs::read_to_string(&test_file).unwrap(), "[1]");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b").join("data.json");

        atomic_write(&nested, "{}").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_backup_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("data.json");

        atomic_write(&test_file, "not json").unwrap();
        let backup_path = backup_file(&test_file).unwrap();

        assert_ne!(backup_path, test_file);
        assert!(backup_path.to_string_lossy().ends_with(".json"));
        assert_eq!(fs::read_to_string(&backup_path).unwrap(), "not json");
    }
}
