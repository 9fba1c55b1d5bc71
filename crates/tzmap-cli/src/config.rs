//! Pipeline settings for a `tzmap` run.
//!
//! Settings come from a single TOML file with a `[pipeline]` table. A
//! file given with `--config` must exist; otherwise the first of
//! `./tzmap/config.toml` and the per-user config directory that holds a
//! `config.toml` is used, and built-in defaults apply when neither does.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tzmap::{TzmapError, config::AppConfig};

/// File name looked up in each discovery directory.
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid pipeline settings in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Settings file given with --config does not exist: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TzmapError {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::MissingFile(_) => io::ErrorKind::NotFound,
            ConfigError::Parse { .. } => io::ErrorKind::InvalidData,
        };
        TzmapError::Io(io::Error::new(kind, err.to_string()))
    }
}

/// Directories searched, in order, when no `--config` path is given.
pub fn discovery_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new("tzmap").join(CONFIG_FILE_NAME)];
    match ProjectDirs::from("com", "tzmap", "tzmap") {
        Some(dirs) => paths.push(dirs.config_dir().join(CONFIG_FILE_NAME)),
        None => debug!("No per-user config directory on this platform"),
    }
    paths
}

/// Resolves the pipeline settings for this run.
///
/// # Errors
///
/// Returns [`TzmapError::Io`] if `explicit_path` does not exist or if the
/// chosen file is not valid pipeline TOML.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TzmapError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        return read_settings(path);
    }

    match discovery_paths().into_iter().find(|path| path.exists()) {
        Some(path) => read_settings(&path),
        None => {
            debug!("No settings file found, using built-in pipeline defaults");
            Ok(AppConfig::default())
        }
    }
}

fn read_settings(path: &Path) -> Result<AppConfig, TzmapError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let pipeline = config.pipeline();
    info!(
        path = path.display().to_string(),
        boundary_marker = pipeline.boundary_marker(),
        prune_incomplete_representations = pipeline.prune_incomplete_representations(),
        public_cloud_fallback = pipeline.public_cloud_fallback();
        "Pipeline settings loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[pipeline]\nboundary_marker = \"Zone\"\npublic_cloud_fallback = true"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.pipeline().boundary_marker(), "Zone");
        assert!(config.pipeline().public_cloud_fallback());
        assert!(config.pipeline().prune_incomplete_representations());
    }

    #[test]
    fn test_missing_explicit_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(dir.path().join("absent.toml")));
        assert!(matches!(
            result,
            Err(TzmapError::Io(ref err)) if err.kind() == io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn test_invalid_toml_is_invalid_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline\n").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(TzmapError::Io(ref err)) if err.kind() == io::ErrorKind::InvalidData
        ));
    }

    #[test]
    fn test_local_directory_is_searched_first() {
        let paths = discovery_paths();
        assert_eq!(paths[0], Path::new("tzmap").join("config.toml"));
        assert!(paths.iter().all(|path| path.ends_with(CONFIG_FILE_NAME)));
    }
}
