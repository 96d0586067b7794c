//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{Result, ResultExt, TfdepsError};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TfdepsError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| TfdepsError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings =
        toml::from_str(content).map_err(|e| TfdepsError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(scan_path) = &settings.scan_path {
        if scan_path.as_os_str().is_empty() {
            return Err(TfdepsError::config_error(format!(
                "Invalid empty scan_path in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(patterns) = &settings.exclude_patterns {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(TfdepsError::config_error(format!(
                    "Empty exclude pattern in config file: {}",
                    path.display()
                )));
            }

            glob::Pattern::new(pattern).with_context(|| {
                format!(
                    "Invalid exclude pattern '{}' in config file {}",
                    pattern,
                    path.display()
                )
            })?;
        }
    }

    if settings.max_depth == Some(0) {
        return Err(TfdepsError::config_error(format!(
            "Invalid max_depth 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(TfdepsError::config_error(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(name) = &settings.orchestration_file_name {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(TfdepsError::config_error(format!(
                "orchestration_file_name must be a bare file name in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(extension) = &settings.module_extension {
        if extension.trim_start_matches('.').is_empty() {
            return Err(TfdepsError::config_error(format!(
                "Invalid empty module_extension in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Candidate config file locations, in lookup order, relative to `dir`
fn default_config_locations(dir: &Path) -> Vec<PathBuf> {
    let mut locations = vec![dir.join(DEFAULT_CONFIG_FILE)];

    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }

    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("tfdeps").join("config.toml"));
    }

    locations
}

/// Find and load configuration from default locations
///
/// Lookup order: current directory, home directory, then the user config
/// directory (`$XDG_CONFIG_HOME/tfdeps/config.toml` on Linux).
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    let current_dir = std::env::current_dir()?;
    find_default_config_in(&current_dir)
}

/// Same as [`find_default_config`] with an explicit starting directory
pub fn find_default_config_in(dir: &Path) -> Result<Option<PartialSettings>> {
    for location in default_config_locations(dir) {
        if location.is_file() {
            tracing::debug!(path = %location.display(), "using config file");
            return Ok(Some(parse_config_file(location)?));
        }
    }

    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_file_context(parent)?;
        }
    }

    let default_config = include_str!("default_config.toml");

    fs::write(path, default_config).map_err(|e| TfdepsError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
