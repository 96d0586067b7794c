//! Validation of fully merged settings

use std::path::Path;

use crate::error::{Result, ResultExt, TfdepsError};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return the first problem found
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.scan_path.is_dir() {
            return Err(TfdepsError::InvalidPath {
                path: settings.scan_path.clone(),
            });
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        }

        if settings.max_depth == Some(0) {
            return Err(TfdepsError::config_error("Max depth must be at least 1"));
        }

        if settings.orchestration_file_name.is_empty() {
            return Err(TfdepsError::config_error(
                "Orchestration file name must not be empty",
            ));
        }

        if settings.module_extension.is_empty() {
            return Err(TfdepsError::config_error("Module extension must not be empty"));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that the directory an output file goes into exists
    fn validate_output_path(path: &Path) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        // A bare file name lands in the current directory
        if parent.as_os_str().is_empty() {
            return Ok(());
        }

        if !parent.is_dir() {
            return Err(TfdepsError::OutputDirectoryNotFound {
                path: parent.to_path_buf(),
            });
        }

        let metadata = std::fs::metadata(parent).with_file_context(parent)?;
        if metadata.permissions().readonly() {
            return Err(TfdepsError::permission_denied(parent));
        }

        Ok(())
    }
}
