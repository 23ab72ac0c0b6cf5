//! TOML configuration file loading
//!
//! The file is optional. An explicit `--config-file` must exist; otherwise the
//! default location is used only when present. Values from the file never
//! override flags given on the command line.

use std::path::{Path, PathBuf};

use super::args::{parse_format_name, parse_severity_name, Args};
use super::validation::{validate_concurrency_value, ValidationError};

/// `{config_dir}/Drydock/drydock.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Drydock").join("drydock.toml"))
}

/// Pick the config file to load, if any
pub fn resolve_config_path(config_file: Option<&Path>) -> Result<Option<PathBuf>, ValidationError> {
    match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(ValidationError::new(&format!(
                    "The specified configuration file does not exist: {}",
                    path.display()
                )));
            }
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(default_config_path().filter(|path| path.exists())),
    }
}

impl Args {
    /// Merge the config file (explicit or default) into these arguments.
    ///
    /// Returns the path that was loaded, if any.
    pub fn load_config_file(&mut self) -> Result<Option<PathBuf>, ValidationError> {
        let Some(path) = resolve_config_path(self.config_file.as_deref())? else {
            return Ok(None);
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            ValidationError::new(&format!(
                "Error reading configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = toml::from_str::<toml::Table>(&contents).map_err(|e| {
            ValidationError::new(&format!(
                "Error parsing configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        self.apply_toml_values(&config).map_err(|e| {
            ValidationError::new(&format!(
                "Error in configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(path))
    }

    /// Apply TOML values to every setting not already given on the command line
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ValidationError> {
        fill_string(config, "project", &mut self.project)?;
        fill_string(config, "location", &mut self.location)?;
        fill_string(config, "log_level", &mut self.log_level)?;
        fill_string(config, "log_format", &mut self.log_format)?;

        if self.min_severity.is_none() {
            if let Some(name) = get_str(config, "min_severity")? {
                self.min_severity =
                    Some(parse_severity_name(name).map_err(|e| ValidationError::new(&e))?);
            }
        }

        if self.output_format.is_none() {
            if let Some(name) = get_str(config, "output_format")? {
                self.output_format =
                    Some(parse_format_name(name).map_err(|e| ValidationError::new(&e))?);
            }
        }

        if self.concurrency.is_none() {
            if let Some(value) = get_integer(config, "concurrency")? {
                self.concurrency = Some(validate_concurrency_value(value)?);
            }
        }

        if self.timeout.is_none() {
            if let Some(value) = get_integer(config, "timeout")? {
                if value <= 0 {
                    return Err(ValidationError::new(&format!(
                        "'timeout' must be a positive number of seconds, got {}",
                        value
                    )));
                }
                self.timeout = Some(value as u64);
            }
        }

        // A flag can only turn this on, so the file applies when the flag is absent
        if !self.fixable {
            if let Some(value) = config.get("fixable_only") {
                self.fixable = value.as_bool().ok_or_else(|| {
                    ValidationError::new("'fixable_only' must be true or false")
                })?;
            }
        }

        if let Some(level) = self.log_level.as_deref() {
            if !["trace", "debug", "info", "warn", "error", "off"].contains(&level) {
                return Err(ValidationError::new(&format!(
                    "Invalid log_level '{}'",
                    level
                )));
            }
        }
        if let Some(format) = self.log_format.as_deref() {
            if !["text", "ext", "json"].contains(&format) {
                return Err(ValidationError::new(&format!(
                    "Invalid log_format '{}'",
                    format
                )));
            }
        }

        Ok(())
    }
}

fn get_str<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ValidationError::new(&format!("'{}' must be a string", key))),
    }
}

fn get_integer(config: &toml::Table, key: &str) -> Result<Option<i64>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| ValidationError::new(&format!("'{}' must be an integer", key))),
    }
}

fn fill_string(
    config: &toml::Table,
    key: &str,
    target: &mut Option<String>,
) -> Result<(), ValidationError> {
    if target.is_none() {
        *target = get_str(config, key)?.map(str::to_string);
    }
    Ok(())
}
