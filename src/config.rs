//! Defaults file handling.
//! A `conseil.json`, `conseil.yml` or `conseil.yaml` file (or the file named by
//! `CONSEIL_CONFIG`) replaces the built-in defaults of the `new` options.
//! Flags given on the command line still win over the file.

use crate::constants::{CONFIG_ENV, CONFIG_FILES};
use crate::error::{Error, Result};
use crate::registry::OptionValue;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Option defaults read from a defaults file. Absent keys keep the built-in value.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub framework: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub driver: Option<String>,
    pub repo: Option<String>,
}

impl Settings {
    /// The configured default for the option `name`, if the file sets one.
    pub fn value_for(&self, name: &str) -> Option<OptionValue> {
        let text = |value: &Option<String>| value.clone().map(OptionValue::Str);
        match name {
            "framework" => text(&self.framework),
            "host" => text(&self.host),
            "port" => self.port.map(|port| OptionValue::Int(i64::from(port))),
            "driver" => text(&self.driver),
            "repo" => text(&self.repo),
            _ => None,
        }
    }
}

/// Finds the first defaults file present in `dir`.
pub fn find_config<P: AsRef<Path>>(dir: P, config_files: &[&str]) -> Option<PathBuf> {
    config_files.iter().map(|file| dir.as_ref().join(file)).find(|path| path.is_file())
}

/// Parses defaults file content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither, or has unknown keys
pub fn parse_settings(content: &str) -> Result<Settings> {
    match serde_json::from_str(content) {
        Ok(settings) => Ok(settings),
        Err(_) => serde_yaml::from_str::<Option<Settings>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Reads defaults from `path`.
pub fn read_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::ConfigError(format!(
            "Invalid configuration path: {}",
            path.display()
        )));
    }
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
    parse_settings(&content)
}

/// Loads defaults for a run started in `dir`.
///
/// An explicit path (normally the `CONSEIL_CONFIG` value) must exist;
/// otherwise the first of [`CONFIG_FILES`] found in `dir` is used, and
/// built-in defaults apply when there is none.
pub fn load_settings<P: AsRef<Path>>(dir: P, explicit: Option<PathBuf>) -> Result<Settings> {
    if let Some(path) = explicit {
        return read_settings(path);
    }
    match find_config(dir, &CONFIG_FILES) {
        Some(path) => read_settings(path),
        None => {
            debug!("No configuration file found (tried: {})", CONFIG_FILES.join(", "));
            Ok(Settings::default())
        }
    }
}

/// Loads defaults for the current process: `CONSEIL_CONFIG`, then the
/// current directory.
pub fn get_settings() -> Result<Settings> {
    let explicit = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from);
    let cwd = std::env::current_dir().map_err(|e| Error::filesystem(".", e))?;
    load_settings(cwd, explicit)
}
