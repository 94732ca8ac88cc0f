//! Configuration stored in `ukmodulus.toml`, naming the table files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ukmodulus.toml";

/// Modulus checker configuration (TOML).
///
/// Missing fields default to the file names VocaLink publishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ModulusConfig {
    pub tables: TablesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TablesConfig {
    /// Weighting-rule table. Relative paths resolve against the config file's
    /// directory.
    pub rules_path: PathBuf,

    /// Sort-code substitution table, resolved like `rules_path`.
    pub substitutions_path: PathBuf,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("valacdos.txt"),
            substitutions_path: PathBuf::from("scsubtab.txt"),
        }
    }
}

impl ModulusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tables.rules_path.as_os_str().is_empty() {
            return Err(anyhow!("tables.rules_path must not be empty"));
        }
        if self.tables.substitutions_path.as_os_str().is_empty() {
            return Err(anyhow!("tables.substitutions_path must not be empty"));
        }
        Ok(())
    }

    /// Make relative table paths absolute against `base`.
    fn resolve_against(mut self, base: &Path) -> Self {
        for path in [
            &mut self.tables.rules_path,
            &mut self.tables.substitutions_path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ModulusConfig::default()`. Relative table
/// paths are resolved against the directory holding `path`.
pub fn load_config(path: &Path) -> Result<ModulusConfig> {
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    if !path.exists() {
        debug!(path = %path.display(), "config missing; using defaults");
        let cfg = ModulusConfig::default();
        cfg.validate()?;
        return Ok(cfg.resolve_against(base));
    }
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ModulusConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg.resolve_against(base))
}
