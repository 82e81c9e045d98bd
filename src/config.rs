//! Settings resolution
//!
//! Three layers, highest wins: CLI flags (with clap env-var fallbacks),
//! then an optional YAML config file, then built-in defaults.

use clap::ValueEnum;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Log verbosity accepted by `--log-level` and the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[value(rename_all = "UPPER")]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Map to a tracing level. CRITICAL collapses into ERROR; tracing has
    /// no fifth severity above it.
    pub fn as_tracing_level(self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error | LogLevel::Critical => Level::ERROR,
        }
    }
}

/// Cloud provider as requested on the command line. `auto` is resolved to
/// a concrete provider before any check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[value(rename_all = "lower")]
#[serde(rename_all = "lowercase")]
pub enum ProviderArg {
    Auto,
    Azure,
}

/// Optional config file contents. Every key is optional; missing keys fall
/// through to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub log_level: Option<LogLevel>,
    pub kube_config: Option<PathBuf>,
    pub cloud_provider: Option<ProviderArg>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_level: LogLevel,
    pub kube_config: Option<PathBuf>,
    pub cloud_provider: ProviderArg,
}

impl Settings {
    pub fn resolve(
        log_level: Option<LogLevel>,
        kube_config: Option<PathBuf>,
        cloud_provider: Option<ProviderArg>,
        file: FileConfig,
    ) -> Settings {
        Settings {
            log_level: log_level.or(file.log_level).unwrap_or(LogLevel::Info),
            kube_config: kube_config.or(file.kube_config),
            cloud_provider: cloud_provider
                .or(file.cloud_provider)
                .unwrap_or(ProviderArg::Auto),
        }
    }
}

/// Load the config file layer.
///
/// With an explicit `--config` path a missing or unparseable file is an
/// error. Without one, the default locations are tried in order and an
/// absent file simply yields the empty layer.
pub fn load_file(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_paths().into_iter().find(|p| p.exists()),
    };
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };

    let raw = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))
}

/// Default config file locations, tried in order: home directory, current
/// directory, then system-wide.
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs_next::home_dir() {
        paths.push(home.join(".xks-preflight.yaml"));
    }
    paths.push(PathBuf::from("xks-preflight.yaml"));
    paths.push(PathBuf::from("/etc/xks-preflight.yaml"));
    paths
}
