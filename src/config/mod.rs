mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Default config locations, searched in order.
const DEFAULT_PATHS: [&str; 2] = ["./qtfaststart.toml", "~/.config/qtfaststart/config.toml"];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Render the effective configuration as TOML
pub fn to_toml(config: &Config) -> Result<String> {
    toml::to_string(config).context("Failed to serialize config")
}
