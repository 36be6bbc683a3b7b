use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::StaleBandPolicy;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub equalizer: EqualizerConfig,
    #[serde(default)]
    pub spectrum: SpectrumConfig,
    #[serde(default)]
    pub levels: LevelsConfig,
}

/// Band layout and the gain range of the equalizer device
#[derive(Debug, Deserialize)]
pub struct EqualizerConfig {
    #[serde(default = "default_start_frequency")]
    pub start_frequency: f64,
    #[serde(default = "default_band_count")]
    pub band_count: usize,
    #[serde(default = "default_gain_min")]
    pub gain_min: f64,
    #[serde(default = "default_gain_max")]
    pub gain_max: f64,
}

/// Analyzer properties: bin count, noise floor, frame interval
#[derive(Debug, Deserialize)]
pub struct SpectrumConfig {
    #[serde(default = "default_bands")]
    pub bands: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_interval")]
    pub interval: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LevelsConfig {
    #[serde(default)]
    pub smoothing: f64,
    #[serde(default)]
    pub stale_bands: StaleBandPolicy,
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            start_frequency: default_start_frequency(),
            band_count: default_band_count(),
            gain_min: default_gain_min(),
            gain_max: default_gain_max(),
        }
    }
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            threshold: default_threshold(),
            interval: default_interval(),
        }
    }
}

fn default_start_frequency() -> f64 { 250.0 }
fn default_band_count() -> usize { 7 }
fn default_gain_min() -> f64 { -24.0 }
fn default_gain_max() -> f64 { 12.0 }
fn default_bands() -> usize { 128 }
fn default_threshold() -> f64 { -60.0 }
fn default_interval() -> f64 { 0.1 }

/// Explicit path first, then `bandscope.toml` in the working directory,
/// then the per-user config locations.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("bandscope.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("bandscope").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("bandscope").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid TOML in {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}
