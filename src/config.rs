use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::encode::export::{DEFAULT_EXPORT_FORMAT, DEFAULT_EXPORT_RATE};
use crate::synth::separate::Stem;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub separation: SeparationConfig,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub semitones: i32,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SeparationConfig {
    #[serde(default = "default_stems")]
    pub stems: Vec<Stem>,
    #[serde(default)]
    pub archive: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            format: default_format(),
        }
    }
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            stems: default_stems(),
            archive: false,
        }
    }
}

/// `transform` options as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSettings {
    pub semitones: i32,
    pub seed: Option<u64>,
    pub sample_rate: u32,
    pub format: String,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            semitones: 0,
            seed: None,
            sample_rate: default_sample_rate(),
            format: default_format(),
        }
    }
}

/// `separate` options as given on the command line. No stems means all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparateSettings {
    pub stems: Vec<Stem>,
    pub archive: bool,
}

impl Config {
    /// Fill in every transform option still at its default from the config.
    pub fn merge_transform(&self, cli: TransformSettings) -> TransformSettings {
        let defaults = TransformSettings::default();
        TransformSettings {
            semitones: if cli.semitones == defaults.semitones { self.synthesis.semitones } else { cli.semitones },
            seed: cli.seed.or(self.synthesis.seed),
            sample_rate: if cli.sample_rate == defaults.sample_rate { self.export.sample_rate } else { cli.sample_rate },
            format: if cli.format == defaults.format { self.export.format.clone() } else { cli.format },
        }
    }

    /// Fill in every separate option still at its default from the config.
    pub fn merge_separate(&self, cli: SeparateSettings) -> SeparateSettings {
        SeparateSettings {
            stems: if cli.stems.is_empty() { self.separation.stems.clone() } else { cli.stems },
            archive: cli.archive || self.separation.archive,
        }
    }
}

fn default_sample_rate() -> u32 { DEFAULT_EXPORT_RATE }
fn default_format() -> String { DEFAULT_EXPORT_FORMAT.into() }
fn default_stems() -> Vec<Stem> { Stem::ALL.to_vec() }

/// Resolve the config file: an explicit path, else `audiolab.toml` in the
/// working directory, else `~/.config/audiolab/config.toml`, else the
/// platform config directory.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("audiolab.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("audiolab").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("audiolab").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Option<Config> {
    match toml::from_str(content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring malformed config: {}", e);
            None
        }
    }
}
