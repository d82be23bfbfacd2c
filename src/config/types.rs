use qtfaststart_media::{ConvertOptions, FillerShift, ParseOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,

    #[serde(default)]
    pub parse: ParseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Drop top-level filler atoms from the output
    #[serde(default = "default_true")]
    pub remove_filler: bool,

    /// How removed filler before mdat changes the chunk-offset shift
    #[serde(default)]
    pub filler_shift: FillerShiftMode,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            remove_filler: default_true(),
            filler_shift: FillerShiftMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FillerShiftMode {
    /// Add the removed filler size to the shift
    #[default]
    Additive,
    /// Subtract the removed filler size, keeping offsets on the same media
    Net,
}

impl From<FillerShiftMode> for FillerShift {
    fn from(mode: FillerShiftMode) -> Self {
        match mode {
            FillerShiftMode::Additive => FillerShift::Additive,
            FillerShiftMode::Net => FillerShift::Net,
        }
    }
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        ConvertOptions::new(config.remove_filler).filler_shift(config.filler_shift.into())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ParseConfig {
    /// Reject files with more than one ftyp, mdat or moov atom instead of
    /// using the last one
    #[serde(default)]
    pub reject_duplicate_atoms: bool,

    /// Treat top-level atoms with an all-zero tag as filler instead of
    /// rejecting the file
    #[serde(default)]
    pub allow_zero_tag_filler: bool,
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        ParseOptions {
            reject_duplicate_atoms: config.reject_duplicate_atoms,
            allow_zero_tag_filler: config.allow_zero_tag_filler,
        }
    }
}

fn default_true() -> bool {
    true
}
