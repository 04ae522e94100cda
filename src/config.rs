//! Configuration loading for the simulator.
//!
//! Mirrors the typed-sub-config-with-serde-defaults pattern: every knob has a
//! sensible default so a minimal TOML file (or none at all) still produces a
//! runnable configuration, and command-line flags layered on top in `main.rs`
//! override whatever the file specifies.

use serde::Deserialize;

const DEFAULT_CYCLE_LIMIT: u64 = 1_000_000;
const DEFAULT_DEPTH_LOG: u32 = 16;
const DEFAULT_BTB_SIZE: usize = 64;
const DEFAULT_GHR_BITS: usize = 6;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            memory: MemoryConfig::default(),
            predictor: PredictorConfig::default(),
        }
    }
}

/// General run parameters: tracing and the hard cycle cap.
#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub trace: bool,

    #[serde(default = "default_cycle_limit")]
    pub cycle_limit: u64,

    /// Default memory image path, overridable by `--image` on the CLI.
    #[serde(default)]
    pub image: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            cycle_limit: default_cycle_limit(),
            image: None,
        }
    }
}

fn default_cycle_limit() -> u64 {
    DEFAULT_CYCLE_LIMIT
}

/// Unified SRAM sizing. Capacity is `2^depth_log` 32-bit words.
#[derive(Debug, Deserialize, Clone)]
pub struct MemoryConfig {
    #[serde(default = "default_depth_log")]
    pub depth_log: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            depth_log: default_depth_log(),
        }
    }
}

impl MemoryConfig {
    /// Number of 32-bit words the SRAM holds.
    pub fn depth_words(&self) -> usize {
        1usize << self.depth_log
    }
}

fn default_depth_log() -> u32 {
    DEFAULT_DEPTH_LOG
}

/// Branch predictor table sizing: BTB entry count and global-history width.
#[derive(Debug, Deserialize, Clone)]
pub struct PredictorConfig {
    #[serde(default = "default_btb_size")]
    pub btb_size: usize,

    #[serde(default = "default_ghr_bits")]
    pub ghr_bits: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            btb_size: default_btb_size(),
            ghr_bits: default_ghr_bits(),
        }
    }
}

fn default_btb_size() -> usize {
    DEFAULT_BTB_SIZE
}

fn default_ghr_bits() -> usize {
    DEFAULT_GHR_BITS
}
