//! Configuration for TideKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, TideError};

/// Soft ceiling on the log size, in bytes. Tracked, never enforced.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 4_000_000_000;

/// Main configuration for a TideKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single append-only log file.
    /// Created empty if missing, replayed if present.
    pub log_path: PathBuf,

    /// Sync strategy: whether appends are fsynced
    pub sync_strategy: SyncStrategy,

    /// Size after which a warning is logged. No rotation or compaction
    /// happens; the log grows for as long as the store is used.
    pub max_file_size: u64,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStrategy {
    /// Hand each append to the OS and return (no fsync)
    #[default]
    OsBuffered,

    /// fsync after every append (safest, slowest)
    EveryWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./tidekv.log"),
            sync_strategy: SyncStrategy::OsBuffered,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can be used to open a store
    pub fn validate(&self) -> Result<()> {
        if self.log_path.as_os_str().is_empty() {
            return Err(TideError::Config("log path must not be empty".to_string()));
        }
        if self.max_file_size == 0 {
            return Err(TideError::Config(
                "max file size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the soft log size ceiling (in bytes)
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.config.max_file_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
