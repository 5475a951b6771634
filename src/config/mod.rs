//! Configuration for pdfseal
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. embedded `default-config.toml`
//! 2. `~/.config/pdfseal/config.{toml,json,yaml,yml}`
//! 3. `pdfseal.{toml,json,yaml,yml}` in the working directory
//! 4. the file given with `--config`
//! 5. `PDFSEAL_` environment variables, `__` separating sections
//! 6. command line flags

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::archive::{ArchiveOptions, MAX_COMPRESSION_LEVEL};
use crate::batch::{BatchOptions, DEFAULT_MAX_DOCUMENTS};
use crate::engine::QpdfOptions;
use crate::mapping::MappingFormat;
use crate::pipeline::{CancellationToken, DEFAULT_CONCURRENCY, MAX_CONCURRENCY};

pub mod core;
pub mod formats;

pub use self::core::{CliOverrides, load};
pub use formats::ConfigFormat;

/// Fully merged configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfsealConfig {
    pub batch: BatchConfig,
    pub archive: ArchiveOptions,
    pub engine: QpdfOptions,
    pub mapping: MappingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// 0 means size from the CPU count
    pub concurrency: usize,
    pub max_documents: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_documents: DEFAULT_MAX_DOCUMENTS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub format: MappingFormat,
}

impl PdfsealConfig {
    /// Reject settings that would make every batch fail.
    pub fn validate(&self) -> Result<()> {
        if self.batch.max_documents == 0 {
            bail!("batch.max_documents must be at least 1");
        }
        if self.batch.concurrency > MAX_CONCURRENCY {
            bail!(
                "batch.concurrency must be at most {MAX_CONCURRENCY}, got {}",
                self.batch.concurrency
            );
        }
        if self.archive.compression_level > MAX_COMPRESSION_LEVEL {
            bail!(
                "archive.compression_level must be between 0 and {MAX_COMPRESSION_LEVEL}, got {}",
                self.archive.compression_level
            );
        }
        for (key, value) in [
            ("archive.encrypted_dir", &self.archive.encrypted_dir),
            ("archive.unencrypted_dir", &self.archive.unencrypted_dir),
            ("archive.report_name", &self.archive.report_name),
            ("engine.program", &self.engine.program),
        ] {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }
        if self.archive.encrypted_dir == self.archive.unencrypted_dir {
            bail!("archive.encrypted_dir and archive.unencrypted_dir must differ");
        }
        Ok(())
    }

    pub fn batch_options(&self, cancel: CancellationToken) -> BatchOptions {
        BatchOptions {
            concurrency: self.batch.concurrency,
            max_documents: self.batch.max_documents,
            archive: self.archive.clone(),
            cancel,
        }
    }
}
