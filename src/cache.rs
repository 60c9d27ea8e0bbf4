//! Processing cache for smart skipping
//!
//! After a successful run a small JSON sidecar is written next to the
//! output file, recording the source file's identity and a hash of the
//! options used. A later run with the same source and options can skip the
//! work entirely.

use crate::cleaner::CleanSummary;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Bumped whenever the cache format or cleaning semantics change.
pub const CACHE_VERSION: u32 = 1;

/// Suffix appended to the output path for the sidecar file.
const CACHE_SUFFIX: &str = ".adsweep.json";

// ============================================================
// Error Types
// ============================================================

/// Cache error types
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

// ============================================================
// Digest
// ============================================================

/// Identity of a source file plus the options it was processed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDigest {
    /// Source modification time, seconds since the epoch.
    pub source_modified: u64,
    /// Source size in bytes.
    pub source_size: u64,
    /// SHA-256 of the serialized processing options.
    pub options_hash: String,
}

impl CacheDigest {
    /// Build a digest for `source` processed with `options_json`.
    pub fn new(source: &Path, options_json: &str) -> Result<Self> {
        let metadata = std::fs::metadata(source)?;
        let source_modified = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut hasher = Sha256::new();
        hasher.update(options_json.as_bytes());
        let options_hash = format!("{:x}", hasher.finalize());

        Ok(Self {
            source_modified,
            source_size: metadata.len(),
            options_hash,
        })
    }
}

// ============================================================
// Cache Entry
// ============================================================

/// One completed processing run, stored beside its output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingCache {
    /// Cache format version.
    pub version: u32,
    /// Completion time, seconds since the epoch.
    pub processed_at: u64,
    /// Source and options identity at processing time.
    pub digest: CacheDigest,
    /// What the run produced.
    pub result: CleanSummary,
}

impl ProcessingCache {
    /// Create an entry for a run that just completed.
    pub fn new(digest: CacheDigest, result: CleanSummary) -> Self {
        let processed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            version: CACHE_VERSION,
            processed_at,
            digest,
            result,
        }
    }

    /// Sidecar path for an output file.
    pub fn cache_path(output: &Path) -> PathBuf {
        let mut os = output.as_os_str().to_os_string();
        os.push(CACHE_SUFFIX);
        PathBuf::from(os)
    }

    /// Write the sidecar next to `output`.
    pub fn save(&self, output: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::cache_path(output), json)?;
        Ok(())
    }

    /// Read the sidecar for `output`.
    pub fn load(output: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(Self::cache_path(output))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Decide whether processing `source` can be skipped.
///
/// Returns the cache entry when the output exists and its sidecar matches
/// the current source file and options. `force` always reprocesses.
pub fn should_skip_processing(
    source: &Path,
    output: &Path,
    options_json: &str,
    force: bool,
) -> Option<ProcessingCache> {
    if force || !output.exists() {
        return None;
    }

    let cache = ProcessingCache::load(output).ok()?;
    if cache.version != CACHE_VERSION {
        return None;
    }

    let current = CacheDigest::new(source, options_json).ok()?;
    (cache.digest == current).then_some(cache)
}
