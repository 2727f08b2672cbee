// src/core/result_cache.rs
//! Single persistent slot holding the last AI-match result set.
//!
//! There is no expiry: the slot stays valid until it is overwritten by a
//! new run or cleared. Writes are full snapshots, so concurrent writers
//! resolve last-write-wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::FsOps;
use crate::types::matching::MatchResult;

pub const AI_MATCH_CACHE_KEY: &str = "ai_match_cache";

#[derive(Serialize, Deserialize)]
struct CachedMatches {
    matches: Vec<MatchResult>,
}

#[derive(Debug, Clone)]
pub struct ResultCache {
    path: PathBuf,
}

impl ResultCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Slot `<cache_dir>/ai_match_cache.json`.
    pub fn in_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join(format!("{}.json", AI_MATCH_CACHE_KEY)))
    }

    /// Slot of one caller, `<cache_dir>/ai_match_cache_<key>.json`. Without
    /// a key this is the shared [`ResultCache::in_dir`] slot.
    pub fn for_session(cache_dir: &Path, key: Option<&str>) -> Self {
        match key {
            Some(key) => Self::new(cache_dir.join(format!("{}_{}.json", AI_MATCH_CACHE_KEY, key))),
            None => Self::in_dir(cache_dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the slot unconditionally.
    pub async fn save(&self, matches: &[MatchResult]) -> Result<()> {
        let payload = serde_json::to_string(&CachedMatches {
            matches: matches.to_vec(),
        })
        .context("Failed to serialize match cache")?;

        FsOps::write_atomic(&self.path, &payload).await?;
        info!("Saved {} matches to {}", matches.len(), self.path.display());
        Ok(())
    }

    /// Stored matches, or `None` for a missing, corrupt or empty slot.
    pub async fn load(&self) -> Option<Vec<MatchResult>> {
        let content = match FsOps::read_optional(&self.path).await {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                warn!("Ignoring unreadable match cache: {:#}", e);
                return None;
            }
        };

        match serde_json::from_str::<CachedMatches>(&content) {
            Ok(cached) if !cached.matches.is_empty() => Some(cached.matches),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    "Ignoring malformed match cache {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        FsOps::remove_file_if_exists(&self.path).await?;
        Ok(())
    }
}
