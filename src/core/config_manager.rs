// src/core/config_manager.rs
//! Unified configuration: environment paths, upstream services, search
//! defaults and scoring weights.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::pipeline::geo::GeoPoint;
use crate::pipeline::scorer::ScoringWeights;

pub const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_LOG_FILE: &str = "/tmp/jobmatch.log";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
    pub search: SearchConfig,
    pub scoring: ScoringWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub cache_dir: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub api_base_url: String,
    pub ai_service_url: String,
    pub ai_provider: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: usize,
    pub default_max_distance_km: f64,
    pub fallback_location: GeoPoint,
    pub location_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            default_max_distance_km: 50.0,
            // Bangkok city centre.
            fallback_location: GeoPoint::new(13.7563, 100.5018),
            location_timeout_secs: 10,
        }
    }
}

/// Sections of `config.yaml`. Both are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    search: SearchConfig,
    scoring: ScoringWeights,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = Self::load_environment()?;
        let service = Self::load_service()?;
        let file = Self::load_file(Path::new(CONFIG_FILE))?;

        Ok(Self {
            environment,
            service,
            search: file.search,
            scoring: file.scoring,
        })
    }

    /// Load environment configuration
    fn load_environment() -> Result<EnvironmentConfig> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading environment configuration for: {}", env);

        let base_dir = if env == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        let log_file = std::env::var("JOBMATCH_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(EnvironmentConfig {
            cache_dir: base_dir.join("cache"),
            log_file,
        })
    }

    /// Load upstream service configuration
    fn load_service() -> Result<ServiceConfig> {
        let api_base_url =
            std::env::var("JOBS_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let ai_service_url =
            std::env::var("AI_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8001".to_string());
        let ai_provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| "openai".to_string());

        let timeout_seconds = match std::env::var("SERVICE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("SERVICE_TIMEOUT_SECS must be a number, got {}", raw))?,
            Err(_) => 30,
        };

        Ok(ServiceConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            ai_service_url: ai_service_url.trim_end_matches('/').to_string(),
            ai_provider,
            timeout_seconds,
        })
    }

    /// Read the optional YAML overrides. A missing file means defaults.
    fn load_file(path: &Path) -> Result<FileConfig> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: FileConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        file.scoring
            .validate()
            .with_context(|| format!("Invalid scoring section in {}", path.display()))?;
        if file.search.page_size == 0 {
            anyhow::bail!("search.page_size must be at least 1 in {}", path.display());
        }

        info!("Loaded configuration overrides from {}", path.display());
        Ok(file)
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&self.environment.cache_dir).await?;
        if let Some(log_parent) = self.environment.log_file.parent() {
            FsOps::ensure_dir_exists(log_parent).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let file = ConfigManager::load_file(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(file.search, SearchConfig::default());
        assert_eq!(file.scoring, ScoringWeights::default());
    }

    #[test]
    fn test_partial_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "search:\n  page_size: 10\nscoring:\n  position: 30\n  industry: 30\n",
        )
        .unwrap();

        let file = ConfigManager::load_file(&path).unwrap();
        assert_eq!(file.search.page_size, 10);
        assert_eq!(file.search.default_max_distance_km, 50.0);
        assert_eq!(file.scoring.position, 30.0);
        assert_eq!(file.scoring.skills, 30.0);
        assert_eq!(file.scoring.distance_tiers.len(), 3);
    }

    #[test]
    fn test_rejects_weights_over_hundred() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "scoring:\n  position: 90\n").unwrap();
        assert!(ConfigManager::load_file(&path).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "search: [not, a, map").unwrap();
        assert!(ConfigManager::load_file(&path).is_err());
    }
}
