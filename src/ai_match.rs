// src/ai_match.rs
//! AI-assisted job matching: readiness check, request building, the run
//! itself and the cached result set.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::result_cache::ResultCache;
use crate::error::JobError;
use crate::gather::{gather_profile_bundle, gather_readiness};
use crate::search::Listing;
use crate::types::card::JobCard;
use crate::types::matching::{
    JobMatchRecord, JobPostPayload, MatchProfilePayload, MatchRequest, MatchResult,
};
use crate::types::profile::{ProfileBundle, ProfileReadiness};
use crate::upstream::{MatchService, ProfileService};

const LINE_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Input,
    Loading,
    Result,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub matches: Vec<MatchResult>,
    pub overall_analysis: String,
    /// Message of the last failed run, cleared by the next one.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Applied(Vec<MatchResult>),
    /// A newer run or a clear started while this one was in flight.
    Superseded,
}

/// A match joined with the card it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedMatch {
    pub card: JobCard,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

fn job_post_payload(card: &JobCard) -> JobPostPayload {
    JobPostPayload {
        id: card.post_id.clone(),
        title: card.role.clone(),
        company: card.company.clone(),
        company_id: card.company_id.clone(),
        location: card.location.clone(),
        description: card.description.join("\n"),
        salary_range: card.rate.clone(),
        tags: card.tags.clone(),
    }
}

/// `POST /match-jobs` body for `bundle` against `cards`.
pub fn build_request(bundle: &ProfileBundle, cards: &[JobCard]) -> MatchRequest {
    let profile = bundle.profile.clone().unwrap_or_default();

    let education = bundle
        .educations
        .iter()
        .map(|e| e.summary())
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR);
    let experience = bundle
        .experiences
        .iter()
        .map(|e| e.summary())
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR);

    let user_profile = MatchProfilePayload {
        name: profile.display_name(),
        phone: profile.phone.clone().unwrap_or_default(),
        email: profile.email.clone().unwrap_or_default(),
        address: bundle
            .address
            .as_ref()
            .map(|a| a.joined())
            .unwrap_or_default(),
        education,
        experience,
        skills: bundle.skills.clone(),
        job_preferences: bundle.job_preference.clone(),
        desired_position: bundle
            .job_preference
            .as_ref()
            .map(|p| p.position.clone())
            .unwrap_or_default(),
        desired_salary: String::new(),
        ai_score: bundle.ai_score.clone(),
    };

    MatchRequest {
        user_profile,
        job_posts: cards.iter().map(job_post_payload).collect(),
    }
}

/// Keep the first result per job id.
pub fn dedupe_matches(matches: Vec<MatchResult>) -> Vec<MatchResult> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(m.job_id.clone()))
        .collect()
}

/// Join `matches` with `cards` by post id or card id, best score first.
/// Matches whose job is no longer listed are dropped.
pub fn resolve_matches(matches: &[MatchResult], cards: &[JobCard]) -> Vec<ResolvedMatch> {
    let mut resolved: Vec<ResolvedMatch> = matches
        .iter()
        .filter_map(|result| {
            let card = cards.iter().find(|card| card.matches_id(&result.job_id));
            if card.is_none() {
                debug!("Dropping match for unlisted job {}", result.job_id);
            }
            card.map(|card| ResolvedMatch {
                card: card.clone(),
                result: result.clone(),
            })
        })
        .collect();

    resolved.sort_by(|a, b| b.result.match_score.total_cmp(&a.result.match_score));
    resolved
}

/// Matching needs the live listing; the bundled sample data only keeps
/// browsing usable.
pub fn ensure_live_listing(listing: &Listing) -> Result<(), JobError> {
    if listing.is_degraded() {
        warn!("AI match refused, job listing is degraded");
        return Err(JobError::MatchFailed(
            "Job listing is unavailable, try again later".to_string(),
        ));
    }
    Ok(())
}

/// Cache key for a caller: a name-based UUID of the bearer token, so the
/// token itself never reaches the disk. `None` for anonymous callers.
pub fn session_key(token: Option<&str>) -> Option<String> {
    token.map(|token| {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, token.as_bytes())
            .simple()
            .to_string()
    })
}

/// One [`MatchWizard`] per caller, restored from its own cache slot on
/// first use.
pub struct MatchSessions {
    cache_dir: PathBuf,
    wizards: Mutex<HashMap<Option<String>, Arc<MatchWizard>>>,
}

impl MatchSessions {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            wizards: Mutex::new(HashMap::new()),
        }
    }

    pub async fn wizard(&self, token: Option<&str>) -> Arc<MatchWizard> {
        let key = session_key(token);
        let mut wizards = self.wizards.lock().await;
        if let Some(wizard) = wizards.get(&key) {
            return Arc::clone(wizard);
        }

        let cache = ResultCache::for_session(&self.cache_dir, key.as_deref());
        let wizard = Arc::new(MatchWizard::new(cache));
        if wizard.restore().await {
            debug!("Restored cached AI match results for a new session");
        }
        wizards.insert(key, Arc::clone(&wizard));
        wizard
    }
}

/// Wizard state for one user's match flow, backed by the result cache.
pub struct MatchWizard {
    cache: ResultCache,
    state: Mutex<WizardSnapshot>,
    generation: AtomicU64,
}

impl MatchWizard {
    pub fn new(cache: ResultCache) -> Self {
        Self {
            cache,
            state: Mutex::new(WizardSnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        self.state.lock().await.clone()
    }

    pub async fn readiness(&self, profiles: &dyn ProfileService) -> ProfileReadiness {
        gather_readiness(profiles).await
    }

    /// Pick up the cached result set, if any. Returns whether one was found.
    pub async fn restore(&self) -> bool {
        let cached = self.cache.load().await;
        let mut state = self.state.lock().await;
        match cached {
            Some(matches) => {
                info!("Restored {} cached matches", matches.len());
                *state = WizardSnapshot {
                    step: WizardStep::Result,
                    matches,
                    ..Default::default()
                };
                true
            }
            None => {
                *state = WizardSnapshot::default();
                false
            }
        }
    }

    /// Drop the cached matches and go back to the input step. Any run in
    /// flight is superseded.
    pub async fn clear(&self) -> Result<(), JobError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        self.cache.clear().await?;
        *state = WizardSnapshot::default();
        info!("Cleared AI match results");
        Ok(())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Run a match against `cards`. Only the latest run may change the
    /// wizard state or the cache.
    pub async fn run(
        &self,
        profiles: &dyn ProfileService,
        matcher: &dyn MatchService,
        cards: &[JobCard],
    ) -> Result<RunOutcome, JobError> {
        let bundle = gather_profile_bundle(profiles).await;
        let readiness = ProfileReadiness::from_bundle(&bundle);
        if !readiness.can_match() {
            info!("AI match refused, profile incomplete: {:?}", readiness.missing);
            return Err(JobError::ProfileIncomplete {
                missing: readiness.missing,
            });
        }

        // A refused run never supersedes the one in flight.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.lock().await;
            if !self.is_current(generation) {
                return Ok(RunOutcome::Superseded);
            }
            state.step = WizardStep::Loading;
            state.error = None;
        }

        let request = build_request(&bundle, cards);
        info!(
            "Requesting AI match for {} jobs (run {})",
            request.job_posts.len(),
            generation
        );
        let response = matcher.match_jobs(&request).await;

        let mut state = self.state.lock().await;
        if !self.is_current(generation) {
            info!("Discarding result of superseded match run {}", generation);
            return Ok(RunOutcome::Superseded);
        }

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("AI match run {} failed: {:#}", generation, e);
                let message = format!("{:#}", e);
                state.step = WizardStep::Input;
                state.error = Some(message.clone());
                return Err(JobError::MatchFailed(message));
            }
        };

        let matches = dedupe_matches(response.matches);
        if let Err(e) = self.cache.save(&matches).await {
            warn!("Failed to cache match results: {:#}", e);
        }
        *state = WizardSnapshot {
            step: WizardStep::Result,
            matches: matches.clone(),
            overall_analysis: response.overall_analysis,
            error: None,
        };
        drop(state);

        let records: Vec<JobMatchRecord> = matches.iter().map(JobMatchRecord::from).collect();
        if let Err(e) = profiles.save_job_matches(&records).await {
            warn!("Failed to persist job matches: {:#}", e);
        }

        info!("AI match run {} produced {} matches", generation, matches.len());
        Ok(RunOutcome::Applied(matches))
    }

    /// Current matches resolved against `cards`.
    pub async fn resolved(&self, cards: &[JobCard]) -> Vec<ResolvedMatch> {
        let state = self.state.lock().await;
        resolve_matches(&state.matches, cards)
    }
}
