// src/bookmarks.rs
//! Applied and saved job sets, changed only after the upstream confirms.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::core::service_client::HttpStatusError;
use crate::error::JobError;
use crate::upstream::ProfileService;

const HTTP_CONFLICT: u16 = 409;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserJobState {
    pub applied: HashSet<String>,
    pub saved: HashSet<String>,
}

impl UserJobState {
    pub fn has_applied(&self, job_id: &str) -> bool {
        self.applied.contains(job_id)
    }

    pub fn is_saved(&self, post_id: &str) -> bool {
        self.saved.contains(post_id)
    }

    /// Reload both sets concurrently. A failed lookup keeps the set it
    /// would have replaced.
    pub async fn refresh(&mut self, profile: &dyn ProfileService) {
        let (applications, saved) = tokio::join!(profile.applications(), profile.saved_jobs());

        match applications {
            Ok(applications) => {
                self.applied = applications.into_iter().map(|app| app.job_id).collect();
            }
            Err(e) => warn!("Failed to load applications: {:#}", e),
        }
        match saved {
            Ok(saved) => {
                self.saved = saved.into_iter().map(|job| job.post_id).collect();
            }
            Err(e) => warn!("Failed to load saved jobs: {:#}", e),
        }
    }

    /// Apply once. A job already in the applied set, or one the upstream
    /// reports as a conflict, is `AlreadyApplied`.
    pub async fn apply(&mut self, profile: &dyn ProfileService, job_id: &str) -> Result<(), JobError> {
        if self.has_applied(job_id) {
            return Err(JobError::AlreadyApplied(job_id.to_string()));
        }

        match profile.apply(job_id).await {
            Ok(()) => {
                info!("Applied to job {}", job_id);
                self.applied.insert(job_id.to_string());
                Ok(())
            }
            Err(e) if HttpStatusError::status_of(&e) == Some(HTTP_CONFLICT) => {
                self.applied.insert(job_id.to_string());
                Err(JobError::AlreadyApplied(job_id.to_string()))
            }
            Err(e) => {
                warn!("Apply to {} failed: {:#}", job_id, e);
                Err(JobError::action_failed("apply", format!("{:#}", e)))
            }
        }
    }

    /// Flip the saved state of `post_id`; returns whether it is now saved.
    pub async fn toggle_saved(
        &mut self,
        profile: &dyn ProfileService,
        post_id: &str,
    ) -> Result<bool, JobError> {
        if self.is_saved(post_id) {
            self.unsave(profile, post_id).await.map(|_| false)
        } else {
            self.save(profile, post_id).await.map(|_| true)
        }
    }

    pub async fn save(&mut self, profile: &dyn ProfileService, post_id: &str) -> Result<(), JobError> {
        profile
            .save_job(post_id)
            .await
            .map_err(|e| JobError::action_failed("save job", format!("{:#}", e)))?;
        self.saved.insert(post_id.to_string());
        Ok(())
    }

    pub async fn unsave(&mut self, profile: &dyn ProfileService, post_id: &str) -> Result<(), JobError> {
        profile
            .unsave_job(post_id)
            .await
            .map_err(|e| JobError::action_failed("remove saved job", format!("{:#}", e)))?;
        self.saved.remove(post_id);
        Ok(())
    }
}
