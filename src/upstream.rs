// src/upstream.rs
//! Boundary to the external services. The pipeline only talks to these
//! traits; [`ServiceClient`](crate::core::ServiceClient) implements them
//! over HTTP.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::matching::{JobMatchRecord, MatchRequest, MatchResponse};
use crate::types::posting::JobPosting;
use crate::types::profile::{
    AiScore, Education, Experience, JobApplication, JobPreference, SavedJob, UserAddress,
    UserProfile,
};

/// Job listing service.
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Every posting, newest first, any status.
    async fn all_posts(&self) -> Result<Vec<JobPosting>>;

    async fn company_name(&self, company_id: &str) -> Result<String>;
}

/// User profile and persistence service.
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn profile(&self) -> Result<UserProfile>;
    async fn address(&self) -> Result<UserAddress>;
    async fn educations(&self) -> Result<Vec<Education>>;
    async fn experiences(&self) -> Result<Vec<Experience>>;
    async fn job_preference(&self) -> Result<JobPreference>;
    /// Stored skill list; a null list comes back empty.
    async fn skills(&self) -> Result<Vec<String>>;
    async fn ai_score(&self) -> Result<AiScore>;

    async fn saved_jobs(&self) -> Result<Vec<SavedJob>>;
    async fn save_job(&self, post_id: &str) -> Result<()>;
    async fn unsave_job(&self, post_id: &str) -> Result<()>;

    async fn applications(&self) -> Result<Vec<JobApplication>>;
    async fn apply(&self, job_id: &str) -> Result<()>;

    async fn save_job_matches(&self, matches: &[JobMatchRecord]) -> Result<()>;
}

/// External AI matching oracle.
#[async_trait]
pub trait MatchService: Send + Sync {
    async fn match_jobs(&self, request: &MatchRequest) -> Result<MatchResponse>;
}
