// src/core/service_client.rs
//! HTTP client for the listing, profile and AI matching services.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::config_manager::ServiceConfig;
use crate::types::matching::{JobMatchRecord, MatchRequest, MatchResponse};
use crate::types::posting::{CompanySummary, JobPosting};
use crate::types::profile::{
    AiScore, Education, Experience, JobApplication, JobPreference, SavedJob, SkillSet,
    UserAddress, UserProfile,
};
use crate::upstream::{ListingService, MatchService, ProfileService};

const ALL_POSTS_ENDPOINT: &str = "/api/user/posts";
const COMPANY_BY_ID_ENDPOINT: &str = "/api/companies";
const PROFILE_ENDPOINT: &str = "/api/user/profile";
const ADDRESS_ENDPOINT: &str = "/api/user/address";
const EDUCATIONS_ENDPOINT: &str = "/api/user/educations";
const EXPERIENCES_ENDPOINT: &str = "/api/user/experiences";
const JOB_PREFERENCE_ENDPOINT: &str = "/api/user/job-preference";
const SKILLS_ENDPOINT: &str = "/api/user/skills";
const AI_SCORE_ENDPOINT: &str = "/api/user/ai-score";
const SAVED_JOBS_ENDPOINT: &str = "/api/user/saved-jobs";
const MY_APPLICATIONS_ENDPOINT: &str = "/api/user/my-applications";
const APPLY_ENDPOINT: &str = "/api/user/apply";
const JOB_MATCHES_ENDPOINT: &str = "/api/user/job-matches";
const MATCH_JOBS_ENDPOINT: &str = "/match-jobs";

pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Non-success status from an upstream service, kept in the error chain so
/// callers can branch on the code.
#[derive(Debug, thiserror::Error)]
#[error("HTTP {status} error: {body}")]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}

impl HttpStatusError {
    /// Status carried anywhere in `error`'s chain.
    pub fn status_of(error: &anyhow::Error) -> Option<u16> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<HttpStatusError>())
            .map(|e| e.status)
    }
}

#[derive(Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    ai_service_url: String,
    ai_provider: String,
    token: Option<String>,
}

impl ServiceClient {
    /// Create new service client with configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            ai_service_url: config.ai_service_url.clone(),
            ai_provider: config.ai_provider.clone(),
            token: None,
        })
    }

    /// Same client, forwarding the caller's bearer token.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            token,
            ..self.clone()
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(HttpStatusError {
                status: status.as_u16(),
                body: error_text,
            }
            .into())
        }
    }

    /// Generic GET request
    pub async fn get<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        Self::check(response)
            .await?
            .json::<R>()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Generic POST request with JSON, response body ignored
    pub async fn post_json<T>(&self, endpoint: &str, payload: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .request(Method::POST, &url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;

        Self::check(response).await?;
        Ok(())
    }

    /// Generic DELETE request
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("DELETE {}", url);

        let response = self
            .request(Method::DELETE, &url)
            .send()
            .await
            .with_context(|| format!("Failed to DELETE {}", url))?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ListingService for ServiceClient {
    async fn all_posts(&self) -> Result<Vec<JobPosting>> {
        self.get(ALL_POSTS_ENDPOINT).await
    }

    async fn company_name(&self, company_id: &str) -> Result<String> {
        let company: CompanySummary = self
            .get(&format!("{}/{}", COMPANY_BY_ID_ENDPOINT, company_id))
            .await?;

        Ok(company
            .company_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()))
    }
}

#[async_trait]
impl ProfileService for ServiceClient {
    async fn profile(&self) -> Result<UserProfile> {
        self.get(PROFILE_ENDPOINT).await
    }

    async fn address(&self) -> Result<UserAddress> {
        self.get(ADDRESS_ENDPOINT).await
    }

    async fn educations(&self) -> Result<Vec<Education>> {
        self.get(EDUCATIONS_ENDPOINT).await
    }

    async fn experiences(&self) -> Result<Vec<Experience>> {
        self.get(EXPERIENCES_ENDPOINT).await
    }

    async fn job_preference(&self) -> Result<JobPreference> {
        self.get(JOB_PREFERENCE_ENDPOINT).await
    }

    async fn skills(&self) -> Result<Vec<String>> {
        let skill_set: SkillSet = self.get(SKILLS_ENDPOINT).await?;
        Ok(skill_set.skills.unwrap_or_default())
    }

    async fn ai_score(&self) -> Result<AiScore> {
        self.get(AI_SCORE_ENDPOINT).await
    }

    async fn saved_jobs(&self) -> Result<Vec<SavedJob>> {
        self.get(SAVED_JOBS_ENDPOINT).await
    }

    async fn save_job(&self, post_id: &str) -> Result<()> {
        self.post_json(SAVED_JOBS_ENDPOINT, &serde_json::json!({ "post_id": post_id }))
            .await
    }

    async fn unsave_job(&self, post_id: &str) -> Result<()> {
        self.delete(&format!("{}/{}", SAVED_JOBS_ENDPOINT, post_id))
            .await
    }

    async fn applications(&self) -> Result<Vec<JobApplication>> {
        self.get(MY_APPLICATIONS_ENDPOINT).await
    }

    async fn apply(&self, job_id: &str) -> Result<()> {
        self.post_json(APPLY_ENDPOINT, &serde_json::json!({ "job_id": job_id }))
            .await
    }

    async fn save_job_matches(&self, matches: &[JobMatchRecord]) -> Result<()> {
        self.post_json(JOB_MATCHES_ENDPOINT, &serde_json::json!({ "matches": matches }))
            .await
    }
}

#[async_trait]
impl MatchService for ServiceClient {
    async fn match_jobs(&self, request: &MatchRequest) -> Result<MatchResponse> {
        let url = format!("{}{}", self.ai_service_url, MATCH_JOBS_ENDPOINT);
        debug!(
            "Calling AI matching service: {} ({} posts, provider {})",
            url,
            request.job_posts.len(),
            self.ai_provider
        );

        let response = self
            .client
            .post(&url)
            .query(&[("provider", self.ai_provider.as_str())])
            .json(request)
            .send()
            .await
            .context("Failed to call AI matching service")?;

        Self::check(response)
            .await?
            .json::<MatchResponse>()
            .await
            .context("Failed to parse AI match response")
    }
}
