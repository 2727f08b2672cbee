// src/types/matching.rs
//! Wire types of the AI matching service and its persisted results.

use serde::{Deserialize, Serialize};

use super::profile::{AiScore, JobPreference};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProximityStatus {
    Close,
    Far,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One scored job from a match run. Unique per `job_id` within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: String,
    pub match_score: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub location_status: ProximityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub matches: Vec<MatchResult>,
    #[serde(default)]
    pub overall_analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProfilePayload {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub education: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub job_preferences: Option<JobPreference>,
    pub desired_position: String,
    pub desired_salary: String,
    pub ai_score: Option<AiScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPostPayload {
    pub id: String,
    pub title: String,
    pub company: String,
    pub company_id: String,
    pub location: String,
    pub description: String,
    pub salary_range: String,
    pub tags: Vec<String>,
}

/// `POST /match-jobs` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub user_profile: MatchProfilePayload,
    pub job_posts: Vec<JobPostPayload>,
}

/// Row persisted through `POST /api/user/job-matches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatchRecord {
    pub job_id: String,
    pub match_score: f64,
    pub analysis: String,
}

impl From<&MatchResult> for JobMatchRecord {
    fn from(result: &MatchResult) -> Self {
        Self {
            job_id: result.job_id.clone(),
            match_score: result.match_score,
            analysis: result.reason.clone(),
        }
    }
}
