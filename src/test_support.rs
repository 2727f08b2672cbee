// src/test_support.rs
//! In-memory stand-in for the upstream services, for unit tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::core::service_client::HttpStatusError;
use crate::pipeline::normalizer::normalize;
use crate::sample::sample_postings;
use crate::types::card::JobCard;
use crate::types::matching::{
    JobMatchRecord, MatchRequest, MatchResponse, MatchResult, ProximityStatus,
};
use crate::types::posting::JobPosting;
use crate::types::profile::{
    AiScore, Education, Experience, JobApplication, JobPreference, SavedJob, UserAddress,
    UserProfile,
};
use crate::upstream::{ListingService, MatchService, ProfileService};

/// Wall clock used for every normalized test card.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
}

/// The bundled sample postings as cards, in fetch order.
pub fn sample_cards() -> Vec<JobCard> {
    sample_postings()
        .unwrap()
        .iter()
        .enumerate()
        .map(|(index, posting)| normalize(posting, index, None, fixed_now()))
        .collect()
}

pub fn match_result(job_id: &str, score: f64) -> MatchResult {
    MatchResult {
        job_id: job_id.to_string(),
        match_score: score,
        reason: format!("fits {}", job_id),
        location_status: ProximityStatus::Unknown,
        location_note: None,
    }
}

#[derive(Default)]
pub struct FakeState {
    pub posts: Vec<JobPosting>,
    pub companies: HashMap<String, String>,
    pub profile: UserProfile,
    pub address: UserAddress,
    pub educations: Vec<Education>,
    pub experiences: Vec<Experience>,
    pub job_preference: JobPreference,
    pub skills: Vec<String>,
    pub ai_score: AiScore,
    pub saved: Vec<SavedJob>,
    pub applications: Vec<JobApplication>,
    pub match_responses: VecDeque<MatchResponse>,
    pub match_delays: VecDeque<Duration>,
    pub failing: HashSet<String>,
    pub fail_all: bool,
    pub match_requests: Vec<MatchRequest>,
    pub persisted_matches: Vec<JobMatchRecord>,
    pub calls: Vec<String>,
}

/// Every method fails when its name was passed to [`FakeUpstream::fail`].
#[derive(Default)]
pub struct FakeUpstream {
    state: Mutex<FakeState>,
}

impl FakeUpstream {
    /// Profile that passes every readiness check.
    pub fn complete_profile() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state();
            state.posts = sample_postings().unwrap();
            state.profile = UserProfile {
                first_name_en: Some("Somchai".to_string()),
                last_name_en: Some("Jaidee".to_string()),
                phone: Some("0812345678".to_string()),
                email: Some("somchai@example.com".to_string()),
                ..Default::default()
            };
            state.address = UserAddress {
                province: Some("Bangkok".to_string()),
                district: Some("Bang Rak".to_string()),
                subdistrict: Some("Silom".to_string()),
                postal_code: Some("10500".to_string()),
                address_detail: None,
            };
            state.educations = vec![Education {
                school: "Chulalongkorn University".to_string(),
                degree: "B.Eng".to_string(),
                major: Some("Computer Engineering".to_string()),
            }];
            state.experiences = vec![Experience {
                company: "Acme".to_string(),
                position: "Backend Developer".to_string(),
            }];
            state.job_preference = JobPreference {
                industry: Some("Technology".to_string()),
                position: "Backend Engineer".to_string(),
                work_time: Some("Full-Time".to_string()),
            };
            state.skills = vec!["Rust".to_string(), "SQL".to_string()];
            state.ai_score = AiScore {
                score: 78.0,
                level: Some("Senior".to_string()),
                recommended_position: "Backend Engineer".to_string(),
                analysis: "Strong backend background".to_string(),
            };
        }
        fake
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail(&self, method: &str) {
        self.state().failing.insert(method.to_string());
    }

    pub fn recover(&self, method: &str) {
        self.state().failing.remove(method);
    }

    pub fn fail_all(&self) {
        self.state().fail_all = true;
    }

    pub fn push_match_response(&self, matches: Vec<MatchResult>) {
        self.state().match_responses.push_back(MatchResponse {
            matches,
            overall_analysis: "ok".to_string(),
        });
    }

    pub fn push_match_delay(&self, delay: Duration) {
        self.state().match_delays.push_back(delay);
    }

    pub fn calls(&self, method: &str) -> usize {
        self.state().calls.iter().filter(|c| c.as_str() == method).count()
    }

    fn enter(&self, method: &str) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(method.to_string());
        if state.fail_all || state.failing.contains(method) {
            anyhow::bail!("HTTP 503 Service Unavailable error: {} is down", method);
        }
        Ok(state)
    }
}

#[async_trait]
impl ListingService for FakeUpstream {
    async fn all_posts(&self) -> Result<Vec<JobPosting>> {
        Ok(self.enter("all_posts")?.posts.clone())
    }

    async fn company_name(&self, company_id: &str) -> Result<String> {
        let state = self.enter("company_name")?;
        state
            .companies
            .get(company_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("HTTP 404 Not Found error: company {}", company_id))
    }
}

#[async_trait]
impl ProfileService for FakeUpstream {
    async fn profile(&self) -> Result<UserProfile> {
        Ok(self.enter("profile")?.profile.clone())
    }

    async fn address(&self) -> Result<UserAddress> {
        Ok(self.enter("address")?.address.clone())
    }

    async fn educations(&self) -> Result<Vec<Education>> {
        Ok(self.enter("educations")?.educations.clone())
    }

    async fn experiences(&self) -> Result<Vec<Experience>> {
        Ok(self.enter("experiences")?.experiences.clone())
    }

    async fn job_preference(&self) -> Result<JobPreference> {
        Ok(self.enter("job_preference")?.job_preference.clone())
    }

    async fn skills(&self) -> Result<Vec<String>> {
        Ok(self.enter("skills")?.skills.clone())
    }

    async fn ai_score(&self) -> Result<AiScore> {
        Ok(self.enter("ai_score")?.ai_score.clone())
    }

    async fn saved_jobs(&self) -> Result<Vec<SavedJob>> {
        Ok(self.enter("saved_jobs")?.saved.clone())
    }

    async fn save_job(&self, post_id: &str) -> Result<()> {
        let mut state = self.enter("save_job")?;
        state.saved.push(SavedJob {
            id: None,
            post_id: post_id.to_string(),
            created_at: None,
        });
        Ok(())
    }

    async fn unsave_job(&self, post_id: &str) -> Result<()> {
        let mut state = self.enter("unsave_job")?;
        state.saved.retain(|saved| saved.post_id != post_id);
        Ok(())
    }

    async fn applications(&self) -> Result<Vec<JobApplication>> {
        Ok(self.enter("applications")?.applications.clone())
    }

    async fn apply(&self, job_id: &str) -> Result<()> {
        let mut state = self.enter("apply")?;
        if state.applications.iter().any(|app| app.job_id == job_id) {
            return Err(HttpStatusError {
                status: 409,
                body: "Already applied".to_string(),
            }
            .into());
        }
        let id = format!("app-{}", state.applications.len() + 1);
        state.applications.push(JobApplication {
            id,
            job_id: job_id.to_string(),
            status: "pending".to_string(),
            created_at: None,
            updated_at: None,
        });
        Ok(())
    }

    async fn save_job_matches(&self, matches: &[JobMatchRecord]) -> Result<()> {
        self.enter("save_job_matches")?
            .persisted_matches
            .extend_from_slice(matches);
        Ok(())
    }
}

#[async_trait]
impl MatchService for FakeUpstream {
    async fn match_jobs(&self, request: &MatchRequest) -> Result<MatchResponse> {
        let (delay, response) = {
            let mut state = self.enter("match_jobs")?;
            state.match_requests.push(request.clone());
            let delay = state.match_delays.pop_front();
            let response = state.match_responses.pop_front();
            (delay, response)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response.ok_or_else(|| anyhow::anyhow!("no match response queued"))
    }
}
