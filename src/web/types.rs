// src/web/types.rs
use rocket::form::FromForm;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;

use crate::ai_match::{MatchSessions, ResolvedMatch, WizardStep};
use crate::core::{ConfigManager, ServiceClient};
use crate::error::JobError;
use crate::types::profile::ProfileReadiness;

/// Shared by every request. Match wizards are per caller.
pub struct AppState {
    pub client: ServiceClient,
    pub config: ConfigManager,
    pub sessions: MatchSessions,
}

/// `GET /jobs` query string.
#[derive(Debug, Default, FromForm)]
pub struct JobsQuery {
    pub query: Option<String>,
    pub location: Option<String>,
    #[field(name = "type")]
    pub job_type: Option<String>,
    pub level: Option<String>,
    pub mode: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub selected: Option<String>,
}

/// `GET /jobs/near-me` query string.
#[derive(Debug, Default, FromForm)]
pub struct NearMeQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub max_distance: Option<f64>,
    /// Comma-separated job types.
    pub types: Option<String>,
    /// Comma-separated salary buckets, e.g. `25000-40000,60000+`.
    pub salary: Option<String>,
    pub recommended: Option<bool>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AiMatchData {
    pub step: WizardStep,
    pub readiness: ProfileReadiness,
    pub matches: Vec<ResolvedMatch>,
    pub overall_analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    /// Inline, non-blocking notice, e.g. the degraded listing message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

pub type ApiError = (Status, Json<StandardErrorResponse>);

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

fn status_for(error: &JobError) -> Status {
    match error {
        JobError::RecommendationUnavailable(_) | JobError::ProfileIncomplete { .. } => {
            Status::UnprocessableEntity
        }
        JobError::MatchFailed(_) | JobError::ActionFailed { .. } => Status::BadGateway,
        JobError::AlreadyApplied(_) => Status::Conflict,
        JobError::NotFound(_) => Status::NotFound,
        JobError::Other(_) => Status::InternalServerError,
    }
}

pub fn error_response(error: &JobError) -> ApiError {
    (
        status_for(error),
        Json(StandardErrorResponse::new(
            error.to_string(),
            error.error_code().to_string(),
            error.suggestions(),
        )),
    )
}

/// 400 for a query value that does not parse.
pub fn invalid_parameter(error: anyhow::Error) -> ApiError {
    (
        Status::BadRequest,
        Json(StandardErrorResponse::new(
            format!("{:#}", error),
            "INVALID_PARAMETER".to_string(),
            vec!["Check the query string values".to_string()],
        )),
    )
}
