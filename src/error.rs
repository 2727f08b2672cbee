// src/error.rs
//! Failures a caller has to branch on. Everything else travels as
//! `anyhow::Error` and ends up in [`JobError::Other`].

use thiserror::Error;

use crate::types::profile::MissingProfileItem;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Recommended jobs are unavailable: {0}")]
    RecommendationUnavailable(String),

    #[error("Profile is incomplete, missing: {}", join_missing(.missing))]
    ProfileIncomplete { missing: Vec<MissingProfileItem> },

    #[error("AI job matching failed: {0}")]
    MatchFailed(String),

    #[error("Already applied to job {0}")]
    AlreadyApplied(String),

    #[error("Failed to {action}: {reason}")]
    ActionFailed { action: String, reason: String },

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_missing(missing: &[MissingProfileItem]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl JobError {
    pub fn action_failed(action: &str, error: impl std::fmt::Display) -> Self {
        JobError::ActionFailed {
            action: action.to_string(),
            reason: error.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            JobError::RecommendationUnavailable(_) => "RECOMMENDATION_UNAVAILABLE",
            JobError::ProfileIncomplete { .. } => "PROFILE_INCOMPLETE",
            JobError::MatchFailed(_) => "MATCH_FAILED",
            JobError::AlreadyApplied(_) => "ALREADY_APPLIED",
            JobError::ActionFailed { .. } => "ACTION_FAILED",
            JobError::NotFound(_) => "NOT_FOUND",
            JobError::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same request can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            JobError::MatchFailed(_) | JobError::ActionFailed { .. } | JobError::Other(_)
        )
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            JobError::RecommendationUnavailable(_) => vec![
                "Add your skills to your profile".to_string(),
                "Set a preferred position or industry".to_string(),
            ],
            JobError::ProfileIncomplete { missing } => missing
                .iter()
                .map(|item| format!("Add your {}", item))
                .collect(),
            JobError::MatchFailed(_) => vec![
                "Try the match again in a few moments".to_string(),
            ],
            JobError::AlreadyApplied(_) => vec![
                "Check your applications list".to_string(),
            ],
            JobError::ActionFailed { .. } => vec![
                "Try again in a few moments".to_string(),
            ],
            JobError::NotFound(_) => vec![
                "Refresh the job list".to_string(),
            ],
            JobError::Other(_) => vec![
                "Try again in a few moments".to_string(),
                "Contact support if the problem persists".to_string(),
            ],
        }
    }
}
