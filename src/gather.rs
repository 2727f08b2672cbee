// src/gather.rs
//! Concurrent profile lookups where every field degrades on its own.
//!
//! A failed lookup is logged and replaced by an empty value; it never
//! cancels or fails the sibling lookups.

use anyhow::Result;
use tracing::warn;

use crate::types::profile::{ProfileBundle, ProfileReadiness, UserMatchProfile};
use crate::upstream::ProfileService;

fn or_none<T>(label: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Profile lookup '{}' failed, continuing without it: {:#}", label, e);
            None
        }
    }
}

fn or_empty<T>(label: &str, result: Result<Vec<T>>) -> Vec<T> {
    or_none(label, result).unwrap_or_default()
}

/// Everything an AI-match request needs.
pub async fn gather_profile_bundle(profiles: &dyn ProfileService) -> ProfileBundle {
    let (profile, address, educations, experiences, job_preference, skills, ai_score) = tokio::join!(
        profiles.profile(),
        profiles.address(),
        profiles.educations(),
        profiles.experiences(),
        profiles.job_preference(),
        profiles.skills(),
        profiles.ai_score(),
    );

    ProfileBundle {
        profile: or_none("profile", profile),
        address: or_none("address", address),
        educations: or_empty("educations", educations),
        experiences: or_empty("experiences", experiences),
        job_preference: or_none("job_preference", job_preference),
        skills: or_empty("skills", skills),
        ai_score: or_none("ai_score", ai_score),
    }
}

/// Inputs of the local recommendation scorer.
pub async fn gather_match_profile(profiles: &dyn ProfileService) -> UserMatchProfile {
    let (ai_score, skills, job_preference) = tokio::join!(
        profiles.ai_score(),
        profiles.skills(),
        profiles.job_preference(),
    );

    UserMatchProfile {
        ai_score: or_none("ai_score", ai_score),
        skills: or_empty("skills", skills),
        job_preference: or_none("job_preference", job_preference),
    }
}

/// Completeness check run before an AI match is offered.
pub async fn gather_readiness(profiles: &dyn ProfileService) -> ProfileReadiness {
    let (profile, educations, experiences, job_preference) = tokio::join!(
        profiles.profile(),
        profiles.educations(),
        profiles.experiences(),
        profiles.job_preference(),
    );

    ProfileReadiness::from_bundle(&ProfileBundle {
        profile: or_none("profile", profile),
        educations: or_empty("educations", educations),
        experiences: or_empty("experiences", experiences),
        job_preference: or_none("job_preference", job_preference),
        ..Default::default()
    })
}
