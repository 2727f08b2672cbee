// src/types/profile.rs
//! Records served by the user profile/persistence service.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name_th: Option<String>,
    pub last_name_th: Option<String>,
    pub first_name_en: Option<String>,
    pub last_name_en: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl UserProfile {
    /// A full name in either Thai or English.
    pub fn has_name(&self) -> bool {
        let thai = non_empty(&self.first_name_th).is_some() && non_empty(&self.last_name_th).is_some();
        let english = non_empty(&self.first_name_en).is_some() && non_empty(&self.last_name_en).is_some();
        thai || english
    }

    /// English name parts preferred, Thai parts as fallback.
    pub fn display_name(&self) -> String {
        let first = non_empty(&self.first_name_en)
            .or_else(|| non_empty(&self.first_name_th))
            .unwrap_or("");
        let last = non_empty(&self.last_name_en)
            .or_else(|| non_empty(&self.last_name_th))
            .unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAddress {
    pub province: Option<String>,
    pub district: Option<String>,
    pub subdistrict: Option<String>,
    pub postal_code: Option<String>,
    pub address_detail: Option<String>,
}

impl UserAddress {
    /// `subdistrict, district, province, postal_code`, blanks skipped.
    pub fn joined(&self) -> String {
        [
            &self.subdistrict,
            &self.district,
            &self.province,
            &self.postal_code,
        ]
        .into_iter()
        .filter_map(non_empty)
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub major: Option<String>,
}

impl Education {
    pub fn summary(&self) -> String {
        format!(
            "{} - {} @ {}",
            self.degree,
            self.major.as_deref().unwrap_or(""),
            self.school
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub position: String,
}

impl Experience {
    pub fn summary(&self) -> String {
        format!("{} @ {}", self.position, self.company)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPreference {
    pub industry: Option<String>,
    #[serde(default)]
    pub position: String,
    pub work_time: Option<String>,
}

/// `GET /api/user/skills`; the list itself may be null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSet {
    pub skills: Option<Vec<String>>,
}

/// Previously computed profile assessment from the AI score record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiScore {
    pub score: f64,
    pub level: Option<String>,
    #[serde(default)]
    pub recommended_position: String,
    #[serde(default)]
    pub analysis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: Option<String>,
    pub post_id: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: String,
    pub job_id: String,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Everything gathered for an AI-match request. Each field degrades
/// independently when its lookup fails.
#[derive(Debug, Clone, Default)]
pub struct ProfileBundle {
    pub profile: Option<UserProfile>,
    pub address: Option<UserAddress>,
    pub educations: Vec<Education>,
    pub experiences: Vec<Experience>,
    pub job_preference: Option<JobPreference>,
    pub skills: Vec<String>,
    pub ai_score: Option<AiScore>,
}

/// Profile inputs of the local recommendation scorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserMatchProfile {
    pub ai_score: Option<AiScore>,
    pub skills: Vec<String>,
    pub job_preference: Option<JobPreference>,
}

impl UserMatchProfile {
    pub fn has_data(&self) -> bool {
        self.ai_score.is_some() || self.job_preference.is_some() || !self.skills.is_empty()
    }

    /// AI-recommended position first, then the stated preference.
    pub fn target_position(&self) -> Option<&str> {
        self.ai_score
            .as_ref()
            .map(|score| score.recommended_position.trim())
            .filter(|p| !p.is_empty())
            .or_else(|| {
                self.job_preference
                    .as_ref()
                    .map(|pref| pref.position.trim())
                    .filter(|p| !p.is_empty())
            })
    }

    pub fn target_industry(&self) -> Option<&str> {
        self.job_preference
            .as_ref()
            .and_then(|pref| pref.industry.as_deref())
            .map(str::trim)
            .filter(|i| !i.is_empty())
    }
}

impl From<&ProfileBundle> for UserMatchProfile {
    fn from(bundle: &ProfileBundle) -> Self {
        Self {
            ai_score: bundle.ai_score.clone(),
            skills: bundle.skills.clone(),
            job_preference: bundle.job_preference.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MissingProfileItem {
    Name,
    EducationOrExperience,
    PreferredPosition,
}

impl fmt::Display for MissingProfileItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissingProfileItem::Name => "full name",
            MissingProfileItem::EducationOrExperience => "education or work experience",
            MissingProfileItem::PreferredPosition => "preferred position",
        };
        f.write_str(label)
    }
}

/// Outcome of the profile completeness check run before an AI match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileReadiness {
    pub missing: Vec<MissingProfileItem>,
}

impl ProfileReadiness {
    pub fn from_bundle(bundle: &ProfileBundle) -> Self {
        let mut missing = Vec::new();

        if !bundle.profile.as_ref().is_some_and(UserProfile::has_name) {
            missing.push(MissingProfileItem::Name);
        }
        if bundle.educations.is_empty() && bundle.experiences.is_empty() {
            missing.push(MissingProfileItem::EducationOrExperience);
        }
        let has_position = bundle
            .job_preference
            .as_ref()
            .is_some_and(|pref| !pref.position.trim().is_empty());
        if !has_position {
            missing.push(MissingProfileItem::PreferredPosition);
        }

        Self { missing }
    }

    pub fn can_match(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_english() {
        let profile = UserProfile {
            first_name_th: Some("สมชาย".to_string()),
            last_name_th: Some("ใจดี".to_string()),
            first_name_en: Some("Somchai".to_string()),
            last_name_en: Some("Jaidee".to_string()),
            ..Default::default()
        };
        assert!(profile.has_name());
        assert_eq!(profile.display_name(), "Somchai Jaidee");
    }

    #[test]
    fn test_address_joined_skips_blanks() {
        let address = UserAddress {
            province: Some("Bangkok".to_string()),
            district: Some(" ".to_string()),
            subdistrict: Some("Silom".to_string()),
            postal_code: Some("10500".to_string()),
            address_detail: None,
        };
        assert_eq!(address.joined(), "Silom, Bangkok, 10500");
    }

    #[test]
    fn test_target_position_precedence() {
        let mut profile = UserMatchProfile {
            ai_score: Some(AiScore {
                recommended_position: "Data Engineer".to_string(),
                ..Default::default()
            }),
            skills: vec![],
            job_preference: Some(JobPreference {
                position: "Analyst".to_string(),
                ..Default::default()
            }),
        };
        assert_eq!(profile.target_position(), Some("Data Engineer"));

        profile.ai_score.as_mut().unwrap().recommended_position = String::new();
        assert_eq!(profile.target_position(), Some("Analyst"));
    }

    #[test]
    fn test_readiness_lists_missing_items() {
        let readiness = ProfileReadiness::from_bundle(&ProfileBundle::default());
        assert!(!readiness.can_match());
        assert_eq!(
            readiness.missing,
            vec![
                MissingProfileItem::Name,
                MissingProfileItem::EducationOrExperience,
                MissingProfileItem::PreferredPosition,
            ]
        );
    }
}
