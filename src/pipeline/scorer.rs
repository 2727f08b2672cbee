// src/pipeline/scorer.rs
//! Local keyword-overlap relevance score used by the near-me recommendation
//! mode. The AI-match flow never goes through here.

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::JobError;
use crate::types::card::JobCard;
use crate::types::profile::UserMatchProfile;

static KEYWORD_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("static keyword regex"));

/// Distances strictly below `below_km` earn `bonus`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceTier {
    pub below_km: f64,
    pub bonus: f64,
}

/// Component weights of the recommendation score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub position: f64,
    pub skills: f64,
    pub industry: f64,
    /// Ascending by `below_km`; the first tier that contains the distance wins.
    pub distance_tiers: Vec<DistanceTier>,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            position: 40.0,
            skills: 30.0,
            industry: 20.0,
            distance_tiers: vec![
                DistanceTier { below_km: 5.0, bonus: 10.0 },
                DistanceTier { below_km: 15.0, bonus: 7.0 },
                DistanceTier { below_km: 30.0, bonus: 4.0 },
            ],
        }
    }
}

impl ScoringWeights {
    fn max_distance_bonus(&self) -> f64 {
        self.distance_tiers
            .iter()
            .map(|tier| tier.bonus)
            .fold(0.0, f64::max)
    }

    /// Reject weights that could push a score outside 0..=100.
    pub fn validate(&self) -> Result<()> {
        let weights = [self.position, self.skills, self.industry];
        let bonuses = self.distance_tiers.iter().map(|t| t.bonus);
        if weights
            .into_iter()
            .chain(bonuses)
            .any(|w| !w.is_finite() || w < 0.0)
        {
            anyhow::bail!("Scoring weights must be finite and non-negative");
        }
        if self
            .distance_tiers
            .windows(2)
            .any(|pair| pair[0].below_km >= pair[1].below_km)
        {
            anyhow::bail!("Distance tiers must be sorted by ascending distance");
        }

        let max_total = self.position + self.skills + self.industry + self.max_distance_bonus();
        if max_total > 100.0 {
            anyhow::bail!(
                "Scoring weights add up to {} but the score is capped at 100",
                max_total
            );
        }
        Ok(())
    }

    fn distance_bonus(&self, distance_km: Option<f64>) -> f64 {
        let Some(distance) = distance_km.filter(|d| d.is_finite()) else {
            return 0.0;
        };
        self.distance_tiers
            .iter()
            .find(|tier| distance < tier.below_km)
            .map(|tier| tier.bonus)
            .unwrap_or(0.0)
    }
}

/// Per-component contributions, before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub position: f64,
    pub skills: f64,
    pub industry: f64,
    pub distance: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.position + self.skills + self.industry + self.distance
    }
}

fn position_keywords(position: &str) -> Vec<String> {
    KEYWORD_SPLIT
        .split(&position.to_lowercase())
        .filter(|keyword| keyword.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: ScoringWeights,
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Recommended mode needs at least one of: AI recommendation, skills,
    /// stated preference.
    pub fn ensure_available(profile: &UserMatchProfile) -> Result<(), JobError> {
        if profile.has_data() {
            Ok(())
        } else {
            Err(JobError::RecommendationUnavailable(
                "Complete your skills or job preference to see recommended jobs".to_string(),
            ))
        }
    }

    pub fn breakdown(
        &self,
        card: &JobCard,
        profile: &UserMatchProfile,
        distance_km: Option<f64>,
    ) -> ScoreBreakdown {
        if !profile.has_data() {
            return ScoreBreakdown::default();
        }

        let text = card.match_text();
        let mut breakdown = ScoreBreakdown::default();

        if let Some(position) = profile.target_position() {
            let keywords = position_keywords(position);
            let matched = keywords.iter().filter(|k| text.contains(k.as_str())).count();
            if matched > 0 {
                let fraction = matched as f64 / keywords.len() as f64;
                breakdown.position = (fraction * self.weights.position).min(self.weights.position);
            }
        }

        let skills: Vec<String> = profile
            .skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !skills.is_empty() {
            let matched = skills.iter().filter(|s| text.contains(s.as_str())).count();
            breakdown.skills = matched as f64 / skills.len() as f64 * self.weights.skills;
        }

        if let Some(industry) = profile.target_industry() {
            if text.contains(&industry.to_lowercase()) {
                breakdown.industry = self.weights.industry;
            }
        }

        breakdown.distance = self.weights.distance_bonus(distance_km);
        breakdown
    }

    /// Rounded score in `0..=100`.
    pub fn score(&self, card: &JobCard, profile: &UserMatchProfile, distance_km: Option<f64>) -> u8 {
        let total = self.breakdown(card, profile, distance_km).total().round();
        total.clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_cards;
    use crate::types::profile::{AiScore, JobPreference};

    fn card_with(role: &str, description: &str) -> JobCard {
        let mut card = sample_cards().remove(0);
        card.role = role.to_string();
        card.description = vec![description.to_string()];
        card.qualifications = String::new();
        card
    }

    fn skills_only(skills: &[&str]) -> UserMatchProfile {
        UserMatchProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_skills_component_is_fractional() {
        let scorer = MatchScorer::default();
        let card = card_with("Engineer", "python developer wanted");
        let breakdown = scorer.breakdown(&card, &skills_only(&["Python", "SQL"]), None);
        assert_eq!(breakdown.skills, 15.0);
        assert_eq!(breakdown.total(), 15.0);
    }

    #[test]
    fn test_distance_tiers() {
        let scorer = MatchScorer::default();
        let card = card_with("Engineer", "");
        let profile = skills_only(&["cobol"]);
        assert_eq!(scorer.breakdown(&card, &profile, Some(3.0)).distance, 10.0);
        assert_eq!(scorer.breakdown(&card, &profile, Some(5.0)).distance, 7.0);
        assert_eq!(scorer.breakdown(&card, &profile, Some(20.0)).distance, 4.0);
        assert_eq!(scorer.breakdown(&card, &profile, Some(60.0)).distance, 0.0);
        assert_eq!(scorer.breakdown(&card, &profile, None).distance, 0.0);
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        let scorer = MatchScorer::default();
        let empty = UserMatchProfile::default();
        for card in sample_cards() {
            assert_eq!(scorer.score(&card, &empty, Some(1.0)), 0);
        }
        assert!(matches!(
            MatchScorer::ensure_available(&empty),
            Err(JobError::RecommendationUnavailable(_))
        ));
    }

    #[test]
    fn test_position_prefers_ai_recommendation() {
        let scorer = MatchScorer::default();
        let card = card_with("Data Engineer", "build pipelines");
        let profile = UserMatchProfile {
            ai_score: Some(AiScore {
                recommended_position: "Data Engineer".to_string(),
                ..Default::default()
            }),
            skills: vec![],
            job_preference: Some(JobPreference {
                position: "Chef".to_string(),
                ..Default::default()
            }),
        };
        assert_eq!(scorer.breakdown(&card, &profile, None).position, 40.0);
    }

    #[test]
    fn test_short_keywords_ignored() {
        let scorer = MatchScorer::default();
        let card = card_with("QA Engineer", "");
        let profile = UserMatchProfile {
            job_preference: Some(JobPreference {
                position: "QA, Automation Engineer".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        // "qa" is dropped, one of "automation"/"engineer" matches.
        assert_eq!(scorer.breakdown(&card, &profile, None).position, 20.0);
    }

    #[test]
    fn test_industry_is_binary() {
        let scorer = MatchScorer::default();
        let card = card_with("Analyst", "fintech payments platform");
        let profile = UserMatchProfile {
            job_preference: Some(JobPreference {
                industry: Some("FinTech".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(scorer.breakdown(&card, &profile, None).industry, 20.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let scorer = MatchScorer::default();
        let profile = UserMatchProfile {
            ai_score: Some(AiScore {
                recommended_position: "Senior Backend Engineer".to_string(),
                ..Default::default()
            }),
            skills: vec!["Rust".to_string(), "backend".to_string()],
            job_preference: Some(JobPreference {
                industry: Some("engineer".to_string()),
                position: String::new(),
                work_time: None,
            }),
        };
        let mut card = card_with("Senior Backend Engineer", "rust backend");
        card.tags.clear();
        for distance in [None, Some(0.0), Some(10.0), Some(500.0)] {
            let score = scorer.score(&card, &profile, distance);
            assert!(score <= 100);
        }
        assert_eq!(scorer.score(&card, &profile, Some(0.0)), 100);
    }

    #[test]
    fn test_validate_rejects_overweight() {
        assert!(ScoringWeights::default().validate().is_ok());
        let heavy = ScoringWeights {
            position: 60.0,
            ..Default::default()
        };
        assert!(heavy.validate().is_err());
        let unsorted = ScoringWeights {
            distance_tiers: vec![
                DistanceTier { below_km: 15.0, bonus: 7.0 },
                DistanceTier { below_km: 5.0, bonus: 10.0 },
            ],
            ..Default::default()
        };
        assert!(unsorted.validate().is_err());
    }
}
