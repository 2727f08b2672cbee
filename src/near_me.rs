// src/near_me.rs
//! "Jobs near me": distance-annotated cards with an optional recommended
//! mode driven by the local scorer.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::JobError;
use crate::pipeline::filter::{matches_job_types, matches_salary_buckets, within_distance};
use crate::pipeline::geo::{DistanceBand, GeoPoint};
use crate::pipeline::ranker::{parse_applicants, rank, Rankable};
use crate::pipeline::scorer::MatchScorer;
use crate::types::card::JobCard;
use crate::types::criteria::{NearMeCriteria, SortOption};
use crate::types::profile::UserMatchProfile;

/// One-shot source of the user's position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<GeoPoint>;
}

/// Position supplied up front by the caller, or a denied request.
pub struct FixedLocation(pub Option<GeoPoint>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<GeoPoint> {
        self.0
            .ok_or_else(|| anyhow::anyhow!("Location permission denied"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserLocation {
    pub point: GeoPoint,
    pub is_fallback: bool,
}

/// Ask `provider` once. Denial, failure or a timeout all resolve to
/// `fallback`, so this never waits longer than `timeout`.
pub async fn acquire_location(
    provider: &dyn LocationProvider,
    timeout: Duration,
    fallback: GeoPoint,
) -> UserLocation {
    match tokio::time::timeout(timeout, provider.current_location()).await {
        Ok(Ok(point)) if point.lat.is_finite() && point.lon.is_finite() => UserLocation {
            point,
            is_fallback: false,
        },
        Ok(Ok(point)) => {
            warn!("Ignoring invalid location {:?}, using fallback", point);
            UserLocation { point: fallback, is_fallback: true }
        }
        Ok(Err(e)) => {
            warn!("Location unavailable, using fallback: {:#}", e);
            UserLocation { point: fallback, is_fallback: true }
        }
        Err(_) => {
            warn!("Location request timed out after {:?}, using fallback", timeout);
            UserLocation { point: fallback, is_fallback: true }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyJob {
    #[serde(flatten)]
    pub card: JobCard,
    pub distance_km: f64,
    /// Distance rounded to one decimal, e.g. `"3.2 km"`.
    pub distance_label: String,
    pub band: DistanceBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
}

impl Rankable for NearbyJob {
    fn sort_index(&self) -> usize {
        self.card.sort_index
    }

    fn salary_key(&self) -> Option<u64> {
        self.card.salary_sort
    }

    fn applicant_count(&self) -> u64 {
        parse_applicants(&self.card.applicants)
    }

    fn distance_km(&self) -> Option<f64> {
        Some(self.distance_km)
    }

    fn match_score(&self) -> Option<f64> {
        self.match_score.map(f64::from)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NearMeView {
    pub origin: UserLocation,
    pub jobs: Vec<NearbyJob>,
    pub active_filter_count: usize,
    pub can_recommend: bool,
}

/// Cards with coordinates, measured from one origin.
#[derive(Debug, Clone)]
pub struct NearMe {
    origin: UserLocation,
    jobs: Vec<NearbyJob>,
    profile: UserMatchProfile,
    scorer: MatchScorer,
}

impl NearMe {
    /// Cards without coordinates are left out.
    pub fn new(cards: &[JobCard], origin: UserLocation, scorer: MatchScorer) -> Self {
        let mut jobs: Vec<NearbyJob> = cards
            .iter()
            .filter_map(|card| {
                let point = card.coordinates?;
                let distance_km = origin.point.distance_km(&point);
                Some(NearbyJob {
                    card: card.clone(),
                    distance_km,
                    distance_label: format!("{:.1} km", distance_km),
                    band: DistanceBand::classify(distance_km),
                    match_score: None,
                })
            })
            .collect();
        jobs = rank(&jobs, SortOption::Distance);

        info!(
            "{} of {} jobs have a location (origin {:?})",
            jobs.len(),
            cards.len(),
            origin.point
        );

        Self {
            origin,
            jobs,
            profile: UserMatchProfile::default(),
            scorer,
        }
    }

    pub fn with_profile(mut self, profile: UserMatchProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn origin(&self) -> UserLocation {
        self.origin
    }

    pub fn can_recommend(&self) -> bool {
        self.profile.has_data()
    }

    /// Filtered jobs, by distance or, in recommended mode, by match score.
    /// Recommended mode is refused when there is no profile data to score with.
    pub fn view(&self, criteria: &NearMeCriteria) -> Result<NearMeView, JobError> {
        if criteria.recommended {
            if let Err(e) = MatchScorer::ensure_available(&self.profile) {
                info!("Recommended mode refused: {}", e);
                return Err(e);
            }
        }

        let mut jobs: Vec<NearbyJob> = self
            .jobs
            .iter()
            .filter(|job| within_distance(Some(job.distance_km), criteria.max_distance_km))
            .filter(|job| matches_job_types(&job.card, &criteria.job_types))
            .filter(|job| matches_salary_buckets(&job.card, &criteria.salary_ranges))
            .cloned()
            .collect();

        if criteria.recommended {
            for job in &mut jobs {
                job.match_score = Some(self.scorer.score(
                    &job.card,
                    &self.profile,
                    Some(job.distance_km),
                ));
            }
            jobs = rank(&jobs, SortOption::MatchScore);
        }

        Ok(NearMeView {
            origin: self.origin,
            jobs,
            active_filter_count: criteria.active_filter_count(),
            can_recommend: self.can_recommend(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_cards;
    use crate::types::card::JobType;
    use crate::types::criteria::SalaryBucket;
    use crate::types::profile::JobPreference;

    const BANGKOK: GeoPoint = GeoPoint::new(13.7563, 100.5018);

    struct SlowLocation;

    #[async_trait]
    impl LocationProvider for SlowLocation {
        async fn current_location(&self) -> Result<GeoPoint> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(GeoPoint::new(0.0, 0.0))
        }
    }

    fn near_me() -> NearMe {
        NearMe::new(
            &sample_cards(),
            UserLocation { point: BANGKOK, is_fallback: false },
            MatchScorer::default(),
        )
    }

    #[tokio::test]
    async fn test_denied_location_uses_fallback() {
        let location =
            acquire_location(&FixedLocation(None), Duration::from_secs(1), BANGKOK).await;
        assert!(location.is_fallback);
        assert_eq!(location.point, BANGKOK);

        let chiang_mai = GeoPoint::new(18.7883, 98.9853);
        let location =
            acquire_location(&FixedLocation(Some(chiang_mai)), Duration::from_secs(1), BANGKOK)
                .await;
        assert!(!location.is_fallback);
        assert_eq!(location.point, chiang_mai);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_location_times_out() {
        let location = acquire_location(&SlowLocation, Duration::from_secs(10), BANGKOK).await;
        assert!(location.is_fallback);
    }

    #[test]
    fn test_jobs_without_coordinates_dropped_and_sorted() {
        let near = near_me();
        let view = near.view(&NearMeCriteria::default()).unwrap();
        assert_eq!(view.jobs.len(), 8);
        for pair in view.jobs.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
        assert_eq!(view.jobs[0].card.post_id, "sample-0001");
        assert_eq!(view.jobs[0].band, DistanceBand::Near);
    }

    #[test]
    fn test_default_distance_filter() {
        let near = near_me();
        let view = near.view(&NearMeCriteria::with_max_distance(50.0)).unwrap();
        assert!(view.jobs.iter().all(|j| j.distance_km <= 50.0));
        assert!(!view.jobs.iter().any(|j| j.card.post_id == "sample-0003"));
        assert!(view.jobs.iter().any(|j| j.card.post_id == "sample-0008"));
    }

    #[test]
    fn test_type_and_salary_filters() {
        let near = near_me();
        let criteria = NearMeCriteria {
            job_types: vec![JobType::Contract],
            salary_ranges: vec![SalaryBucket::From25kTo40k],
            ..NearMeCriteria::with_max_distance(50.0)
        };
        let view = near.view(&criteria).unwrap();
        let ids: Vec<&str> = view.jobs.iter().map(|j| j.card.post_id.as_str()).collect();
        assert_eq!(ids, vec!["sample-0008"]);
        assert_eq!(view.active_filter_count, 2);
    }

    #[test]
    fn test_recommended_requires_profile() {
        let near = near_me();
        let criteria = NearMeCriteria {
            recommended: true,
            ..Default::default()
        };
        assert!(!near.can_recommend());
        assert!(matches!(
            near.view(&criteria),
            Err(JobError::RecommendationUnavailable(_))
        ));
    }

    #[test]
    fn test_recommended_sorts_by_score() {
        let near = near_me().with_profile(UserMatchProfile {
            skills: vec!["python".to_string(), "sql".to_string()],
            job_preference: Some(JobPreference {
                position: "Data Analyst".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        });
        let criteria = NearMeCriteria {
            recommended: true,
            ..Default::default()
        };
        let view = near.view(&criteria).unwrap();
        assert!(view.can_recommend);
        assert!(view.jobs.iter().all(|j| j.match_score.is_some()));
        for pair in view.jobs.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
        assert_eq!(view.jobs[0].card.post_id, "sample-0002");
    }
}
