// src/types/posting.rs
use serde::{Deserialize, Serialize};

use crate::pipeline::geo::GeoPoint;

/// Lifecycle status of a posting as reported by the listing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    Active,
    Closed,
    Draft,
    #[serde(other)]
    Unknown,
}

/// Raw employer-submitted job record, as returned by `GET /api/user/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub company_id: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub job_type: String,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: PostingStatus,
    pub responsibilities: Option<String>,
    pub qualifications: Option<String>,
    pub benefits: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl JobPosting {
    pub fn is_active(&self) -> bool {
        self.status == PostingStatus::Active
    }

    /// Both coordinates present and finite.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(GeoPoint::new(lat, lon))
            }
            _ => None,
        }
    }
}

/// Subset of `GET /api/companies/:company_id` used for display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: Option<String>,
    pub company_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_deserializes_with_missing_optionals() {
        let raw = r#"{
            "id": "p1",
            "company_id": "c1",
            "title": "Backend Engineer",
            "status": "active",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let posting: JobPosting = serde_json::from_str(raw).unwrap();
        assert!(posting.is_active());
        assert_eq!(posting.location, "");
        assert!(posting.tags.is_none());
        assert!(posting.coordinates().is_none());
    }

    #[test]
    fn test_unknown_status_is_not_active() {
        let raw = r#"{"id":"p1","company_id":"c1","title":"t","status":"archived","created_at":""}"#;
        let posting: JobPosting = serde_json::from_str(raw).unwrap();
        assert_eq!(posting.status, PostingStatus::Unknown);
        assert!(!posting.is_active());
    }
}
