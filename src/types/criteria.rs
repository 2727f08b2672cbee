// src/types/criteria.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::card::{JobType, SeniorityLevel, WorkMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    #[default]
    Recent,
    Salary,
    Applicants,
    Distance,
    MatchScore,
}

impl FromStr for SortOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(SortOption::Recent),
            "salary" => Ok(SortOption::Salary),
            "applicants" => Ok(SortOption::Applicants),
            "distance" => Ok(SortOption::Distance),
            "matchscore" | "match_score" | "match-score" | "score" => Ok(SortOption::MatchScore),
            _ => anyhow::bail!("Unknown sort option: {}", s),
        }
    }
}

/// Active filters, sort option and page of the general job list.
///
/// `None` on an enum filter is the "All" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub query: String,
    pub location: String,
    pub job_type: Option<JobType>,
    pub level: Option<SeniorityLevel>,
    pub work_mode: Option<WorkMode>,
    pub sort: SortOption,
    pub page: usize,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            location: String::new(),
            job_type: None,
            level: None,
            work_mode: None,
            sort: SortOption::Recent,
            page: 1,
        }
    }
}

/// Parse a filter value where `All` (or empty) means no constraint.
pub fn parse_choice<T>(value: Option<&str>) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

/// Salary buckets offered by the near-me view. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryBucket {
    #[serde(rename = "0-15000")]
    UpTo15k,
    #[serde(rename = "15000-25000")]
    From15kTo25k,
    #[serde(rename = "25000-40000")]
    From25kTo40k,
    #[serde(rename = "40000-60000")]
    From40kTo60k,
    #[serde(rename = "60000+")]
    Above60k,
}

impl SalaryBucket {
    pub const ALL: [SalaryBucket; 5] = [
        SalaryBucket::UpTo15k,
        SalaryBucket::From15kTo25k,
        SalaryBucket::From25kTo40k,
        SalaryBucket::From40kTo60k,
        SalaryBucket::Above60k,
    ];

    pub fn bounds(&self) -> (u64, u64) {
        match self {
            SalaryBucket::UpTo15k => (0, 15_000),
            SalaryBucket::From15kTo25k => (15_000, 25_000),
            SalaryBucket::From25kTo40k => (25_000, 40_000),
            SalaryBucket::From40kTo60k => (40_000, 60_000),
            SalaryBucket::Above60k => (60_000, u64::MAX),
        }
    }

    pub fn contains(&self, salary: u64) -> bool {
        let (min, max) = self.bounds();
        salary >= min && salary <= max
    }

    pub fn value(&self) -> &'static str {
        match self {
            SalaryBucket::UpTo15k => "0-15000",
            SalaryBucket::From15kTo25k => "15000-25000",
            SalaryBucket::From25kTo40k => "25000-40000",
            SalaryBucket::From40kTo60k => "40000-60000",
            SalaryBucket::Above60k => "60000+",
        }
    }
}

impl FromStr for SalaryBucket {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SalaryBucket::ALL
            .into_iter()
            .find(|bucket| bucket.value() == trimmed)
            .ok_or_else(|| anyhow::anyhow!("Unknown salary range: {}", s))
    }
}

impl fmt::Display for SalaryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Filters of the near-me view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearMeCriteria {
    pub max_distance_km: Option<f64>,
    pub job_types: Vec<JobType>,
    pub salary_ranges: Vec<SalaryBucket>,
    pub recommended: bool,
}

impl NearMeCriteria {
    pub fn with_max_distance(max_distance_km: f64) -> Self {
        Self {
            max_distance_km: Some(max_distance_km),
            job_types: Vec::new(),
            salary_ranges: Vec::new(),
            recommended: false,
        }
    }

    /// Number of chip filters shown as active (distance excluded).
    pub fn active_filter_count(&self) -> usize {
        self.job_types.len() + self.salary_ranges.len() + usize::from(self.recommended)
    }
}
