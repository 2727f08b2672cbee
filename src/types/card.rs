// src/types/card.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pipeline::geo::GeoPoint;
use crate::pipeline::normalizer::{DESCRIPTION_PLACEHOLDER, SECTION_PLACEHOLDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkMode {
    Onsite,
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeniorityLevel {
    Junior,
    Mid,
    Senior,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    Contract,
    Freelance,
    Internship,
}

impl JobType {
    /// Lenient mapping of the listing service's free-form `job_type`.
    /// Unrecognised values fall back to Full-Time.
    pub fn from_raw(raw: &str) -> Self {
        raw.parse().unwrap_or(JobType::FullTime)
    }
}

fn squash(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "fulltime" => Ok(JobType::FullTime),
            "parttime" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "freelance" => Ok(JobType::Freelance),
            "internship" | "intern" => Ok(JobType::Internship),
            _ => anyhow::bail!("Unknown job type: {}", s),
        }
    }
}

impl FromStr for WorkMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "onsite" => Ok(WorkMode::Onsite),
            "remote" => Ok(WorkMode::Remote),
            "hybrid" => Ok(WorkMode::Hybrid),
            _ => anyhow::bail!("Unknown work mode: {}", s),
        }
    }
}

impl FromStr for SeniorityLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "junior" => Ok(SeniorityLevel::Junior),
            "mid" => Ok(SeniorityLevel::Mid),
            "senior" => Ok(SeniorityLevel::Senior),
            "expert" => Ok(SeniorityLevel::Expert),
            _ => anyhow::bail!("Unknown level: {}", s),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobType::FullTime => "Full-Time",
            JobType::PartTime => "Part-Time",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
            JobType::Internship => "Internship",
        };
        f.write_str(label)
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for SeniorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Display projection of a [`JobPosting`](super::JobPosting) with inferred fields.
///
/// Every derived field is a pure function of the source posting, so a changed
/// posting means a fresh card from the normalizer, never an edit of this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCard {
    /// 1-based position in the fetched list.
    pub id: usize,
    pub post_id: String,
    pub company_id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub coordinates: Option<GeoPoint>,
    pub work_mode: WorkMode,
    pub rate: String,
    pub salary_sort: Option<u64>,
    pub job_type: JobType,
    pub applicants: String,
    pub level: SeniorityLevel,
    pub posted: String,
    pub sort_index: usize,
    pub tags: Vec<String>,
    pub description: Vec<String>,
    pub responsibilities: String,
    pub qualifications: String,
    pub benefits: String,
}

impl JobCard {
    /// Matches either the upstream post id or the numeric card id.
    pub fn matches_id(&self, id: &str) -> bool {
        self.post_id == id || self.id.to_string() == id
    }

    /// Lower-cased text searched by the free-text query: role, company and tags.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.role, self.company, self.tags.join(" ")).to_lowercase()
    }

    /// Lower-cased text used by the recommendation scorer: role, description
    /// and qualifications. Placeholder sections contribute nothing.
    pub fn match_text(&self) -> String {
        let description = self
            .description
            .iter()
            .filter(|line| line.as_str() != DESCRIPTION_PLACEHOLDER)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        let qualifications = if self.qualifications == SECTION_PLACEHOLDER {
            ""
        } else {
            self.qualifications.as_str()
        };
        format!("{} {} {}", self.role, description, qualifications).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_spellings() {
        assert_eq!(JobType::from_raw("Full-Time"), JobType::FullTime);
        assert_eq!(JobType::from_raw("FullTime"), JobType::FullTime);
        assert_eq!(JobType::from_raw("part_time"), JobType::PartTime);
        assert_eq!(JobType::from_raw("Part-time"), JobType::PartTime);
        assert_eq!(JobType::from_raw("Contract"), JobType::Contract);
        assert_eq!(JobType::from_raw("something else"), JobType::FullTime);
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("remote".parse::<WorkMode>().unwrap(), WorkMode::Remote);
        assert_eq!("EXPERT".parse::<SeniorityLevel>().unwrap(), SeniorityLevel::Expert);
        assert!("anywhere".parse::<WorkMode>().is_err());
    }
}
