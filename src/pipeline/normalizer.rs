// src/pipeline/normalizer.rs
//! Turns a raw [`JobPosting`] into a display-ready [`JobCard`].
//!
//! Every inference here is a keyword or substring heuristic with a fixed
//! precedence. They are kept as separate named functions so each rule can be
//! tested and replaced on its own.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::types::card::{JobCard, JobType, SeniorityLevel, WorkMode};
use crate::types::posting::JobPosting;

pub const DESCRIPTION_PLACEHOLDER: &str = "No description provided.";
pub const SECTION_PLACEHOLDER: &str = "Not specified.";
pub const RATE_PLACEHOLDER: &str = "Negotiable";
pub const DEFAULT_APPLICANTS: &str = "0 / 50";

/// Checked top to bottom, first tier with a hit wins.
const LEVEL_RULES: &[(SeniorityLevel, &[&str])] = &[
    (
        SeniorityLevel::Senior,
        &["senior", "lead", "manager", "head", "principal"],
    ),
    (
        SeniorityLevel::Junior,
        &["junior", "intern", "trainee", "entry"],
    ),
    (
        SeniorityLevel::Expert,
        &["expert", "specialist", "director", "vp", "chief"],
    ),
];

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("static salary regex"));

/// Remote is checked before Hybrid, so "Remote / Hybrid" is Remote.
pub fn infer_work_mode(location: &str) -> WorkMode {
    let location = location.to_lowercase();
    if location.contains("remote") {
        WorkMode::Remote
    } else if location.contains("hybrid") {
        WorkMode::Hybrid
    } else {
        WorkMode::Onsite
    }
}

pub fn infer_level(title: &str) -> SeniorityLevel {
    let title = title.to_lowercase();
    LEVEL_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| title.contains(k)))
        .map(|(level, _)| *level)
        .unwrap_or(SeniorityLevel::Mid)
}

/// First number of a salary string once thousands separators are removed.
pub fn parse_salary_key(salary: &str) -> Option<u64> {
    let cleaned = salary.replace(',', "");
    FIRST_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse().ok())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // The listing service sometimes drops the offset.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Minutes, hours or days for anything under a week, else the calendar date.
pub fn relative_age(created_at: &str, now: DateTime<Utc>) -> String {
    let Some(created) = parse_timestamp(created_at) else {
        return created_at.to_string();
    };

    let delta = now.signed_duration_since(created);
    let minutes = delta.num_minutes().max(0);
    let hours = delta.num_hours().max(0);
    let days = delta.num_days().max(0);

    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        created.format("%Y-%m-%d").to_string()
    }
}

fn section_or_placeholder(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(SECTION_PLACEHOLDER)
        .to_string()
}

fn fallback_company_name(company_id: &str) -> String {
    let short: String = company_id.chars().take(8).collect();
    format!("Company {}", short)
}

/// Build the card for `posting`, the `index`-th posting of the fetched list.
pub fn normalize(
    posting: &JobPosting,
    index: usize,
    employer_name: Option<&str>,
    now: DateTime<Utc>,
) -> JobCard {
    let mut description: Vec<String> = posting
        .description
        .as_deref()
        .unwrap_or("")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if description.is_empty() {
        description.push(DESCRIPTION_PLACEHOLDER.to_string());
    }

    let salary = posting
        .salary_range
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let company = employer_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_company_name(&posting.company_id));

    JobCard {
        id: index + 1,
        post_id: posting.id.clone(),
        company_id: posting.company_id.clone(),
        company,
        role: posting.title.clone(),
        location: posting.location.clone(),
        coordinates: posting.coordinates(),
        work_mode: infer_work_mode(&posting.location),
        rate: salary.unwrap_or(RATE_PLACEHOLDER).to_string(),
        salary_sort: salary.and_then(parse_salary_key),
        job_type: JobType::from_raw(&posting.job_type),
        applicants: DEFAULT_APPLICANTS.to_string(),
        level: infer_level(&posting.title),
        posted: relative_age(&posting.created_at, now),
        sort_index: index,
        tags: posting.tags.clone().unwrap_or_default(),
        description,
        responsibilities: section_or_placeholder(&posting.responsibilities),
        qualifications: section_or_placeholder(&posting.qualifications),
        benefits: section_or_placeholder(&posting.benefits),
    }
}
