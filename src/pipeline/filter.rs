// src/pipeline/filter.rs
//! Conjunctive predicate filter over job cards.
//!
//! Each predicate passes everything when its criterion is unset, so dropping
//! any one criterion can only grow the result.

use crate::types::card::{JobCard, JobType};
use crate::types::criteria::{SalaryBucket, SearchCriteria};

pub fn matches_query(card: &JobCard, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || card.search_text().contains(&query)
}

pub fn matches_location(card: &JobCard, location: &str) -> bool {
    let location = location.trim().to_lowercase();
    location.is_empty() || card.location.to_lowercase().contains(&location)
}

/// `None` is the "All" choice.
pub fn matches_choice<T: PartialEq>(value: &T, choice: Option<&T>) -> bool {
    choice.map_or(true, |wanted| wanted == value)
}

pub fn matches_criteria(card: &JobCard, criteria: &SearchCriteria) -> bool {
    matches_query(card, &criteria.query)
        && matches_location(card, &criteria.location)
        && matches_choice(&card.job_type, criteria.job_type.as_ref())
        && matches_choice(&card.level, criteria.level.as_ref())
        && matches_choice(&card.work_mode, criteria.work_mode.as_ref())
}

/// Cards passing every active criterion, in input order.
pub fn filter_cards<'a>(cards: &'a [JobCard], criteria: &SearchCriteria) -> Vec<&'a JobCard> {
    cards
        .iter()
        .filter(|card| matches_criteria(card, criteria))
        .collect()
}

/// Once a maximum is set, an unknown distance never passes.
pub fn within_distance(distance_km: Option<f64>, max_distance_km: Option<f64>) -> bool {
    match max_distance_km {
        None => true,
        Some(max) => distance_km.is_some_and(|d| d <= max),
    }
}

pub fn matches_job_types(card: &JobCard, job_types: &[JobType]) -> bool {
    job_types.is_empty() || job_types.contains(&card.job_type)
}

/// A card without a parsable salary never matches an active bucket filter.
pub fn matches_salary_buckets(card: &JobCard, buckets: &[SalaryBucket]) -> bool {
    if buckets.is_empty() {
        return true;
    }
    card.salary_sort
        .is_some_and(|salary| buckets.iter().any(|bucket| bucket.contains(salary)))
}

/// Keep the selected id only while it is still in `visible`.
pub fn clear_stale_selection<'a, I>(selected: Option<&str>, visible: I) -> Option<String>
where
    I: IntoIterator<Item = &'a JobCard>,
{
    let selected = selected?;
    let mut visible = visible.into_iter();
    if visible.any(|card| card.matches_id(selected)) {
        Some(selected.to_string())
    } else {
        None
    }
}
