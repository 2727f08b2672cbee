// src/pipeline/ranker.rs
//! Interchangeable comparators for the ranked job lists.
//!
//! Missing keys are coerced to fixed sentinels before comparison and every
//! comparator falls back to the stable fetch index, so each one is a total
//! order and re-sorting a sorted list changes nothing.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::types::card::JobCard;
use crate::types::criteria::SortOption;

static APPLICANTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*/\s*\d+$").expect("static applicants regex"));

/// Numerator of an `"N / M"` applicant string, 0 when unparseable.
pub fn parse_applicants(applicants: &str) -> u64 {
    APPLICANTS
        .captures(applicants.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|n| n.as_str().parse().ok())
        .unwrap_or(0)
}

/// Sort keys of anything shown in a ranked job list.
pub trait Rankable {
    fn sort_index(&self) -> usize;

    fn salary_key(&self) -> Option<u64> {
        None
    }

    fn applicant_count(&self) -> u64 {
        0
    }

    fn distance_km(&self) -> Option<f64> {
        None
    }

    fn match_score(&self) -> Option<f64> {
        None
    }
}

impl Rankable for JobCard {
    fn sort_index(&self) -> usize {
        self.sort_index
    }

    fn salary_key(&self) -> Option<u64> {
        self.salary_sort
    }

    fn applicant_count(&self) -> u64 {
        parse_applicants(&self.applicants)
    }
}

impl<T: Rankable + ?Sized> Rankable for &T {
    fn sort_index(&self) -> usize {
        (**self).sort_index()
    }

    fn salary_key(&self) -> Option<u64> {
        (**self).salary_key()
    }

    fn applicant_count(&self) -> u64 {
        (**self).applicant_count()
    }

    fn distance_km(&self) -> Option<f64> {
        (**self).distance_km()
    }

    fn match_score(&self) -> Option<f64> {
        (**self).match_score()
    }
}

fn finite_or(value: Option<f64>, sentinel: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(sentinel)
}

pub fn compare<T: Rankable>(a: &T, b: &T, option: SortOption) -> Ordering {
    let primary = match option {
        SortOption::Recent => Ordering::Equal,
        SortOption::Salary => b
            .salary_key()
            .unwrap_or(0)
            .cmp(&a.salary_key().unwrap_or(0)),
        SortOption::Applicants => b.applicant_count().cmp(&a.applicant_count()),
        SortOption::Distance => finite_or(a.distance_km(), f64::INFINITY)
            .total_cmp(&finite_or(b.distance_km(), f64::INFINITY)),
        SortOption::MatchScore => {
            finite_or(b.match_score(), 0.0).total_cmp(&finite_or(a.match_score(), 0.0))
        }
    };
    primary.then_with(|| a.sort_index().cmp(&b.sort_index()))
}

/// New sequence ordered by `option`; the input is left untouched.
pub fn rank<T: Rankable + Clone>(items: &[T], option: SortOption) -> Vec<T> {
    let mut ranked = items.to_vec();
    ranked.sort_by(|a, b| compare(a, b, option));
    ranked
}
