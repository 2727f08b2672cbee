// src/sample.rs
//! Bundled postings shown when the listing service is unreachable.

use anyhow::{Context, Result};

use crate::types::posting::JobPosting;

const SAMPLE_JOBS_JSON: &str = include_str!("../data/sample_jobs.json");

pub fn sample_postings() -> Result<Vec<JobPosting>> {
    serde_json::from_str(SAMPLE_JOBS_JSON).context("Failed to parse bundled sample jobs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_dataset_is_valid() {
        let postings = sample_postings().unwrap();
        assert_eq!(postings.len(), 10);
        assert!(postings.iter().all(JobPosting::is_active));
    }
}
