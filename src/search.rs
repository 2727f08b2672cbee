// src/search.rs
//! General job list: loading the listing and the per-user search session.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::error::JobError;
use crate::pipeline::filter::{clear_stale_selection, filter_cards};
use crate::pipeline::normalizer::normalize;
use crate::pipeline::paginator::{paginate, Page};
use crate::pipeline::ranker::rank;
use crate::sample::sample_postings;
use crate::types::card::JobCard;
use crate::types::criteria::SearchCriteria;
use crate::types::posting::JobPosting;
use crate::upstream::ListingService;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load jobs";

/// Cards of one listing fetch.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub cards: Vec<JobCard>,
    /// Set when the bundled sample data stands in for the live listing.
    pub message: Option<String>,
}

impl Listing {
    pub fn is_degraded(&self) -> bool {
        self.message.is_some()
    }

    pub fn find(&self, id: &str) -> Option<&JobCard> {
        self.cards.iter().find(|card| card.matches_id(id))
    }
}

/// Resolve display names for the distinct employers, concurrently. Failed
/// lookups are left out so the normalizer can fall back.
async fn resolve_company_names(
    listing: &dyn ListingService,
    postings: &[JobPosting],
) -> HashMap<String, String> {
    let mut seen = HashSet::new();
    let company_ids: Vec<&str> = postings
        .iter()
        .map(|p| p.company_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect();

    let lookups = company_ids.iter().map(|id| async move {
        match listing.company_name(id).await {
            Ok(name) => Some((id.to_string(), name)),
            Err(e) => {
                warn!("Failed to fetch company {}: {:#}", id, e);
                None
            }
        }
    });

    join_all(lookups).await.into_iter().flatten().collect()
}

fn normalize_all(
    postings: &[JobPosting],
    names: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Vec<JobCard> {
    postings
        .iter()
        .enumerate()
        .map(|(index, posting)| {
            let name = names.get(&posting.company_id).map(String::as_str);
            normalize(posting, index, name, now)
        })
        .collect()
}

/// Fetch active postings and normalize them in fetch order. A failed fetch
/// falls back to the bundled sample data with an inline message.
pub async fn load_listing(listing: &dyn ListingService, now: DateTime<Utc>) -> Listing {
    match listing.all_posts().await {
        Ok(postings) => {
            let active: Vec<JobPosting> = postings.into_iter().filter(JobPosting::is_active).collect();
            let names = resolve_company_names(listing, &active).await;
            info!(
                "Loaded {} active postings ({} employers resolved)",
                active.len(),
                names.len()
            );
            Listing {
                cards: normalize_all(&active, &names, now),
                message: None,
            }
        }
        Err(e) => {
            warn!("Failed to fetch jobs, using sample data: {:#}", e);
            let sample = sample_postings().unwrap_or_else(|e| {
                warn!("Sample data unavailable: {:#}", e);
                Vec::new()
            });
            Listing {
                cards: normalize_all(&sample, &HashMap::new(), now),
                message: Some(LOAD_FAILED_MESSAGE.to_string()),
            }
        }
    }
}

/// What the job list renders for the current criteria.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub criteria: SearchCriteria,
    pub page: Page<JobCard>,
    pub selected: Option<JobCard>,
}

/// Criteria, selection and cards of one user's job list.
#[derive(Debug, Clone)]
pub struct SearchSession {
    cards: Vec<JobCard>,
    criteria: SearchCriteria,
    selected: Option<String>,
    page_size: usize,
}

impl SearchSession {
    pub fn new(cards: Vec<JobCard>, page_size: usize) -> Self {
        Self {
            cards,
            criteria: SearchCriteria::default(),
            selected: None,
            page_size: page_size.max(1),
        }
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_criteria(&mut self, criteria: SearchCriteria) {
        self.criteria = criteria;
    }

    pub fn set_page(&mut self, page: usize) {
        self.criteria.page = page;
    }

    /// Select a job by post id or card id.
    pub fn select(&mut self, id: &str) -> Result<(), JobError> {
        let card = self
            .cards
            .iter()
            .find(|card| card.matches_id(id))
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;
        self.selected = Some(card.post_id.clone());
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Every criterion back to "no constraint", sort by recent, page 1.
    pub fn reset_all(&mut self) {
        self.criteria = SearchCriteria::default();
        self.selected = None;
    }

    /// Filter, rank and paginate. An out-of-range page resets to 1 and a
    /// selection that was filtered out is cleared.
    pub fn view(&mut self) -> SearchView {
        let filtered = filter_cards(&self.cards, &self.criteria);
        let ranked = rank(&filtered, self.criteria.sort);

        self.selected = clear_stale_selection(self.selected.as_deref(), ranked.iter().copied());

        let page = paginate(&ranked, self.page_size, self.criteria.page);
        if page.page_reset {
            self.criteria.page = 1;
        }

        let selected = self
            .selected
            .as_deref()
            .and_then(|id| ranked.iter().find(|card| card.matches_id(id)))
            .map(|card| (*card).clone());

        SearchView {
            criteria: self.criteria.clone(),
            page: Page {
                items: page.items.into_iter().cloned().collect(),
                page: page.page,
                total_pages: page.total_pages,
                total_items: page.total_items,
                page_reset: page.page_reset,
            },
            selected,
        }
    }
}
