// src/web/handlers/job_handlers.rs
use anyhow::Result;
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use std::time::Duration;
use tracing::info;

use crate::auth::BearerToken;
use crate::bookmarks::UserJobState;
use crate::gather::gather_match_profile;
use crate::near_me::{acquire_location, FixedLocation, NearMe, NearMeView};
use crate::pipeline::geo::GeoPoint;
use crate::pipeline::scorer::MatchScorer;
use crate::search::{load_listing, Listing, SearchSession, SearchView};
use crate::types::criteria::{parse_choice, NearMeCriteria, SearchCriteria, SortOption};
use crate::utils::parse_list;
use crate::web::types::*;

pub fn search_criteria(query: &JobsQuery) -> Result<SearchCriteria> {
    Ok(SearchCriteria {
        query: query.query.clone().unwrap_or_default(),
        location: query.location.clone().unwrap_or_default(),
        job_type: parse_choice(query.job_type.as_deref())?,
        level: parse_choice(query.level.as_deref())?,
        work_mode: parse_choice(query.mode.as_deref())?,
        sort: query
            .sort
            .as_deref()
            .map(str::parse::<SortOption>)
            .transpose()?
            .unwrap_or_default(),
        page: query.page.unwrap_or(1),
    })
}

/// A missing `max_distance` falls back to the configured default; `0` or
/// a negative value turns the distance filter off.
pub fn near_me_criteria(query: &NearMeQuery, default_max_distance_km: f64) -> Result<NearMeCriteria> {
    let max_distance_km = match query.max_distance {
        None => Some(default_max_distance_km),
        Some(km) if km > 0.0 && km.is_finite() => Some(km),
        Some(_) => None,
    };

    Ok(NearMeCriteria {
        max_distance_km,
        job_types: parse_list(query.types.as_deref())?,
        salary_ranges: parse_list(query.salary.as_deref())?,
        recommended: query.recommended.unwrap_or(false),
    })
}

pub async fn list_jobs_handler(
    query: JobsQuery,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SearchView>>, ApiError> {
    let criteria = search_criteria(&query).map_err(invalid_parameter)?;
    let client = state.client.with_token(token.into_inner());

    let Listing { cards, message } = load_listing(&client, Utc::now()).await;
    let mut session = SearchSession::new(cards, state.config.search.page_size);
    session.set_criteria(criteria);
    if let Some(id) = query.selected.as_deref() {
        if session.select(id).is_err() {
            info!("Selected job {} is no longer listed, clearing selection", id);
            session.deselect();
        }
    }

    let view = session.view();
    info!(
        "Job list: {} matching jobs, page {}/{}",
        view.page.total_items, view.page.page, view.page.total_pages
    );

    Ok(Json(
        DataResponse::success(format!("Found {} jobs", view.page.total_items), view)
            .with_notice(message),
    ))
}

pub async fn near_me_handler(
    query: NearMeQuery,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<DataResponse<NearMeView>>, ApiError> {
    let search = &state.config.search;
    let criteria =
        near_me_criteria(&query, search.default_max_distance_km).map_err(invalid_parameter)?;
    let client = state.client.with_token(token.into_inner());

    let provider = FixedLocation(
        query
            .lat
            .zip(query.lon)
            .map(|(lat, lon)| GeoPoint::new(lat, lon)),
    );
    let (origin, listing, profile) = tokio::join!(
        acquire_location(
            &provider,
            Duration::from_secs(search.location_timeout_secs),
            search.fallback_location,
        ),
        load_listing(&client, Utc::now()),
        gather_match_profile(&client),
    );

    let near = NearMe::new(
        &listing.cards,
        origin,
        MatchScorer::new(state.config.scoring.clone()),
    )
    .with_profile(profile);
    let view = near.view(&criteria).map_err(|e| error_response(&e))?;

    Ok(Json(
        DataResponse::success(format!("Found {} jobs nearby", view.jobs.len()), view)
            .with_notice(listing.message),
    ))
}

pub async fn apply_handler(
    id: String,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let client = state.client.with_token(token.into_inner());
    let mut jobs = UserJobState::default();
    jobs.refresh(&client).await;

    jobs.apply(&client, &id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(
        ActionResponse::success(format!("Applied to job {}", id), "applied".to_string())
            .with_next_actions(vec!["view_applications".to_string()]),
    ))
}

pub async fn save_handler(
    id: String,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let client = state.client.with_token(token.into_inner());
    let mut jobs = UserJobState::default();
    jobs.refresh(&client).await;

    if !jobs.is_saved(&id) {
        jobs.save(&client, &id)
            .await
            .map_err(|e| error_response(&e))?;
    }

    Ok(Json(ActionResponse::success(
        format!("Job {} saved", id),
        "saved".to_string(),
    )))
}

pub async fn unsave_handler(
    id: String,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let client = state.client.with_token(token.into_inner());
    let mut jobs = UserJobState::default();

    jobs.unsave(&client, &id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(ActionResponse::success(
        format!("Job {} removed from saved jobs", id),
        "unsaved".to_string(),
    )))
}
