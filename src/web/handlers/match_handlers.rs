// src/web/handlers/match_handlers.rs
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::ai_match::{ensure_live_listing, MatchWizard, RunOutcome};
use crate::auth::BearerToken;
use crate::search::load_listing;
use crate::types::card::JobCard;
use crate::types::profile::ProfileReadiness;
use crate::web::types::*;

async fn ai_match_data(
    wizard: &MatchWizard,
    cards: &[JobCard],
    readiness: ProfileReadiness,
) -> AiMatchData {
    let snapshot = wizard.snapshot().await;
    let matches = wizard.resolved(cards).await;

    AiMatchData {
        step: snapshot.step,
        readiness,
        matches,
        overall_analysis: snapshot.overall_analysis,
        error: snapshot.error,
    }
}

pub async fn get_ai_match_handler(
    token: BearerToken,
    state: &State<AppState>,
) -> Json<DataResponse<AiMatchData>> {
    let token = token.into_inner();
    let wizard = state.sessions.wizard(token.as_deref()).await;
    let client = state.client.with_token(token);

    let (readiness, listing) = tokio::join!(
        wizard.readiness(&client),
        load_listing(&client, Utc::now()),
    );
    let data = ai_match_data(&wizard, &listing.cards, readiness).await;

    Json(
        DataResponse::success(format!("{} matched jobs", data.matches.len()), data)
            .with_notice(listing.message),
    )
}

pub async fn run_ai_match_handler(
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<DataResponse<AiMatchData>>, ApiError> {
    let token = token.into_inner();
    let wizard = state.sessions.wizard(token.as_deref()).await;
    let client = state.client.with_token(token);

    let listing = load_listing(&client, Utc::now()).await;
    ensure_live_listing(&listing).map_err(|e| error_response(&e))?;

    let outcome = wizard
        .run(&client, &client, &listing.cards)
        .await
        .map_err(|e| error_response(&e))?;

    let message = match outcome {
        RunOutcome::Applied(matches) => format!("AI match found {} jobs", matches.len()),
        RunOutcome::Superseded => {
            info!("Match request superseded by a newer run");
            "A newer match run replaced this one".to_string()
        }
    };

    let data = ai_match_data(&wizard, &listing.cards, ProfileReadiness::default()).await;
    Ok(Json(DataResponse::success(message, data)))
}

pub async fn clear_ai_match_handler(
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let wizard = state.sessions.wizard(token.0.as_deref()).await;
    wizard.clear().await.map_err(|e| error_response(&e))?;

    Ok(Json(ActionResponse::success(
        "AI match results cleared".to_string(),
        "cleared".to_string(),
    )))
}
