// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::ai_match::MatchSessions;
use crate::auth::BearerToken;
use crate::core::{ConfigManager, ServiceClient};
use crate::near_me::NearMeView;
use crate::search::SearchView;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/health")]
pub async fn health(token: BearerToken) -> Json<TextResponse> {
    handlers::health_handler(token).await
}

#[get("/jobs?<query..>")]
pub async fn list_jobs(
    query: JobsQuery,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SearchView>>, ApiError> {
    handlers::list_jobs_handler(query, token, state).await
}

#[get("/jobs/near-me?<query..>")]
pub async fn jobs_near_me(
    query: NearMeQuery,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<DataResponse<NearMeView>>, ApiError> {
    handlers::near_me_handler(query, token, state).await
}

#[post("/jobs/<id>/apply")]
pub async fn apply_job(
    id: String,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::apply_handler(id, token, state).await
}

#[post("/jobs/<id>/save")]
pub async fn save_job(
    id: String,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::save_handler(id, token, state).await
}

#[delete("/jobs/<id>/save")]
pub async fn unsave_job(
    id: String,
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::unsave_handler(id, token, state).await
}

#[get("/ai-match")]
pub async fn get_ai_match(
    token: BearerToken,
    state: &State<AppState>,
) -> Json<DataResponse<AiMatchData>> {
    handlers::get_ai_match_handler(token, state).await
}

#[post("/ai-match")]
pub async fn run_ai_match(
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<DataResponse<AiMatchData>>, ApiError> {
    handlers::run_ai_match_handler(token, state).await
}

#[delete("/ai-match")]
pub async fn clear_ai_match(
    token: BearerToken,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::clear_ai_match_handler(token, state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request parameters".to_string(),
            "Verify all values have the expected type".to_string(),
        ],
    ))
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid Authorization header".to_string(),
        "AUTHORIZATION_ERROR".to_string(),
        vec!["Send the header as 'Authorization: Bearer <token>'".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Shared state: HTTP client, configuration and the per-caller match
/// sessions, each restored from its own cache slot on first use.
pub fn build_state(config: ConfigManager) -> Result<AppState> {
    let client = ServiceClient::new(&config.service)?;
    let sessions = MatchSessions::new(&config.environment.cache_dir);

    Ok(AppState {
        client,
        config,
        sessions,
    })
}

pub fn build_rocket(rocket: Rocket<Build>, state: AppState) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, unauthorized, not_found, internal_error],
        )
        .mount(
            "/api",
            routes![
                health,
                list_jobs,
                jobs_near_me,
                apply_job,
                save_job,
                unsave_job,
                get_ai_match,
                run_ai_match,
                clear_ai_match,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    config.ensure_directories().await?;

    info!("Starting job matching API server");
    info!("Jobs API: {}", config.service.api_base_url);
    info!("AI service: {}", config.service.ai_service_url);
    info!("Cache: {}", config.environment.cache_dir.display());
    info!("Server: http://0.0.0.0:{}", port);

    let state = build_state(config)?;
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    let _rocket = build_rocket(rocket::custom(figment), state)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai_match::session_key;
    use crate::core::config_manager::{EnvironmentConfig, SearchConfig, ServiceConfig};
    use crate::core::ResultCache;
    use crate::test_support::match_result;
    use crate::pipeline::scorer::ScoringWeights;
    use rocket::local::asynchronous::Client;
    use tempfile::TempDir;

    /// Upstreams point at a closed local port so every call fails fast.
    fn offline_config(dir: &TempDir) -> ConfigManager {
        ConfigManager {
            environment: EnvironmentConfig {
                cache_dir: dir.path().join("cache"),
                log_file: dir.path().join("jobmatch.log"),
            },
            service: ServiceConfig {
                api_base_url: "http://127.0.0.1:9".to_string(),
                ai_service_url: "http://127.0.0.1:9".to_string(),
                ai_provider: "openai".to_string(),
                timeout_seconds: 2,
            },
            search: SearchConfig::default(),
            scoring: ScoringWeights::default(),
        }
    }

    async fn client(dir: &TempDir) -> Client {
        let state = build_state(offline_config(dir)).unwrap();
        Client::tracked(build_rocket(rocket::build(), state))
            .await
            .unwrap()
    }

    async fn match_count(client: &Client, token: &str) -> usize {
        let response = client
            .get("/api/ai-match")
            .header(Header::new("Authorization", format!("Bearer {}", token)))
            .dispatch()
            .await;
        let body: serde_json::Value = response.into_json().await.unwrap();
        body["data"]["matches"].as_array().unwrap().len()
    }

    #[rocket::async_test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["success"], true);
        let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["message", "success", "type"]);
    }

    #[rocket::async_test]
    async fn test_jobs_fall_back_to_sample_data() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client.get("/api/jobs?type=All&page=2").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["notice"], "Failed to load jobs");
        assert_eq!(body["data"]["page"]["total_items"], 10);
        assert_eq!(body["data"]["page"]["items"].as_array().unwrap().len(), 4);
    }

    #[rocket::async_test]
    async fn test_unknown_selection_is_cleared() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client
            .get("/api/jobs?selected=deleted-post")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert!(body["data"]["selected"].is_null());
        assert_eq!(body["data"]["page"]["total_items"], 10);
    }

    #[rocket::async_test]
    async fn test_ai_match_results_are_per_caller() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache");
        ResultCache::for_session(&cache_dir, session_key(Some("user-a-token")).as_deref())
            .save(&[match_result("sample-0001", 91.0)])
            .await
            .unwrap();
        let client = client(&dir).await;

        assert_eq!(match_count(&client, "user-b-token").await, 0);
        assert_eq!(match_count(&client, "user-a-token").await, 1);

        let response = client
            .delete("/api/ai-match")
            .header(Header::new("Authorization", "Bearer user-b-token"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(match_count(&client, "user-a-token").await, 1);
    }

    #[rocket::async_test]
    async fn test_ai_match_refused_on_sample_listing() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client.post("/api/ai-match").dispatch().await;
        assert_eq!(response.status(), Status::BadGateway);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "MATCH_FAILED");
        assert!(!dir.path().join("cache").join("ai_match_cache.json").exists());
    }

    #[rocket::async_test]
    async fn test_invalid_query_value() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client.get("/api/jobs?sort=loudest").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "INVALID_PARAMETER");
    }

    #[rocket::async_test]
    async fn test_malformed_authorization() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client
            .get("/api/health")
            .header(Header::new("Authorization", "Token abc"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_recommended_near_me_without_profile() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client
            .get("/api/jobs/near-me?recommended=true")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "RECOMMENDATION_UNAVAILABLE");
    }

    #[rocket::async_test]
    async fn test_apply_upstream_down() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir).await;
        let response = client.post("/api/jobs/sample-0001/apply").dispatch().await;
        assert_eq!(response.status(), Status::BadGateway);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "ACTION_FAILED");
    }
}
