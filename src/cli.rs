// src/cli.rs
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing::info;

use crate::ai_match::{
    ensure_live_listing, resolve_matches, session_key, MatchWizard, RunOutcome,
};
use crate::bookmarks::UserJobState;
use crate::core::{ConfigManager, ResultCache, ServiceClient};
use crate::gather::gather_match_profile;
use crate::near_me::{acquire_location, FixedLocation, NearMe};
use crate::pipeline::geo::GeoPoint;
use crate::pipeline::scorer::MatchScorer;
use crate::search::{load_listing, SearchSession};
use crate::types::card::JobCard;
use crate::types::criteria::{parse_choice, NearMeCriteria, SearchCriteria, SortOption};
use crate::utils::{parse_list, truncate};
use crate::web::start_web_server;

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Job search, near-me and AI matching service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Bearer token forwarded to the upstream services
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Defaults to ROCKET_PORT, then 8000
        #[arg(long)]
        port: Option<u16>,
    },
    /// Filter, sort and page the job list
    Search(SearchArgs),
    /// Jobs around a location
    NearMe(NearMeArgs),
    /// AI job matching
    Match {
        #[command(subcommand)]
        action: MatchAction,
    },
    /// Apply to a job
    Apply { job_id: String },
    /// Save a job, or remove it when already saved
    Save { post_id: String },
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(long, default_value = "")]
    pub query: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long = "type")]
    pub job_type: Option<String>,
    #[arg(long)]
    pub level: Option<String>,
    #[arg(long)]
    pub mode: Option<String>,
    #[arg(long, default_value = "recent")]
    pub sort: String,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Args)]
pub struct NearMeArgs {
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,
    #[arg(long)]
    pub max_distance: Option<f64>,
    /// Comma-separated job types
    #[arg(long)]
    pub types: Option<String>,
    /// Comma-separated salary buckets
    #[arg(long)]
    pub salary: Option<String>,
    #[arg(long)]
    pub recommended: bool,
}

#[derive(Subcommand)]
pub enum MatchAction {
    /// Run a new AI match and cache the result
    Run,
    /// Print the cached result
    Show,
    /// Remove the cached result
    Clear,
}

impl SearchArgs {
    fn criteria(&self) -> Result<SearchCriteria> {
        Ok(SearchCriteria {
            query: self.query.clone(),
            location: self.location.clone(),
            job_type: parse_choice(self.job_type.as_deref())?,
            level: parse_choice(self.level.as_deref())?,
            work_mode: parse_choice(self.mode.as_deref())?,
            sort: self.sort.parse::<SortOption>()?,
            page: self.page,
        })
    }
}

fn print_card(card: &JobCard) {
    println!(
        "{:>3}  {:<32} {:<22} {:<20} {:<18} {}",
        card.id,
        truncate(&card.role, 32),
        truncate(&card.company, 22),
        truncate(&card.location, 20),
        card.rate,
        card.posted
    );
}

fn resolve_port(port: Option<u16>) -> Result<u16> {
    match port {
        Some(port) => Ok(port),
        None => match std::env::var("ROCKET_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number")),
            Err(_) => Ok(DEFAULT_PORT),
        },
    }
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    let client = ServiceClient::new(&config.service)?.with_token(cli.token.clone());

    match cli.command {
        Command::Serve { port } => {
            let port = resolve_port(port)?;
            start_web_server(config, port).await?;
        }

        Command::Search(args) => {
            let criteria = args.criteria()?;
            let listing = load_listing(&client, Utc::now()).await;
            if let Some(message) = &listing.message {
                println!("⚠️  {} (showing sample jobs)", message);
            }

            let mut session = SearchSession::new(listing.cards, config.search.page_size);
            session.set_criteria(criteria);
            let view = session.view();

            if view.page.page_reset {
                println!("Page out of range, showing page 1");
            }
            for card in &view.page.items {
                print_card(card);
            }
            println!(
                "Page {}/{} ({} jobs)",
                view.page.page, view.page.total_pages, view.page.total_items
            );
        }

        Command::NearMe(args) => {
            let provider = FixedLocation(
                args.lat
                    .zip(args.lon)
                    .map(|(lat, lon)| GeoPoint::new(lat, lon)),
            );
            let origin = acquire_location(
                &provider,
                Duration::from_secs(config.search.location_timeout_secs),
                config.search.fallback_location,
            )
            .await;
            if origin.is_fallback {
                println!(
                    "📍 Using default location {:.4}, {:.4}",
                    origin.point.lat, origin.point.lon
                );
            }

            let criteria = NearMeCriteria {
                max_distance_km: Some(
                    args.max_distance
                        .unwrap_or(config.search.default_max_distance_km),
                ),
                job_types: parse_list(args.types.as_deref())?,
                salary_ranges: parse_list(args.salary.as_deref())?,
                recommended: args.recommended,
            };

            let (listing, profile) = tokio::join!(
                load_listing(&client, Utc::now()),
                gather_match_profile(&client)
            );
            let near = NearMe::new(&listing.cards, origin, MatchScorer::new(config.scoring.clone()))
                .with_profile(profile);
            let view = near.view(&criteria)?;

            for job in &view.jobs {
                let score = job
                    .match_score
                    .map(|s| format!("  {:>3}%", s))
                    .unwrap_or_default();
                println!(
                    "{:>9}  {:<32} {:<20}{}",
                    job.distance_label,
                    truncate(&job.card.role, 32),
                    truncate(&job.card.location, 20),
                    score
                );
            }
            println!("{} jobs nearby", view.jobs.len());
        }

        Command::Match { action } => {
            config.ensure_directories().await?;
            let cache = ResultCache::for_session(
                &config.environment.cache_dir,
                session_key(cli.token.as_deref()).as_deref(),
            );
            let wizard = MatchWizard::new(cache);

            match action {
                MatchAction::Run => {
                    let listing = load_listing(&client, Utc::now()).await;
                    ensure_live_listing(&listing)?;
                    match wizard.run(&client, &client, &listing.cards).await? {
                        RunOutcome::Applied(matches) => {
                            for resolved in resolve_matches(&matches, &listing.cards) {
                                println!(
                                    "{:>5.1}  {:<32} {}",
                                    resolved.result.match_score,
                                    truncate(&resolved.card.role, 32),
                                    resolved.result.reason
                                );
                            }
                            let snapshot = wizard.snapshot().await;
                            if !snapshot.overall_analysis.is_empty() {
                                println!("\n{}", snapshot.overall_analysis);
                            }
                        }
                        RunOutcome::Superseded => println!("Match run was superseded"),
                    }
                }
                MatchAction::Show => {
                    if !wizard.restore().await {
                        println!("No cached match results");
                        return Ok(());
                    }
                    let listing = load_listing(&client, Utc::now()).await;
                    for resolved in wizard.resolved(&listing.cards).await {
                        println!(
                            "{:>5.1}  {:<32} {}",
                            resolved.result.match_score,
                            truncate(&resolved.card.role, 32),
                            resolved.result.reason
                        );
                    }
                }
                MatchAction::Clear => {
                    wizard.clear().await?;
                    println!("✅ Cleared cached match results");
                }
            }
        }

        Command::Apply { job_id } => {
            let mut jobs = UserJobState::default();
            jobs.refresh(&client).await;
            jobs.apply(&client, &job_id).await?;
            println!("✅ Applied to job {}", job_id);
        }

        Command::Save { post_id } => {
            let mut jobs = UserJobState::default();
            jobs.refresh(&client).await;
            if jobs.toggle_saved(&client, &post_id).await? {
                println!("✅ Saved job {}", post_id);
            } else {
                println!("✅ Removed job {} from saved jobs", post_id);
            }
        }
    }

    info!("Command finished");
    Ok(())
}
