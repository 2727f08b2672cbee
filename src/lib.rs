//! Job search, "jobs near me" and AI-assisted matching, served over HTTP
//! in front of the job listing, profile and AI matching services.

pub mod ai_match;
pub mod auth;
pub mod bookmarks;
pub mod cli;
pub mod core;
pub mod error;
pub mod gather;
pub mod near_me;
pub mod pipeline;
pub mod sample;
pub mod search;
pub mod types;
pub mod upstream;
pub mod utils;
pub mod web;

#[cfg(test)]
mod test_support;

pub use error::JobError;
pub use web::start_web_server;
