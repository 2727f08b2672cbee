// src/pipeline/mod.rs
//! Synchronous, pure stages of the job list pipeline:
//! normalize, filter, score, rank, paginate.

pub mod filter;
pub mod geo;
pub mod normalizer;
pub mod paginator;
pub mod ranker;
pub mod scorer;

pub use geo::{DistanceBand, GeoPoint};
pub use paginator::{paginate, Page};
pub use ranker::{rank, Rankable};
pub use scorer::{MatchScorer, ScoringWeights};
