// src/types/mod.rs
pub mod card;
pub mod criteria;
pub mod matching;
pub mod posting;
pub mod profile;

pub use card::{JobCard, JobType, SeniorityLevel, WorkMode};
pub use criteria::{NearMeCriteria, SalaryBucket, SearchCriteria, SortOption};
pub use matching::{MatchRequest, MatchResponse, MatchResult, ProximityStatus};
pub use posting::{JobPosting, PostingStatus};
pub use profile::{ProfileBundle, ProfileReadiness, UserMatchProfile};
