//! Talent match library
//!
//! Ranks freelancers against jobs (and jobs against freelancers) by
//! blending exact and embedding-based skill overlap with rate/budget
//! fit, experience, and rating signals.

pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod models;
pub mod output;

pub use config::Config;
pub use error::{Result, TalentMatchError};
pub use matching::engine::MatchEngine;
pub use models::{
    FreelancerMatch, FreelancerProfile, JobMatch, JobPosting, JobSpec, MatchCandidatesRequest,
    MatchJobsRequest, DEFAULT_LIMIT,
};
