//! Typed records for match requests, profiles, and results

use serde::{Deserialize, Serialize};

/// Default result size for both match directions.
pub const DEFAULT_LIMIT: usize = 20;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// A freelancer profile as supplied by the caller. Optional numeric
/// fields have defined neutral fallbacks during scoring (absent rate
/// scores 0.5 against a budget, absent experience contributes no
/// bonus), so none of them is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreelancerProfile {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub completed_jobs: u32,
    /// Average rating in [0, 5]. Values outside the range are clamped
    /// during scoring.
    #[serde(default)]
    pub avg_rating: f64,
}

/// The job a set of freelancers is scored against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub job_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
}

/// A job posting scored against a freelancer (target→candidate
/// direction). Only `job_id` is required; every other field defaults.
/// Unknown fields in the payload are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub budget_max: Option<f64>,
}

/// A ranked freelancer match. All score fields are percentages in
/// [0, 100] rounded to 2 decimal places; `skills` echoes the profile's
/// skill list unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreelancerMatch {
    pub freelancer_id: String,
    pub name: String,
    pub match_score: f64,
    pub skill_match: f64,
    pub experience_match: f64,
    pub rate_match: f64,
    pub skills: Vec<String>,
}

/// A ranked job match. Same numeric contract as [`FreelancerMatch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatch {
    pub job_id: String,
    pub title: String,
    pub match_score: f64,
    pub skill_match: f64,
    pub budget_match: f64,
    pub skills: Vec<String>,
}

/// Request payload for matching freelancers to a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidatesRequest {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub freelancers: Vec<FreelancerProfile>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl MatchCandidatesRequest {
    /// The job this request scores candidates against.
    pub fn job(&self) -> JobSpec {
        JobSpec {
            job_id: self.job_id.clone(),
            title: self.title.clone(),
            description: self.job_description.clone(),
            required_skills: self.required_skills.clone(),
            budget_min: self.budget_min,
            budget_max: self.budget_max,
        }
    }
}

/// Request payload for matching jobs to a freelancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchJobsRequest {
    #[serde(default)]
    pub freelancer_skills: Vec<String>,
    #[serde(default)]
    pub freelancer_bio: String,
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub preferred_rate: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}
