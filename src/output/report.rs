//! Match report: ranked results plus generation metadata

use crate::models::{FreelancerMatch, JobMatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The ranked matches of one request, in either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSet {
    Candidates(Vec<FreelancerMatch>),
    Jobs(Vec<JobMatch>),
}

impl MatchSet {
    pub fn len(&self) -> usize {
        match self {
            MatchSet::Candidates(matches) => matches.len(),
            MatchSet::Jobs(matches) => matches.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete, serializable match report. This is what the JSON output
/// format emits verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub embedding_model: String,
    pub processing_time_ms: u64,
    pub matches: MatchSet,
}

impl MatchReport {
    pub fn new(embedding_model: &str, processing_time_ms: u64, matches: MatchSet) -> Self {
        Self {
            generated_at: Utc::now(),
            embedding_model: embedding_model.to_string(),
            processing_time_ms,
            matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_match_direction() {
        let report = MatchReport::new(
            "potion-base-8M",
            12,
            MatchSet::Jobs(vec![JobMatch {
                job_id: "j1".to_string(),
                title: "Rust backend".to_string(),
                match_score: 91.5,
                skill_match: 100.0,
                budget_match: 80.0,
                skills: vec!["rust".to_string()],
            }]),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["embedding_model"], "potion-base-8M");
        assert_eq!(json["matches"]["jobs"][0]["job_id"], "j1");
    }
}
