//! Integration tests for the talent matcher

use std::path::Path;
use std::sync::Arc;

use talent_match::matching::embeddings::HashingEmbedder;
use talent_match::models::{MatchCandidatesRequest, MatchJobsRequest};
use talent_match::output::report::{MatchReport, MatchSet};
use talent_match::{MatchEngine, TalentMatchError};

fn engine() -> MatchEngine {
    MatchEngine::new(Arc::new(HashingEmbedder::new()))
}

fn load_candidates_request() -> MatchCandidatesRequest {
    let payload =
        std::fs::read_to_string(Path::new("tests/fixtures/match_candidates_request.json"))
            .unwrap();
    serde_json::from_str(&payload).unwrap()
}

fn load_jobs_request() -> MatchJobsRequest {
    let payload =
        std::fs::read_to_string(Path::new("tests/fixtures/match_jobs_request.json")).unwrap();
    serde_json::from_str(&payload).unwrap()
}

#[test]
fn test_match_candidates_end_to_end() {
    let request = load_candidates_request();
    let engine = engine();

    let matches = engine
        .match_candidates_to_target(&request.job(), &request.freelancers, request.limit)
        .unwrap();

    // Four candidates, limit 3.
    assert_eq!(matches.len(), 3);

    // Sorted by score descending.
    for window in matches.windows(2) {
        assert!(window[0].match_score >= window[1].match_score);
    }

    // Every score field is a bounded percentage.
    for m in &matches {
        for score in [m.match_score, m.skill_match, m.experience_match, m.rate_match] {
            assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
    }

    // The full-overlap, in-budget, highly-rated candidate wins.
    assert_eq!(matches[0].freelancer_id, "fl-001");
    assert_eq!(matches[0].skill_match, 100.0);
    assert_eq!(matches[0].rate_match, 100.0);

    // Skills are echoed back exactly as submitted.
    assert_eq!(matches[0].skills, vec!["Rust", "Tokio", "PostgreSQL"]);
}

#[test]
fn test_match_jobs_end_to_end() {
    let request = load_jobs_request();
    let engine = engine();

    let matches = engine
        .match_targets_to_candidate(
            &request.freelancer_skills,
            &request.freelancer_bio,
            &request.jobs,
            request.preferred_rate,
            request.limit,
        )
        .unwrap();

    assert_eq!(matches.len(), 2);

    // Identical jobs except for the budget ceiling: the generous one
    // outranks the tight one, and the unrelated design job is cut by
    // the limit.
    assert_eq!(matches[0].job_id, "job-100");
    assert_eq!(matches[0].budget_match, 100.0);
    assert_eq!(matches[1].job_id, "job-101");
    assert!(matches[0].match_score > matches[1].match_score);
}

#[test]
fn test_empty_candidate_lists_return_empty() {
    let request = load_candidates_request();
    let engine = engine();

    let matches = engine
        .match_candidates_to_target(&request.job(), &[], request.limit)
        .unwrap();
    assert!(matches.is_empty());

    let matches = engine
        .match_targets_to_candidate(&["rust".to_string()], "bio", &[], None, 20)
        .unwrap();
    assert!(matches.is_empty());
}

#[test]
fn test_missing_identity_fails_the_request() {
    let mut request = load_candidates_request();
    request.freelancers[1].user_id = String::new();

    let err = engine()
        .match_candidates_to_target(&request.job(), &request.freelancers, request.limit)
        .unwrap_err();

    assert!(matches!(err, TalentMatchError::InvalidInput(_)));
}

#[test]
fn test_malformed_request_payload_is_rejected() {
    // Missing the required `freelancers` field.
    let result: Result<MatchCandidatesRequest, _> =
        serde_json::from_str(r#"{"job_id": "j1", "required_skills": ["rust"]}"#);
    assert!(result.is_err());
}

#[test]
fn test_results_are_reproducible_across_threads() {
    let request = Arc::new(load_candidates_request());
    let engine = Arc::new(engine());

    let baseline = engine
        .match_candidates_to_target(&request.job(), &request.freelancers, request.limit)
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let request = Arc::clone(&request);
            std::thread::spawn(move || {
                engine
                    .match_candidates_to_target(&request.job(), &request.freelancers, request.limit)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let matches = handle.join().unwrap();
        assert_eq!(matches.len(), baseline.len());
        for (a, b) in matches.iter().zip(baseline.iter()) {
            assert_eq!(a.freelancer_id, b.freelancer_id);
            assert_eq!(a.match_score, b.match_score);
        }
    }
}

#[test]
fn test_report_json_round_trip() {
    let request = load_jobs_request();
    let engine = engine();

    let matches = engine
        .match_targets_to_candidate(
            &request.freelancer_skills,
            &request.freelancer_bio,
            &request.jobs,
            request.preferred_rate,
            request.limit,
        )
        .unwrap();

    let report = MatchReport::new(engine.embedder().model_id(), 3, MatchSet::Jobs(matches));
    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: MatchReport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.embedding_model, "hashing-embedder");
    assert_eq!(parsed.matches.len(), report.matches.len());
}
