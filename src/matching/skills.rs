//! Skill-set normalization and overlap scoring
//!
//! Exact matches always earn full credit; near-miss skills earn
//! partial credit proportional to their embedding similarity, but only
//! above a confidence floor that keeps unrelated skills from inflating
//! the score.

use crate::error::Result;
use crate::matching::embeddings::{batch_similarity, Embedder};
use std::collections::HashSet;

/// Minimum cosine similarity (strict) for a near-miss skill to earn
/// partial credit. Calibration constant — small changes materially
/// shift match quality, so it is deliberately not configurable.
pub const SEMANTIC_MATCH_THRESHOLD: f32 = 0.7;

/// Normalize a skill list for matching: lowercase, trim, drop empties,
/// collapse duplicates while preserving first-seen order.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for skill in skills {
        let skill = skill.trim().to_lowercase();
        if skill.is_empty() {
            continue;
        }
        if seen.insert(skill.clone()) {
            normalized.push(skill);
        }
    }

    normalized
}

/// Overlap score between a required and an available skill set, in
/// [0, 1].
///
/// Required skills present verbatim (case-insensitively) in the
/// available set count as exact matches worth full credit. Each
/// remaining required skill is compared against every available skill
/// by embedding similarity and credited its best score iff that score
/// exceeds [`SEMANTIC_MATCH_THRESHOLD`]. The total is divided by the
/// number of distinct required skills.
///
/// An empty required set is vacuously satisfied (1.0); a non-empty
/// required set against an empty available set scores 0.0. Neither is
/// an error.
pub fn skill_match(
    embedder: &dyn Embedder,
    required: &[String],
    available: &[String],
) -> Result<f64> {
    let required = normalize_skills(required);
    if required.is_empty() {
        return Ok(1.0);
    }

    let available = normalize_skills(available);
    let available_set: HashSet<&str> = available.iter().map(String::as_str).collect();

    let mut exact_matches = 0usize;
    let mut unmatched = Vec::new();
    for skill in &required {
        if available_set.contains(skill.as_str()) {
            exact_matches += 1;
        } else {
            unmatched.push(skill.clone());
        }
    }

    let mut partial_credit = 0.0f64;
    if !unmatched.is_empty() && !available.is_empty() {
        // One batch per side amortizes encoding across all comparisons.
        let unmatched_vecs = embedder.embed_batch(&unmatched)?;
        let available_vecs = embedder.embed_batch(&available)?;

        for vec in &unmatched_vecs {
            let best = batch_similarity(vec, &available_vecs)
                .into_iter()
                .fold(f32::NEG_INFINITY, f32::max);
            if best > SEMANTIC_MATCH_THRESHOLD {
                partial_credit += f64::from(best);
            }
        }
    }

    let score = (exact_matches as f64 + partial_credit) / required.len() as f64;
    Ok(score.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::embeddings::HashingEmbedder;
    use std::collections::HashMap;

    /// Embedder with a fixed word→vector table, so similarities in
    /// tests are exact by construction. Unknown words map to a zero
    /// vector (similarity 0.0 against everything).
    struct TableEmbedder {
        table: HashMap<String, Vec<f32>>,
    }

    impl TableEmbedder {
        fn new(entries: &[(&str, [f32; 3])]) -> Self {
            let table = entries
                .iter()
                .map(|(word, vec)| (word.to_string(), vec.to_vec()))
                .collect();
            Self { table }
        }
    }

    impl Embedder for TableEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(self
                .table
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0; 3]))
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            texts.iter().map(|t| self.embed(t)).collect()
        }

        fn model_id(&self) -> &str {
            "table"
        }
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_normalize_skills_lowercases_trims_dedups() {
        let raw = strings(&["  Python ", "python", "REACT", "", "  "]);
        assert_eq!(normalize_skills(&raw), strings(&["python", "react"]));
    }

    #[test]
    fn test_empty_required_is_vacuously_satisfied() {
        let embedder = HashingEmbedder::new();
        let score = skill_match(&embedder, &[], &strings(&["python"])).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_all_exact_matches_score_one() {
        let embedder = HashingEmbedder::new();
        let required = strings(&["Python", "React"]);
        let available = strings(&["react", "python", "go"]);
        assert_eq!(skill_match(&embedder, &required, &available).unwrap(), 1.0);
    }

    #[test]
    fn test_nonempty_required_against_empty_available_scores_zero() {
        let embedder = HashingEmbedder::new();
        let required = strings(&["python", "react"]);
        assert_eq!(skill_match(&embedder, &required, &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_semantic_credit_above_threshold() {
        // django·python = 0.72 (> 0.7, credited), django·react = 0.4.
        let embedder = TableEmbedder::new(&[
            ("python", [1.0, 0.0, 0.0]),
            ("react", [0.0, 1.0, 0.0]),
            ("django", [0.72, 0.4, (1.0f32 - 0.72 * 0.72 - 0.4 * 0.4).sqrt()]),
        ]);

        let required = strings(&["python", "react"]);
        let available = strings(&["django"]);

        let score = skill_match(&embedder, &required, &available).unwrap();
        assert!((score - 0.36).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_below_threshold_earns_no_credit() {
        let embedder = TableEmbedder::new(&[
            ("python", [1.0, 0.0, 0.0]),
            ("excel", [0.5, (1.0f32 - 0.25).sqrt(), 0.0]),
        ]);

        let required = strings(&["python"]);
        let available = strings(&["excel"]);

        assert_eq!(skill_match(&embedder, &required, &available).unwrap(), 0.0);
    }

    #[test]
    fn test_duplicate_required_skills_collapse() {
        let embedder = HashingEmbedder::new();
        let required = strings(&["python", "Python", "python "]);
        let available = strings(&["python"]);
        assert_eq!(skill_match(&embedder, &required, &available).unwrap(), 1.0);
    }

    #[test]
    fn test_score_stays_in_unit_interval() {
        let embedder = HashingEmbedder::new();
        let required = strings(&["rust", "tokio", "axum"]);
        let available = strings(&["rust", "tokio", "axum", "serde"]);
        let score = skill_match(&embedder, &required, &available).unwrap();
        assert!((0.0..=1.0).contains(&score));
    }
}
