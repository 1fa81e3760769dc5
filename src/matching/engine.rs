//! The matching engine: scores a candidate set against a target and
//! returns ranked results
//!
//! Candidates are scored sequentially in input order; the numeric
//! results must not depend on evaluation order, and ties in the final
//! ranking fall back to input order.

use crate::error::{Result, TalentMatchError};
use crate::matching::embeddings::{cosine_similarity, Embedder};
use crate::matching::ranking::rank;
use crate::matching::scoring::{
    aggregate, budget_match, experience_bonus, rate_match, rating_bonus, to_percent,
    CANDIDATE_TO_TARGET, TARGET_TO_CANDIDATE,
};
use crate::matching::skills::skill_match;
use crate::models::{FreelancerMatch, FreelancerProfile, JobMatch, JobPosting, JobSpec};
use std::sync::Arc;

/// Matching engine over an injected embedding provider.
///
/// The provider is the only expensive resource; construct it once at
/// process startup (or wrap it in
/// [`LazyEmbedder`](crate::matching::embeddings::LazyEmbedder)) and
/// share the engine freely — all scoring is a pure function of its
/// inputs.
pub struct MatchEngine {
    embedder: Arc<dyn Embedder>,
}

impl MatchEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// The embedding provider backing this engine.
    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Score freelancers against a job and return the top `limit`
    /// matches, best first.
    ///
    /// An empty candidate list returns an empty result without
    /// touching the embedding provider. A candidate without a
    /// `user_id`, or a job without a `job_id`, fails the whole request
    /// with [`TalentMatchError::InvalidInput`] — silently dropping a
    /// record would misrepresent ranking completeness.
    pub fn match_candidates_to_target(
        &self,
        job: &JobSpec,
        candidates: &[FreelancerProfile],
        limit: usize,
    ) -> Result<Vec<FreelancerMatch>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        if job.job_id.trim().is_empty() {
            return Err(TalentMatchError::InvalidInput(
                "job is missing a job_id".to_string(),
            ));
        }
        for candidate in candidates {
            if candidate.user_id.trim().is_empty() {
                return Err(TalentMatchError::InvalidInput(format!(
                    "freelancer record '{}' is missing a user_id",
                    candidate.name
                )));
            }
        }

        log::info!(
            "Matching {} freelancers against job {}",
            candidates.len(),
            job.job_id
        );

        let job_text = compose_text(&job.description, &job.required_skills);
        let job_vec = self.embedder.embed(&job_text)?;

        let mut matches = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let candidate_text =
                compose_text(candidate.bio.as_deref().unwrap_or(""), &candidate.skills);
            let candidate_vec = self.embedder.embed(&candidate_text)?;

            let skill = skill_match(
                self.embedder.as_ref(),
                &job.required_skills,
                &candidate.skills,
            )?;
            let semantic = f64::from(cosine_similarity(&job_vec, &candidate_vec));
            let rate = rate_match(candidate.hourly_rate, job.budget_min, job.budget_max);
            let exp_bonus = experience_bonus(candidate.experience_years);
            let rating = rating_bonus(candidate.avg_rating);

            let score = aggregate(&CANDIDATE_TO_TARGET, skill, semantic, rate, exp_bonus + rating);

            matches.push(FreelancerMatch {
                freelancer_id: candidate.user_id.clone(),
                name: candidate.name.clone(),
                match_score: to_percent(score),
                skill_match: to_percent(skill),
                // Reported as the fraction of the ten-year cap.
                experience_match: to_percent(exp_bonus * 10.0),
                rate_match: to_percent(rate),
                skills: candidate.skills.clone(),
            });
        }

        Ok(rank(matches, limit))
    }

    /// Score job postings against a freelancer and return the top
    /// `limit` matches, best first.
    ///
    /// Mirrors [`Self::match_candidates_to_target`] with the
    /// target→candidate weight profile: skills weigh heavier, and the
    /// secondary signal is budget fit instead of rate fit, with no
    /// experience or rating bonuses.
    pub fn match_targets_to_candidate(
        &self,
        freelancer_skills: &[String],
        freelancer_bio: &str,
        jobs: &[JobPosting],
        preferred_rate: Option<f64>,
        limit: usize,
    ) -> Result<Vec<JobMatch>> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        for job in jobs {
            if job.job_id.trim().is_empty() {
                return Err(TalentMatchError::InvalidInput(format!(
                    "job record '{}' is missing a job_id",
                    job.title
                )));
            }
        }

        log::info!("Matching {} jobs against freelancer profile", jobs.len());

        let freelancer_text = compose_text(freelancer_bio, freelancer_skills);
        let freelancer_vec = self.embedder.embed(&freelancer_text)?;

        let mut matches = Vec::with_capacity(jobs.len());
        for job in jobs {
            let job_text = compose_text(
                &format!("{} {}", job.title, job.description),
                &job.skills,
            );
            let job_vec = self.embedder.embed(&job_text)?;

            let skill = skill_match(self.embedder.as_ref(), &job.skills, freelancer_skills)?;
            let semantic = f64::from(cosine_similarity(&freelancer_vec, &job_vec));
            let budget = budget_match(preferred_rate, job.budget_max);

            let score = aggregate(&TARGET_TO_CANDIDATE, skill, semantic, budget, 0.0);

            matches.push(JobMatch {
                job_id: job.job_id.clone(),
                title: job.title.clone(),
                match_score: to_percent(score),
                skill_match: to_percent(skill),
                budget_match: to_percent(budget),
                skills: job.skills.clone(),
            });
        }

        Ok(rank(matches, limit))
    }
}

/// Composite text fed to the embedding model: free text plus the skill
/// list, in the fixed `"{text} Skills: {a, b, c}"` shape the scores
/// were calibrated on.
fn compose_text(text: &str, skills: &[String]) -> String {
    format!("{} Skills: {}", text, skills.join(", "))
}
