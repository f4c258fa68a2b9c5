use crate::core::{
    filters::screen_posting,
    normalize::normalize,
    scoring::{calculate_match_score, KeywordPatterns},
};
use crate::models::{Evaluation, JobPosting, MatchingConfig, RejectReason, ScoredMatch, Screening};

/// Result of the matching process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matches: Vec<ScoredMatch>,
    pub total_candidates: usize,
    pub rejected: usize,
}

/// Main matching orchestrator - implements the filter/score/rank pipeline
///
/// # Pipeline Stages
/// 1. Exclude-keyword filter
/// 2. Seniority filter
/// 3. Experience filter (with fresh-grad waiver)
/// 4. Scoring and ranking
///
/// History deduplication is the caller's job and happens before this.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchingConfig,
    patterns: KeywordPatterns,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        let patterns = KeywordPatterns::compile(&config.keywords);
        Self { config, patterns }
    }

    pub fn with_default_config() -> Self {
        Self::new(MatchingConfig::default())
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Screen and score a single posting
    pub fn evaluate(&self, resume_text: &str, job: &JobPosting) -> Evaluation {
        self.evaluate_normalized(&normalize(resume_text), job)
    }

    fn evaluate_normalized(&self, resume: &str, job: &JobPosting) -> Evaluation {
        match screen_posting(job, &self.config) {
            Screening::Reject(reason) => Evaluation::Rejected(reason),
            Screening::Pass => {
                let (score, shared_keywords) =
                    calculate_match_score(resume, job, &self.config, &self.patterns);
                tracing::trace!("Scored {} at {:.1} (keywords: {:?})", job.url, score, shared_keywords);
                if score.is_nan() || score < 0.0 {
                    return Evaluation::Rejected(RejectReason::NegativeScore);
                }
                Evaluation::Accepted { score }
            }
        }
    }

    /// Score an accepted posting without screening it
    pub fn score(&self, resume_text: &str, job: &JobPosting) -> f64 {
        calculate_match_score(&normalize(resume_text), job, &self.config, &self.patterns).0
    }

    /// Rank postings against a resume
    ///
    /// # Arguments
    /// * `resume_text` - Plain resume text; may be empty
    /// * `postings` - Candidates already filtered against history
    ///
    /// # Returns
    /// MatchResult with accepted postings sorted by descending score. Equal
    /// scores keep their input order. No truncation happens here.
    pub fn match_jobs(&self, resume_text: &str, postings: &[JobPosting]) -> MatchResult {
        let resume = normalize(resume_text);
        let mut rejected = 0;

        let mut matches: Vec<ScoredMatch> = postings
            .iter()
            .filter_map(|job| match self.evaluate_normalized(&resume, job) {
                Evaluation::Accepted { score } => Some(ScoredMatch::from_posting(job, score)),
                Evaluation::Rejected(reason) => {
                    tracing::debug!("Rejected {:?} at {:?}: {}", job.title, job.company, reason);
                    rejected += 1;
                    None
                }
            })
            .collect();

        // Stable: equal scores keep input order
        matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

        MatchResult {
            matches,
            total_candidates: postings.len(),
            rejected,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}
