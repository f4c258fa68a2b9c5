//! Job Alert - daily job matching pipeline
//!
//! This library provides the matching engine that turns a resume and a batch
//! of scraped job postings into a ranked shortlist, plus the collaborators
//! (Apify fetch, resume loading, history, email) used by the daily run.

pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchResult, normalize::normalize, experience::extract_experience_claims};
pub use models::{JobPosting, ScoredMatch, MatchingConfig, Evaluation, RejectReason};
pub use pipeline::{DailyRun, RunSummary, PipelineError};

/// Rank postings against a resume with the given rules
///
/// Convenience wrapper over [`Matcher::match_jobs`] returning only the
/// sorted matches.
pub fn match_jobs(resume_text: &str, postings: &[JobPosting], config: &MatchingConfig) -> Vec<ScoredMatch> {
    Matcher::new(config.clone()).match_jobs(resume_text, postings).matches
}
