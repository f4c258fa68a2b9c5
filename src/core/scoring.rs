use crate::core::normalize::{normalize, token_set};
use crate::models::{JobPosting, MatchingConfig};
use regex::Regex;

/// Divisor applied to the shared-token count
const OVERLAP_SCALE: f64 = 10.0;

/// Whole-word patterns for the configured keywords, compiled once per matcher
#[derive(Debug, Clone, Default)]
pub struct KeywordPatterns {
    patterns: Vec<(String, Regex)>,
}

impl KeywordPatterns {
    /// Compile `\b<keyword>\b` for each keyword, preserving order and duplicates
    pub fn compile(keywords: &[String]) -> Self {
        let patterns = keywords
            .iter()
            .filter(|kw| !kw.trim().is_empty())
            .filter_map(|kw| {
                let keyword = kw.to_lowercase();
                match Regex::new(&format!(r"\b{}\b", regex::escape(&keyword))) {
                    Ok(re) => Some((keyword, re)),
                    Err(e) => {
                        tracing::warn!("Skipping keyword {:?}: {}", kw, e);
                        None
                    }
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Keywords found as whole words in both texts, one entry per pattern
    pub fn shared_keywords(&self, job_text: &str, resume: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(job_text) && re.is_match(resume))
            .map(|(kw, _)| kw.clone())
            .collect()
    }
}

/// Calculate the match score for an accepted posting
///
/// `resume` must already be normalized. Scoring formula:
/// score = (
///     fresh_grad_boost_score        # any fresh-grad keyword in the job text
///   + keyword_match_score * k       # k = keywords in both job text and resume
///   + shared_tokens / 10            # lexical overlap tie-breaker
/// )
///
/// Returns the score and the keywords that earned a boost.
pub fn calculate_match_score(
    resume: &str,
    job: &JobPosting,
    config: &MatchingConfig,
    patterns: &KeywordPatterns,
) -> (f64, Vec<String>) {
    let job_text = job_text(job);

    let fresh_grad_score = if mentions_fresh_grad(&job_text, config) {
        config.fresh_grad_boost_score
    } else {
        0.0
    };

    let shared_keywords = patterns.shared_keywords(&job_text, resume);
    let keyword_score = shared_keywords.len() as f64 * config.keyword_match_score;

    let overlap_score = lexical_overlap(resume, &job_text) as f64 / OVERLAP_SCALE;

    (fresh_grad_score + keyword_score + overlap_score, shared_keywords)
}

/// Normalized title, company, description and location joined by spaces
pub fn job_text(job: &JobPosting) -> String {
    normalize(&format!(
        "{} {} {} {}",
        job.title, job.company, job.description, job.location
    ))
}

/// Number of distinct tokens the two normalized texts share
#[inline]
pub fn lexical_overlap(resume: &str, job_text: &str) -> usize {
    let resume_tokens = token_set(resume);
    let job_tokens = token_set(job_text);
    resume_tokens.intersection(&job_tokens).count()
}

/// Substring check on the normalized job text
///
/// Keywords containing punctuation ("entry-level") never match here since
/// normalization turned the punctuation into spaces.
#[inline]
fn mentions_fresh_grad(job_text: &str, config: &MatchingConfig) -> bool {
    config
        .fresh_grad_keywords
        .iter()
        .filter(|kw| !kw.trim().is_empty())
        .any(|kw| job_text.contains(kw.to_lowercase().as_str()))
}
