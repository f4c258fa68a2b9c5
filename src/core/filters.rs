use crate::core::experience::extract_experience_claims;
use crate::models::{JobPosting, MatchingConfig, RejectReason, Screening};

/// Screen a posting against the configured rules
///
/// Stages run in order and stop at the first rejection:
/// 1. Exclude keywords (title or description)
/// 2. Seniority keywords (title only)
/// 3. Stated experience vs `max_experience_years`, waived per claim for
///    fresh-grad friendly postings
pub fn screen_posting(job: &JobPosting, config: &MatchingConfig) -> Screening {
    let title_lower = job.title.to_lowercase();
    let desc_lower = job.description.to_lowercase();

    // Stage 1: Exclude keywords
    if let Some(keyword) = find_keyword(&config.exclude_keywords, &[title_lower.as_str(), desc_lower.as_str()]) {
        return Screening::Reject(RejectReason::ExcludedKeyword { keyword });
    }

    // Stage 2: Seniority markers in the title
    if let Some(keyword) = find_keyword(&config.seniority_keywords, &[title_lower.as_str()]) {
        return Screening::Reject(RejectReason::Seniority { keyword });
    }

    // Stage 3: Experience requirements
    let fresh_grad = is_fresh_grad(&title_lower, &desc_lower, config);
    if let Some(years) = disqualifying_experience(&desc_lower, config.max_experience_years, fresh_grad) {
        return Screening::Reject(RejectReason::Experience { years });
    }

    Screening::Pass
}

/// Check whether a posting advertises itself as junior friendly
#[inline]
pub fn is_fresh_grad(title_lower: &str, desc_lower: &str, config: &MatchingConfig) -> bool {
    find_keyword(&config.fresh_grad_keywords, &[title_lower, desc_lower]).is_some()
}

/// First experience claim at or above the ceiling, if any
///
/// A fresh-grad posting never disqualifies: each offending claim is waived
/// and scanning continues.
pub fn disqualifying_experience(desc_lower: &str, max_years: u32, fresh_grad: bool) -> Option<u32> {
    for claim in extract_experience_claims(desc_lower) {
        if claim.min_years >= max_years {
            if fresh_grad {
                tracing::trace!("Waiving {}-year claim for fresh-grad posting", claim.min_years);
                continue;
            }
            return Some(claim.min_years);
        }
    }
    None
}

/// First keyword (lowercased) that is a substring of any haystack
///
/// Haystacks must already be lowercased. Blank keywords are ignored since
/// they would match everything.
fn find_keyword(keywords: &[String], haystacks: &[&str]) -> Option<String> {
    keywords
        .iter()
        .filter(|kw| !kw.trim().is_empty())
        .map(|kw| kw.to_lowercase())
        .find(|kw| haystacks.iter().any(|h| h.contains(kw.as_str())))
}
