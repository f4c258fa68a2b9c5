use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single job listing as handed to the matcher
///
/// The description is plain text (HTML already stripped) and the url is
/// canonical (query string removed). The url is the posting's identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(rename = "postedAt", default = "default_posted_at", deserialize_with = "null_as_unknown")]
    pub posted_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

fn default_posted_at() -> String { "Unknown".to_string() }

fn null_as_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_posted_at))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scored match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
}

impl ScoredMatch {
    pub fn from_posting(job: &JobPosting, match_score: f64) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            url: job.url.clone(),
            match_score,
        }
    }
}

/// Matching rules for one run
///
/// Every field is optional when deserialized; absent fields take the
/// documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Postings asking for this many years or more are rejected
    pub max_experience_years: u32,
    pub fresh_grad_boost_score: f64,
    pub keyword_match_score: f64,
    pub exclude_keywords: Vec<String>,
    pub seniority_keywords: Vec<String>,
    pub fresh_grad_keywords: Vec<String>,
    /// Skill and role terms, matched as whole words
    pub keywords: Vec<String>,
}

/// Weights must be finite and non-negative so every score stays at or above zero
impl Validate for MatchingConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let weights = [
            ("fresh_grad_boost_score", self.fresh_grad_boost_score),
            ("keyword_match_score", self.keyword_match_score),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                let mut error = ValidationError::new("weight");
                error.message = Some(Cow::from("must be a finite number >= 0"));
                errors.add(field, error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_experience_years: 2,
            fresh_grad_boost_score: 10.0,
            keyword_match_score: 5.0,
            exclude_keywords: vec![],
            seniority_keywords: vec![],
            fresh_grad_keywords: vec![],
            keywords: vec![],
        }
    }
}

/// A stated years-of-experience requirement found in a description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceClaim {
    /// Lower bound, the value the experience filter compares
    pub min_years: u32,
    /// Upper bound of a range such as "3-5 years"
    pub max_years: Option<u32>,
    pub plus_marker: Option<PlusMarker>,
    /// Byte offset of the match in the scanned text
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlusMarker {
    Symbol,
    Plus,
    OrMore,
}

/// Why a posting was filtered out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    ExcludedKeyword { keyword: String },
    Seniority { keyword: String },
    Experience { years: u32 },
    /// Scored below zero; only reachable with weights that skip validation
    NegativeScore,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::ExcludedKeyword { keyword } => write!(f, "excluded keyword '{}'", keyword),
            RejectReason::Seniority { keyword } => write!(f, "seniority keyword '{}' in title", keyword),
            RejectReason::Experience { years } => write!(f, "requires {} years of experience", years),
            RejectReason::NegativeScore => write!(f, "score below zero"),
        }
    }
}

/// Outcome of screening a posting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    Pass,
    Reject(RejectReason),
}

/// Outcome of screening and scoring a posting
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Accepted { score: f64 },
    Rejected(RejectReason),
}

impl Evaluation {
    pub fn score(&self) -> Option<f64> {
        match self {
            Evaluation::Accepted { score } => Some(*score),
            Evaluation::Rejected(_) => None,
        }
    }
}
