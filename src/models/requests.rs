use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{JobPosting, MatchingConfig};

/// Request to score a batch of postings against a resume
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreJobsRequest {
    #[serde(alias = "resume_text", rename = "resumeText", default)]
    pub resume_text: String,
    #[validate(length(max = 5000))]
    pub postings: Vec<JobPosting>,
    /// Urls already presented to the user; matching postings are skipped
    #[serde(alias = "exclude_urls", rename = "excludeUrls", default)]
    pub exclude_urls: Vec<String>,
    #[validate(range(min = 1, max = 500))]
    #[serde(default = "default_limit")]
    pub limit: u16,
    /// Per-request override of the server's matching rules
    #[serde(default)]
    pub config: Option<MatchingConfig>,
}

fn default_limit() -> u16 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let req: ScoreJobsRequest = serde_json::from_str(
            r#"{"resumeText": "rust", "postings": [{"title": "Engineer", "url": "https://x/1"}]}"#,
        )
        .unwrap();
        assert_eq!(req.limit, 20);
        assert!(req.exclude_urls.is_empty());
        assert!(req.config.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_postings_allowed() {
        let req: ScoreJobsRequest =
            serde_json::from_str(r#"{"resumeText": "rust", "postings": []}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_limit_out_of_range() {
        let req: ScoreJobsRequest = serde_json::from_str(
            r#"{"resumeText": "rust", "postings": [{"title": "Engineer"}], "limit": 0}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
