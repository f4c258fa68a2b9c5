// Core algorithm exports
pub mod experience;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use experience::{extract_experience_claims, ExperienceClaims};
pub use filters::{screen_posting, is_fresh_grad, disqualifying_experience};
pub use matcher::{Matcher, MatchResult};
pub use normalize::normalize;
pub use scoring::{calculate_match_score, KeywordPatterns};
