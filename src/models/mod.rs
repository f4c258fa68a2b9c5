// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{JobPosting, ScoredMatch, MatchingConfig, ExperienceClaim, PlusMarker, RejectReason, Screening, Evaluation};
pub use requests::ScoreJobsRequest;
pub use responses::{ScoreJobsResponse, HealthResponse, ErrorResponse};
