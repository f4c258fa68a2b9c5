use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use validator::Validate;
use crate::core::Matcher;
use crate::models::{ErrorResponse, HealthResponse, JobPosting, ScoreJobsRequest, ScoreJobsResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_jobs));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score postings endpoint
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "resumeText": "string",
///   "postings": [{ "title": "...", "company": "...", "description": "...", "location": "...", "url": "..." }],
///   "excludeUrls": ["string"],
///   "limit": 20,
///   "config": { "keywords": ["python"] }
/// }
/// ```
async fn score_jobs(
    state: web::Data<AppState>,
    req: web::Json<ScoreJobsRequest>,
) -> impl Responder {
    // Validate request, including any per-request weights
    let validation = req
        .validate()
        .and_then(|_| req.config.as_ref().map_or(Ok(()), Validate::validate));
    if let Err(errors) = validation {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let limit = req.limit as usize;

    // Drop postings the client has already shown
    let exclude: HashSet<&str> = req.exclude_urls.iter().map(String::as_str).collect();
    let total = req.postings.len();
    let unseen: Vec<JobPosting> = req
        .postings
        .into_iter()
        .filter(|job| !exclude.contains(job.url.as_str()))
        .collect();
    let already_seen = total - unseen.len();

    // Per-request rules replace the server defaults
    let custom;
    let matcher = match req.config {
        Some(config) => {
            custom = Matcher::new(config);
            &custom
        }
        None => &state.matcher,
    };

    let mut result = matcher.match_jobs(&req.resume_text, &unseen);
    result.matches.truncate(limit);

    tracing::info!(
        "Returning {} matches (from {} candidates, {} rejected, {} already seen)",
        result.matches.len(),
        result.total_candidates,
        result.rejected,
        already_seen
    );

    HttpResponse::Ok().json(ScoreJobsResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
        rejected: result.rejected,
        already_seen,
    })
}
