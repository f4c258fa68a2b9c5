// Integration tests for Job Alert

use job_alert::config::Settings;
use job_alert::core::Matcher;
use job_alert::models::{Evaluation, JobPosting, MatchingConfig, RejectReason};
use job_alert::services::{ApifyClient, ApifyError, HistoryStore};
use job_alert::{match_jobs, DailyRun, PipelineError};
use serde_json::json;
use std::fs;

fn create_test_posting(id: &str, title: &str, description: &str) -> JobPosting {
    JobPosting {
        title: title.to_string(),
        company: "Acme".to_string(),
        description: description.to_string(),
        location: "Singapore".to_string(),
        posted_at: "Unknown".to_string(),
        url: format!("https://www.linkedin.com/jobs/view/{}", id),
    }
}

fn create_test_config() -> MatchingConfig {
    MatchingConfig {
        max_experience_years: 2,
        fresh_grad_boost_score: 10.0,
        keyword_match_score: 5.0,
        exclude_keywords: vec!["clearance".to_string(), "commission only".to_string()],
        seniority_keywords: vec!["senior".to_string(), "lead".to_string(), "manager".to_string()],
        fresh_grad_keywords: vec!["fresh graduate".to_string(), "entry level".to_string()],
        keywords: vec!["python".to_string(), "sql".to_string(), "react".to_string(), "docker".to_string()],
    }
}

const RESUME: &str = "Software engineer. Python, SQL, React and Docker projects. BSc Computer Science.";

#[test]
fn test_integration_end_to_end_matching() {
    let matcher = Matcher::new(create_test_config());

    let postings = vec![
        create_test_posting("1", "Software Engineer", "Python and SQL. 1 year of experience."),   // Good match
        create_test_posting("2", "Frontend Developer", "React, Docker."),                        // Good match
        create_test_posting("3", "Senior Software Engineer", "Python."),                         // Seniority
        create_test_posting("4", "Data Engineer", "Requires security clearance."),               // Excluded
        create_test_posting("5", "Backend Engineer", "3+ years of Python."),                     // Experience
        create_test_posting("6", "Graduate Engineer", "Fresh graduate? 3+ years is a plus."),    // Waived
        create_test_posting("7", "Platform Engineer", "Grow into a lead within 2 years."),       // Within guard
    ];

    let result = matcher.match_jobs(RESUME, &postings);

    let mut urls: Vec<&str> = result.matches.iter().map(|m| m.url.as_str()).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://www.linkedin.com/jobs/view/1",
            "https://www.linkedin.com/jobs/view/2",
            "https://www.linkedin.com/jobs/view/6",
            "https://www.linkedin.com/jobs/view/7",
        ]
    );
    assert_eq!(result.total_candidates, 7);
    assert_eq!(result.rejected, 3);

    // Sorted by score, all non-negative
    for pair in result.matches.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }
    assert!(result.matches.iter().all(|m| m.match_score >= 0.0));
}

#[test]
fn test_integration_excluded_regardless_of_score() {
    let matcher = Matcher::new(create_test_config());
    let job = create_test_posting(
        "1",
        "Entry Level Python SQL React Docker Engineer",
        "Fresh graduate, python sql react docker. Commission only.",
    );

    assert_eq!(
        matcher.evaluate(RESUME, &job),
        Evaluation::Rejected(RejectReason::ExcludedKeyword { keyword: "commission only".to_string() })
    );
}

#[test]
fn test_integration_fresh_grad_ranks_first() {
    let matcher = Matcher::new(create_test_config());
    let postings = vec![
        create_test_posting("1", "Software Engineer", "Python."),
        create_test_posting("2", "Software Engineer", "Python. Entry level role."),
    ];

    let result = matcher.match_jobs(RESUME, &postings);

    assert_eq!(result.matches[0].url, "https://www.linkedin.com/jobs/view/2");
    assert!(result.matches[0].match_score - result.matches[1].match_score >= 10.0);
}

#[test]
fn test_integration_match_jobs_wrapper_is_pure() {
    let config = create_test_config();
    let postings = vec![
        create_test_posting("1", "Software Engineer", "Python and SQL."),
        create_test_posting("2", "Software Engineer", "Docker."),
    ];

    let first = match_jobs(RESUME, &postings, &config);
    let second = match_jobs(RESUME, &postings, &config);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_integration_negative_weight_never_yields_negative_score() {
    let config = MatchingConfig {
        keyword_match_score: -5.0,
        keywords: vec!["python".to_string()],
        ..MatchingConfig::default()
    };
    let postings = vec![create_test_posting("1", "Python Developer", "Python services.")];

    let matches = match_jobs("python", &postings, &config);

    assert!(matches.iter().all(|m| m.match_score >= 0.0));
    assert!(matches.is_empty());
}

#[test]
fn test_integration_history_dedup_before_matching() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, r#"["https://www.linkedin.com/jobs/view/1"]"#).unwrap();

    let history = HistoryStore::open(&path);
    let postings = vec![
        create_test_posting("1", "Software Engineer", "Python."),
        create_test_posting("2", "Software Engineer", "Python."),
    ];

    let unseen = history.filter_unseen(postings);
    let matches = match_jobs(RESUME, &unseen, &create_test_config());

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].url, "https://www.linkedin.com/jobs/view/2");
}

fn apify_items() -> serde_json::Value {
    json!([
        {
            "title": "Junior Python Developer",
            "companyName": "Acme",
            "description": "<p>Python &amp; SQL. <b>Entry level</b>.</p>",
            "location": "Singapore",
            "postedAt": "1 day ago",
            "jobUrl": "https://www.linkedin.com/jobs/view/1?refId=a"
        },
        {
            "title": "Senior Python Developer",
            "companyName": "Globex",
            "descriptionText": "Python.",
            "location": "Singapore",
            "jobUrl": "https://www.linkedin.com/jobs/view/2?refId=b"
        },
        {
            "title": "React Developer",
            "companyName": "Initech",
            "description": "<div>React and Docker</div>",
            "location": "Remote",
            "link": "https://www.linkedin.com/jobs/view/3"
        }
    ])
}

fn test_settings(server_url: &str, dir: &std::path::Path) -> Settings {
    let mut settings = Settings::default();
    settings.matching = create_test_config();
    settings.apify.base_url = server_url.to_string();
    settings.apify.actor = "test-actor".to_string();
    settings.apify.token = "test-token".to_string();
    settings.apify.timeout_secs = 5;
    settings.resume.path = dir.join("resume.txt");
    settings.history.path = dir.join("history.json");
    settings
}

#[tokio::test]
async fn test_apify_fetch_postings() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/acts/test-actor/run-sync-get-dataset-items")
        .match_query(mockito::Matcher::UrlEncoded("token".into(), "test-token".into()))
        .match_body(mockito::Matcher::PartialJson(json!({ "count": 100, "scrapeCompany": true })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(apify_items().to_string())
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.url(), dir.path());
    let client = ApifyClient::new(&settings.apify).unwrap();

    let postings = client.fetch_postings().await.unwrap();

    mock.assert_async().await;
    assert_eq!(postings.len(), 3);
    assert_eq!(postings[0].url, "https://www.linkedin.com/jobs/view/1");
    assert!(postings[0].description.contains("Python & SQL"));
    assert_eq!(postings[1].description, "Python.");
    assert_eq!(postings[1].posted_at, "Unknown");
    assert_eq!(postings[2].url, "https://www.linkedin.com/jobs/view/3");
}

#[tokio::test]
async fn test_apify_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/acts/test-actor/run-sync-get-dataset-items")
        .match_query(mockito::Matcher::Any)
        .with_status(402)
        .with_body("monthly usage exceeded")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.url(), dir.path());
    let client = ApifyClient::new(&settings.apify).unwrap();

    match client.fetch_items().await {
        Err(ApifyError::ApiError { status, body }) => {
            assert_eq!(status.as_u16(), 402);
            assert_eq!(body, "monthly usage exceeded");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_daily_run_dry_run() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/acts/test-actor/run-sync-get-dataset-items")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(apify_items().to_string())
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.url(), dir.path());
    fs::write(&settings.resume.path, RESUME).unwrap();
    fs::write(&settings.history.path, r#"["https://www.linkedin.com/jobs/view/3"]"#).unwrap();

    let summary = DailyRun::new(&settings, true).execute().await.unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.unseen, 2);
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.delivered, 0);
    assert_eq!(summary.recorded, 0);

    // Dry runs leave history untouched
    let history = HistoryStore::open(&settings.history.path);
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_daily_run_without_credentials_skips_delivery() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/acts/test-actor/run-sync-get-dataset-items")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(apify_items().to_string())
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.url(), dir.path());
    fs::write(&settings.resume.path, RESUME).unwrap();

    let summary = DailyRun::new(&settings, false).execute().await.unwrap();

    assert_eq!(summary.matched, 2);
    assert_eq!(summary.delivered, 0);
    assert!(!settings.history.path.exists());
}

#[tokio::test]
async fn test_daily_run_empty_resume_stops_early() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/acts/test-actor/run-sync-get-dataset-items")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.url(), dir.path());
    fs::write(&settings.resume.path, "   \n").unwrap();

    let summary = DailyRun::new(&settings, false).execute().await.unwrap();

    mock.assert_async().await;
    assert_eq!(summary.fetched, 0);
}

#[tokio::test]
async fn test_daily_run_missing_resume() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings("http://127.0.0.1:9", dir.path());

    let result = DailyRun::new(&settings, false).execute().await;

    assert!(matches!(result, Err(PipelineError::Resume(_))));
}
