use crate::config::ApifySettings;
use crate::models::JobPosting;
use reqwest::{Client, StatusCode};
use scraper::Html;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Apify
#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error {status}: {body}")]
    ApiError { status: StatusCode, body: String },

    #[error("Missing Apify token")]
    MissingToken,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Actor input for the LinkedIn jobs scraper
#[derive(Debug, Clone, Serialize)]
struct ActorInput<'a> {
    count: u32,
    #[serde(rename = "scrapeCompany")]
    scrape_company: bool,
    urls: &'a [String],
}

/// Apify API client
///
/// Runs the scraping actor synchronously and returns its dataset items.
pub struct ApifyClient {
    base_url: String,
    actor: String,
    token: String,
    job_queries: Vec<String>,
    max_items: u32,
    scrape_company: bool,
    client: Client,
}

impl ApifyClient {
    /// Create a new Apify client
    pub fn new(settings: &ApifySettings) -> Result<Self, ApifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            actor: settings.actor.clone(),
            token: settings.token.clone(),
            job_queries: settings.job_queries.clone(),
            max_items: settings.max_items,
            scrape_company: settings.scrape_company,
            client,
        })
    }

    /// Run the actor and return the raw dataset items
    pub async fn fetch_items(&self) -> Result<Vec<Value>, ApifyError> {
        if self.token.is_empty() {
            return Err(ApifyError::MissingToken);
        }

        let url = format!(
            "{}/acts/{}/run-sync-get-dataset-items?token={}",
            self.base_url.trim_end_matches('/'),
            self.actor,
            urlencoding::encode(&self.token)
        );

        let input = ActorInput {
            count: self.max_items,
            scrape_company: self.scrape_company,
            urls: &self.job_queries,
        };

        tracing::info!(
            "Fetching up to {} jobs from Apify actor {} ({} queries)",
            self.max_items,
            self.actor,
            self.job_queries.len()
        );

        let response = self.client.post(&url).json(&input).send().await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(ApifyError::ApiError { status, body });
        }

        let json: Value = response.json().await?;
        match json {
            Value::Array(items) => Ok(items),
            other => Err(ApifyError::InvalidResponse(format!(
                "Expected an array of dataset items, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Fetch and normalize in one step
    pub async fn fetch_postings(&self) -> Result<Vec<JobPosting>, ApifyError> {
        let items = self.fetch_items().await?;
        tracing::info!("Fetched {} raw jobs from Apify", items.len());
        Ok(normalize_items(&items))
    }
}

/// Map raw scraper items onto postings
///
/// Strips HTML from the description and drops the query string from the url
/// so repeat sightings of a job share one identity.
pub fn normalize_items(items: &[Value]) -> Vec<JobPosting> {
    items.iter().map(normalize_item).collect()
}

fn normalize_item(item: &Value) -> JobPosting {
    let raw_description = first_text(item, &["description", "descriptionText"]);
    let description = if raw_description.is_empty() {
        String::new()
    } else {
        strip_html(raw_description)
    };

    let raw_url = first_text(item, &["jobUrl", "url", "link", "applyUrl"]);
    let url = if raw_url.is_empty() { "#" } else { canonical_url(raw_url) };

    let posted_at = match text_field(item, "postedAt") {
        "" => "Unknown",
        posted => posted,
    };

    JobPosting {
        title: text_field(item, "title").to_string(),
        company: text_field(item, "companyName").to_string(),
        description,
        location: text_field(item, "location").to_string(),
        posted_at: posted_at.to_string(),
        url: url.to_string(),
    }
}

/// Text content of an HTML fragment, text nodes joined by a space
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Everything before the first '?'
#[inline]
pub fn canonical_url(raw: &str) -> &str {
    raw.split('?').next().unwrap_or(raw)
}

#[inline]
fn text_field<'a>(item: &'a Value, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or("")
}

fn first_text<'a>(item: &'a Value, keys: &[&str]) -> &'a str {
    keys.iter()
        .map(|key| text_field(item, key))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
