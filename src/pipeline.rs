use crate::config::Settings;
use crate::core::Matcher;
use crate::services::{
    load_resume_text, ApifyClient, ApifyError, HistoryError, HistoryStore, Mailer, MailerError,
    ResumeError,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a daily run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resume(#[from] ResumeError),

    #[error(transparent)]
    Apify(#[from] ApifyError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Mailer(#[from] MailerError),
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub fetched: usize,
    pub unseen: usize,
    pub matched: usize,
    pub delivered: usize,
    pub recorded: usize,
}

/// One invocation of the job-alert pipeline
///
/// resume -> fetch -> normalize -> history filter -> match -> email -> history
pub struct DailyRun<'a> {
    settings: &'a Settings,
    matcher: Matcher,
    dry_run: bool,
}

impl<'a> DailyRun<'a> {
    pub fn new(settings: &'a Settings, dry_run: bool) -> Self {
        Self {
            settings,
            matcher: Matcher::new(settings.matching.clone()),
            dry_run,
        }
    }

    pub async fn execute(&self) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::default();

        // 1. Resume
        let resume_text = load_resume_text(&self.settings.resume.path)?;
        if resume_text.trim().is_empty() {
            tracing::warn!(
                "Resume at {} has no extractable text, nothing to match against",
                self.settings.resume.path.display()
            );
            return Ok(summary);
        }

        // 2. Postings
        let client = ApifyClient::new(&self.settings.apify)?;
        let postings = client.fetch_postings().await?;
        summary.fetched = postings.len();
        if postings.is_empty() {
            tracing::info!("No jobs fetched, exiting");
            return Ok(summary);
        }

        // 3. Drop anything presented in an earlier run
        let mut history = HistoryStore::open(&self.settings.history.path);
        let unseen = history.filter_unseen(postings);
        summary.unseen = unseen.len();
        tracing::info!("Filtered out {} previously seen jobs", summary.fetched - summary.unseen);

        // 4. Match
        let result = self.matcher.match_jobs(&resume_text, &unseen);
        summary.matched = result.matches.len();
        tracing::info!(
            "Ranked {} jobs ({} rejected by filters)",
            result.matches.len(),
            result.rejected
        );

        // 5. Deliver, then remember exactly what was presented
        let limit = self.settings.delivery.top_results_limit;
        if self.dry_run {
            for job in result.matches.iter().take(limit) {
                tracing::info!("{:>6.1}  {} at {} ({})", job.match_score, job.title, job.company, job.url);
            }
            tracing::info!("Dry run: skipping email and history update");
            return Ok(summary);
        }

        if !self.settings.delivery.is_configured() {
            tracing::warn!("Skipping email send. Set EMAIL_USER and EMAIL_PASSWORD to send real emails");
            return Ok(summary);
        }

        let mailer = Mailer::new(&self.settings.delivery)?;
        summary.delivered = mailer.send_digest(&result.matches, limit).await?;

        let presented = &result.matches[..summary.delivered];
        summary.recorded = history.record(presented);
        history.save()?;
        tracing::info!("Updated history with {} new jobs", summary.recorded);

        Ok(summary)
    }
}
