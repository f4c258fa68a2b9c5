use crate::config::DeliverySettings;
use crate::models::ScoredMatch;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt::Write;
use thiserror::Error;

/// Scores above this are highlighted as strong matches
const STRONG_MATCH_SCORE: f64 = 10.0;

/// Errors that can occur when sending the digest
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email credentials are not configured")]
    MissingCredentials,

    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP delivery of the daily digest
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    /// Build a STARTTLS transport for the configured account
    pub fn new(settings: &DeliverySettings) -> Result<Self, MailerError> {
        if !settings.is_configured() {
            return Err(MailerError::MissingCredentials);
        }

        let from: Mailbox = settings.username.parse()?;
        let to: Mailbox = if settings.recipient.is_empty() {
            from.clone()
        } else {
            settings.recipient.parse()?
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport, from, to })
    }

    /// Email the top `limit` matches; returns how many were included
    ///
    /// Nothing is sent for an empty match list.
    pub async fn send_digest(&self, matches: &[ScoredMatch], limit: usize) -> Result<usize, MailerError> {
        if matches.is_empty() {
            tracing::info!("No matches found to email");
            return Ok(0);
        }

        let included = matches.len().min(limit);
        tracing::info!("Sending email with top {} jobs to {}", included, self.to);

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(digest_subject(limit))
            .header(ContentType::TEXT_HTML)
            .body(render_digest(matches, limit))?;

        self.transport.send(message).await?;
        tracing::info!("Email sent successfully");

        Ok(included)
    }
}

pub fn digest_subject(limit: usize) -> String {
    format!("Your Daily Top {} Job Matches", limit)
}

/// HTML body listing the first `limit` matches
pub fn render_digest(matches: &[ScoredMatch], limit: usize) -> String {
    let mut html = String::from("<h2>🔥 Top matches for you today</h2><ul>");

    for job in matches.iter().take(limit) {
        let color = if job.match_score > STRONG_MATCH_SCORE { "green" } else { "orange" };
        let _ = write!(
            html,
            r#"
        <li style="margin-bottom: 20px;">
            <strong style="font-size: 16px;">
                <a href="{url}">{title}</a> at {company}
            </strong><br>
            <span style="color: {color}; font-weight: bold;">Score: {score:.1}</span> | {location}<br>
        </li>"#,
            url = escape_html(&job.url),
            title = escape_html(&job.title),
            company = escape_html(&job.company),
            color = color,
            score = job.match_score,
            location = escape_html(&job.location),
        );
    }

    html.push_str("</ul>");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(title: &str, score: f64) -> ScoredMatch {
        ScoredMatch {
            title: title.to_string(),
            company: "Acme & Sons".to_string(),
            location: "Singapore".to_string(),
            url: format!("https://jobs.example.com/{}", title.len()),
            match_score: score,
        }
    }

    #[test]
    fn test_render_digest_truncates() {
        let matches = vec![scored("A", 20.0), scored("BB", 12.0), scored("CCC", 3.0)];
        let html = render_digest(&matches, 2);

        assert_eq!(html.matches("<li").count(), 2);
        assert!(html.contains("Score: 20.0"));
        assert!(!html.contains("CCC"));
    }

    #[test]
    fn test_render_digest_colors() {
        let html = render_digest(&[scored("Strong", 10.5), scored("Weak", 10.0)], 10);
        assert_eq!(html.matches("color: green").count(), 1);
        assert_eq!(html.matches("color: orange").count(), 1);
    }

    #[test]
    fn test_render_digest_escapes() {
        let html = render_digest(&[scored("<script>", 1.0)], 10);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Acme &amp; Sons"));
    }

    #[test]
    fn test_subject() {
        assert_eq!(digest_subject(10), "Your Daily Top 10 Job Matches");
    }

    #[test]
    fn test_new_requires_credentials() {
        let settings = DeliverySettings::default();
        assert!(matches!(Mailer::new(&settings), Err(MailerError::MissingCredentials)));
    }

    #[test]
    fn test_new_rejects_bad_address() {
        let settings = DeliverySettings {
            username: "not-an-address".to_string(),
            password: "secret".to_string(),
            ..DeliverySettings::default()
        };
        assert!(matches!(Mailer::new(&settings), Err(MailerError::InvalidAddress(_))));
    }
}
