// Service exports
pub mod apify;
pub mod history;
pub mod mailer;
pub mod resume;

pub use apify::{ApifyClient, ApifyError, normalize_items, strip_html, canonical_url};
pub use history::{HistoryStore, HistoryError};
pub use mailer::{Mailer, MailerError, render_digest, digest_subject};
pub use resume::{load_resume_text, ResumeError};
