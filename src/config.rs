use crate::models::MatchingConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub matching: MatchingConfig,
    pub apify: ApifySettings,
    pub delivery: DeliverySettings,
    pub resume: ResumeSettings,
    pub history: HistorySettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApifySettings {
    pub base_url: String,
    pub actor: String,
    pub token: String,
    /// LinkedIn search urls handed to the scraper
    pub job_queries: Vec<String>,
    pub max_items: u32,
    pub scrape_company: bool,
    pub timeout_secs: u64,
}

impl Default for ApifySettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.apify.com/v2".to_string(),
            actor: "curious_coder~linkedin-jobs-scraper".to_string(),
            token: String::new(),
            job_queries: vec![],
            max_items: 100,
            scrape_company: true,
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    pub top_results_limit: usize,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Defaults to the sending account when empty
    pub recipient: String,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            top_results_limit: 10,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            recipient: String::new(),
        }
    }
}

impl DeliverySettings {
    /// Email goes out only when both credentials are set
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResumeSettings {
    pub path: PathBuf,
}

impl Default for ResumeSettings {
    fn default() -> Self {
        Self { path: PathBuf::from("resume.pdf") }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub path: PathBuf,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { path: PathBuf::from("job_history.json") }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. An explicit file, if given
    /// 5. Environment variables (prefixed with JOBALERT__)
    /// 6. Secrets: APIFY_TOKEN, EMAIL_USER, EMAIL_PASSWORD
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        // e.g., JOBALERT__DELIVERY__TOP_RESULTS_LIMIT -> delivery.top_results_limit
        let settings = builder
            .add_source(
                Environment::with_prefix("JOBALERT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_secrets(settings, |key| std::env::var(key).ok())?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from a single file, without environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.matching
            .validate()
            .map_err(|errors| ConfigError::Message(format!("invalid [matching] weights: {}", errors)))?;
        Ok(self)
    }
}

/// Overlay credentials kept outside config files
///
/// Values are trimmed; spaces inside the email password are removed since
/// app passwords are often pasted in groups of four.
fn substitute_secrets<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(token) = lookup("APIFY_TOKEN") {
        builder = builder.set_override("apify.token", token.trim().to_string())?;
    }
    if let Some(user) = lookup("EMAIL_USER") {
        builder = builder.set_override("delivery.username", user.trim().to_string())?;
    }
    if let Some(password) = lookup("EMAIL_PASSWORD") {
        builder = builder.set_override("delivery.password", password.replace(' ', ""))?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.matching.max_experience_years, 2);
        assert_eq!(settings.apify.max_items, 100);
        assert!(settings.apify.scrape_company);
        assert_eq!(settings.delivery.top_results_limit, 10);
        assert_eq!(settings.history.path, PathBuf::from("job_history.json"));
        assert!(!settings.delivery.is_configured());
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "compact");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [matching]
            keywords = ["rust", "python"]

            [delivery]
            top_results_limit = 5
            "#,
        )
        .unwrap();

        assert_eq!(settings.matching.keywords, vec!["rust", "python"]);
        assert_eq!(settings.matching.keyword_match_score, 5.0);
        assert_eq!(settings.delivery.top_results_limit, 5);
        assert_eq!(settings.delivery.smtp_port, 587);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matching]\nmax_experience_years = 3\n\n[history]\npath = \"seen.json\"").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.matching.max_experience_years, 3);
        assert_eq!(settings.history.path, PathBuf::from("seen.json"));
    }

    #[test]
    fn test_load_from_rejects_negative_weight() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matching]\nkeyword_match_score = -5.0").unwrap();

        let err = Settings::load_from(file.path()).unwrap_err();

        assert!(err.to_string().contains("keyword_match_score"));
    }

    #[test]
    fn test_load_from_rejects_nan_weight() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matching]\nfresh_grad_boost_score = nan").unwrap();

        assert!(Settings::load_from(file.path()).is_err());
    }

    #[test]
    fn test_substitute_secrets() {
        let base = Config::builder().build().unwrap();
        let settings: Settings = substitute_secrets(base, |key| match key {
            "APIFY_TOKEN" => Some(" apify_api_123 \n".to_string()),
            "EMAIL_USER" => Some("me@example.com".to_string()),
            "EMAIL_PASSWORD" => Some("abcd efgh ijkl mnop".to_string()),
            _ => None,
        })
        .unwrap()
        .try_deserialize()
        .unwrap();

        assert_eq!(settings.apify.token, "apify_api_123");
        assert_eq!(settings.delivery.username, "me@example.com");
        assert_eq!(settings.delivery.password, "abcdefghijklmnop");
        assert!(settings.delivery.is_configured());
    }
}
