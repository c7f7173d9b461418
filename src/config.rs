use crate::error::{Result, TrackerError};
use config::{Config, Environment, File, FileFormat};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable that takes precedence over `email.password`
pub const PASSWORD_ENV: &str = "EMAIL_PASSWORD";

/// One year
pub const MAX_INTERVAL_HOURS: u64 = 24 * 366;

/// Fully resolved configuration for one process lifetime
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub sources: IndexMap<String, SourceConfig>,
    pub email: EmailConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub urls: Vec<SearchSpec>,
}

/// One saved search under a source
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchSpec {
    #[serde(default = "default_search_name")]
    pub name: String,
    pub url: Option<String>,
    #[serde(default)]
    pub criteria: Criteria,
}

/// Matching constraints; a missing field means no constraint
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Criteria {
    pub max_price: Option<u64>,
    pub min_price: Option<u64>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub receiver_email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

/// Politeness and timeout knobs for the fetcher, in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct ScrapingConfig {
    #[serde(default = "default_delay")]
    pub delay: f64,
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_true() -> bool {
    true
}

fn default_search_name() -> String {
    "Unnamed search".to_string()
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_interval_hours() -> u64 {
    1
}

fn default_delay() -> f64 {
    5.0
}

fn default_jitter() -> f64 {
    2.0
}

fn default_timeout() -> u64 {
    30
}

fn default_database_path() -> String {
    "ad_tracker.db".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            jitter: default_jitter(),
            timeout: default_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours.saturating_mul(60 * 60))
    }
}

impl Settings {
    /// Resolve settings from a YAML file, `APP__*` variables and the password
    /// override variable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TrackerError::Config(format!(
                "configuration file {} not found",
                path.display()
            )));
        }

        let builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .set_override_option("email.password", std::env::var(PASSWORD_ENV).ok())?;

        Self::from_config(builder.build()?)
    }

    /// Resolve settings from an in-memory YAML document, without environment
    /// overrides.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        debug!(
            sources = settings.sources.len(),
            interval_hours = settings.schedule.interval_hours,
            "Resolved configuration"
        );

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schedule.interval_hours == 0 {
            return Err(TrackerError::Config(
                "schedule.interval_hours must be at least 1".to_string(),
            ));
        }

        if self.schedule.interval_hours > MAX_INTERVAL_HOURS {
            return Err(TrackerError::Config(format!(
                "schedule.interval_hours must be at most {MAX_INTERVAL_HOURS}"
            )));
        }

        if self.scraping.delay < 0.0 || self.scraping.jitter < 0.0 {
            return Err(TrackerError::Config(
                "scraping.delay and scraping.jitter must not be negative".to_string(),
            ));
        }

        if self.email.enabled
            && (self.email.sender_email.is_empty() || self.email.receiver_email.is_empty())
        {
            return Err(TrackerError::Config(
                "email.sender_email and email.receiver_email are required when email is enabled"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
