use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Could not parse {source_name} page: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Listing {0} is already stored")]
    DuplicateKey(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Storage failures end the current run; everything else is recovered
    /// at the search or notification level.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::DuplicateKey(_))
    }
}

impl From<config::ConfigError> for TrackerError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<lettre::error::Error> for TrackerError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Notification(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for TrackerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::Notification(err.to_string())
    }
}

impl From<lettre::address::AddressError> for TrackerError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::Notification(err.to_string())
    }
}
