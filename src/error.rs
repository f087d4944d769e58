use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid target `{0}`: enter a valid IP or domain")]
    InvalidTarget(String),
    #[error("invalid port range `{raw}`: {reason}")]
    InvalidRange { raw: String, reason: String },
    #[error("failed to start scan workers: {0}")]
    Startup(String),
}

impl ScanError {
    pub(crate) fn invalid_range(raw: &str, reason: impl Into<String>) -> Self {
        ScanError::InvalidRange {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}
