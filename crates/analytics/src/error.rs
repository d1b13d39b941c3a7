use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid reporting parameter '{0}': {1}")]
    InvalidParameter(String, String),
}
