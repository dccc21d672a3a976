use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Alert not found")]
    AlertNotFound,

    #[error("Pattern not found")]
    PatternNotFound,

    #[error("Invalid input: {0}")] InvalidInput(String),

    #[error("Upstream error: {0}")] Upstream(String),

    #[error("Store error: {0}")] Store(String),

    #[error("Notification error: {0}")] Notification(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
