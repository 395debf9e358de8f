//! Error handling for ChatWarden
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for ChatWarden application
#[derive(Error, Debug)]
pub enum ChatWardenError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Target not eligible: {0}")]
    TargetIneligible(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ChatWarden operations
pub type Result<T> = std::result::Result<T, ChatWardenError>;

impl ChatWardenError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ChatWardenError::Database(_) => false,
            ChatWardenError::Migration(_) => false,
            ChatWardenError::Telegram(_) => true,
            ChatWardenError::Config(_) => false,
            ChatWardenError::PermissionDenied(_) => false,
            ChatWardenError::InvalidInput(_) => false,
            ChatWardenError::TargetIneligible(_) => false,
            ChatWardenError::Serialization(_) => false,
            ChatWardenError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ChatWardenError::Database(_) => ErrorSeverity::Critical,
            ChatWardenError::Migration(_) => ErrorSeverity::Critical,
            ChatWardenError::Config(_) => ErrorSeverity::Critical,
            ChatWardenError::PermissionDenied(_) => ErrorSeverity::Warning,
            ChatWardenError::InvalidInput(_) => ErrorSeverity::Info,
            ChatWardenError::TargetIneligible(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
